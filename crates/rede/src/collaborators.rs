// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborators used when rede runs without a chat platform.
//!
//! The archive writes each finished session to the log as JSON and the
//! role collaborator only logs what it would have changed.

use async_trait::async_trait;
use rede_core::{
    AdapterType, GuildId, HealthStatus, PluginAdapter, RedeError, RoleMembership, Session,
    SessionArchive, UserId,
};
use tracing::info;

/// Archives sessions by logging them.
#[derive(Debug, Default)]
pub struct LogArchive;

#[async_trait]
impl PluginAdapter for LogArchive {
    fn name(&self) -> &str {
        "log-archive"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Archive
    }

    async fn health_check(&self) -> Result<HealthStatus, RedeError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), RedeError> {
        Ok(())
    }
}

#[async_trait]
impl SessionArchive for LogArchive {
    async fn archive(&self, session: &Session) -> Result<(), RedeError> {
        let json = serde_json::to_string(session).map_err(RedeError::archive)?;
        info!(
            key = %session.key(),
            entries = session.status_log().len(),
            session = json.as_str(),
            "session archived"
        );
        Ok(())
    }
}

/// Logs role membership changes instead of applying them.
#[derive(Debug, Default)]
pub struct LogRoles;

#[async_trait]
impl PluginAdapter for LogRoles {
    fn name(&self) -> &str {
        "log-roles"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::RoleMembership
    }

    async fn health_check(&self) -> Result<HealthStatus, RedeError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), RedeError> {
        Ok(())
    }
}

#[async_trait]
impl RoleMembership for LogRoles {
    async fn set_available_role_membership(
        &self,
        guild: &GuildId,
        user: &UserId,
        member: bool,
    ) -> Result<(), RedeError> {
        info!(guild = %guild, user = %user, member, "availability role updated");
        Ok(())
    }
}
