// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Role-membership collaborator that records calls for assertion.
//!
//! Role updates are applied by a background worker, so tests use
//! [`RecordingRoles::wait_for_calls`] rather than reading the list right
//! after the triggering command.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use rede_core::{AdapterType, GuildId, HealthStatus, PluginAdapter, RedeError, RoleMembership, UserId};

/// One recorded `set_available_role_membership` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleCall {
    pub guild: GuildId,
    pub user: UserId,
    pub member: bool,
}

#[derive(Debug, Default)]
pub struct RecordingRoles {
    calls: Arc<Mutex<Vec<RoleCall>>>,
    failing: AtomicBool,
    join_delay_ms: AtomicU64,
}

impl RecordingRoles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records calls but reports failure for each of them.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Makes every `member = true` call wait `delay` before it is recorded.
    pub fn set_join_delay(&self, delay: Duration) {
        let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.join_delay_ms.store(millis, Ordering::SeqCst);
    }

    pub async fn calls(&self) -> Vec<RoleCall> {
        self.calls.lock().await.clone()
    }

    /// Waits until at least `count` calls were recorded, giving up after
    /// `timeout`. Returns whatever was recorded.
    pub async fn wait_for_calls(&self, count: usize, timeout: Duration) -> Vec<RoleCall> {
        let poll = async {
            loop {
                {
                    let calls = self.calls.lock().await;
                    if calls.len() >= count {
                        return;
                    }
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        };
        let _ = tokio::time::timeout(timeout, poll).await;
        self.calls().await
    }
}

#[async_trait]
impl PluginAdapter for RecordingRoles {
    fn name(&self) -> &str {
        "recording-roles"
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
impl RoleMembership for RecordingRoles {
    async fn set_available_role_membership(
        &self,
        guild: &GuildId,
        user: &UserId,
        member: bool,
    ) -> Result<(), RedeError> {
        let delay = self.join_delay_ms.load(Ordering::SeqCst);
        if member && delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        self.calls.lock().await.push(RoleCall {
            guild: guild.clone(),
            user: user.clone(),
            member,
        });
        if self.failing.load(Ordering::SeqCst) {
            return Err(RedeError::RoleMembership {
                message: format!("refusing role change for {user}"),
                source: None,
            });
        }
        Ok(())
    }
}
