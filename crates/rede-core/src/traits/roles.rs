// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Guild role membership for participants who are (or will be) available.

use async_trait::async_trait;

use crate::error::RedeError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{GuildId, UserId};

/// Adds or removes the "available" role for a user in a guild.
///
/// Calls are fire-and-forget from the session engine's point of view: the
/// result is logged and never changes session state.
#[async_trait]
pub trait RoleMembership: PluginAdapter {
    async fn set_available_role_membership(
        &self,
        guild: &GuildId,
        user: &UserId,
        member: bool,
    ) -> Result<(), RedeError>;
}
