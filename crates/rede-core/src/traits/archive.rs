// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage for finished sessions.

use async_trait::async_trait;

use crate::error::RedeError;
use crate::session::Session;
use crate::traits::adapter::PluginAdapter;

/// Receives a full session (including its complete status log) before the
/// registry lets go of it.
///
/// The registry removes a session only after `archive` returns `Ok`, so an
/// implementation that fails leaves the session in place for a later retry.
#[async_trait]
pub trait SessionArchive: PluginAdapter {
    async fn archive(&self, session: &Session) -> Result<(), RedeError>;
}
