// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for rede.
//!
//! Only genuine faults live here. Routine outcomes such as a rejected status
//! update or an unrecognized trigger are returned as values.

use thiserror::Error;

use crate::types::ConversationKey;

/// The primary error type shared by the rede crates.
#[derive(Debug, Error)]
pub enum RedeError {
    /// Configuration errors (invalid TOML, failed validation).
    #[error("configuration error: {0}")]
    Config(String),

    /// The archive collaborator failed to store a session.
    #[error("archive error: {source}")]
    Archive {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The role-membership collaborator failed to apply a change.
    #[error("role membership error: {message}")]
    RoleMembership {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// No active session exists for the conversation.
    #[error("no active session for {key}")]
    SessionNotFound { key: ConversationKey },

    /// No pending replace confirmation exists for the conversation.
    #[error("no pending confirmation for {key}")]
    ConfirmationNotFound { key: ConversationKey },

    /// The session loop has stopped and no longer accepts commands.
    #[error("session loop is closed")]
    LoopClosed,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RedeError {
    /// Wraps any error as an archive failure.
    pub fn archive(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Archive {
            source: Box::new(err),
        }
    }
}
