// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Events published by the session engine.
//!
//! Everything the excluded messaging layer needs to keep its own UI in
//! sync arrives as one of these. Events describe state that has already
//! been committed; consumers cannot veto them.

use chrono::{DateTime, Utc};
use rede_core::{ConversationKey, GuildId, LatenessTier, MessagePool, Status, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An event with its identity and the instant it was committed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusEnvelope {
    pub id: Uuid,
    pub at: DateTime<Utc>,
    pub event: RedeEvent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RedeEvent {
    SessionCreated {
        key: ConversationKey,
        creator: UserId,
        status: Status,
    },
    SessionReplaced {
        key: ConversationKey,
        previous_creator: UserId,
        creator: UserId,
        status: Status,
    },
    SessionExpired {
        key: ConversationKey,
    },
    SessionDeleted {
        key: ConversationKey,
    },
    StatusChanged {
        key: ConversationKey,
        participant: UserId,
        status: Status,
    },
    /// A participant reached a new lateness tier.
    Lateness {
        key: ConversationKey,
        participant: UserId,
        tier: LatenessTier,
        /// Pool to sample one message from, if the tier sends one.
        pool: Option<MessagePool>,
        /// Offer the participant the reminder buttons.
        nudge: bool,
    },
    /// A role membership change was dispatched.
    RoleChange {
        guild: GuildId,
        user: UserId,
        member: bool,
    },
    ReplaceRequested {
        key: ConversationKey,
        requester: UserId,
        proposed: Status,
        expires_at: DateTime<Utc>,
    },
    ReplaceCancelled {
        key: ConversationKey,
        requester: UserId,
    },
    ConfirmationExpired {
        key: ConversationKey,
        requester: UserId,
    },
}

impl RedeEvent {
    /// Short stable name used in logs.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::SessionCreated { .. } => "session_created",
            Self::SessionReplaced { .. } => "session_replaced",
            Self::SessionExpired { .. } => "session_expired",
            Self::SessionDeleted { .. } => "session_deleted",
            Self::StatusChanged { .. } => "status_changed",
            Self::Lateness { .. } => "lateness",
            Self::RoleChange { .. } => "role_change",
            Self::ReplaceRequested { .. } => "replace_requested",
            Self::ReplaceCancelled { .. } => "replace_cancelled",
            Self::ConfirmationExpired { .. } => "confirmation_expired",
        }
    }

    /// The conversation the event belongs to, if it is conversation-scoped.
    pub fn key(&self) -> Option<&ConversationKey> {
        match self {
            Self::SessionCreated { key, .. }
            | Self::SessionReplaced { key, .. }
            | Self::SessionExpired { key }
            | Self::SessionDeleted { key }
            | Self::StatusChanged { key, .. }
            | Self::Lateness { key, .. }
            | Self::ReplaceRequested { key, .. }
            | Self::ReplaceCancelled { key, .. }
            | Self::ConfirmationExpired { key, .. } => Some(key),
            Self::RoleChange { .. } => None,
        }
    }
}
