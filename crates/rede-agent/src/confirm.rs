// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pending "replace the active session?" prompts.
//!
//! A prompt is advisory UI state: it never touches a session by itself.
//! Confirming hands the proposal back to the caller, while cancelling or
//! letting it time out just drops it.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use rede_core::{ConversationKey, Status, UserId};
use rede_intent::StatusIntent;
use tracing::debug;

/// A proposal to replace the active session for a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReplace {
    pub requester: UserId,
    pub intent: StatusIntent,
    pub proposed: Status,
    pub expires_at: DateTime<Utc>,
}

/// Why a confirmation could not be taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmRefusal {
    /// No open prompt for the conversation (never asked, or expired).
    NoPending,
    /// Someone other than the requester tried to confirm.
    NotRequester,
}

/// Open prompts, at most one per conversation.
#[derive(Debug)]
pub struct ConfirmationBook {
    pending: BTreeMap<ConversationKey, PendingReplace>,
    timeout: Duration,
}

impl ConfirmationBook {
    pub fn new(timeout: Duration) -> Self {
        Self {
            pending: BTreeMap::new(),
            timeout,
        }
    }

    /// Opens a prompt, superseding any earlier prompt for the same key.
    pub fn request(
        &mut self,
        key: ConversationKey,
        requester: UserId,
        intent: StatusIntent,
        proposed: Status,
        now: DateTime<Utc>,
    ) -> PendingReplace {
        let expires_at = now.checked_add_signed(self.timeout).unwrap_or(DateTime::<Utc>::MAX_UTC);
        let pending = PendingReplace {
            requester,
            intent,
            proposed,
            expires_at,
        };
        debug!(key = %key, requester = %pending.requester, %expires_at, "replace prompt opened");
        self.pending.insert(key, pending.clone());
        pending
    }

    pub fn get(&self, key: &ConversationKey) -> Option<&PendingReplace> {
        self.pending.get(key)
    }

    /// Removes and returns the prompt if `who` opened it and it is still live.
    pub fn take(
        &mut self,
        key: &ConversationKey,
        who: &UserId,
        now: DateTime<Utc>,
    ) -> Result<PendingReplace, ConfirmRefusal> {
        let pending = self
            .pending
            .get(key)
            .filter(|p| p.expires_at > now)
            .ok_or(ConfirmRefusal::NoPending)?;
        if &pending.requester != who {
            return Err(ConfirmRefusal::NotRequester);
        }
        self.pending.remove(key).ok_or(ConfirmRefusal::NoPending)
    }

    /// Drops the prompt if `who` opened it.
    pub fn cancel(&mut self, key: &ConversationKey, who: &UserId) -> bool {
        if self.pending.get(key).is_some_and(|p| &p.requester == who) {
            self.pending.remove(key);
            debug!(key = %key, "replace prompt cancelled");
            return true;
        }
        false
    }

    /// Removes and returns every prompt whose deadline has passed.
    pub fn expire(&mut self, now: DateTime<Utc>) -> Vec<(ConversationKey, PendingReplace)> {
        let expired: Vec<ConversationKey> = self
            .pending
            .iter()
            .filter(|(_, p)| p.expires_at <= now)
            .map(|(key, _)| key.clone())
            .collect();
        expired
            .into_iter()
            .filter_map(|key| self.pending.remove(&key).map(|p| (key, p)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
