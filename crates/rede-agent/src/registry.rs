// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The table of active sessions, one per conversation.
//!
//! A session leaves the registry only after the archive collaborator has
//! accepted it. When archiving fails the session stays put and the next
//! sweep (or delete) tries again, so history is never dropped silently.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rede_core::{
    AvailabilityLevel, ConversationKey, GuildId, RedeError, Session, SessionArchive, Status,
    UserId,
};
use tracing::{debug, info, warn};

use crate::lateness::{self, LatenessEvent, LatenessThresholds};
use crate::status_engine;

/// Result of asking for a new session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    Created,
    /// A session is already active for the key; nothing changed.
    AlreadyActive,
}

/// Everything one sweep did.
#[derive(Debug, Default)]
pub struct SweepReport {
    pub lateness: Vec<(ConversationKey, LatenessEvent)>,
    pub expired: Vec<ConversationKey>,
    /// Expired sessions kept because the archive refused them.
    pub archive_failures: Vec<ConversationKey>,
}

impl SweepReport {
    pub fn is_empty(&self) -> bool {
        self.lateness.is_empty() && self.expired.is_empty() && self.archive_failures.is_empty()
    }
}

/// Owner of all active sessions.
pub struct SessionRegistry {
    sessions: BTreeMap<ConversationKey, Session>,
    archive: Arc<dyn SessionArchive>,
    ttl: Duration,
    thresholds: LatenessThresholds,
    default_participants: Vec<UserId>,
}

impl SessionRegistry {
    pub fn new(archive: Arc<dyn SessionArchive>, ttl: Duration, thresholds: LatenessThresholds) -> Self {
        Self {
            sessions: BTreeMap::new(),
            archive,
            ttl,
            thresholds,
            default_participants: Vec::new(),
        }
    }

    /// Participants seeded as `Unknown` in every new session.
    pub fn with_default_participants(mut self, participants: Vec<UserId>) -> Self {
        self.default_participants = participants;
        self
    }

    pub fn get(&self, key: &ConversationKey) -> Option<&Session> {
        self.sessions.get(key)
    }

    pub fn get_mut(&mut self, key: &ConversationKey) -> Option<&mut Session> {
        self.sessions.get_mut(key)
    }

    pub fn contains(&self, key: &ConversationKey) -> bool {
        self.sessions.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &ConversationKey> {
        self.sessions.keys()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Creates a session for `key` seeded with the creator's status, unless
    /// one is already active.
    pub fn start_session(
        &mut self,
        key: ConversationKey,
        creator: UserId,
        status: Status,
        now: DateTime<Utc>,
    ) -> StartOutcome {
        if self.sessions.contains_key(&key) {
            debug!(key = %key, "session already active");
            return StartOutcome::AlreadyActive;
        }

        info!(key = %key, creator = %creator, level = %status.level(), "session created");
        let session = Session::new(
            key.clone(),
            creator,
            status,
            self.default_participants.iter().cloned(),
            now,
        );
        self.sessions.insert(key, session);
        StartOutcome::Created
    }

    /// Archives the active session for `key` (if any) and starts a new one.
    ///
    /// Returns the archived session. Only call this after the requester has
    /// confirmed; the registry never overwrites on its own.
    pub async fn replace_session(
        &mut self,
        key: ConversationKey,
        creator: UserId,
        status: Status,
        now: DateTime<Utc>,
    ) -> Result<Option<Session>, RedeError> {
        let previous = self.archive_and_remove(&key).await?;
        if previous.is_some() {
            info!(key = %key, creator = %creator, "session replaced");
        }
        self.start_session(key, creator, status, now);
        Ok(previous)
    }

    /// Archives and removes the session for `key`.
    pub async fn delete_session(&mut self, key: &ConversationKey) -> Result<Session, RedeError> {
        match self.archive_and_remove(key).await? {
            Some(session) => {
                info!(key = %key, "session deleted");
                Ok(session)
            }
            None => Err(RedeError::SessionNotFound { key: key.clone() }),
        }
    }

    /// Runs the lateness monitor over every session, then expires sessions
    /// older than the TTL.
    pub async fn sweep(&mut self, now: DateTime<Utc>) -> SweepReport {
        let mut report = SweepReport::default();

        for (key, session) in &mut self.sessions {
            for event in lateness::evaluate(session, &self.thresholds, now) {
                report.lateness.push((key.clone(), event));
            }
        }

        let expired: Vec<ConversationKey> = self
            .sessions
            .iter()
            .filter(|(_, session)| session.is_expired(now, self.ttl))
            .map(|(key, _)| key.clone())
            .collect();

        for key in expired {
            match self.archive_and_remove(&key).await {
                Ok(_) => {
                    info!(key = %key, "session expired");
                    report.expired.push(key);
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "failed to archive expired session, will retry");
                    report.archive_failures.push(key);
                }
            }
        }

        report
    }

    /// Applies a tracked-venue presence change to every session in `guild`.
    ///
    /// Joining sets `Ready`, leaving sets `Done`, and moving between tracked
    /// venues (both flags) changes nothing. Returns the sessions whose
    /// status actually changed.
    pub fn apply_presence(
        &mut self,
        guild: &GuildId,
        user: &UserId,
        left: bool,
        joined: bool,
        now: DateTime<Utc>,
    ) -> Vec<(ConversationKey, Status)> {
        let level = match (left, joined) {
            (true, true) | (false, false) => return Vec::new(),
            (false, true) => AvailabilityLevel::Ready,
            (true, false) => AvailabilityLevel::Done,
        };

        let mut changed = Vec::new();
        for (key, session) in self.sessions.iter_mut().filter(|(key, _)| &key.guild == guild) {
            let status = Status::new(level, now);
            if status_engine::apply_status(session, user, status.clone(), now) {
                changed.push((key.clone(), status));
            }
        }
        changed
    }

    async fn archive_and_remove(
        &mut self,
        key: &ConversationKey,
    ) -> Result<Option<Session>, RedeError> {
        let Some(session) = self.sessions.get(key) else {
            return Ok(None);
        };
        self.archive.archive(session).await?;
        debug!(key = %key, entries = session.status_log().len(), "session archived");
        Ok(self.sessions.remove(key))
    }
}
