// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-conversation scheduling request and its status history.
//!
//! Every status change is appended to a single ordered log; the current
//! status of a participant is an index into that log. Entries are never
//! replaced, which keeps the full history available for archival and
//! timeline replay. The only in-place bookkeeping is the lateness tier and
//! reminder counter of a participant's current entry.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Duration, DurationRound, Utc};
use serde::{Deserialize, Serialize};

use crate::status::Status;
use crate::types::{AvailabilityLevel, ConversationKey, LatenessTier, UserId};

/// One appended status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub participant: UserId,
    pub status: Status,
}

/// An active group-scheduling request for a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    key: ConversationKey,
    creator: UserId,
    participants: BTreeSet<UserId>,
    status_log: Vec<LogEntry>,
    current: BTreeMap<UserId, usize>,
    created_at: DateTime<Utc>,
    last_updated_at: DateTime<Utc>,
    #[serde(default)]
    message_refs: Vec<String>,
}

impl Session {
    /// Creates a session with the creator's status seeded first and every
    /// other known participant defaulted to `Unknown`.
    pub fn new(
        key: ConversationKey,
        creator: UserId,
        creator_status: Status,
        known_participants: impl IntoIterator<Item = UserId>,
        now: DateTime<Utc>,
    ) -> Self {
        let mut session = Self {
            key,
            creator: creator.clone(),
            participants: BTreeSet::new(),
            status_log: Vec::new(),
            current: BTreeMap::new(),
            created_at: now,
            last_updated_at: now,
            message_refs: Vec::new(),
        };
        session.append_status(creator.clone(), creator_status, now);
        for participant in known_participants {
            if participant != creator && !session.participants.contains(&participant) {
                session.append_status(
                    participant,
                    Status::new(AvailabilityLevel::Unknown, now),
                    now,
                );
            }
        }
        session
    }

    pub fn key(&self) -> &ConversationKey {
        &self.key
    }

    pub fn creator(&self) -> &UserId {
        &self.creator
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_updated_at(&self) -> DateTime<Utc> {
        self.last_updated_at
    }

    pub fn status_log(&self) -> &[LogEntry] {
        &self.status_log
    }

    pub fn message_refs(&self) -> &[String] {
        &self.message_refs
    }

    /// Participants with the creator first, then the rest in id order.
    pub fn participants(&self) -> impl Iterator<Item = &UserId> {
        std::iter::once(&self.creator).chain(
            self.participants
                .iter()
                .filter(move |p| **p != self.creator),
        )
    }

    pub fn is_participant(&self, participant: &UserId) -> bool {
        self.participants.contains(participant)
    }

    /// The most recently appended status for `participant`.
    pub fn current_status(&self, participant: &UserId) -> Option<&Status> {
        self.current
            .get(participant)
            .and_then(|&idx| self.status_log.get(idx))
            .map(|entry| &entry.status)
    }

    pub fn creator_status(&self) -> Option<&Status> {
        self.current_status(&self.creator)
    }

    /// The creator's target time, when the creator is `AvailableLater`.
    pub fn proposed_time(&self) -> Option<DateTime<Utc>> {
        self.creator_status().and_then(Status::time_available)
    }

    /// Appends a status for `participant` and makes it current.
    ///
    /// This is the raw log operation; the guard rules on which transitions
    /// are allowed belong to the status engine that calls it.
    pub fn append_status(
        &mut self,
        participant: UserId,
        status: Status,
        now: DateTime<Utc>,
    ) -> &Status {
        self.status_log.push(LogEntry {
            participant: participant.clone(),
            status,
        });
        let idx = self.status_log.len() - 1;
        self.current.insert(participant.clone(), idx);
        self.participants.insert(participant);
        self.last_updated_at = now;
        &self.status_log[idx].status
    }

    /// Advances the lateness tier of `participant`'s current status.
    ///
    /// Returns `false` (and changes nothing) when the participant has no
    /// `AvailableLater` status or the tier would not move forward.
    pub fn advance_lateness(&mut self, participant: &UserId, tier: LatenessTier) -> bool {
        let Some(&idx) = self.current.get(participant) else {
            return false;
        };
        self.status_log[idx].status.advance_lateness(tier)
    }

    /// Records an external message (e.g. a posted reply) tied to this session.
    pub fn attach_message_ref(&mut self, reference: impl Into<String>) {
        self.message_refs.push(reference.into());
    }

    /// A session expires once strictly more than `ttl` has passed since creation.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.created_at > ttl
    }

    /// A read-only view for renderers.
    pub fn snapshot(&self, now: DateTime<Utc>) -> SessionSnapshot {
        let participants = self
            .participants()
            .filter_map(|p| {
                self.current_status(p).map(|status| ParticipantView {
                    participant: p.clone(),
                    late: status.is_late(now),
                    status: status.clone(),
                })
            })
            .collect();

        SessionSnapshot {
            key: self.key.clone(),
            creator: self.creator.clone(),
            proposed_time: self.proposed_time(),
            created_at: self.created_at,
            last_updated_at: self.last_updated_at,
            participants,
            message_refs: self.message_refs.clone(),
        }
    }

    /// Replays the status log into frames spaced `step` apart, from the
    /// first entry (floored to the step) up to and including `until`.
    ///
    /// Each frame holds every participant's level as of that instant, using
    /// only entries created strictly before it. Participants without an
    /// entry yet read as `Unknown`.
    pub fn timeline(&self, step: Duration, until: DateTime<Utc>) -> Vec<TimelineFrame> {
        let Some(first) = self.status_log.first() else {
            return Vec::new();
        };
        if step <= Duration::zero() {
            return Vec::new();
        }

        let start = first
            .status
            .created_at()
            .duration_trunc(step)
            .unwrap_or(first.status.created_at());
        let order: Vec<&UserId> = self.participants().collect();
        let mut latest: BTreeMap<&UserId, &Status> = BTreeMap::new();
        let mut next = 0;
        let mut frames = Vec::new();

        let mut at = start;
        while at <= until {
            while next < self.status_log.len() && self.status_log[next].status.created_at() < at {
                let entry = &self.status_log[next];
                latest.insert(&entry.participant, &entry.status);
                next += 1;
            }

            let cells = order
                .iter()
                .map(|p| match latest.get(p) {
                    Some(status) => TimelineCell {
                        participant: (*p).clone(),
                        level: status.level(),
                        late: status.is_late(at),
                    },
                    None => TimelineCell {
                        participant: (*p).clone(),
                        level: AvailabilityLevel::Unknown,
                        late: false,
                    },
                })
                .collect();

            frames.push(TimelineFrame { at, cells });
            at = match at.checked_add_signed(step) {
                Some(next_at) => next_at,
                None => break,
            };
        }

        frames
    }
}

/// Read-only session view handed to the rendering layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub key: ConversationKey,
    pub creator: UserId,
    pub proposed_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub last_updated_at: DateTime<Utc>,
    pub participants: Vec<ParticipantView>,
    pub message_refs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantView {
    pub participant: UserId,
    pub status: Status,
    /// `AvailableLater` and already past the target time.
    pub late: bool,
}

/// One sampled instant of a session's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineFrame {
    pub at: DateTime<Utc>,
    pub cells: Vec<TimelineCell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineCell {
    pub participant: UserId,
    pub level: AvailabilityLevel,
    pub late: bool,
}
