// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The session engine: every mutation of every session goes through here.
//!
//! [`SessionEngine`] combines the registry, the status engine, the lateness
//! monitor and the replace prompts. It commits each state change first and
//! only then publishes events and queues role updates; role updates are
//! applied in the background, in commit order, and their failures are
//! logged, never rolled back into session state.

use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset, Utc};
use rede_bus::{RedeEvent, SharedEventBus};
use rede_config::RedeConfig;
use rede_core::{
    AvailabilityLevel, Clock, ConversationKey, GuildId, LatenessTier, RedeError,
    RoleMembership, Session, SessionArchive, SessionSnapshot, Status, TimelineFrame, UserId,
};
use rede_intent::{StatusIntent, detect_trigger, parse_clause, resolve_status};
use tracing::{debug, info, warn};

use crate::actions::{Action, Command, PresenceEvent, QuickReply, ReplyOutcome};
use crate::confirm::{ConfirmRefusal, ConfirmationBook, PendingReplace};
use crate::lateness::LatenessThresholds;
use crate::registry::{SessionRegistry, StartOutcome, SweepReport};
use crate::role_dispatch::RoleDispatcher;
use crate::status_engine;

/// A participant change after the reminder checks.
///
/// Reminder "+N" replies count from now; quick-add replies stack on the
/// current target.
enum Change {
    Reply(QuickReply),
    Snooze(u32),
}

/// What posting a message did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOutcome {
    /// The message is not a trigger phrase.
    NotTrigger,
    Started {
        intent: StatusIntent,
        status: Status,
    },
    /// A session is already active; the sender must confirm a replacement.
    ReplaceRequested {
        intent: StatusIntent,
        pending: PendingReplace,
    },
}

/// Result of confirming a replace prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Replaced {
        /// Creator of the archived session, if one was still active.
        previous_creator: Option<UserId>,
        status: Status,
    },
    NotRequester,
}

pub struct SessionEngine {
    registry: SessionRegistry,
    confirmations: ConfirmationBook,
    bus: SharedEventBus,
    clock: Arc<dyn Clock>,
    roles: Option<RoleDispatcher>,
    offset: FixedOffset,
}

impl SessionEngine {
    pub fn new(
        registry: SessionRegistry,
        confirmations: ConfirmationBook,
        bus: SharedEventBus,
        clock: Arc<dyn Clock>,
        offset: FixedOffset,
    ) -> Self {
        Self {
            registry,
            confirmations,
            bus,
            clock,
            roles: None,
            offset,
        }
    }

    /// Builds an engine from validated configuration.
    ///
    /// `roles` is ignored when `[roles] enabled = false`.
    pub fn from_config(
        config: &RedeConfig,
        archive: Arc<dyn SessionArchive>,
        roles: Option<Arc<dyn RoleMembership>>,
        clock: Arc<dyn Clock>,
        bus: SharedEventBus,
    ) -> Result<Self, RedeError> {
        let offset = config.session.utc_offset().ok_or_else(|| {
            RedeError::Config(format!(
                "session.utc_offset_minutes out of range: {}",
                config.session.utc_offset_minutes
            ))
        })?;
        let registry = SessionRegistry::new(
            archive,
            config.session.ttl(),
            LatenessThresholds::from_config(&config.lateness),
        )
        .with_default_participants(
            config
                .session
                .default_participants
                .iter()
                .map(UserId::new)
                .collect(),
        );
        let confirmations = ConfirmationBook::new(config.session.confirmation_timeout());

        let mut engine = Self::new(registry, confirmations, bus, clock, offset);
        if config.roles.enabled {
            engine.roles = roles.map(RoleDispatcher::new);
        }
        Ok(engine)
    }

    /// Dispatches role membership changes through `roles`.
    pub fn with_roles(mut self, roles: Arc<dyn RoleMembership>) -> Self {
        self.roles = Some(RoleDispatcher::new(roles));
        self
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn confirmations(&self) -> &ConfirmationBook {
        &self.confirmations
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Handles a chat message: a trigger phrase starts a session, or asks
    /// to replace the active one.
    pub fn post_message(
        &mut self,
        key: ConversationKey,
        sender: UserId,
        text: &str,
    ) -> MessageOutcome {
        let Some(trigger) = detect_trigger(text) else {
            return MessageOutcome::NotTrigger;
        };
        let intent = parse_clause(trigger.clause());
        debug!(key = %key, sender = %sender, clause = trigger.clause(), ?intent, "trigger phrase");
        self.request_session(key, sender, intent)
    }

    /// Starts a session from an already-recognized intent (the explicit
    /// start command), or opens a replace prompt if one is active.
    pub fn request_session(
        &mut self,
        key: ConversationKey,
        creator: UserId,
        intent: StatusIntent,
    ) -> MessageOutcome {
        let now = self.clock.now();
        let status = resolve_status(intent, now, self.offset);

        match self
            .registry
            .start_session(key.clone(), creator.clone(), status.clone(), now)
        {
            StartOutcome::Created => {
                self.publish(
                    now,
                    RedeEvent::SessionCreated {
                        key,
                        creator,
                        status: status.clone(),
                    },
                );
                MessageOutcome::Started { intent, status }
            }
            StartOutcome::AlreadyActive => {
                let pending =
                    self.confirmations
                        .request(key.clone(), creator.clone(), intent, status, now);
                self.publish(
                    now,
                    RedeEvent::ReplaceRequested {
                        key,
                        requester: creator,
                        proposed: pending.proposed.clone(),
                        expires_at: pending.expires_at,
                    },
                );
                MessageOutcome::ReplaceRequested { intent, pending }
            }
        }
    }

    /// Confirms an open replace prompt: archives the active session and
    /// starts the proposed one.
    pub async fn confirm_replace(
        &mut self,
        key: ConversationKey,
        who: UserId,
    ) -> Result<ConfirmOutcome, RedeError> {
        let now = self.clock.now();
        let pending = match self.confirmations.take(&key, &who, now) {
            Ok(pending) => pending,
            Err(ConfirmRefusal::NotRequester) => return Ok(ConfirmOutcome::NotRequester),
            Err(ConfirmRefusal::NoPending) => {
                return Err(RedeError::ConfirmationNotFound { key });
            }
        };

        // Re-resolve against the confirmation instant so relative targets
        // count from when the replacement actually starts.
        let status = resolve_status(pending.intent, now, self.offset);
        let previous = match self
            .registry
            .replace_session(key.clone(), who.clone(), status.clone(), now)
            .await
        {
            Ok(previous) => previous,
            Err(e) => {
                warn!(key = %key, error = %e, "replace aborted, active session kept");
                return Err(e);
            }
        };

        let previous_creator = previous.map(|s| s.creator().clone());
        let event = match &previous_creator {
            Some(previous_creator) => RedeEvent::SessionReplaced {
                key,
                previous_creator: previous_creator.clone(),
                creator: who,
                status: status.clone(),
            },
            None => RedeEvent::SessionCreated {
                key,
                creator: who,
                status: status.clone(),
            },
        };
        self.publish(now, event);

        Ok(ConfirmOutcome::Replaced {
            previous_creator,
            status,
        })
    }

    /// Cancels an open replace prompt. Only its requester may cancel.
    pub fn cancel_replace(&mut self, key: ConversationKey, who: UserId) -> bool {
        if !self.confirmations.cancel(&key, &who) {
            return false;
        }
        let now = self.clock.now();
        self.publish(now, RedeEvent::ReplaceCancelled { key, requester: who });
        true
    }

    /// Applies one participant command through the status engine.
    pub async fn handle_command(&mut self, command: Command) -> ReplyOutcome {
        let Command {
            key,
            participant,
            action,
        } = command;
        let now = self.clock.now();
        let offset = self.offset;
        let Some(session) = self.registry.get_mut(&key) else {
            return ReplyOutcome::NoSession;
        };

        let change = match action {
            Action::QuickReply(reply) => Change::Reply(reply),
            Action::Reminder { addressee, reply } => {
                if addressee != participant {
                    debug!(key = %key, participant = %participant, addressee = %addressee, "reminder reply from non-addressee");
                    return ReplyOutcome::NotAddressee;
                }
                let nudged = session.current_status(&participant).is_some_and(|status| {
                    status.level() == AvailabilityLevel::AvailableLater
                        && status.lateness() >= LatenessTier::SlightlyLate
                });
                if !nudged {
                    debug!(key = %key, participant = %participant, "stale reminder reply");
                    return ReplyOutcome::StaleReminder;
                }
                match reply.snooze_minutes() {
                    Some(minutes) => Change::Snooze(minutes),
                    None => Change::Reply(reply.as_quick_reply()),
                }
            }
        };

        let accepted = match change {
            Change::Snooze(minutes) => status_engine::snooze(
                session,
                &participant,
                Duration::minutes(minutes.into()),
                now,
            ),
            Change::Reply(reply) => apply_reply(session, &participant, reply, now, offset),
        };
        if !accepted {
            return ReplyOutcome::Rejected;
        }
        let Some(status) = session.current_status(&participant).cloned() else {
            return ReplyOutcome::Rejected;
        };

        self.publish(
            now,
            RedeEvent::StatusChanged {
                key: key.clone(),
                participant: participant.clone(),
                status: status.clone(),
            },
        );
        self.dispatch_role(
            key.guild,
            participant,
            status.level().holds_available_role(),
            now,
        );
        ReplyOutcome::Accepted(status)
    }

    /// Applies a tracked-venue presence change. Returns how many sessions
    /// changed. Presence never touches role membership.
    pub fn presence(&mut self, event: PresenceEvent) -> usize {
        let now = self.clock.now();
        let changed =
            self.registry
                .apply_presence(&event.guild, &event.user, event.left, event.joined, now);
        let count = changed.len();
        for (key, status) in changed {
            self.publish(
                now,
                RedeEvent::StatusChanged {
                    key,
                    participant: event.user.clone(),
                    status,
                },
            );
        }
        count
    }

    /// Archives and removes the session for `key`.
    pub async fn delete_session(&mut self, key: ConversationKey) -> Result<(), RedeError> {
        self.registry.delete_session(&key).await?;
        let now = self.clock.now();
        self.publish(now, RedeEvent::SessionDeleted { key });
        Ok(())
    }

    /// One periodic pass: lateness escalation, TTL expiry, prompt timeouts.
    pub async fn sweep(&mut self) -> SweepReport {
        let now = self.clock.now();
        let report = self.registry.sweep(now).await;

        for (key, event) in &report.lateness {
            self.publish(
                now,
                RedeEvent::Lateness {
                    key: key.clone(),
                    participant: event.participant.clone(),
                    tier: event.tier,
                    pool: event.pool,
                    nudge: event.nudge,
                },
            );
            if event.grant_role {
                self.dispatch_role(key.guild.clone(), event.participant.clone(), true, now);
            }
        }
        for key in &report.expired {
            self.publish(now, RedeEvent::SessionExpired { key: key.clone() });
        }
        for (key, pending) in self.confirmations.expire(now) {
            debug!(key = %key, requester = %pending.requester, "replace prompt timed out");
            self.publish(
                now,
                RedeEvent::ConfirmationExpired {
                    key,
                    requester: pending.requester,
                },
            );
        }

        if !report.is_empty() {
            info!(
                escalations = report.lateness.len(),
                expired = report.expired.len(),
                archive_failures = report.archive_failures.len(),
                active = self.registry.len(),
                "sweep completed"
            );
        }
        report
    }

    pub fn snapshot(&self, key: &ConversationKey) -> Option<SessionSnapshot> {
        self.registry
            .get(key)
            .map(|session| session.snapshot(self.clock.now()))
    }

    /// Replays the session's history in `step` increments up to now.
    pub fn timeline(&self, key: &ConversationKey, step: Duration) -> Option<Vec<TimelineFrame>> {
        self.registry
            .get(key)
            .map(|session| session.timeline(step, self.clock.now()))
    }

    /// Associates a posted message with the session for `key`.
    pub fn attach_message_ref(
        &mut self,
        key: &ConversationKey,
        reference: String,
    ) -> Result<(), RedeError> {
        let session = self
            .registry
            .get_mut(key)
            .ok_or_else(|| RedeError::SessionNotFound { key: key.clone() })?;
        session.attach_message_ref(reference);
        Ok(())
    }

    fn publish(&self, now: DateTime<Utc>, event: RedeEvent) {
        self.bus.publish(now, event);
    }

    fn dispatch_role(&mut self, guild: GuildId, user: UserId, member: bool, now: DateTime<Utc>) {
        let Some(roles) = self.roles.as_mut() else {
            return;
        };
        roles.dispatch(guild.clone(), user.clone(), member);
        self.bus
            .publish(now, RedeEvent::RoleChange { guild, user, member });
    }
}

fn apply_reply(
    session: &mut Session,
    participant: &UserId,
    reply: QuickReply,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> bool {
    match reply {
        QuickReply::Available => status_engine::apply_status(
            session,
            participant,
            Status::new(AvailabilityLevel::Available, now),
            now,
        ),
        QuickReply::Maybe => status_engine::apply_status(
            session,
            participant,
            Status::new(AvailabilityLevel::Maybe, now),
            now,
        ),
        QuickReply::Unavailable => status_engine::apply_status(
            session,
            participant,
            Status::new(AvailabilityLevel::Unavailable, now),
            now,
        ),
        QuickReply::Agree => status_engine::agree_with_creator(session, participant, now),
        QuickReply::AddMinutes(minutes) => status_engine::add_time(
            session,
            participant,
            Duration::minutes(minutes.into()),
            now,
        ),
        QuickReply::AtHour(hour) => {
            status_engine::at_hour(session, participant, hour, now, offset)
        }
    }
}
