// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lateness escalation for participants who missed their declared time.
//!
//! The tier a status deserves is a pure function of how far past its target
//! the clock is. [`evaluate`] moves each `AvailableLater` status up to that
//! tier, one rung at a time, and reports every rung it crossed. Tiers never
//! move backward, so evaluating again at the same or a later time never
//! reports a rung twice.

use chrono::{DateTime, Duration, Utc};
use rede_config::LatenessConfig;
use rede_core::{AvailabilityLevel, LatenessTier, MessagePool, Session, UserId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Overdue durations at which the `Late` and `VeryLate` tiers begin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatenessThresholds {
    late_after: Duration,
    very_late_after: Duration,
}

impl LatenessThresholds {
    pub fn new(late_after: Duration, very_late_after: Duration) -> Self {
        Self {
            late_after,
            very_late_after,
        }
    }

    pub fn from_config(config: &LatenessConfig) -> Self {
        Self::new(
            Duration::minutes(config.late_after_mins.into()),
            Duration::minutes(config.very_late_after_mins.into()),
        )
    }

    /// The tier for a status `overdue` past its target. Any positive overdue
    /// time is at least `SlightlyLate`.
    pub fn tier_for(&self, overdue: Duration) -> LatenessTier {
        if overdue <= Duration::zero() {
            LatenessTier::NotLate
        } else if overdue < self.late_after {
            LatenessTier::SlightlyLate
        } else if overdue < self.very_late_after {
            LatenessTier::Late
        } else {
            LatenessTier::VeryLate
        }
    }
}

impl Default for LatenessThresholds {
    fn default() -> Self {
        Self::from_config(&LatenessConfig::default())
    }
}

/// One rung of the ladder reached by one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatenessEvent {
    pub participant: UserId,
    pub tier: LatenessTier,
    /// Pool to sample one message from, if the tier sends one.
    pub pool: Option<MessagePool>,
    /// Offer the participant the reminder replies.
    pub nudge: bool,
    /// The participant belongs in the availability role.
    pub grant_role: bool,
}

impl LatenessEvent {
    fn reached(participant: UserId, tier: LatenessTier) -> Self {
        Self {
            participant,
            tier,
            pool: tier.message_pool(),
            nudge: tier.sends_nudge(),
            grant_role: tier.grants_role(),
        }
    }
}

/// Advances every `AvailableLater` status in `session` to the tier it has
/// earned at `now` and returns the rungs crossed, in ladder order per
/// participant.
pub fn evaluate(
    session: &mut Session,
    thresholds: &LatenessThresholds,
    now: DateTime<Utc>,
) -> Vec<LatenessEvent> {
    let due: Vec<(UserId, LatenessTier, LatenessTier)> = session
        .participants()
        .filter_map(|p| {
            let status = session.current_status(p)?;
            if status.level() != AvailabilityLevel::AvailableLater {
                return None;
            }
            let target = thresholds.tier_for(status.overdue_by(now)?);
            (target > status.lateness()).then(|| (p.clone(), status.lateness(), target))
        })
        .collect();

    let mut events = Vec::new();
    for (participant, from, target) in due {
        let mut tier = from;
        while let Some(next) = tier.next().filter(|next| *next <= target) {
            if session.advance_lateness(&participant, next) {
                debug!(
                    key = %session.key(),
                    participant = %participant,
                    tier = %next,
                    "lateness tier reached"
                );
                events.push(LatenessEvent::reached(participant.clone(), next));
            }
            tier = next;
        }
    }
    events
}
