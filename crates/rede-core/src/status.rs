// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A single availability declaration.
//!
//! `time_available` is `Some` exactly when the level is
//! [`AvailabilityLevel::AvailableLater`]; `None` is the "never" sentinel.
//! The constructors are the only way to build a `Status`, so the pairing
//! cannot drift.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AvailabilityLevel, LatenessTier};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    level: AvailabilityLevel,
    time_available: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    lateness: LatenessTier,
    #[serde(default)]
    reminder_count: u32,
}

impl Status {
    /// A status at any level other than `AvailableLater`.
    ///
    /// Passing `AvailableLater` here yields `Unknown`: a later-availability
    /// without a target time carries no information.
    pub fn new(level: AvailabilityLevel, created_at: DateTime<Utc>) -> Self {
        let level = match level {
            AvailabilityLevel::AvailableLater => AvailabilityLevel::Unknown,
            other => other,
        };
        Self {
            level,
            time_available: None,
            created_at,
            lateness: LatenessTier::NotLate,
            reminder_count: 0,
        }
    }

    /// A promise to be available at `at`.
    pub fn available_later(at: DateTime<Utc>, created_at: DateTime<Utc>) -> Self {
        Self {
            level: AvailabilityLevel::AvailableLater,
            time_available: Some(at),
            created_at,
            lateness: LatenessTier::NotLate,
            reminder_count: 0,
        }
    }

    /// Builds a status from a level and an optional target, keeping the
    /// level/time pairing intact.
    pub fn from_parts(
        level: AvailabilityLevel,
        time_available: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
    ) -> Self {
        match (level, time_available) {
            (AvailabilityLevel::AvailableLater, Some(at)) => Self::available_later(at, created_at),
            (level, _) => Self::new(level, created_at),
        }
    }

    pub fn level(&self) -> AvailabilityLevel {
        self.level
    }

    pub fn time_available(&self) -> Option<DateTime<Utc>> {
        self.time_available
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn lateness(&self) -> LatenessTier {
        self.lateness
    }

    pub fn reminder_count(&self) -> u32 {
        self.reminder_count
    }

    /// Time elapsed past the target, or `None` if not `AvailableLater`.
    /// Negative while the target is still in the future.
    pub fn overdue_by(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.time_available.map(|at| now - at)
    }

    /// Whether the participant has missed their declared time.
    pub fn is_late(&self, now: DateTime<Utc>) -> bool {
        self.time_available.is_some_and(|at| now > at)
    }

    /// Moves the lateness tier forward. Tiers never regress, so a request
    /// for a tier at or below the current one is ignored and returns `false`.
    pub(crate) fn advance_lateness(&mut self, tier: LatenessTier) -> bool {
        if self.level != AvailabilityLevel::AvailableLater || tier <= self.lateness {
            return false;
        }
        self.lateness = tier;
        self.reminder_count += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 14, 0, 0).unwrap()
    }

    #[test]
    fn non_later_levels_never_carry_a_time() {
        for level in [
            AvailabilityLevel::Unknown,
            AvailabilityLevel::Unavailable,
            AvailabilityLevel::Maybe,
            AvailabilityLevel::Available,
            AvailabilityLevel::Ready,
            AvailabilityLevel::Done,
        ] {
            let status = Status::from_parts(level, Some(t0()), t0());
            assert_eq!(status.level(), level);
            assert!(status.time_available().is_none());
        }
    }

    #[test]
    fn available_later_without_time_degrades_to_unknown() {
        let status = Status::from_parts(AvailabilityLevel::AvailableLater, None, t0());
        assert_eq!(status.level(), AvailabilityLevel::Unknown);
        assert!(status.time_available().is_none());
    }

    #[test]
    fn lateness_only_moves_forward() {
        let mut status = Status::available_later(t0(), t0());
        assert!(status.advance_lateness(LatenessTier::Late));
        assert!(!status.advance_lateness(LatenessTier::SlightlyLate));
        assert!(!status.advance_lateness(LatenessTier::Late));
        assert_eq!(status.lateness(), LatenessTier::Late);
        assert_eq!(status.reminder_count(), 1);
    }

    #[test]
    fn lateness_ignored_for_other_levels() {
        let mut status = Status::new(AvailabilityLevel::Available, t0());
        assert!(!status.advance_lateness(LatenessTier::SlightlyLate));
        assert_eq!(status.lateness(), LatenessTier::NotLate);
    }

    #[test]
    fn is_late_is_strictly_after_target() {
        let status = Status::available_later(t0(), t0());
        assert!(!status.is_late(t0()));
        assert!(status.is_late(t0() + Duration::seconds(1)));
    }
}
