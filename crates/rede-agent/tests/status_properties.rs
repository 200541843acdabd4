// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property tests for the status engine and lateness monitor.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use rede_agent::lateness::{self, LatenessThresholds};
use rede_agent::status_engine::apply_status;
use rede_core::{AvailabilityLevel, ConversationKey, LatenessTier, Session, Status, UserId};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 14, 0, 0).unwrap()
}

fn level() -> impl Strategy<Value = AvailabilityLevel> {
    prop_oneof![
        Just(AvailabilityLevel::Unknown),
        Just(AvailabilityLevel::Unavailable),
        Just(AvailabilityLevel::Maybe),
        Just(AvailabilityLevel::AvailableLater),
        Just(AvailabilityLevel::Available),
        Just(AvailabilityLevel::Ready),
        Just(AvailabilityLevel::Done),
    ]
}

fn status(level: AvailabilityLevel, minute: i64) -> Status {
    let now = t0() + Duration::minutes(minute);
    Status::from_parts(level, Some(now + Duration::minutes(10)), now)
}

proptest! {
    /// Once Ready, only Done is ever accepted; the current status always
    /// equals the last accepted one.
    #[test]
    fn ready_is_left_only_through_done(levels in proptest::collection::vec(level(), 1..40)) {
        let bob = UserId::new("bob");
        let mut session = Session::new(
            ConversationKey::new("g", "c"),
            UserId::new("alice"),
            Status::new(AvailabilityLevel::Available, t0()),
            [],
            t0(),
        );

        let mut last_accepted: Option<Status> = None;
        for (i, level) in levels.into_iter().enumerate() {
            let minute = i as i64;
            let before = session.current_status(&bob).map(Status::level);
            let candidate = status(level, minute);
            let accepted = apply_status(&mut session, &bob, candidate.clone(), t0() + Duration::minutes(minute));

            if before == Some(AvailabilityLevel::Ready) {
                prop_assert_eq!(accepted, candidate.level() == AvailabilityLevel::Done);
            } else {
                prop_assert!(accepted);
            }
            if accepted {
                last_accepted = Some(candidate);
            }
            prop_assert_eq!(session.current_status(&bob), last_accepted.as_ref());
        }
    }

    /// However sweeps are spaced, each rung is reached at most once and in
    /// ladder order.
    #[test]
    fn sweeps_emit_each_rung_once(gaps in proptest::collection::vec(0i64..20, 1..30)) {
        let alice = UserId::new("alice");
        let mut session = Session::new(
            ConversationKey::new("g", "c"),
            alice.clone(),
            Status::available_later(t0() + Duration::minutes(20), t0()),
            [],
            t0(),
        );
        let thresholds = LatenessThresholds::default();

        let mut now = t0();
        let mut reached = Vec::new();
        for gap in gaps {
            now += Duration::minutes(gap);
            reached.extend(lateness::evaluate(&mut session, &thresholds, now).into_iter().map(|e| e.tier));
        }

        let mut sorted = reached.clone();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(&reached, &sorted);
        let expected: Vec<LatenessTier> = [LatenessTier::SlightlyLate, LatenessTier::Late, LatenessTier::VeryLate]
            .into_iter()
            .filter(|tier| *tier <= thresholds.tier_for(now - (t0() + Duration::minutes(20))))
            .collect();
        prop_assert_eq!(reached, expected);
    }
}
