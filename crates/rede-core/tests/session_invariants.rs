// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property tests for the session data model.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use rede_core::{
    AvailabilityLevel, ConversationKey, LatenessTier, Session, Status, UserId,
};

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

fn level_strategy() -> impl Strategy<Value = AvailabilityLevel> {
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

fn tier_strategy() -> impl Strategy<Value = LatenessTier> {
    prop_oneof![
        Just(LatenessTier::NotLate),
        Just(LatenessTier::SlightlyLate),
        Just(LatenessTier::Late),
        Just(LatenessTier::VeryLate),
    ]
}

proptest! {
    #[test]
    fn time_available_present_iff_available_later(
        level in level_strategy(),
        offset in proptest::option::of(0i64..10_000),
    ) {
        let at = offset.map(|m| base() + Duration::minutes(m));
        let status = Status::from_parts(level, at, base());
        prop_assert_eq!(
            status.time_available().is_some(),
            status.level() == AvailabilityLevel::AvailableLater
        );
    }

    #[test]
    fn log_only_grows_and_current_tracks_last_append(
        updates in proptest::collection::vec((0usize..4, level_strategy()), 1..40),
    ) {
        let users = ["alice", "bob", "carol", "dave"];
        let mut session = Session::new(
            ConversationKey::new("g", "c"),
            UserId::new("alice"),
            Status::new(AvailabilityLevel::Available, base()),
            [],
            base(),
        );
        let mut last_len = session.status_log().len();

        for (i, (who, level)) in updates.iter().enumerate() {
            let now = base() + Duration::minutes(i as i64 + 1);
            let status = Status::from_parts(*level, Some(now + Duration::minutes(30)), now);
            session.append_status(UserId::new(users[*who]), status.clone(), now);

            prop_assert_eq!(session.status_log().len(), last_len + 1);
            last_len = session.status_log().len();
            prop_assert_eq!(session.current_status(&UserId::new(users[*who])), Some(&status));
            prop_assert_eq!(session.last_updated_at(), now);
        }
    }

    #[test]
    fn lateness_never_regresses(tiers in proptest::collection::vec(tier_strategy(), 1..20)) {
        let alice = UserId::new("alice");
        let mut session = Session::new(
            ConversationKey::new("g", "c"),
            alice.clone(),
            Status::available_later(base(), base()),
            [],
            base(),
        );
        let mut highest = LatenessTier::NotLate;
        for tier in tiers {
            let moved = session.advance_lateness(&alice, tier);
            prop_assert_eq!(moved, tier > highest);
            highest = highest.max(tier);
            prop_assert_eq!(session.creator_status().map(Status::lateness), Some(highest));
        }
    }
}

#[test]
fn session_serializes_with_full_log() {
    let mut session = Session::new(
        ConversationKey::new("g", "c"),
        UserId::new("alice"),
        Status::available_later(base() + Duration::minutes(20), base()),
        [UserId::new("bob")],
        base(),
    );
    session.append_status(
        UserId::new("bob"),
        Status::new(AvailabilityLevel::Maybe, base()),
        base(),
    );

    let json = serde_json::to_value(&session).expect("serialize");
    assert_eq!(json["status_log"].as_array().map(Vec::len), Some(3));
    assert_eq!(json["status_log"][0]["status"]["level"], "available_later");
    assert_eq!(json["key"]["guild"], "g");

    let back: Session = serde_json::from_value(json).expect("deserialize");
    assert_eq!(back.status_log(), session.status_log());
}
