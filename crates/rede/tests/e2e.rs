// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for a full evening of scheduling.
//!
//! Each test creates an isolated TestHarness with an in-memory archive,
//! recording roles and a manual clock. Tests are independent and
//! order-insensitive.

use std::time::Duration as StdDuration;

use chrono::{Duration, TimeZone, Utc};
use rede_agent::{
    Action, Command, MessageOutcome, PresenceEvent, QuickReply, ReplyOutcome, SweepReport,
};
use rede_bus::RedeEvent;
use rede_config::load_and_validate_str;
use rede_core::{AvailabilityLevel, LatenessTier, UserId};
use rede_test_utils::TestHarness;

fn at(h: u32, m: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, h, m, 0).unwrap()
}

fn quick(user: &str, reply: QuickReply) -> Command {
    Command {
        key: TestHarness::key(),
        participant: UserId::new(user),
        action: Action::QuickReply(reply),
    }
}

// ---- Test 1: A whole session from trigger to archive ----

#[tokio::test]
async fn evening_from_trigger_to_archive() {
    let mut harness = TestHarness::builder()
        .with_default_participants(&["bob", "carol"])
        .build()
        .unwrap();
    let key = TestHarness::key();

    let outcome = harness
        .engine
        .post_message(key.clone(), UserId::new("alice"), "e in 20 mins?");
    assert!(matches!(outcome, MessageOutcome::Started { .. }));

    // bob agrees, carol will be a bit later than that.
    harness.clock.set(at(14, 2));
    harness.engine.handle_command(quick("bob", QuickReply::Agree)).await;
    harness
        .engine
        .handle_command(quick("carol", QuickReply::AddMinutes(30)))
        .await;

    // bob shows up early; alice and carol do not.
    harness.clock.set(at(14, 15));
    harness.engine.presence(PresenceEvent {
        guild: key.guild.clone(),
        user: UserId::new("bob"),
        left: false,
        joined: true,
    });
    let outcome = harness
        .engine
        .handle_command(quick("bob", QuickReply::Unavailable))
        .await;
    assert_eq!(outcome, ReplyOutcome::Rejected);

    let tiers = |report: &SweepReport| -> Vec<(String, LatenessTier)> {
        report
            .lateness
            .iter()
            .map(|(_, e)| (e.participant.to_string(), e.tier))
            .collect()
    };

    // alice (due 14:20) is ten minutes over; carol (due 14:32) is not due yet.
    harness.clock.set(at(14, 30));
    let report = harness.engine.sweep().await;
    assert_eq!(
        tiers(&report),
        vec![
            ("alice".to_string(), LatenessTier::SlightlyLate),
            ("alice".to_string(), LatenessTier::Late),
        ]
    );

    let snapshot = harness.engine.snapshot(&key).unwrap();
    let levels: Vec<(String, AvailabilityLevel, bool)> = snapshot
        .participants
        .iter()
        .map(|p| (p.participant.to_string(), p.status.level(), p.late))
        .collect();
    assert_eq!(
        levels,
        vec![
            ("alice".to_string(), AvailabilityLevel::AvailableLater, true),
            ("bob".to_string(), AvailabilityLevel::Ready, false),
            ("carol".to_string(), AvailabilityLevel::AvailableLater, false),
        ]
    );

    harness.clock.set(at(14, 40));
    let report = harness.engine.sweep().await;
    assert_eq!(
        tiers(&report),
        vec![
            ("alice".to_string(), LatenessTier::VeryLate),
            ("carol".to_string(), LatenessTier::SlightlyLate),
            ("carol".to_string(), LatenessTier::Late),
        ]
    );

    harness.clock.set(at(14, 0) + Duration::hours(12) + Duration::minutes(1));
    let report = harness.engine.sweep().await;
    assert_eq!(report.expired, vec![key.clone()]);

    let archived = harness.archive.archived().await;
    assert_eq!(archived.len(), 1);
    // Three seeds, bob agree, carol +30, bob ready.
    assert_eq!(archived[0].status_log().len(), 6);
}

// ---- Test 2: Replacing a session through the running loop ----

#[tokio::test(start_paused = true)]
async fn replace_through_loop_keeps_history_in_archive() {
    let mut running = TestHarness::new()
        .unwrap()
        .spawn_loop(StdDuration::from_secs(60));
    let key = TestHarness::key();
    let alice = UserId::new("alice");
    let bob = UserId::new("bob");

    running
        .handle
        .post_message(key.clone(), alice.clone(), "e at 9?")
        .await
        .unwrap();
    running
        .handle
        .command(quick("bob", QuickReply::Maybe))
        .await
        .unwrap();

    let outcome = running
        .handle
        .post_message(key.clone(), bob.clone(), "ee now??")
        .await
        .unwrap();
    assert!(matches!(outcome, MessageOutcome::ReplaceRequested { .. }));

    running
        .handle
        .confirm_replace(key.clone(), bob.clone())
        .await
        .unwrap();

    let snapshot = running.handle.snapshot(key.clone()).await.unwrap().unwrap();
    assert_eq!(snapshot.creator, bob);
    assert_eq!(snapshot.participants.len(), 1);

    let archived = running.archive.archived().await;
    assert_eq!(archived.len(), 1);
    assert_eq!(archived[0].creator(), &alice);
    assert_eq!(archived[0].status_log().len(), 2);

    let mut seen = Vec::new();
    while let Ok(envelope) = running.events.try_recv() {
        seen.push(envelope.event.event_type());
    }
    assert_eq!(
        seen.iter().filter(|t| **t == "session_replaced").count(),
        1
    );
    assert!(seen.contains(&"replace_requested"));

    let roles = running
        .roles
        .wait_for_calls(1, StdDuration::from_secs(1))
        .await;
    assert_eq!(roles.len(), 1);
    assert!(roles[0].member);

    running.stop().await.unwrap();
}

// ---- Test 3: Configuration drives thresholds and offsets ----

#[tokio::test]
async fn configured_thresholds_and_offset_apply() {
    let config = load_and_validate_str(
        r#"
[session]
utc_offset_minutes = 120

[lateness]
late_after_mins = 2
very_late_after_mins = 4
"#,
    )
    .unwrap();
    let mut harness = TestHarness::builder().with_config(config).build().unwrap();
    let key = TestHarness::key();

    // 14:00 UTC is 16:00 local, so "at 5" means 17:00 local = 15:00 UTC.
    let outcome = harness
        .engine
        .post_message(key.clone(), UserId::new("alice"), "e at 5?");
    match outcome {
        MessageOutcome::Started { status, .. } => {
            assert_eq!(status.time_available(), Some(at(15, 0)));
        }
        other => panic!("expected Started, got {other:?}"),
    }

    harness.clock.set(at(15, 3));
    let report = harness.engine.sweep().await;
    let tiers: Vec<LatenessTier> = report.lateness.iter().map(|(_, e)| e.tier).collect();
    assert_eq!(tiers, vec![LatenessTier::SlightlyLate, LatenessTier::Late]);

    harness.clock.set(at(15, 4));
    let report = harness.engine.sweep().await;
    assert!(matches!(
        report.lateness.as_slice(),
        [(_, event)] if event.tier == LatenessTier::VeryLate
    ));

    let lateness_events = harness
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e.event, RedeEvent::Lateness { .. }))
        .count();
    assert_eq!(lateness_events, 3);
}
