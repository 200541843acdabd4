// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tests for the single-writer session loop and its handle.
//!
//! Tokio time is paused, so the periodic sweep fires as soon as the runtime
//! goes idle past the interval. The session clock is the harness's manual
//! clock and moves independently.

use std::time::Duration as StdDuration;

use chrono::{TimeZone, Utc};
use rede_agent::{Action, Command, MessageOutcome, QuickReply, ReplyOutcome};
use rede_bus::RedeEvent;
use rede_core::{AvailabilityLevel, LatenessTier, RedeError, UserId};
use rede_test_utils::TestHarness;

const SWEEP_EVERY: StdDuration = StdDuration::from_secs(60);

fn at(h: u32, m: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, h, m, 0).unwrap()
}

#[tokio::test(start_paused = true)]
async fn handle_round_trips_through_loop() {
    let running = TestHarness::new().unwrap().spawn_loop(SWEEP_EVERY);
    let key = TestHarness::key();

    let outcome = running
        .handle
        .post_message(key.clone(), UserId::new("alice"), "e in 20 mins?")
        .await
        .unwrap();
    assert!(matches!(outcome, MessageOutcome::Started { .. }));

    let outcome = running
        .handle
        .command(Command {
            key: key.clone(),
            participant: UserId::new("bob"),
            action: Action::QuickReply(QuickReply::Agree),
        })
        .await
        .unwrap();
    assert!(matches!(outcome, ReplyOutcome::Accepted(_)));

    let snapshot = running.handle.snapshot(key.clone()).await.unwrap().unwrap();
    assert_eq!(snapshot.participants.len(), 2);
    assert_eq!(running.handle.active_keys().await.unwrap(), vec![key]);

    let engine = running.stop().await.unwrap();
    assert_eq!(engine.registry().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn periodic_sweep_escalates_lateness() {
    let mut running = TestHarness::new().unwrap().spawn_loop(SWEEP_EVERY);
    running
        .handle
        .post_message(TestHarness::key(), UserId::new("alice"), "e in 20 mins?")
        .await
        .unwrap();

    running.clock.set(at(14, 21));

    let tier = tokio::time::timeout(StdDuration::from_secs(300), async {
        loop {
            let envelope = running.events.recv().await.unwrap();
            if let RedeEvent::Lateness { tier, .. } = envelope.event {
                return tier;
            }
        }
    })
    .await
    .unwrap();

    assert_eq!(tier, LatenessTier::SlightlyLate);
    running.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn concurrent_handles_are_serialized() {
    let running = TestHarness::new().unwrap().spawn_loop(SWEEP_EVERY);
    let key = TestHarness::key();
    running
        .handle
        .post_message(key.clone(), UserId::new("alice"), "e?")
        .await
        .unwrap();

    let mut tasks = Vec::new();
    for i in 0..16 {
        let handle = running.handle.clone();
        let key = key.clone();
        tasks.push(tokio::spawn(async move {
            handle
                .command(Command {
                    key,
                    participant: UserId::new(format!("user-{i}")),
                    action: Action::QuickReply(QuickReply::Maybe),
                })
                .await
        }));
    }
    for task in tasks {
        let outcome = task.await.unwrap().unwrap();
        assert!(matches!(outcome, ReplyOutcome::Accepted(_)));
    }

    let snapshot = running.handle.snapshot(key).await.unwrap().unwrap();
    assert_eq!(snapshot.participants.len(), 17);
    assert!(
        snapshot
            .participants
            .iter()
            .skip(1)
            .all(|p| p.status.level() == AvailabilityLevel::Maybe)
    );
    running.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn stopped_loop_reports_closed() {
    let running = TestHarness::new().unwrap().spawn_loop(SWEEP_EVERY);
    let handle = running.handle.clone();

    running.stop().await.unwrap();

    let err = handle.sweep().await.unwrap_err();
    assert!(matches!(err, RedeError::LoopClosed));
}

#[tokio::test(start_paused = true)]
async fn loop_ends_when_handles_drop() {
    let running = TestHarness::new().unwrap().spawn_loop(SWEEP_EVERY);
    let task = running.task;
    drop(running.handle);

    let engine = tokio::time::timeout(StdDuration::from_secs(1), task)
        .await
        .unwrap()
        .unwrap();
    assert!(engine.registry().is_empty());
}
