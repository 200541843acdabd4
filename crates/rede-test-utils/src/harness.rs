// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end session tests.
//!
//! `TestHarness` assembles a complete session engine over in-memory
//! collaborators and a manual clock. Tests either drive the engine
//! directly or move it into a running [`SessionLoop`] with
//! [`TestHarness::spawn_loop`].

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use rede_agent::{SessionEngine, SessionHandle, SessionLoop};
use rede_bus::{BusEnvelope, EventBus, SharedEventBus};
use rede_config::RedeConfig;
use rede_core::{ConversationKey, RedeError, UserId};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::clock::ManualClock;
use crate::memory_archive::MemoryArchive;
use crate::recording_roles::RecordingRoles;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    config: RedeConfig,
    start: DateTime<Utc>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            config: RedeConfig::default(),
            start: default_start(),
        }
    }

    /// Use a custom configuration.
    pub fn with_config(mut self, config: RedeConfig) -> Self {
        self.config = config;
        self
    }

    /// Start the manual clock at `start` instead of 14:00 UTC.
    pub fn with_start(mut self, start: DateTime<Utc>) -> Self {
        self.start = start;
        self
    }

    /// Seed these user ids into every new session.
    pub fn with_default_participants(mut self, ids: &[&str]) -> Self {
        self.config.session.default_participants = ids.iter().map(|id| id.to_string()).collect();
        self
    }

    /// Turn role side effects off.
    pub fn without_roles(mut self) -> Self {
        self.config.roles.enabled = false;
        self
    }

    /// Build the harness.
    pub fn build(self) -> Result<TestHarness, RedeError> {
        let archive = Arc::new(MemoryArchive::new());
        let roles = Arc::new(RecordingRoles::new());
        let clock = ManualClock::new(self.start);
        let bus = EventBus::new().shared();
        let events = bus.subscribe();

        let engine = SessionEngine::from_config(
            &self.config,
            archive.clone(),
            Some(roles.clone()),
            Arc::new(clock.clone()),
            bus.clone(),
        )?;

        Ok(TestHarness {
            engine,
            archive,
            roles,
            clock,
            bus,
            events,
            config: self.config,
        })
    }
}

/// A complete session engine wired to in-memory collaborators.
pub struct TestHarness {
    pub engine: SessionEngine,
    pub archive: Arc<MemoryArchive>,
    pub roles: Arc<RecordingRoles>,
    pub clock: ManualClock,
    pub bus: SharedEventBus,
    /// Subscribed before the engine existed, so it sees every event.
    pub events: broadcast::Receiver<BusEnvelope>,
    pub config: RedeConfig,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// A harness with default configuration.
    pub fn new() -> Result<Self, RedeError> {
        Self::builder().build()
    }

    /// The conversation most tests use.
    pub fn key() -> ConversationKey {
        ConversationKey::new("guild-1", "general")
    }

    pub fn user(id: &str) -> UserId {
        UserId::new(id)
    }

    /// Drains every event published so far.
    pub fn drain_events(&mut self) -> Vec<BusEnvelope> {
        let mut drained = Vec::new();
        while let Ok(envelope) = self.events.try_recv() {
            drained.push(envelope);
        }
        drained
    }

    /// Moves the engine into a running loop. The loop stops when the
    /// returned token is cancelled, handing the engine back through the
    /// join handle.
    pub fn spawn_loop(self, sweep_interval: Duration) -> RunningHarness {
        let (session_loop, handle) = SessionLoop::new(self.engine, sweep_interval);
        let cancel = CancellationToken::new();
        let task = tokio::spawn(session_loop.run(cancel.clone()));
        RunningHarness {
            handle,
            cancel,
            task,
            archive: self.archive,
            roles: self.roles,
            clock: self.clock,
            events: self.events,
        }
    }
}

/// A harness whose engine runs inside a [`SessionLoop`].
pub struct RunningHarness {
    pub handle: SessionHandle,
    pub cancel: CancellationToken,
    pub task: JoinHandle<SessionEngine>,
    pub archive: Arc<MemoryArchive>,
    pub roles: Arc<RecordingRoles>,
    pub clock: ManualClock,
    pub events: broadcast::Receiver<BusEnvelope>,
}

impl RunningHarness {
    /// Cancels the loop and waits for it to hand back the engine.
    pub async fn stop(self) -> Result<SessionEngine, RedeError> {
        self.cancel.cancel();
        self.task
            .await
            .map_err(|e| RedeError::Internal(format!("session loop task failed: {e}")))
    }
}

fn default_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 14, 0, 0)
        .single()
        .unwrap_or_default()
}
