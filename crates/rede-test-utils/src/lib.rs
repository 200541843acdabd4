// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for rede integration tests.
//!
//! Provides in-memory collaborators and a harness for fast, deterministic
//! tests without a chat platform.
//!
//! # Components
//!
//! - [`MemoryArchive`] - Archive that keeps sessions in memory, with failure injection
//! - [`RecordingRoles`] - Role collaborator that records every membership change
//! - [`ManualClock`] - Clock that only moves when told to
//! - [`TestHarness`] - A wired-up session engine over the above

pub mod clock;
pub mod harness;
pub mod memory_archive;
pub mod recording_roles;

pub use clock::ManualClock;
pub use harness::{RunningHarness, TestHarness, TestHarnessBuilder};
pub use memory_archive::MemoryArchive;
pub use recording_roles::{RecordingRoles, RoleCall};
