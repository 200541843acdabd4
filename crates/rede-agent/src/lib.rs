// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session management for rede.
//!
//! The [`SessionLoop`] is the single writer that:
//! - Starts sessions from trigger phrases and replace confirmations
//! - Applies participant replies through the status engine
//! - Escalates lateness and expires sessions on a periodic sweep
//! - Publishes every committed change on the event bus
//! - Stops cleanly on cancellation

pub mod actions;
pub mod confirm;
pub mod engine;
pub mod lateness;
pub mod registry;
pub mod role_dispatch;
pub mod session_loop;
pub mod shutdown;
pub mod status_engine;

pub use actions::{
    ADD_MINUTES_CHOICES, AT_HOUR_CHOICES, Action, Command, PresenceEvent, QuickReply,
    ReminderReply, ReplyOutcome, UnknownReply,
};
pub use confirm::{ConfirmRefusal, ConfirmationBook, PendingReplace};
pub use engine::{ConfirmOutcome, MessageOutcome, SessionEngine};
pub use lateness::{LatenessEvent, LatenessThresholds};
pub use registry::{SessionRegistry, StartOutcome, SweepReport};
pub use role_dispatch::RoleDispatcher;
pub use session_loop::{SessionHandle, SessionLoop};
