// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent recognition for rede trigger phrases.
//!
//! A message such as `"eee in 20 mins?"` is first checked for the trigger
//! shape ([`detect_trigger`]), then its qualifier clause is parsed against a
//! closed grammar into a [`StatusIntent`]. Recognition never fails: anything
//! outside the grammar is [`StatusIntent::Unknown`].

pub mod grammar;
pub mod intent;
mod numbers;
pub mod resolve;
pub mod trigger;

pub use grammar::parse_clause;
pub use intent::StatusIntent;
pub use resolve::{clock_time_today, nearest_hour_after, resolve_status, target_time};
pub use trigger::{TRIGGER_MARKER, TriggerPhrase, detect_trigger};

use tracing::debug;

/// Recognizes the intent of a message.
///
/// Messages that are not trigger phrases yield `Unknown`; use
/// [`detect_trigger`] to tell those apart from vague triggers.
pub fn recognize(text: &str) -> StatusIntent {
    match detect_trigger(text) {
        Some(trigger) => {
            let intent = parse_clause(trigger.clause());
            debug!(clause = trigger.clause(), ?intent, "recognized trigger clause");
            intent
        }
        None => StatusIntent::Unknown,
    }
}
