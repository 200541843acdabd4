// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The closed grammar for qualifier clauses.
//!
//! Only a fixed set of phrasings is understood. Anything else, including
//! ranges ("in 5-15") and vague quantities ("in a few"), is `Unknown`.

use std::sync::LazyLock;

use regex::Regex;

use crate::intent::StatusIntent;
use crate::numbers::{clock_hour, quantity};

/// Clauses meaning "right now".
static IMMEDIATE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?:(?:like )?now)?$").unwrap());

/// `in|within [like] <qty> [unit]`
static RELATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:in|within) (?:like )?(?P<qty>\d+|[a-z]+) ?(?P<unit>m|mins?|minutes?|h|hrs?|hours?)?$",
    )
    .unwrap()
});

/// `at|before [like] <hour>[:<minute>]`
static ABSOLUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:at|before) (?:like )?(?P<hour>\d+|[a-z]+)(?::(?P<minute>[0-5][0-9]))?$")
        .unwrap()
});

/// Phrasings that are recognized as deliberately vague and never guessed at.
const VAGUE: &[&str] = &[
    "soon",
    "eventually",
    "tonight",
    "later",
    "at some point",
    "in a bit",
    "in a while",
    "in a few",
];

/// Minutes meant by "a minute".
const A_MINUTE: u32 = 5;
/// Minutes meant by "soon" in quantity position ("in like soon").
const SOON_MINUTES: u32 = 10;
const SOONISH_MINUTES: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Minutes,
    Hours,
}

impl Unit {
    fn parse(unit: &str) -> Self {
        if unit.starts_with('h') {
            Self::Hours
        } else {
            Self::Minutes
        }
    }
}

/// Parses a lowercased qualifier clause.
pub fn parse_clause(clause: &str) -> StatusIntent {
    let normalized = clause.split_whitespace().collect::<Vec<_>>().join(" ");

    if IMMEDIATE.is_match(&normalized) {
        return StatusIntent::Immediate;
    }
    if VAGUE.contains(&normalized.as_str()) {
        return StatusIntent::Unknown;
    }
    if let Some(caps) = RELATIVE.captures(&normalized) {
        let unit = caps.name("unit").map(|m| Unit::parse(m.as_str()));
        return relative(&caps["qty"], unit);
    }
    if let Some(caps) = ABSOLUTE.captures(&normalized) {
        let minute = caps
            .name("minute")
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0);
        return match clock_hour(&caps["hour"]) {
            Some(hour) => StatusIntent::AbsoluteTimeOfDay { hour, minute },
            None => StatusIntent::Unknown,
        };
    }

    StatusIntent::Unknown
}

fn relative(qty: &str, unit: Option<Unit>) -> StatusIntent {
    match (qty, unit) {
        ("a" | "an", Some(Unit::Minutes)) => StatusIntent::RelativeMinutes(A_MINUTE),
        ("a" | "an", Some(Unit::Hours)) => StatusIntent::RelativeMinutes(60),
        ("soon", None) => StatusIntent::RelativeMinutes(SOON_MINUTES),
        ("soonish", None) => StatusIntent::RelativeMinutes(SOONISH_MINUTES),
        (qty, unit) => match (quantity(qty), unit) {
            (Some(n), Some(Unit::Hours)) => StatusIntent::RelativeHours(n),
            // A bare number means minutes.
            (Some(n), Some(Unit::Minutes) | None) => StatusIntent::RelativeMinutes(n),
            (None, _) => StatusIntent::Unknown,
        },
    }
}
