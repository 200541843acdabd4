// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};

/// The structured meaning of a trigger phrase's qualifier clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusIntent {
    /// Available right now ("e?", "e now?").
    Immediate,
    RelativeMinutes(u32),
    RelativeHours(u32),
    /// A 12-hour clock time; AM or PM is decided at resolution.
    AbsoluteTimeOfDay { hour: u32, minute: u32 },
    /// Not part of the grammar, or deliberately vague.
    Unknown,
}

impl StatusIntent {
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}
