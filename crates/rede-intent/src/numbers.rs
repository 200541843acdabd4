// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Word tables for spelled-out quantities and clock hours.

/// Spelled quantities accepted in relative clauses ("in ten minutes").
const QUANTITY_WORDS: &[(&str, u32)] = &[
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("twenty", 20),
    ("thirty", 30),
];

/// Spelled hours accepted in absolute clauses ("at six", "before noon").
const HOUR_WORDS: &[(&str, u32)] = &[
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("eleven", 11),
    ("twelve", 12),
    ("noon", 12),
    ("midnight", 12),
];

/// A digit run or a spelled quantity.
pub(crate) fn quantity(token: &str) -> Option<u32> {
    if token.bytes().all(|b| b.is_ascii_digit()) {
        return token.parse().ok();
    }
    lookup(QUANTITY_WORDS, token)
}

/// A 12-hour clock hour, numeric `1..=12` or spelled.
pub(crate) fn clock_hour(token: &str) -> Option<u32> {
    if token.bytes().all(|b| b.is_ascii_digit()) {
        return token.parse().ok().filter(|h| (1..=12).contains(h));
    }
    lookup(HOUR_WORDS, token)
}

fn lookup(table: &[(&str, u32)], token: &str) -> Option<u32> {
    table.iter().find(|(word, _)| *word == token).map(|(_, n)| *n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantities() {
        assert_eq!(quantity("20"), Some(20));
        assert_eq!(quantity("ten"), Some(10));
        assert_eq!(quantity("thirty"), Some(30));
        assert_eq!(quantity("eleven"), None);
        assert_eq!(quantity("few"), None);
        assert_eq!(quantity("99999999999"), None);
    }

    #[test]
    fn clock_hours() {
        assert_eq!(clock_hour("8"), Some(8));
        assert_eq!(clock_hour("12"), Some(12));
        assert_eq!(clock_hour("0"), None);
        assert_eq!(clock_hour("13"), None);
        assert_eq!(clock_hour("six"), Some(6));
        assert_eq!(clock_hour("noon"), Some(12));
        assert_eq!(clock_hour("midnight"), Some(12));
    }
}
