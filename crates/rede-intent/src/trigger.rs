// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deciding whether a message is a scheduling request at all.
//!
//! A trigger is a run of the marker character, optionally followed by
//! whitespace and a qualifier clause, ending in one or more `?`. The marker
//! run must be followed by whitespace or the end of the phrase, so ordinary
//! words that merely start with the marker ("effort?") never qualify.

/// The marker character a trigger phrase starts with.
pub const TRIGGER_MARKER: char = 'e';

/// A message that qualified as a trigger phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerPhrase {
    marker_len: usize,
    clause: String,
}

impl TriggerPhrase {
    /// Length of the marker run ("eee" is 3).
    pub fn marker_len(&self) -> usize {
        self.marker_len
    }

    /// The lowercased qualifier after the marker run, trimmed, with the
    /// trailing question marks removed. Empty for a bare "e?".
    pub fn clause(&self) -> &str {
        &self.clause
    }
}

/// Returns the trigger phrase if `text` is one.
pub fn detect_trigger(text: &str) -> Option<TriggerPhrase> {
    let lower = text.trim().to_lowercase();
    if !lower.ends_with('?') {
        return None;
    }

    let body = lower.trim_end_matches(|c: char| c == '?' || c.is_whitespace());
    let rest = body.trim_start_matches(TRIGGER_MARKER);
    let marker_len = body.len() - rest.len();
    if marker_len == 0 {
        return None;
    }
    if !(rest.is_empty() || rest.starts_with(char::is_whitespace)) {
        return None;
    }

    Some(TriggerPhrase {
        marker_len,
        clause: rest.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_markers_trigger() {
        for text in ["e?", "eeeeee?", "E?", "  ee??  "] {
            let trigger = detect_trigger(text).expect(text);
            assert_eq!(trigger.clause(), "");
        }
    }

    #[test]
    fn clause_is_extracted() {
        let trigger = detect_trigger("eee at 11:30 ?").unwrap();
        assert_eq!(trigger.marker_len(), 3);
        assert_eq!(trigger.clause(), "at 11:30");

        let trigger = detect_trigger("E In 20 Mins???").unwrap();
        assert_eq!(trigger.clause(), "in 20 mins");
    }

    #[test]
    fn words_starting_with_marker_do_not_trigger() {
        assert!(detect_trigger("effort?").is_none());
        assert!(detect_trigger("eeeeeventualeeeee?").is_none());
        assert!(detect_trigger("eeen like a while?").is_none());
    }

    #[test]
    fn requires_leading_marker_and_question_mark() {
        assert!(detect_trigger("can anyone e?").is_none());
        assert!(detect_trigger("y'all wanna e?").is_none());
        assert!(detect_trigger("e now").is_none());
        assert!(detect_trigger("").is_none());
        assert!(detect_trigger("?").is_none());
    }
}
