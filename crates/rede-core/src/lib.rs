// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for rede.
//!
//! This crate provides the session and status model, the error type, and the
//! collaborator traits (archive, role membership, clock) used throughout the
//! rede workspace.

pub mod error;
pub mod session;
pub mod status;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::RedeError;
pub use session::{
    LogEntry, ParticipantView, Session, SessionSnapshot, TimelineCell, TimelineFrame,
};
pub use status::Status;
pub use types::{
    AdapterType, AvailabilityLevel, ConversationKey, GuildId, HealthStatus, LatenessTier,
    MessagePool, UserId,
};

pub use traits::{Clock, PluginAdapter, RoleMembership, SessionArchive, SystemClock};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rede_error_variants_render() {
        let key = ConversationKey::new("g", "c");
        let cases = [
            RedeError::Config("bad".into()),
            RedeError::archive(std::io::Error::other("disk")),
            RedeError::RoleMembership {
                message: "forbidden".into(),
                source: None,
            },
            RedeError::SessionNotFound { key: key.clone() },
            RedeError::ConfirmationNotFound { key },
            RedeError::LoopClosed,
            RedeError::Internal("oops".into()),
        ];
        for err in &cases {
            assert!(!err.to_string().is_empty());
        }
        assert_eq!(
            cases[3].to_string(),
            "no active session for g/c"
        );
    }

    #[test]
    fn enums_round_trip_through_strum() {
        use std::str::FromStr;

        for level in [
            AvailabilityLevel::Unknown,
            AvailabilityLevel::Unavailable,
            AvailabilityLevel::Maybe,
            AvailabilityLevel::AvailableLater,
            AvailabilityLevel::Available,
            AvailabilityLevel::Ready,
            AvailabilityLevel::Done,
        ] {
            let parsed = AvailabilityLevel::from_str(&level.to_string()).expect("should parse back");
            assert_eq!(level, parsed);
        }
        assert_eq!(AvailabilityLevel::AvailableLater.to_string(), "available_later");
        assert_eq!(LatenessTier::from_str("very_late").unwrap(), LatenessTier::VeryLate);
    }

    #[test]
    fn role_holding_levels() {
        assert!(!AvailabilityLevel::Unknown.holds_available_role());
        assert!(!AvailabilityLevel::Unavailable.holds_available_role());
        assert!(AvailabilityLevel::Maybe.holds_available_role());
        assert!(AvailabilityLevel::AvailableLater.holds_available_role());
        assert!(AvailabilityLevel::Available.holds_available_role());
        assert!(AvailabilityLevel::Ready.holds_available_role());
        assert!(AvailabilityLevel::Done.holds_available_role());
    }

    #[test]
    fn lateness_ladder_is_ordered() {
        let mut tier = LatenessTier::NotLate;
        let mut seen = vec![tier];
        while let Some(next) = tier.next() {
            assert!(next > tier);
            tier = next;
            seen.push(tier);
        }
        assert_eq!(seen.len(), 4);
        assert!(tier.is_terminal());
        assert_eq!(LatenessTier::Late.message_pool(), Some(MessagePool::Shame));
        assert_eq!(LatenessTier::VeryLate.message_pool(), Some(MessagePool::SuperShame));
        assert!(LatenessTier::SlightlyLate.sends_nudge());
        assert!(!LatenessTier::Late.sends_nudge());
    }
}
