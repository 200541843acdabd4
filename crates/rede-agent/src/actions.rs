// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Explicit command messages for participant-driven changes.
//!
//! Buttons and presence changes in the messaging layer are translated into
//! these values and handed to the single session writer, instead of
//! capturing a session by reference in a callback.

use std::fmt;
use std::str::FromStr;

use rede_core::{ConversationKey, GuildId, Status, UserId};
use serde::{Deserialize, Serialize};

/// Minutes offered by the "add time" buttons.
pub const ADD_MINUTES_CHOICES: [u32; 5] = [5, 15, 30, 60, 120];

/// Local hours offered by the "at hour" buttons.
pub const AT_HOUR_CHOICES: [u32; 5] = [20, 21, 22, 23, 0];

/// A quick reply attached to a session's message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickReply {
    Available,
    Agree,
    Maybe,
    Unavailable,
    AddMinutes(u32),
    AtHour(u32),
}

impl fmt::Display for QuickReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available => f.write_str("available"),
            Self::Agree => f.write_str("agree"),
            Self::Maybe => f.write_str("maybe"),
            Self::Unavailable => f.write_str("unavailable"),
            Self::AddMinutes(n) => write!(f, "+{n}"),
            Self::AtHour(h) => write!(f, "@{h}"),
        }
    }
}

/// Error returned when a reply name is not one of the known replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownReply(pub String);

impl fmt::Display for UnknownReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown reply `{}`", self.0)
    }
}

impl std::error::Error for UnknownReply {}

/// Parses `available`, `agree`, `maybe`, `unavailable`, `+<minutes>` and
/// `@<hour>`.
impl FromStr for QuickReply {
    type Err = UnknownReply;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownReply(s.to_string());
        match s.trim().to_lowercase().as_str() {
            "available" => Ok(Self::Available),
            "agree" => Ok(Self::Agree),
            "maybe" => Ok(Self::Maybe),
            "unavailable" => Ok(Self::Unavailable),
            other => {
                if let Some(n) = other.strip_prefix('+') {
                    n.parse().map(Self::AddMinutes).map_err(|_| unknown())
                } else if let Some(h) = other.strip_prefix('@') {
                    h.parse::<u32>()
                        .ok()
                        .filter(|h| *h < 24)
                        .map(Self::AtHour)
                        .ok_or_else(unknown)
                } else {
                    Err(unknown())
                }
            }
        }
    }
}

/// A reply to a lateness nudge. Only the nudged participant may use it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderReply {
    Available,
    PlusFive,
    PlusFifteen,
    Maybe,
    Unavailable,
}

impl ReminderReply {
    /// Minutes a "+N" reminder reply pushes the target past now.
    pub fn snooze_minutes(self) -> Option<u32> {
        match self {
            Self::PlusFive => Some(5),
            Self::PlusFifteen => Some(15),
            Self::Available | Self::Maybe | Self::Unavailable => None,
        }
    }

    pub fn as_quick_reply(self) -> QuickReply {
        match self {
            Self::Available => QuickReply::Available,
            Self::PlusFive => QuickReply::AddMinutes(5),
            Self::PlusFifteen => QuickReply::AddMinutes(15),
            Self::Maybe => QuickReply::Maybe,
            Self::Unavailable => QuickReply::Unavailable,
        }
    }
}

impl TryFrom<QuickReply> for ReminderReply {
    type Error = UnknownReply;

    fn try_from(reply: QuickReply) -> Result<Self, Self::Error> {
        match reply {
            QuickReply::Available => Ok(Self::Available),
            QuickReply::AddMinutes(5) => Ok(Self::PlusFive),
            QuickReply::AddMinutes(15) => Ok(Self::PlusFifteen),
            QuickReply::Maybe => Ok(Self::Maybe),
            QuickReply::Unavailable => Ok(Self::Unavailable),
            other => Err(UnknownReply(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    QuickReply(QuickReply),
    Reminder {
        /// The participant the nudge was addressed to.
        addressee: UserId,
        reply: ReminderReply,
    },
}

/// One participant-driven change to one conversation's session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub key: ConversationKey,
    pub participant: UserId,
    pub action: Action,
}

/// Result of handling a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    Accepted(Status),
    /// The status engine refused the change (Ready guard, nothing to agree with).
    Rejected,
    NoSession,
    NotAddressee,
    /// The addressee was never nudged, or has answered since.
    StaleReminder,
}

/// A participant entering or leaving a tracked venue.
///
/// Both flags set means the participant moved between tracked venues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceEvent {
    pub guild: GuildId,
    pub user: UserId,
    pub left: bool,
    pub joined: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quick_replies_parse() {
        assert_eq!("available".parse(), Ok(QuickReply::Available));
        assert_eq!("Agree".parse(), Ok(QuickReply::Agree));
        assert_eq!("+15".parse(), Ok(QuickReply::AddMinutes(15)));
        assert_eq!("@0".parse(), Ok(QuickReply::AtHour(0)));
        assert!("@24".parse::<QuickReply>().is_err());
        assert!("+soon".parse::<QuickReply>().is_err());
        assert!("later".parse::<QuickReply>().is_err());
    }

    #[test]
    fn display_parses_back() {
        for choice in ADD_MINUTES_CHOICES {
            let reply = QuickReply::AddMinutes(choice);
            assert_eq!(reply.to_string().parse(), Ok(reply));
        }
        for hour in AT_HOUR_CHOICES {
            let reply = QuickReply::AtHour(hour);
            assert_eq!(reply.to_string().parse(), Ok(reply));
        }
    }

    #[test]
    fn reminder_replies_are_a_subset() {
        for reply in [
            ReminderReply::Available,
            ReminderReply::PlusFive,
            ReminderReply::PlusFifteen,
            ReminderReply::Maybe,
            ReminderReply::Unavailable,
        ] {
            assert_eq!(ReminderReply::try_from(reply.as_quick_reply()), Ok(reply));
        }
        assert!(ReminderReply::try_from(QuickReply::Agree).is_err());
        assert!(ReminderReply::try_from(QuickReply::AddMinutes(30)).is_err());
    }

    #[test]
    fn only_plus_replies_snooze() {
        assert_eq!(ReminderReply::PlusFive.snooze_minutes(), Some(5));
        assert_eq!(ReminderReply::PlusFifteen.snooze_minutes(), Some(15));
        assert_eq!(ReminderReply::Maybe.snooze_minutes(), None);
    }
}
