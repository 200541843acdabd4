// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identifiers and closed enumerations shared across rede.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Platform identifier of a participant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Platform identifier of a guild (the community a conversation lives in).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuildId(pub String);

impl GuildId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for GuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies one conversation: a channel inside a guild.
///
/// At most one session is active per key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConversationKey {
    pub guild: GuildId,
    pub channel: String,
}

impl ConversationKey {
    pub fn new(guild: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            guild: GuildId::new(guild),
            channel: channel.into(),
        }
    }
}

impl fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.guild, self.channel)
    }
}

/// A participant's declared or derived availability.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AvailabilityLevel {
    Unknown,
    Unavailable,
    Maybe,
    AvailableLater,
    Available,
    /// Live presence: the participant is in a tracked venue.
    Ready,
    Done,
}

impl AvailabilityLevel {
    /// Whether a participant at this level belongs in the guild's availability role.
    pub fn holds_available_role(self) -> bool {
        matches!(
            self,
            Self::Available | Self::AvailableLater | Self::Maybe | Self::Ready | Self::Done
        )
    }

    /// Human-readable label used by renderers.
    pub fn label(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Unavailable => "Unavailable",
            Self::Maybe => "Maybe Later",
            Self::AvailableLater => "Available Later",
            Self::Available => "Available Now",
            Self::Ready => "Ready (In Voice)",
            Self::Done => "Done",
        }
    }
}

/// Escalation stage of a participant who missed their declared time.
///
/// Variants are declared in escalation order so the derived `Ord` is the ladder.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LatenessTier {
    #[default]
    NotLate,
    SlightlyLate,
    Late,
    VeryLate,
}

impl LatenessTier {
    /// The next rung of the ladder, or `None` at the terminal tier.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::NotLate => Some(Self::SlightlyLate),
            Self::SlightlyLate => Some(Self::Late),
            Self::Late => Some(Self::VeryLate),
            Self::VeryLate => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Self::VeryLate
    }

    /// The message pool sampled when this tier is reached, if any.
    pub fn message_pool(self) -> Option<MessagePool> {
        match self {
            Self::Late => Some(MessagePool::Shame),
            Self::VeryLate => Some(MessagePool::SuperShame),
            Self::NotLate | Self::SlightlyLate => None,
        }
    }

    /// Reaching this tier sends the participant a "confirm availability" nudge.
    pub fn sends_nudge(self) -> bool {
        self == Self::SlightlyLate
    }

    /// Reaching this tier signals that the participant belongs in the availability role.
    pub fn grants_role(self) -> bool {
        self == Self::SlightlyLate
    }
}

/// A configured pool of escalation messages. The core only names the pool;
/// picking a message is the messaging layer's job.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MessagePool {
    Shame,
    SuperShame,
}

/// Health status reported by collaborator health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Degraded(String),
    Unhealthy(String),
}

/// Identifies the kind of external collaborator.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Archive,
    RoleMembership,
}
