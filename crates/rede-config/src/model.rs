// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for rede.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

/// Top-level rede configuration.
///
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RedeConfig {
    /// Bot identity and logging.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Session lifetime, sweep cadence and local clock.
    #[serde(default)]
    pub session: SessionConfig,

    /// Lateness thresholds and escalation message pools.
    #[serde(default)]
    pub lateness: LatenessConfig,

    /// Availability role side effects.
    #[serde(default)]
    pub roles: RolesConfig,
}

/// Bot identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the bot.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "rede".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Session lifecycle configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Hours after creation at which a session is archived and removed.
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u64,

    /// Seconds between sweeps.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// Seconds a replace-session prompt stays open.
    #[serde(default = "default_confirmation_timeout_secs")]
    pub confirmation_timeout_secs: u64,

    /// User ids seeded as `Unknown` in every new session.
    #[serde(default)]
    pub default_participants: Vec<String>,

    /// Local UTC offset in minutes, used for clock-time phrases.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_hours: default_ttl_hours(),
            sweep_interval_secs: default_sweep_interval_secs(),
            confirmation_timeout_secs: default_confirmation_timeout_secs(),
            default_participants: Vec::new(),
            utc_offset_minutes: 0,
        }
    }
}

impl SessionConfig {
    pub fn ttl(&self) -> chrono::Duration {
        i64::try_from(self.ttl_hours)
            .ok()
            .and_then(chrono::Duration::try_hours)
            .unwrap_or(chrono::Duration::MAX)
    }

    pub fn sweep_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn confirmation_timeout(&self) -> chrono::Duration {
        i64::try_from(self.confirmation_timeout_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }

    /// The configured offset, or `None` when out of range.
    pub fn utc_offset(&self) -> Option<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes.checked_mul(60)?)
    }
}

fn default_ttl_hours() -> u64 {
    12
}

fn default_sweep_interval_secs() -> u64 {
    60
}

fn default_confirmation_timeout_secs() -> u64 {
    60
}

/// Lateness escalation configuration.
///
/// Message templates may contain `{@}`, replaced with the participant mention.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LatenessConfig {
    /// Minutes past the target at which a participant becomes `Late`.
    #[serde(default = "default_late_after_mins")]
    pub late_after_mins: u32,

    /// Minutes past the target at which a participant becomes `VeryLate`.
    #[serde(default = "default_very_late_after_mins")]
    pub very_late_after_mins: u32,

    #[serde(default = "default_shame_messages")]
    pub shame_messages: Vec<String>,

    #[serde(default = "default_super_shame_messages")]
    pub super_shame_messages: Vec<String>,
}

impl Default for LatenessConfig {
    fn default() -> Self {
        Self {
            late_after_mins: default_late_after_mins(),
            very_late_after_mins: default_very_late_after_mins(),
            shame_messages: default_shame_messages(),
            super_shame_messages: default_super_shame_messages(),
        }
    }
}

fn default_late_after_mins() -> u32 {
    5
}

fn default_very_late_after_mins() -> u32 {
    15
}

fn default_shame_messages() -> Vec<String> {
    [
        "{@} is late. Shame.",
        "Still waiting on {@}...",
        "{@}, the clock is ticking.",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_super_shame_messages() -> Vec<String> {
    [
        "{@} is VERY late. Everyone point and stare.",
        "{@} has abandoned us.",
        "A moment of silence for {@}'s punctuality.",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Availability role configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RolesConfig {
    /// Whether role membership changes are dispatched at all.
    #[serde(default = "default_roles_enabled")]
    pub enabled: bool,
}

impl Default for RolesConfig {
    fn default() -> Self {
        Self {
            enabled: default_roles_enabled(),
        }
    }
}

fn default_roles_enabled() -> bool {
    true
}
