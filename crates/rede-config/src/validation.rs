// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that serde attributes cannot express.
//! All violations are collected; validation does not fail fast.

use crate::diagnostic::ConfigError;
use crate::model::RedeConfig;

/// Widest UTC offset in use anywhere, in minutes.
const MAX_UTC_OFFSET_MINUTES: u32 = 14 * 60;

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &RedeConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if !matches!(
        config.agent.log_level.as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    ) {
        fail(format!(
            "agent.log_level must be one of trace, debug, info, warn, error, got `{}`",
            config.agent.log_level
        ));
    }

    let session = &config.session;
    if session.ttl_hours == 0 {
        fail("session.ttl_hours must be greater than 0".to_string());
    }
    if session.sweep_interval_secs == 0 {
        fail("session.sweep_interval_secs must be greater than 0".to_string());
    }
    if session.confirmation_timeout_secs == 0 {
        fail("session.confirmation_timeout_secs must be greater than 0".to_string());
    }
    if session.utc_offset_minutes.unsigned_abs() > MAX_UTC_OFFSET_MINUTES {
        fail(format!(
            "session.utc_offset_minutes must be within +/-{MAX_UTC_OFFSET_MINUTES}, got {}",
            session.utc_offset_minutes
        ));
    }
    for (i, id) in session.default_participants.iter().enumerate() {
        if id.trim().is_empty() {
            fail(format!("session.default_participants[{i}] must not be empty"));
        }
    }

    let lateness = &config.lateness;
    if lateness.late_after_mins == 0 {
        fail("lateness.late_after_mins must be greater than 0".to_string());
    }
    if lateness.very_late_after_mins <= lateness.late_after_mins {
        fail(format!(
            "lateness.very_late_after_mins ({}) must be greater than lateness.late_after_mins ({})",
            lateness.very_late_after_mins, lateness.late_after_mins
        ));
    }
    if lateness.shame_messages.is_empty() {
        fail("lateness.shame_messages must not be empty".to_string());
    }
    if lateness.super_shame_messages.is_empty() {
        fail("lateness.super_shame_messages must not be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
