// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `rede parse` command implementation.

use chrono::{DateTime, FixedOffset, Utc};
use rede_config::RedeConfig;
use rede_core::{RedeError, Status};
use rede_intent::{StatusIntent, detect_trigger, parse_clause, resolve_status};
use serde::Serialize;

/// What the recognizer made of one message.
#[derive(Debug, Serialize)]
pub struct ParseReport {
    pub text: String,
    pub trigger: bool,
    /// The clause after the marker, when the message is a trigger.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clause: Option<String>,
    pub intent: StatusIntent,
    /// The status a session started now would open with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

pub fn report(text: &str, now: DateTime<Utc>, offset: FixedOffset) -> ParseReport {
    match detect_trigger(text) {
        Some(trigger) => {
            let intent = parse_clause(trigger.clause());
            ParseReport {
                text: text.to_string(),
                trigger: true,
                clause: Some(trigger.clause().to_string()),
                intent,
                status: Some(resolve_status(intent, now, offset)),
            }
        }
        None => ParseReport {
            text: text.to_string(),
            trigger: false,
            clause: None,
            intent: StatusIntent::Unknown,
            status: None,
        },
    }
}

/// Prints the report for `text` as pretty JSON.
pub fn run_parse(config: &RedeConfig, text: &str) -> Result<(), RedeError> {
    let offset = config
        .session
        .utc_offset()
        .ok_or_else(|| RedeError::Config("session.utc_offset_minutes out of range".to_string()))?;
    let report = report(text, Utc::now(), offset);
    let json = serde_json::to_string_pretty(&report)
        .map_err(|e| RedeError::Internal(format!("failed to render report: {e}")))?;
    println!("{json}");
    Ok(())
}
