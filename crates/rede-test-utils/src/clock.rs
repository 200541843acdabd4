// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A clock under test control.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use rede_core::Clock;

/// Clock that stays put until [`set`](ManualClock::set) or
/// [`advance`](ManualClock::advance) is called. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// A clock at `hour:minute` UTC on a fixed day.
    pub fn at(hour: u32, minute: u32) -> Self {
        let start = Utc
            .with_ymd_and_hms(2026, 3, 1, hour, minute, 0)
            .single()
            .unwrap_or_else(|| panic!("invalid test time {hour}:{minute}"));
        Self::new(start)
    }

    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = at;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }

    pub fn advance_minutes(&self, minutes: i64) {
        self.advance(Duration::minutes(minutes));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}
