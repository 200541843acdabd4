// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turning an intent into a concrete [`Status`] against the local clock.

use chrono::{DateTime, Duration, FixedOffset, NaiveTime, TimeZone, Timelike, Utc};
use rede_core::{AvailabilityLevel, Status};

use crate::intent::StatusIntent;

/// Resolves `intent` into the status it declares at `now`.
///
/// `offset` is the local UTC offset used for clock-time phrases.
pub fn resolve_status(intent: StatusIntent, now: DateTime<Utc>, offset: FixedOffset) -> Status {
    match target_time(intent, now, offset) {
        Some(at) => Status::available_later(at, now),
        None => match intent {
            StatusIntent::Immediate => Status::new(AvailabilityLevel::Available, now),
            _ => Status::new(AvailabilityLevel::Unknown, now),
        },
    }
}

/// The instant an intent points at, for the intents that name one.
pub fn target_time(
    intent: StatusIntent,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Option<DateTime<Utc>> {
    match intent {
        StatusIntent::RelativeMinutes(n) => now.checked_add_signed(Duration::minutes(n.into())),
        StatusIntent::RelativeHours(n) => now.checked_add_signed(Duration::hours(n.into())),
        StatusIntent::AbsoluteTimeOfDay { hour, minute } => {
            clock_time_today(hour, minute, now, offset)
        }
        StatusIntent::Immediate | StatusIntent::Unknown => None,
    }
}

/// Places a 12-hour clock time on today's local date.
///
/// Before local noon the time is taken as AM, from noon on as PM. The result
/// is never moved to the next day, so a time already passed on the same
/// side of noon resolves into the past, and "12" on the PM side lands on
/// the following midnight.
pub fn clock_time_today(
    hour: u32,
    minute: u32,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Option<DateTime<Utc>> {
    let local = now.with_timezone(&offset);
    let half_day = if local.hour() < 12 { 0 } else { 12 };
    let midnight = local.date_naive().and_time(NaiveTime::MIN);
    let naive = midnight
        + Duration::hours(i64::from(half_day + hour))
        + Duration::minutes(i64::from(minute));
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// The nearest local `hour:00` strictly after `now`, within the next 24 hours.
pub fn nearest_hour_after(hour: u32, now: DateTime<Utc>, offset: FixedOffset) -> Option<DateTime<Utc>> {
    let local = now.with_timezone(&offset);
    let time = NaiveTime::from_hms_opt(hour, 0, 0)?;
    let mut candidate = offset
        .from_local_datetime(&local.date_naive().and_time(time))
        .single()?
        .with_timezone(&Utc);
    if candidate <= now {
        candidate += Duration::days(1);
    }
    Some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(d: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, d, h, m, 0).unwrap()
    }

    fn utc_offset() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn relative_minutes_from_now() {
        let status = resolve_status(StatusIntent::RelativeMinutes(20), utc(1, 14, 0), utc_offset());
        assert_eq!(status.level(), AvailabilityLevel::AvailableLater);
        assert_eq!(status.time_available(), Some(utc(1, 14, 20)));
        assert_eq!(status.created_at(), utc(1, 14, 0));
    }

    #[test]
    fn immediate_and_unknown() {
        let now = utc(1, 14, 0);
        assert_eq!(
            resolve_status(StatusIntent::Immediate, now, utc_offset()).level(),
            AvailabilityLevel::Available
        );
        assert_eq!(
            resolve_status(StatusIntent::Unknown, now, utc_offset()).level(),
            AvailabilityLevel::Unknown
        );
    }

    #[test]
    fn morning_resolves_am() {
        let at = clock_time_today(10, 30, utc(1, 9, 0), utc_offset());
        assert_eq!(at, Some(utc(1, 10, 30)));
    }

    #[test]
    fn afternoon_resolves_pm() {
        let at = clock_time_today(8, 0, utc(1, 14, 0), utc_offset());
        assert_eq!(at, Some(utc(1, 20, 0)));
    }

    #[test]
    fn passed_time_is_not_rolled_forward() {
        let at = clock_time_today(9, 0, utc(1, 9, 5), utc_offset());
        assert_eq!(at, Some(utc(1, 9, 0)));
    }

    #[test]
    fn twelve_after_noon_is_next_midnight() {
        let at = clock_time_today(12, 0, utc(1, 14, 0), utc_offset());
        assert_eq!(at, Some(utc(2, 0, 0)));
    }

    #[test]
    fn local_offset_decides_the_half_day() {
        // 10:00 UTC is 19:00 at +09:00, so "at 8" means 20:00 local.
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let at = clock_time_today(8, 0, utc(1, 10, 0), tokyo);
        assert_eq!(at, Some(utc(1, 11, 0)));
    }

    #[test]
    fn nearest_hour_rolls_to_tomorrow_when_passed() {
        assert_eq!(nearest_hour_after(21, utc(1, 20, 15), utc_offset()), Some(utc(1, 21, 0)));
        assert_eq!(nearest_hour_after(20, utc(1, 20, 15), utc_offset()), Some(utc(2, 20, 0)));
        assert_eq!(nearest_hour_after(0, utc(1, 20, 15), utc_offset()), Some(utc(2, 0, 0)));
        assert_eq!(nearest_hour_after(20, utc(1, 20, 0), utc_offset()), Some(utc(2, 20, 0)));
        assert_eq!(nearest_hour_after(24, utc(1, 20, 0), utc_offset()), None);
    }
}
