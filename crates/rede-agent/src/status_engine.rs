// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Validated status transitions against a [`Session`].
//!
//! Every participant-driven change goes through [`apply_status`], which owns
//! the one guard rule: a live `Ready` presence is only ever superseded by
//! `Done`. Rejections are ordinary `false` results.

use chrono::{DateTime, Duration, FixedOffset, Utc};
use rede_core::{AvailabilityLevel, Session, Status, UserId};
use rede_intent::nearest_hour_after;
use tracing::debug;

/// Appends `status` for `participant` unless the Ready guard refuses it.
pub fn apply_status(
    session: &mut Session,
    participant: &UserId,
    status: Status,
    now: DateTime<Utc>,
) -> bool {
    let current = session.current_status(participant).map(Status::level);
    if current == Some(AvailabilityLevel::Ready) && status.level() != AvailabilityLevel::Done {
        debug!(
            key = %session.key(),
            participant = %participant,
            attempted = %status.level(),
            "status update rejected: participant is ready"
        );
        return false;
    }

    debug!(
        key = %session.key(),
        participant = %participant,
        from = ?current,
        to = %status.level(),
        "status applied"
    );
    session.append_status(participant.clone(), status, now);
    true
}

/// Copies the creator's current status onto `participant`.
///
/// `Ready` does not transfer and becomes `Available`, as does a creator
/// target that has already passed. A creator at `Unknown` or `Done` leaves
/// nothing to agree with.
pub fn agree_with_creator(session: &mut Session, participant: &UserId, now: DateTime<Utc>) -> bool {
    let Some(creator) = session.creator_status() else {
        return false;
    };
    let status = match creator.level() {
        AvailabilityLevel::AvailableLater if creator.is_late(now) => {
            Status::new(AvailabilityLevel::Available, now)
        }
        AvailabilityLevel::Maybe
        | AvailabilityLevel::Unavailable
        | AvailabilityLevel::AvailableLater
        | AvailabilityLevel::Available => {
            Status::from_parts(creator.level(), creator.time_available(), now)
        }
        AvailabilityLevel::Ready => Status::new(AvailabilityLevel::Available, now),
        AvailabilityLevel::Unknown | AvailabilityLevel::Done => return false,
    };
    apply_status(session, participant, status, now)
}

/// Pushes the participant's target time back by `offset`.
///
/// The baseline is the current target when already `AvailableLater`, so
/// repeated presses stack; otherwise it is `now`.
pub fn add_time(
    session: &mut Session,
    participant: &UserId,
    offset: Duration,
    now: DateTime<Utc>,
) -> bool {
    let baseline = session
        .current_status(participant)
        .and_then(Status::time_available)
        .unwrap_or(now);
    let Some(target) = baseline.checked_add_signed(offset) else {
        return false;
    };
    apply_status(session, participant, Status::available_later(target, now), now)
}

/// Sets the participant's target to `now + offset`, discarding any earlier
/// target. Used for reminder replies, whose target has already passed.
pub fn snooze(
    session: &mut Session,
    participant: &UserId,
    offset: Duration,
    now: DateTime<Utc>,
) -> bool {
    let Some(target) = now.checked_add_signed(offset) else {
        return false;
    };
    apply_status(session, participant, Status::available_later(target, now), now)
}

/// Sets the participant's target to the next local `hour:00`.
pub fn at_hour(
    session: &mut Session,
    participant: &UserId,
    hour: u32,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> bool {
    let Some(target) = nearest_hour_after(hour, now, offset) else {
        return false;
    };
    apply_status(session, participant, Status::available_later(target, now), now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rede_core::ConversationKey;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, h, m, 0).unwrap()
    }

    fn alice() -> UserId {
        UserId::new("alice")
    }

    fn bob() -> UserId {
        UserId::new("bob")
    }

    fn session_with(creator_status: Status) -> Session {
        Session::new(
            ConversationKey::new("g", "c"),
            alice(),
            creator_status,
            [bob()],
            at(14, 0),
        )
    }

    fn level_of(session: &Session, user: &UserId) -> AvailabilityLevel {
        session.current_status(user).map(Status::level).unwrap()
    }

    #[test]
    fn ready_is_only_superseded_by_done() {
        let mut session = session_with(Status::new(AvailabilityLevel::Available, at(14, 0)));
        assert!(apply_status(
            &mut session,
            &bob(),
            Status::new(AvailabilityLevel::Ready, at(14, 1)),
            at(14, 1)
        ));
        let log_len = session.status_log().len();

        assert!(!apply_status(
            &mut session,
            &bob(),
            Status::new(AvailabilityLevel::Available, at(14, 2)),
            at(14, 2)
        ));
        assert_eq!(level_of(&session, &bob()), AvailabilityLevel::Ready);
        assert_eq!(session.status_log().len(), log_len);

        assert!(apply_status(
            &mut session,
            &bob(),
            Status::new(AvailabilityLevel::Done, at(14, 3)),
            at(14, 3)
        ));
        assert_eq!(level_of(&session, &bob()), AvailabilityLevel::Done);
    }

    #[test]
    fn agree_copies_creator_time() {
        let mut session = session_with(Status::available_later(at(14, 20), at(14, 0)));
        assert!(agree_with_creator(&mut session, &bob(), at(14, 5)));
        let status = session.current_status(&bob()).unwrap();
        assert_eq!(status.level(), AvailabilityLevel::AvailableLater);
        assert_eq!(status.time_available(), Some(at(14, 20)));
        assert_eq!(status.created_at(), at(14, 5));
    }

    #[test]
    fn agree_with_ready_creator_means_available() {
        let mut session = session_with(Status::new(AvailabilityLevel::Ready, at(14, 0)));
        assert!(agree_with_creator(&mut session, &bob(), at(14, 5)));
        assert_eq!(level_of(&session, &bob()), AvailabilityLevel::Available);
    }

    #[test]
    fn agree_is_noop_for_unknown_or_done_creator() {
        for level in [AvailabilityLevel::Unknown, AvailabilityLevel::Done] {
            let mut session = session_with(Status::new(level, at(14, 0)));
            let log_len = session.status_log().len();
            assert!(!agree_with_creator(&mut session, &bob(), at(14, 5)));
            assert_eq!(session.status_log().len(), log_len);
        }
    }

    #[test]
    fn add_time_stacks_on_existing_target() {
        let mut session = session_with(Status::new(AvailabilityLevel::Available, at(14, 0)));
        assert!(add_time(&mut session, &bob(), Duration::minutes(15), at(14, 0)));
        assert!(add_time(&mut session, &bob(), Duration::minutes(15), at(14, 1)));
        let status = session.current_status(&bob()).unwrap();
        assert_eq!(status.time_available(), Some(at(14, 30)));
    }

    #[test]
    fn add_time_starts_from_now_otherwise() {
        let mut session = session_with(Status::new(AvailabilityLevel::Available, at(14, 0)));
        assert!(add_time(&mut session, &bob(), Duration::minutes(5), at(14, 10)));
        assert_eq!(
            session.current_status(&bob()).unwrap().time_available(),
            Some(at(14, 15))
        );
    }

    #[test]
    fn agree_with_overdue_creator_means_available() {
        let mut session = session_with(Status::available_later(at(14, 5), at(14, 0)));
        assert!(agree_with_creator(&mut session, &bob(), at(14, 30)));
        let status = session.current_status(&bob()).unwrap();
        assert_eq!(status.level(), AvailabilityLevel::Available);
        assert!(status.time_available().is_none());
    }

    #[test]
    fn agree_at_the_target_instant_still_copies_it() {
        let mut session = session_with(Status::available_later(at(14, 5), at(14, 0)));
        assert!(agree_with_creator(&mut session, &bob(), at(14, 5)));
        assert_eq!(
            session.current_status(&bob()).unwrap().time_available(),
            Some(at(14, 5))
        );
    }

    #[test]
    fn snooze_counts_from_now_not_the_missed_target() {
        let mut session = session_with(Status::available_later(at(14, 5), at(14, 0)));
        assert!(snooze(&mut session, &alice(), Duration::minutes(5), at(14, 12)));
        let status = session.current_status(&alice()).unwrap();
        assert_eq!(status.time_available(), Some(at(14, 17)));
        assert_eq!(status.lateness(), rede_core::LatenessTier::NotLate);
    }

    #[test]
    fn at_hour_picks_next_occurrence() {
        let mut session = session_with(Status::new(AvailabilityLevel::Available, at(14, 0)));
        let utc = FixedOffset::east_opt(0).unwrap();
        assert!(at_hour(&mut session, &bob(), 21, at(14, 0), utc));
        assert_eq!(
            session.current_status(&bob()).unwrap().time_available(),
            Some(at(21, 0))
        );
    }
}
