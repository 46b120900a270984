//! Snooze length calculation.

use crate::clock::ClockTime;
use crate::location::UtcOffset;
use chrono::{DateTime, Duration, Utc};
use std::fmt;

/// Whole minutes of do-not-disturb to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SnoozeDuration(u32);

impl SnoozeDuration {
    pub fn minutes(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for SnoozeDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} minutes", self.0)
    }
}

/// Minutes from `now` until the next occurrence of `target` on the user's clock.
///
/// `target` is read as today's date in the zone described by `offset`. When
/// that moment has already passed (strictly), the snooze runs until the same
/// time tomorrow. The result is truncated to whole minutes.
pub fn minutes_until(target: ClockTime, offset: UtcOffset, now: DateTime<Utc>) -> SnoozeDuration {
    let local_today = now.with_timezone(&offset.fixed()).date_naive();
    let target_local = local_today.and_time(target.naive_time());
    let mut target_at = target_local.and_utc() - Duration::seconds(i64::from(offset.seconds()));

    if now > target_at {
        target_at += Duration::days(1);
    }

    let minutes = (target_at - now).num_minutes();
    SnoozeDuration(u32::try_from(minutes).unwrap_or(0))
}
