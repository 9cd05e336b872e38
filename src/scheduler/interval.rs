//! Review intervals and the outcome transition.
//!
//! Intervals follow a fixed ladder keyed by the repetition count reached after
//! a successful review:
//! - 1st success: +1 day
//! - 2nd success: +3 days
//! - 3rd success: +7 days
//! - every later success: +14 days
//!
//! A failed review keeps the repetition count and retries tomorrow.

use chrono::{Days, NaiveDate};

use crate::domain::{Outcome, UserId, WordId, WordRecord};

/// Interval in days for repetition counts 1, 2 and 3.
pub const INTERVAL_SCHEDULE: [u64; 3] = [1, 3, 7];

/// Plateau interval once the ladder is exhausted.
pub const MAX_INTERVAL_DAYS: u64 = 14;

/// Interval after a failed review.
pub const FAILURE_INTERVAL_DAYS: u64 = 1;

/// Days until the next review after reaching `repetition_count` successes.
///
/// A count of zero only happens after failures, which always retry tomorrow.
pub fn interval_days(repetition_count: u32) -> u64 {
    match repetition_count {
        0 => FAILURE_INTERVAL_DAYS,
        n => INTERVAL_SCHEDULE
            .get(n as usize - 1)
            .copied()
            .unwrap_or(MAX_INTERVAL_DAYS),
    }
}

/// `today` plus `days`, saturating at the last representable date.
pub fn next_due_date(today: NaiveDate, days: u64) -> NaiveDate {
    today.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}

/// Compute the record that results from reviewing a word on `today`.
///
/// A missing record is treated as a zeroed one. The interval is measured from
/// `today`, not from the previous due date, so late reviews do not compound.
/// `learned` is carried over untouched.
pub fn advance(
    record: Option<&WordRecord>,
    user_id: UserId,
    word_id: WordId,
    outcome: Outcome,
    today: NaiveDate,
) -> WordRecord {
    let mut next = record.cloned().unwrap_or_else(|| WordRecord::blank(user_id, word_id));

    let days = match outcome {
        Outcome::Success => {
            next.repetition_count = next.repetition_count.saturating_add(1);
            interval_days(next.repetition_count)
        }
        Outcome::Failure => FAILURE_INTERVAL_DAYS,
    };

    next.next_due = Some(next_due_date(today, days));
    next.appearances = next.appearances.saturating_add(1);
    next
}
