//! Spaced-repetition scheduling.
//!
//! This module provides:
//! - **Intervals**: the capped step function mapping a repetition count to the
//!   number of days until the next review.
//! - **advance**: the pure state transition applied when a review outcome is
//!   reported.
//! - **Due selection**: the policy deciding which records are reviewable today
//!   and in which order they are presented.
//!
//! Nothing here touches storage. The review service reads a record, runs
//! [`advance`] and writes the result back.

mod interval;
mod select;

pub use interval::{
    FAILURE_INTERVAL_DAYS, INTERVAL_SCHEDULE, MAX_INTERVAL_DAYS, advance, interval_days, next_due_date,
};
pub use select::{due_order, is_due, select_due};
