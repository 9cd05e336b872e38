//! vocabr - spaced-repetition review for a personal vocabulary list
//!
//! Learners enroll words from a ranked catalog, review them on a fixed
//! interval ladder (1, 3, 7, then every 14 days) and retire them once learned.

pub mod catalog;
pub mod clock;
pub mod domain;
pub mod error;
pub mod review;
pub mod scheduler;
pub mod store;

pub use error::{Result, VocabrError};
