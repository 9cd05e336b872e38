//! Domain types for vocabr
//!
//! This module contains the core domain types:
//! - WordRecord: per (user, word) review state
//! - Outcome: result of a single review attempt
//! - Word / DueWord: catalog entries and the rows the review surface shows

pub mod outcome;
pub mod word;
pub mod word_record;

pub use outcome::Outcome;
pub use word::{DueWord, Word, normalize_word};
pub use word_record::{UserId, WordId, WordRecord};
