//! Per-learner review state for one vocabulary item.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Opaque learner identifier
pub type UserId = i64;

/// Opaque vocabulary item identifier
pub type WordId = i64;

/// Review state of one word in one learner's personal list.
///
/// A record exists exactly when the word has been enrolled at least once.
/// `appearances` never drops below `repetition_count`, and `learned` never goes
/// back to false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRecord {
    pub user_id: UserId,
    pub word_id: WordId,

    /// Successful review cycles completed
    pub repetition_count: u32,

    /// Day the word becomes reviewable again (None = due immediately)
    pub next_due: Option<NaiveDate>,

    /// Times the word has been reviewed, pass or fail
    pub appearances: u32,

    /// Permanently excluded from review once set
    pub learned: bool,
}

impl WordRecord {
    /// Fresh enrollment, due on `today`.
    pub fn enrolled(user_id: UserId, word_id: WordId, today: NaiveDate) -> Self {
        Self {
            user_id,
            word_id,
            repetition_count: 0,
            next_due: Some(today),
            appearances: 0,
            learned: false,
        }
    }

    /// Zeroed state used when an outcome arrives for a word without a record.
    pub fn blank(user_id: UserId, word_id: WordId) -> Self {
        Self {
            user_id,
            word_id,
            repetition_count: 0,
            next_due: None,
            appearances: 0,
            learned: false,
        }
    }

    pub fn key(&self) -> (UserId, WordId) {
        (self.user_id, self.word_id)
    }
}
