//! Storage trait definitions.

use chrono::NaiveDate;

use crate::domain::{DueWord, UserId, Word, WordId, WordRecord};
use crate::error::Result;

/// Persistent per-(user, word) review state.
///
/// Every mutation is durable when the call returns.
pub trait RecordStore: Send + Sync {
    /// Get the record for a (user, word) pair.
    fn get(&self, user_id: UserId, word_id: WordId) -> Result<Option<WordRecord>>;

    /// Enroll a word, due on `today`.
    ///
    /// First write wins: returns `false` and leaves the existing record alone if
    /// the pair is already enrolled.
    fn create(&self, user_id: UserId, word_id: WordId, today: NaiveDate) -> Result<bool>;

    /// Overwrite the mutable fields of an existing record.
    ///
    /// Fails with `NotEnrolled` when no record exists for the pair.
    fn update(&self, record: &WordRecord) -> Result<()>;

    /// Enroll the pair if needed, then replace its record with `transition`
    /// applied to the current one, as a single atomic write.
    ///
    /// On error nothing is persisted, not even the enrollment.
    fn apply_review(
        &self,
        user_id: UserId,
        word_id: WordId,
        today: NaiveDate,
        transition: &dyn Fn(&WordRecord) -> WordRecord,
    ) -> Result<WordRecord>;

    /// Records due on `today`, undated first then by due date, joined with
    /// catalog metadata and truncated to `limit`.
    fn query_due(&self, user_id: UserId, today: NaiveDate, limit: usize) -> Result<Vec<DueWord>>;

    /// Every record of a user, learned or not, in due order.
    fn list_for_user(&self, user_id: UserId) -> Result<Vec<WordRecord>>;
}

/// Static word metadata owned by the catalog.
pub trait WordCatalog: Send + Sync {
    /// Look a word up by id.
    fn word(&self, word_id: WordId) -> Result<Option<Word>>;

    /// Look a word up by spelling (normalized before matching).
    ///
    /// When several entries share a spelling the best ranked one wins.
    fn find_by_spelling(&self, spelling: &str) -> Result<Option<Word>>;

    /// Insert or replace catalog entries by id. Returns how many were written.
    fn upsert_words(&self, words: &[Word]) -> Result<usize>;
}
