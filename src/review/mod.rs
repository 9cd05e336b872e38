//! Enrollment and review API.
//!
//! `ReviewService` is what the study surface talks to. It composes a store
//! (review records plus the word catalog), the pure scheduler and a clock:
//! 1. `list_due` returns the words to show today
//! 2. the caller reports each answer with `report_outcome`
//! 3. the scheduler computes the next state and the store persists it
//!
//! Errors surface synchronously and are never retried here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::domain::{DueWord, Outcome, UserId, WordId, WordRecord};
use crate::error::{Result, VocabrError};
use crate::scheduler::{advance, is_due};
use crate::store::{RecordStore, WordCatalog};

/// Summary counts over one learner's list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewStats {
    pub enrolled: usize,
    pub learned: usize,
    pub due_today: usize,
    pub total_appearances: u64,
    pub total_repetitions: u64,
}

/// Review lifecycle operations over a store and a clock.
pub struct ReviewService<S, C> {
    store: S,
    clock: C,
}

impl<S, C> ReviewService<S, C>
where
    S: RecordStore + WordCatalog,
    C: Clock,
{
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Add a word to the learner's list, due today.
    ///
    /// Enrolling an already enrolled word leaves its record untouched.
    pub fn enroll(&self, user_id: UserId, word_id: WordId) -> Result<()> {
        if self.store.word(word_id)?.is_none() {
            return Err(VocabrError::UnknownWord(word_id));
        }

        let created = self.store.create(user_id, word_id, self.clock.today())?;
        if created {
            tracing::info!(user_id, word_id, "Enrolled word");
        } else {
            tracing::debug!(user_id, word_id, "Word already enrolled");
        }
        Ok(())
    }

    /// Record a review answer and schedule the next review.
    ///
    /// Enrolls the word first if needed, in the same write as the transition:
    /// on error the stored state is exactly what it was before the call.
    /// Returns the persisted record.
    pub fn report_outcome(&self, user_id: UserId, word_id: WordId, success: bool) -> Result<WordRecord> {
        if self.store.word(word_id)?.is_none() {
            return Err(VocabrError::UnknownWord(word_id));
        }

        let today = self.clock.today();
        let outcome = Outcome::from(success);
        let next = self.store.apply_review(user_id, word_id, today, &|current| {
            advance(Some(current), user_id, word_id, outcome, today)
        })?;

        tracing::info!(
            user_id,
            word_id,
            %outcome,
            repetition_count = next.repetition_count,
            appearances = next.appearances,
            next_due = ?next.next_due,
            "Recorded review outcome"
        );
        Ok(next)
    }

    /// Mark a word as permanently learned.
    ///
    /// Fails with `NotEnrolled` without writing anything when the word is not
    /// on the learner's list.
    pub fn confirm_learned(&self, user_id: UserId, word_id: WordId) -> Result<()> {
        let mut record = self
            .store
            .get(user_id, word_id)?
            .ok_or(VocabrError::NotEnrolled { user_id, word_id })?;

        if record.learned {
            tracing::debug!(user_id, word_id, "Word already learned");
            return Ok(());
        }

        record.learned = true;
        self.store.update(&record)?;
        tracing::info!(user_id, word_id, "Confirmed word as learned");
        Ok(())
    }

    /// Words to review today, undated first, at most `limit` of them.
    pub fn list_due(&self, user_id: UserId, limit: usize) -> Result<Vec<DueWord>> {
        let due = self.store.query_due(user_id, self.clock.today(), limit)?;
        tracing::debug!(user_id, limit, count = due.len(), "Listed due words");
        Ok(due)
    }

    /// Every word on the learner's list, learned ones included.
    pub fn list_words(&self, user_id: UserId) -> Result<Vec<WordRecord>> {
        self.store.list_for_user(user_id)
    }

    pub fn stats(&self, user_id: UserId) -> Result<ReviewStats> {
        let today = self.clock.today();
        let records = self.store.list_for_user(user_id)?;

        let stats = records.iter().fold(ReviewStats::default(), |mut acc, record| {
            acc.enrolled += 1;
            if record.learned {
                acc.learned += 1;
            }
            if is_due(record, today) {
                acc.due_today += 1;
            }
            acc.total_appearances += u64::from(record.appearances);
            acc.total_repetitions += u64::from(record.repetition_count);
            acc
        });

        Ok(stats)
    }
}
