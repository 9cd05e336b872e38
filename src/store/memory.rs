//! In-memory record store and catalog.
//!
//! Mirrors `SqliteStore` semantics (first-write-wins enrollment, inner join
//! against the catalog, due ordering) using the scheduler's selection policy
//! directly. Nothing survives the process.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;

use crate::domain::{DueWord, UserId, Word, WordId, WordRecord, normalize_word};
use crate::error::{Result, VocabrError};
use crate::scheduler::{due_order, select_due};
use crate::store::traits::{RecordStore, WordCatalog};

#[derive(Debug, Default)]
struct Inner {
    records: BTreeMap<(UserId, WordId), WordRecord>,
    words: BTreeMap<WordId, Word>,
}

/// Volatile store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|e| VocabrError::StorageUnavailable(format!("memory store lock poisoned: {}", e)))
    }
}

impl Inner {
    fn require_word(&self, word_id: WordId) -> Result<()> {
        if self.words.contains_key(&word_id) {
            Ok(())
        } else {
            Err(VocabrError::StorageUnavailable(format!(
                "foreign key violation: word {} not in catalog",
                word_id
            )))
        }
    }
}

/// Same row constraint the SQLite schema enforces.
fn check_record(record: &WordRecord) -> Result<()> {
    if record.appearances < record.repetition_count {
        return Err(VocabrError::StorageUnavailable(format!(
            "check constraint failed: appearances {} < repetition_count {}",
            record.appearances, record.repetition_count
        )));
    }
    Ok(())
}

impl RecordStore for MemoryStore {
    fn get(&self, user_id: UserId, word_id: WordId) -> Result<Option<WordRecord>> {
        Ok(self.lock()?.records.get(&(user_id, word_id)).cloned())
    }

    fn create(&self, user_id: UserId, word_id: WordId, today: NaiveDate) -> Result<bool> {
        let mut inner = self.lock()?;
        inner.require_word(word_id)?;
        if inner.records.contains_key(&(user_id, word_id)) {
            return Ok(false);
        }
        inner
            .records
            .insert((user_id, word_id), WordRecord::enrolled(user_id, word_id, today));
        Ok(true)
    }

    fn update(&self, record: &WordRecord) -> Result<()> {
        check_record(record)?;
        let mut inner = self.lock()?;
        match inner.records.get_mut(&record.key()) {
            Some(existing) => {
                *existing = record.clone();
                Ok(())
            }
            None => Err(VocabrError::NotEnrolled {
                user_id: record.user_id,
                word_id: record.word_id,
            }),
        }
    }

    fn apply_review(
        &self,
        user_id: UserId,
        word_id: WordId,
        today: NaiveDate,
        transition: &dyn Fn(&WordRecord) -> WordRecord,
    ) -> Result<WordRecord> {
        let mut inner = self.lock()?;
        inner.require_word(word_id)?;

        let current = inner
            .records
            .get(&(user_id, word_id))
            .cloned()
            .unwrap_or_else(|| WordRecord::enrolled(user_id, word_id, today));
        let next = transition(&current);
        check_record(&next)?;

        inner.records.insert(next.key(), next.clone());
        Ok(next)
    }

    fn query_due(&self, user_id: UserId, today: NaiveDate, limit: usize) -> Result<Vec<DueWord>> {
        let inner = self.lock()?;
        let user_records = inner
            .records
            .values()
            .filter(|r| r.user_id == user_id && inner.words.contains_key(&r.word_id));

        let due = select_due(user_records, today, limit)
            .into_iter()
            .filter_map(|record| {
                inner.words.get(&record.word_id).map(|word| DueWord {
                    word_id: record.word_id,
                    word_text: word.word.clone(),
                    phonetic: word.phonetic.clone(),
                    example: word.example.clone(),
                    repetition_count: record.repetition_count,
                    appearances: record.appearances,
                    next_due: record.next_due,
                })
            })
            .collect();

        Ok(due)
    }

    fn list_for_user(&self, user_id: UserId) -> Result<Vec<WordRecord>> {
        let inner = self.lock()?;
        let mut records: Vec<WordRecord> = inner
            .records
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(due_order);
        Ok(records)
    }
}

impl WordCatalog for MemoryStore {
    fn word(&self, word_id: WordId) -> Result<Option<Word>> {
        Ok(self.lock()?.words.get(&word_id).cloned())
    }

    fn find_by_spelling(&self, spelling: &str) -> Result<Option<Word>> {
        let needle = normalize_word(spelling);
        let inner = self.lock()?;
        let best = inner
            .words
            .values()
            .filter(|w| w.word == needle)
            .min_by_key(|w| (w.ranking.is_none(), w.ranking, w.id))
            .cloned();
        Ok(best)
    }

    fn upsert_words(&self, words: &[Word]) -> Result<usize> {
        let mut inner = self.lock()?;
        for word in words {
            let mut stored = word.clone();
            stored.word = normalize_word(&word.word);
            inner.words.insert(stored.id, stored);
        }
        Ok(words.len())
    }
}
