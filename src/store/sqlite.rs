//! SQLite-backed record store and word catalog.
//!
//! One connection behind a `Mutex`: `rusqlite::Connection` is not `Sync`, and
//! every operation is a single short statement or transaction, so exclusive
//! access costs nothing. Dates are stored as ISO `YYYY-MM-DD` text, which sorts
//! in calendar order.

use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::clock::{format_date, parse_date};
use crate::domain::{DueWord, UserId, Word, WordId, WordRecord, normalize_word};
use crate::error::{Result, VocabrError};
use crate::store::schema::run_migrations;
use crate::store::traits::{RecordStore, WordCatalog};

/// Durable store for review records and catalog entries.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Open or create a database file, creating parent directories as needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        // journal_mode answers with the resulting mode, so it has to be queried
        let _mode: String = conn.query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;
        conn.execute_batch("PRAGMA synchronous=NORMAL; PRAGMA foreign_keys=ON;")?;

        tracing::debug!(path = %path.display(), "Opened SQLite store");
        Self::init(conn)
    }

    /// Private in-memory database. Used by tests.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Self::init(conn)
    }

    fn init(mut conn: Connection) -> Result<Self> {
        run_migrations(&mut conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| VocabrError::StorageUnavailable(format!("connection lock poisoned: {}", e)))
    }
}

/// Parse a stored due date, treating malformed text as a storage fault.
fn decode_due(raw: Option<String>) -> Result<Option<NaiveDate>> {
    match raw {
        None => Ok(None),
        Some(text) => parse_date(&text)
            .map(Some)
            .ok_or_else(|| VocabrError::StorageUnavailable(format!("malformed due date in store: {:?}", text))),
    }
}

fn limit_param(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

/// Columns of `user_vocab` as read from a row, before date decoding.
struct RawRecord {
    user_id: UserId,
    word_id: WordId,
    repetition_count: u32,
    next_due: Option<String>,
    appearances: u32,
    learned: bool,
}

impl RawRecord {
    const COLUMNS: &'static str = "user_id, word_id, repetition_count, next_due, appearances, learned";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            user_id: row.get(0)?,
            word_id: row.get(1)?,
            repetition_count: row.get(2)?,
            next_due: row.get(3)?,
            appearances: row.get(4)?,
            learned: row.get(5)?,
        })
    }

    fn decode(self) -> Result<WordRecord> {
        Ok(WordRecord {
            user_id: self.user_id,
            word_id: self.word_id,
            repetition_count: self.repetition_count,
            next_due: decode_due(self.next_due)?,
            appearances: self.appearances,
            learned: self.learned,
        })
    }
}

fn word_from_row(row: &Row<'_>) -> rusqlite::Result<Word> {
    Ok(Word {
        id: row.get(0)?,
        word: row.get(1)?,
        phonetic: row.get(2)?,
        example: row.get(3)?,
        ranking: row.get(4)?,
        syllables: row.get(5)?,
    })
}

fn select_record(conn: &Connection, user_id: UserId, word_id: WordId) -> Result<Option<WordRecord>> {
    let raw = conn
        .query_row(
            &format!(
                "SELECT {} FROM user_vocab WHERE user_id = ?1 AND word_id = ?2",
                RawRecord::COLUMNS
            ),
            params![user_id, word_id],
            RawRecord::from_row,
        )
        .optional()?;

    raw.map(RawRecord::decode).transpose()
}

/// Insert a fresh enrollment unless the pair already has a record.
fn insert_enrollment(conn: &Connection, user_id: UserId, word_id: WordId, today: NaiveDate) -> Result<bool> {
    let inserted = conn.execute(
        r#"
        INSERT INTO user_vocab (user_id, word_id, repetition_count, next_due, appearances, learned)
        VALUES (?1, ?2, 0, ?3, 0, 0)
        ON CONFLICT (user_id, word_id) DO NOTHING
        "#,
        params![user_id, word_id, format_date(today)],
    )?;

    Ok(inserted > 0)
}

fn write_record(conn: &Connection, record: &WordRecord) -> Result<()> {
    let changed = conn.execute(
        r#"
        UPDATE user_vocab
        SET repetition_count = ?3, next_due = ?4, appearances = ?5, learned = ?6
        WHERE user_id = ?1 AND word_id = ?2
        "#,
        params![
            record.user_id,
            record.word_id,
            record.repetition_count,
            record.next_due.map(format_date),
            record.appearances,
            record.learned,
        ],
    )?;

    if changed == 0 {
        return Err(VocabrError::NotEnrolled {
            user_id: record.user_id,
            word_id: record.word_id,
        });
    }
    Ok(())
}

impl RecordStore for SqliteStore {
    fn get(&self, user_id: UserId, word_id: WordId) -> Result<Option<WordRecord>> {
        let conn = self.lock()?;
        select_record(&conn, user_id, word_id)
    }

    fn create(&self, user_id: UserId, word_id: WordId, today: NaiveDate) -> Result<bool> {
        let conn = self.lock()?;
        insert_enrollment(&conn, user_id, word_id, today)
    }

    fn update(&self, record: &WordRecord) -> Result<()> {
        let conn = self.lock()?;
        write_record(&conn, record)
    }

    fn apply_review(
        &self,
        user_id: UserId,
        word_id: WordId,
        today: NaiveDate,
        transition: &dyn Fn(&WordRecord) -> WordRecord,
    ) -> Result<WordRecord> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        insert_enrollment(&tx, user_id, word_id, today)?;
        let current = select_record(&tx, user_id, word_id)?.ok_or(VocabrError::NotEnrolled { user_id, word_id })?;
        let next = transition(&current);
        write_record(&tx, &next)?;

        tx.commit()?;
        Ok(next)
    }

    fn query_due(&self, user_id: UserId, today: NaiveDate, limit: usize) -> Result<Vec<DueWord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT uv.word_id, w.word, w.phonetic, w.example, uv.repetition_count, uv.appearances, uv.next_due
            FROM user_vocab uv JOIN words w ON uv.word_id = w.id
            WHERE uv.user_id = ?1
              AND uv.learned = 0
              AND (uv.next_due IS NULL OR uv.next_due <= ?2)
            ORDER BY uv.next_due IS NOT NULL, uv.next_due, uv.word_id
            LIMIT ?3
            "#,
        )?;

        let rows = stmt.query_map(params![user_id, format_date(today), limit_param(limit)], |row| {
            Ok((
                DueWord {
                    word_id: row.get(0)?,
                    word_text: row.get(1)?,
                    phonetic: row.get(2)?,
                    example: row.get(3)?,
                    repetition_count: row.get(4)?,
                    appearances: row.get(5)?,
                    next_due: None,
                },
                row.get::<_, Option<String>>(6)?,
            ))
        })?;

        let mut due = Vec::new();
        for row in rows {
            let (mut item, raw_due) = row?;
            item.next_due = decode_due(raw_due)?;
            due.push(item);
        }

        Ok(due)
    }

    fn list_for_user(&self, user_id: UserId) -> Result<Vec<WordRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM user_vocab WHERE user_id = ?1 ORDER BY next_due IS NOT NULL, next_due, word_id",
            RawRecord::COLUMNS
        ))?;
        let rows = stmt.query_map([user_id], RawRecord::from_row)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?.decode()?);
        }

        Ok(records)
    }
}

impl WordCatalog for SqliteStore {
    fn word(&self, word_id: WordId) -> Result<Option<Word>> {
        let conn = self.lock()?;
        let word = conn
            .query_row(
                "SELECT id, word, phonetic, example, ranking, syllables FROM words WHERE id = ?1",
                [word_id],
                word_from_row,
            )
            .optional()?;
        Ok(word)
    }

    fn find_by_spelling(&self, spelling: &str) -> Result<Option<Word>> {
        let conn = self.lock()?;
        let word = conn
            .query_row(
                r#"
                SELECT id, word, phonetic, example, ranking, syllables FROM words
                WHERE word = ?1
                ORDER BY ranking IS NULL, ranking, id
                LIMIT 1
                "#,
                [normalize_word(spelling)],
                word_from_row,
            )
            .optional()?;
        Ok(word)
    }

    fn upsert_words(&self, words: &[Word]) -> Result<usize> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO words (id, word, phonetic, example, ranking, syllables)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ON CONFLICT (id) DO UPDATE SET
                    word = excluded.word,
                    phonetic = excluded.phonetic,
                    example = excluded.example,
                    ranking = excluded.ranking,
                    syllables = excluded.syllables
                "#,
            )?;
            for word in words {
                stmt.execute(params![
                    word.id,
                    normalize_word(&word.word),
                    word.phonetic,
                    word.example,
                    word.ranking,
                    word.syllables,
                ])?;
            }
        }
        tx.commit()?;

        Ok(words.len())
    }
}
