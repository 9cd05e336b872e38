//! SQLite schema migrations.
//!
//! Each migration runs in its own transaction and bumps `PRAGMA user_version`,
//! so reopening a database only applies what is missing.

use rusqlite::Connection;

use crate::error::{Result, VocabrError};

/// Latest schema version.
pub const CURRENT_SCHEMA_VERSION: i64 = 2;

/// A single schema step.
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i64,
    pub name: &'static str,
    pub sql: &'static str,
}

/// All migrations, ordered by version.
pub fn migrations() -> Vec<Migration> {
    vec![
        Migration {
            version: 1,
            name: "words and user_vocab tables",
            sql: r#"
            CREATE TABLE IF NOT EXISTS words (
                id INTEGER PRIMARY KEY,
                word TEXT NOT NULL,
                phonetic TEXT,
                example TEXT,
                ranking INTEGER,
                syllables INTEGER
            );

            CREATE TABLE IF NOT EXISTS user_vocab (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                word_id INTEGER NOT NULL REFERENCES words(id),
                repetition_count INTEGER NOT NULL DEFAULT 0 CHECK (repetition_count >= 0),
                next_due TEXT,
                appearances INTEGER NOT NULL DEFAULT 0 CHECK (appearances >= repetition_count),
                learned INTEGER NOT NULL DEFAULT 0,
                UNIQUE (user_id, word_id)
            );
            "#,
        },
        Migration {
            version: 2,
            name: "due and spelling indexes",
            sql: r#"
            CREATE INDEX IF NOT EXISTS idx_user_vocab_due ON user_vocab(user_id, learned, next_due);
            CREATE INDEX IF NOT EXISTS idx_words_word ON words(word);
            "#,
        },
    ]
}

/// Read the schema version stored in the database.
pub fn schema_version(conn: &Connection) -> Result<i64> {
    let version = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    Ok(version)
}

/// Apply every migration newer than the stored version.
///
/// Returns the number of migrations applied.
pub fn run_migrations(conn: &mut Connection) -> Result<usize> {
    let current = schema_version(conn)?;
    if current > CURRENT_SCHEMA_VERSION {
        return Err(VocabrError::StorageUnavailable(format!(
            "database schema version {} is newer than supported version {}",
            current, CURRENT_SCHEMA_VERSION
        )));
    }

    let mut applied = 0;
    for migration in migrations().into_iter().filter(|m| m.version > current) {
        let tx = conn.transaction()?;
        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {}", migration.version))?;
        tx.commit()?;

        tracing::info!(version = migration.version, migration = migration.name, "Applied schema migration");
        applied += 1;
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_ordered_and_end_at_current() {
        let all = migrations();
        for pair in all.windows(2) {
            assert!(pair[0].version < pair[1].version);
        }
        assert_eq!(all.last().map(|m| m.version), Some(CURRENT_SCHEMA_VERSION));
    }

    #[test]
    fn test_run_migrations_on_fresh_database() {
        let mut conn = Connection::open_in_memory().unwrap();
        assert_eq!(schema_version(&conn).unwrap(), 0);

        let applied = run_migrations(&mut conn).unwrap();
        assert_eq!(applied as i64, CURRENT_SCHEMA_VERSION);
        assert_eq!(schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn test_run_migrations_is_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&mut conn).unwrap();
        assert_eq!(run_migrations(&mut conn).unwrap(), 0);
    }

    #[test]
    fn test_newer_schema_is_rejected() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA user_version = 99").unwrap();
        let err = run_migrations(&mut conn).unwrap_err();
        assert!(matches!(err, VocabrError::StorageUnavailable(_)));
    }

    #[test]
    fn test_unique_pair_constraint() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&mut conn).unwrap();
        conn.execute("INSERT INTO words (id, word) VALUES (1, 'apple')", []).unwrap();
        conn.execute("INSERT INTO user_vocab (user_id, word_id) VALUES (1, 1)", [])
            .unwrap();
        assert!(
            conn.execute("INSERT INTO user_vocab (user_id, word_id) VALUES (1, 1)", [])
                .is_err()
        );
    }
}
