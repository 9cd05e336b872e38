//! Review lifecycle integration tests
//!
//! Drives the review service against an on-disk SQLite store with a
//! hand-moved clock.

use std::sync::Arc;
use std::thread;

use chrono::NaiveDate;
use rusqlite::Connection;
use tempfile::TempDir;
use vocabr::clock::{FixedClock, ManualClock};
use vocabr::domain::{Word, WordRecord};
use vocabr::error::{Result, VocabrError};
use vocabr::review::ReviewService;
use vocabr::store::{RecordStore, SqliteStore, WordCatalog};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seed_catalog(store: &SqliteStore) -> Result<()> {
    let words = ["abate", "benign", "candid", "deft"]
        .iter()
        .enumerate()
        .map(|(i, w)| Word {
            id: i as i64 + 1,
            word: w.to_string(),
            phonetic: None,
            example: Some(format!("A sentence using {}.", w)),
            ranking: Some(i as u32 + 100),
            syllables: Some(2),
        })
        .collect::<Vec<_>>();
    store.upsert_words(&words)?;
    Ok(())
}

fn open_store(temp_dir: &TempDir) -> Result<SqliteStore> {
    SqliteStore::open(temp_dir.path().join("vocabr.db"))
}

/// Integration test: pass, pass, fail from a fresh enrollment
#[test]
fn test_pass_pass_fail_scenario() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = open_store(&temp_dir)?;
    seed_catalog(&store)?;
    let today = day(2025, 3, 10);
    let service = ReviewService::new(store, FixedClock(today));

    service.enroll(1, 1)?;

    service.report_outcome(1, 1, true)?;
    let r = service.store().get(1, 1)?.unwrap();
    assert_eq!((r.repetition_count, r.appearances, r.next_due), (1, 1, Some(day(2025, 3, 11))));

    service.report_outcome(1, 1, true)?;
    let r = service.store().get(1, 1)?.unwrap();
    assert_eq!((r.repetition_count, r.appearances, r.next_due), (2, 2, Some(day(2025, 3, 13))));

    service.report_outcome(1, 1, false)?;
    let r = service.store().get(1, 1)?.unwrap();
    assert_eq!((r.repetition_count, r.appearances, r.next_due), (2, 3, Some(day(2025, 3, 11))));

    Ok(())
}

/// Integration test: N successes give the capped interval ladder
#[test]
fn test_success_interval_sequence() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = open_store(&temp_dir)?;
    seed_catalog(&store)?;
    let today = day(2025, 1, 1);
    let service = ReviewService::new(store, FixedClock(today));
    service.enroll(1, 2)?;

    let mut deltas = Vec::new();
    for n in 1..=6u32 {
        let r = service.report_outcome(1, 2, true)?;
        assert_eq!(r.repetition_count, n);
        assert_eq!(r.appearances, n);
        deltas.push((r.next_due.unwrap() - today).num_days());
    }
    assert_eq!(deltas, vec![1, 3, 7, 14, 14, 14]);

    Ok(())
}

/// Integration test: failures only move the due date and the appearance count
#[test]
fn test_failures_never_touch_repetitions() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = open_store(&temp_dir)?;
    seed_catalog(&store)?;
    let today = day(2025, 1, 1);
    let service = ReviewService::new(store, FixedClock(today));

    service.report_outcome(1, 3, true)?;
    service.report_outcome(1, 3, true)?;
    for extra in 1..=3u32 {
        let r = service.report_outcome(1, 3, false)?;
        assert_eq!(r.repetition_count, 2);
        assert_eq!(r.appearances, 2 + extra);
        assert_eq!(r.next_due, Some(day(2025, 1, 2)));
    }

    Ok(())
}

/// Integration test: due list excludes learned words and future dates
#[test]
fn test_due_listing_rules() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = open_store(&temp_dir)?;
    seed_catalog(&store)?;
    let today = day(2025, 6, 15);
    let yesterday = day(2025, 6, 14);
    let service = ReviewService::new(store, FixedClock(today));

    for id in 1..=4 {
        service.enroll(1, id)?;
    }
    let set = |id: i64, next_due: Option<NaiveDate>| -> Result<()> {
        let mut r = service.store().get(1, id)?.unwrap();
        r.next_due = next_due;
        service.store().update(&r)
    };
    set(1, Some(yesterday))?;
    set(2, Some(yesterday))?;
    set(3, Some(day(2025, 6, 16)))?;
    set(4, None)?;
    service.confirm_learned(1, 2)?;

    let due = service.list_due(1, 10)?;
    let ids: Vec<i64> = due.iter().map(|d| d.word_id).collect();
    assert_eq!(ids, vec![4, 1]);
    assert_eq!(due[1].word_text, "abate");
    assert_eq!(due[1].example.as_deref(), Some("A sentence using abate."));

    Ok(())
}

/// Integration test: confirming an unenrolled word fails without writing
#[test]
fn test_confirm_learned_unenrolled() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = open_store(&temp_dir)?;
    seed_catalog(&store)?;
    let service = ReviewService::new(store, FixedClock(day(2025, 1, 1)));

    let err = service.confirm_learned(9, 1).unwrap_err();
    assert!(matches!(err, VocabrError::NotEnrolled { user_id: 9, word_id: 1 }));
    assert!(service.store().get(9, 1)?.is_none());
    assert!(service.list_words(9)?.is_empty());

    Ok(())
}

/// Integration test: enrollment is idempotent and survives reopening the database
#[test]
fn test_enrollment_persists_and_is_idempotent() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let today = day(2025, 2, 1);

    let after_review: WordRecord = {
        let store = open_store(&temp_dir)?;
        seed_catalog(&store)?;
        let service = ReviewService::new(store, FixedClock(today));
        service.enroll(1, 4)?;
        service.report_outcome(1, 4, true)?
    };

    let service = ReviewService::new(open_store(&temp_dir)?, FixedClock(day(2025, 2, 20)));
    service.enroll(1, 4)?;
    assert_eq!(service.store().get(1, 4)?, Some(after_review));

    Ok(())
}

/// Integration test: a word comes back on the expected days as time passes
#[test]
fn test_word_resurfaces_over_weeks() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = open_store(&temp_dir)?;
    seed_catalog(&store)?;
    let clock = Arc::new(ManualClock::new(day(2025, 4, 1)));
    let service = ReviewService::new(store, Arc::clone(&clock));
    service.enroll(1, 1)?;

    let mut review_days = Vec::new();
    for _ in 0..6 {
        while service.list_due(1, 10)?.is_empty() {
            clock.advance_days(1);
        }
        review_days.push(service.today());
        service.report_outcome(1, 1, true)?;
    }

    assert_eq!(
        review_days,
        vec![
            day(2025, 4, 1),
            day(2025, 4, 2),
            day(2025, 4, 5),
            day(2025, 4, 12),
            day(2025, 4, 26),
            day(2025, 5, 10),
        ]
    );

    Ok(())
}

/// Integration test: learners do not see each other's records
#[test]
fn test_users_are_isolated() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = open_store(&temp_dir)?;
    seed_catalog(&store)?;
    let service = ReviewService::new(store, FixedClock(day(2025, 1, 1)));

    service.enroll(1, 1)?;
    service.enroll(2, 1)?;
    service.report_outcome(1, 1, true)?;

    assert!(service.list_due(1, 10)?.is_empty());
    assert_eq!(service.list_due(2, 10)?.len(), 1);
    assert_eq!(service.store().get(2, 1)?.unwrap().appearances, 0);

    Ok(())
}

/// Integration test: a rejected write leaves the stored state as it was
#[test]
fn test_failed_outcome_leaves_state_untouched() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = open_store(&temp_dir)?;
    seed_catalog(&store)?;
    let today = day(2025, 1, 1);
    let service = ReviewService::new(store, FixedClock(today));
    service.enroll(1, 2)?;

    let side = Connection::open(temp_dir.path().join("vocabr.db"))?;
    side.execute_batch(
        "CREATE TRIGGER reject_updates BEFORE UPDATE ON user_vocab
         BEGIN SELECT RAISE(ABORT, 'updates disabled'); END;",
    )?;

    let err = service.report_outcome(1, 1, true).unwrap_err();
    assert!(matches!(err, VocabrError::StorageUnavailable(_)));
    assert!(service.store().get(1, 1)?.is_none());

    assert!(service.report_outcome(1, 2, false).is_err());
    assert_eq!(service.store().get(1, 2)?, Some(WordRecord::enrolled(1, 2, today)));

    Ok(())
}

/// Integration test: concurrent enrollments and reviews of one word
#[test]
fn test_concurrent_enroll_and_review() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = open_store(&temp_dir)?;
    seed_catalog(&store)?;
    let today = day(2025, 1, 1);
    let service = ReviewService::new(store, FixedClock(today));

    thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| service.enroll(1, 3).unwrap());
        }
    });
    assert_eq!(service.list_words(1)?.len(), 1);
    assert_eq!(service.store().get(1, 3)?, Some(WordRecord::enrolled(1, 3, today)));

    thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| service.report_outcome(1, 4, true).unwrap());
        }
    });
    let r = service.store().get(1, 4)?.unwrap();
    assert_eq!((r.repetition_count, r.appearances), (8, 8));
    assert_eq!(service.list_words(1)?.len(), 2);

    Ok(())
}
