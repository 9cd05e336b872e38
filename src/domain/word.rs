//! Catalog entries and the rows shown to the review surface.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::word_record::WordId;

/// Static metadata for one vocabulary item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub id: WordId,

    /// Spelling, stored normalized
    pub word: String,

    #[serde(default)]
    pub phonetic: Option<String>,

    #[serde(default)]
    pub example: Option<String>,

    /// Frequency rank (1 = most common)
    #[serde(default)]
    pub ranking: Option<u32>,

    #[serde(default)]
    pub syllables: Option<u32>,
}

/// A due word joined with its catalog metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueWord {
    pub word_id: WordId,
    pub word_text: String,
    pub phonetic: Option<String>,
    pub example: Option<String>,
    pub repetition_count: u32,
    pub appearances: u32,
    pub next_due: Option<NaiveDate>,
}

/// Canonical spelling used for storage and lookup.
pub fn normalize_word(word: &str) -> String {
    word.trim().to_lowercase()
}
