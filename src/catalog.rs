//! Word catalog import.
//!
//! Catalog files are a list of word entries in YAML (`.yml`/`.yaml`) or JSON
//! (`.json`):
//!
//! ```yaml
//! - id: 1
//!   word: the
//!   phonetic: /ðə/
//!   example: The cat sat on the mat.
//!   ranking: 1
//!   syllables: 1
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::domain::{Word, normalize_word};
use crate::error::{Result, VocabrError};
use crate::store::WordCatalog;

/// Serialization format of a catalog file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Yaml,
    Json,
}

impl CatalogFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("yml") | Some("yaml") => Ok(CatalogFormat::Yaml),
            Some("json") => Ok(CatalogFormat::Json),
            _ => Err(VocabrError::InvalidInput(format!(
                "unsupported catalog file extension: {}",
                path.display()
            ))),
        }
    }
}

/// Parse and validate catalog entries.
///
/// Spellings are normalized; empty spellings, non-positive ids and duplicate
/// ids are rejected.
pub fn parse_words(content: &str, format: CatalogFormat) -> Result<Vec<Word>> {
    let mut words: Vec<Word> = match format {
        CatalogFormat::Yaml => serde_yaml::from_str(content)?,
        CatalogFormat::Json => serde_json::from_str(content)?,
    };

    let mut seen = HashSet::new();
    for word in &mut words {
        if word.id <= 0 {
            return Err(VocabrError::InvalidInput(format!("word id must be positive: {}", word.id)));
        }
        if !seen.insert(word.id) {
            return Err(VocabrError::InvalidInput(format!("duplicate word id: {}", word.id)));
        }
        word.word = normalize_word(&word.word);
        if word.word.is_empty() {
            return Err(VocabrError::InvalidInput(format!("word {} has an empty spelling", word.id)));
        }
    }

    Ok(words)
}

/// Load a catalog file and write its entries into `catalog`.
///
/// Returns the number of entries written.
pub fn import_file<W: WordCatalog + ?Sized>(catalog: &W, path: &Path) -> Result<usize> {
    let format = CatalogFormat::from_path(path)?;
    let content = fs::read_to_string(path)?;
    let words = parse_words(&content, format)?;
    let written = catalog.upsert_words(&words)?;

    tracing::info!(path = %path.display(), count = written, "Imported word catalog");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use tempfile::TempDir;

    const SAMPLE_YAML: &str = r#"
- id: 1
  word: The
  phonetic: /ðə/
  example: The cat sat on the mat.
  ranking: 1
  syllables: 1
- id: 2
  word: " serendipity "
"#;

    #[test]
    fn test_format_from_path() {
        assert_eq!(CatalogFormat::from_path(Path::new("w.yml")).unwrap(), CatalogFormat::Yaml);
        assert_eq!(CatalogFormat::from_path(Path::new("w.YAML")).unwrap(), CatalogFormat::Yaml);
        assert_eq!(CatalogFormat::from_path(Path::new("w.json")).unwrap(), CatalogFormat::Json);
        assert!(CatalogFormat::from_path(Path::new("w.csv")).is_err());
        assert!(CatalogFormat::from_path(Path::new("words")).is_err());
    }

    #[test]
    fn test_parse_yaml_normalizes() {
        let words = parse_words(SAMPLE_YAML, CatalogFormat::Yaml).unwrap();
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].word, "the");
        assert_eq!(words[0].ranking, Some(1));
        assert_eq!(words[1].word, "serendipity");
        assert_eq!(words[1].example, None);
    }

    #[test]
    fn test_parse_json() {
        let json = r#"[{"id": 5, "word": "Apple", "syllables": 2}]"#;
        let words = parse_words(json, CatalogFormat::Json).unwrap();
        assert_eq!(words[0].word, "apple");
        assert_eq!(words[0].syllables, Some(2));
    }

    #[test]
    fn test_parse_rejects_duplicates_and_blanks() {
        let dup = "- {id: 1, word: a}\n- {id: 1, word: b}\n";
        assert!(matches!(
            parse_words(dup, CatalogFormat::Yaml),
            Err(VocabrError::InvalidInput(_))
        ));

        let blank = "- {id: 1, word: '   '}\n";
        assert!(matches!(
            parse_words(blank, CatalogFormat::Yaml),
            Err(VocabrError::InvalidInput(_))
        ));

        let zero = "- {id: 0, word: a}\n";
        assert!(parse_words(zero, CatalogFormat::Yaml).is_err());
    }

    #[test]
    fn test_parse_malformed_yaml() {
        let err = parse_words("- id: [", CatalogFormat::Yaml).unwrap_err();
        assert!(matches!(err, VocabrError::Yaml(_)));
    }

    #[test]
    fn test_import_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("words.yml");
        fs::write(&path, SAMPLE_YAML).unwrap();

        let store = MemoryStore::new();
        assert_eq!(import_file(&store, &path).unwrap(), 2);
        assert_eq!(store.find_by_spelling("Serendipity").unwrap().unwrap().id, 2);
    }

    #[test]
    fn test_import_missing_file() {
        let store = MemoryStore::new();
        let err = import_file(&store, Path::new("/nonexistent/words.yml")).unwrap_err();
        assert!(matches!(err, VocabrError::Io(_)));
    }
}
