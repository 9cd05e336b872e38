//! Storage layer for vocabr.
//!
//! This module provides persistence for review records and the word catalog:
//! - **traits**: `RecordStore` (per user/word review state) and `WordCatalog`
//!   (static word metadata)
//! - **SqliteStore**: durable implementation with versioned schema migrations
//! - **MemoryStore**: volatile implementation sharing the same semantics
//!
//! # Example
//!
//! ```ignore
//! use vocabr::store::{RecordStore, SqliteStore};
//!
//! let store = SqliteStore::open("/path/to/vocabr.db")?;
//! store.create(user_id, word_id, today)?;
//! let due = store.query_due(user_id, today, 10)?;
//! ```

mod memory;
mod schema;
mod sqlite;
mod traits;

pub use memory::MemoryStore;
pub use schema::{CURRENT_SCHEMA_VERSION, run_migrations, schema_version};
pub use sqlite::SqliteStore;
pub use traits::{RecordStore, WordCatalog};
