//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - catalog: import and inspect the word catalog
//! - enroll / pass / fail / learned: review lifecycle for one word
//! - due / words / stats: what to review and how it is going

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// vocabr - spaced-repetition review for a personal vocabulary list
#[derive(Parser, Debug)]
#[command(name = "vocabr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Learner id (defaults to review.default_user from config)
    #[arg(short, long, global = true)]
    pub user: Option<i64>,

    /// Subcommand to execute (defaults to `due`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Word catalog management
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },

    /// Add a word to your review list
    Enroll {
        /// Word id or spelling
        word: String,
    },

    /// Record a successful review
    Pass {
        /// Word id or spelling
        word: String,
    },

    /// Record a failed review (word comes back tomorrow)
    Fail {
        /// Word id or spelling
        word: String,
    },

    /// Mark a word as learned for good
    Learned {
        /// Word id or spelling
        word: String,
    },

    /// List words due for review today
    Due {
        /// Maximum number of words to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// List every word on your review list
    Words,

    /// Show review statistics
    Stats,
}

/// Catalog subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum CatalogCommands {
    /// Import words from a YAML or JSON file
    Import {
        /// Catalog file (.yml, .yaml or .json)
        file: PathBuf,
    },

    /// Show the catalog entry for a word
    Show {
        /// Word id or spelling
        word: String,
    },
}
