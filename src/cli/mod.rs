//! CLI module for vocabr - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for catalog import and the
//! review lifecycle.

pub mod commands;

pub use commands::Cli;
