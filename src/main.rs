use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use log::info;
use std::fs;
use std::path::PathBuf;

use vocabr::catalog;
use vocabr::clock::SystemClock;
use vocabr::review::ReviewService;
use vocabr::store::{SqliteStore, WordCatalog};

mod cli;
mod config;

use cli::Cli;
use cli::commands::{CatalogCommands, Commands};
use config::Config;

type Service = ReviewService<SqliteStore, SystemClock>;

/// Default filter for env_logger. RUST_LOG still takes precedence.
fn default_log_filter(config: &Config) -> &str {
    config.log_level.as_deref().unwrap_or("info")
}

fn setup_logging(config: &Config) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vocabr")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("vocabr.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_log_filter(config)))
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn open_service(config: &Config) -> Result<Service> {
    let store = SqliteStore::open(&config.storage.db_path)
        .with_context(|| format!("Failed to open database at {}", config.storage.db_path.display()))?;
    Ok(ReviewService::new(store, SystemClock::new(config.review.timezone)))
}

/// Accept either a numeric word id or a spelling from the catalog.
fn resolve_word(service: &Service, word: &str) -> Result<i64> {
    if let Ok(id) = word.trim().parse::<i64>() {
        return Ok(id);
    }
    service
        .store()
        .find_by_spelling(word)?
        .map(|w| w.id)
        .ok_or_else(|| eyre!("No catalog entry for '{}'", word))
}

fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    let service = open_service(config)?;
    let user_id = cli.user.unwrap_or(config.review.default_user);

    match &cli.command {
        None => handle_due_command(&service, user_id, config.review.due_limit),
        Some(Commands::Catalog { command }) => handle_catalog_command(&service, command),
        Some(Commands::Enroll { word }) => handle_enroll_command(&service, user_id, word),
        Some(Commands::Pass { word }) => handle_outcome_command(&service, user_id, word, true),
        Some(Commands::Fail { word }) => handle_outcome_command(&service, user_id, word, false),
        Some(Commands::Learned { word }) => handle_learned_command(&service, user_id, word),
        Some(Commands::Due { limit }) => {
            handle_due_command(&service, user_id, limit.unwrap_or(config.review.due_limit))
        }
        Some(Commands::Words) => handle_words_command(&service, user_id),
        Some(Commands::Stats) => handle_stats_command(&service, user_id),
    }
}

fn handle_catalog_command(service: &Service, command: &CatalogCommands) -> Result<()> {
    info!("Handling catalog command: {:?}", command);
    match command {
        CatalogCommands::Import { file } => {
            let count = catalog::import_file(service.store(), file)
                .with_context(|| format!("Failed to import {}", file.display()))?;
            println!("{} {} words from {}", "Imported".green(), count, file.display());
        }
        CatalogCommands::Show { word } => {
            let id = resolve_word(service, word)?;
            match service.store().word(id)? {
                Some(entry) => {
                    println!("{} {}", entry.word.bold(), entry.phonetic.as_deref().unwrap_or(""));
                    println!("  id: {}", entry.id);
                    if let Some(rank) = entry.ranking {
                        println!("  rank: {}", rank);
                    }
                    if let Some(syllables) = entry.syllables {
                        println!("  syllables: {}", syllables);
                    }
                    if let Some(example) = &entry.example {
                        println!("  e.g. {}", example.italic());
                    }
                }
                None => println!("{} {}", "Not in catalog:".red(), word),
            }
        }
    }
    Ok(())
}

fn handle_enroll_command(service: &Service, user_id: i64, word: &str) -> Result<()> {
    let word_id = resolve_word(service, word)?;
    service.enroll(user_id, word_id)?;
    println!("{} {}", "Added to your list:".green(), word);
    Ok(())
}

fn handle_outcome_command(service: &Service, user_id: i64, word: &str, success: bool) -> Result<()> {
    let word_id = resolve_word(service, word)?;
    let record = service.report_outcome(user_id, word_id, success)?;

    let label = if success { "Passed:".green() } else { "Missed:".yellow() };
    let next = record
        .next_due
        .map(|d| d.to_string())
        .unwrap_or_else(|| "now".to_string());
    println!(
        "{} {} (reps: {}, seen: {}, next: {})",
        label, word, record.repetition_count, record.appearances, next
    );
    Ok(())
}

fn handle_learned_command(service: &Service, user_id: i64, word: &str) -> Result<()> {
    let word_id = resolve_word(service, word)?;
    service.confirm_learned(user_id, word_id)?;
    println!("{} {}", "Marked as learned:".green(), word);
    Ok(())
}

fn handle_due_command(service: &Service, user_id: i64, limit: usize) -> Result<()> {
    let due = service.list_due(user_id, limit)?;
    if due.is_empty() {
        println!("{}", "No words due now. Enroll some words first.".cyan());
        return Ok(());
    }

    println!("{}", "Words due for practice:".cyan());
    for item in due {
        println!(
            "  [{}] {} {} (reps: {}, seen: {})",
            item.word_id,
            item.word_text.bold(),
            item.phonetic.as_deref().unwrap_or(""),
            item.repetition_count,
            item.appearances
        );
        if let Some(example) = &item.example {
            println!("      {}", example.italic());
        }
    }
    Ok(())
}

fn handle_words_command(service: &Service, user_id: i64) -> Result<()> {
    let records = service.list_words(user_id)?;
    if records.is_empty() {
        println!("{}", "Your list is empty.".cyan());
        return Ok(());
    }

    for record in records {
        let spelling = service
            .store()
            .word(record.word_id)?
            .map(|w| w.word)
            .unwrap_or_else(|| format!("#{}", record.word_id));
        let next = record
            .next_due
            .map(|d| d.to_string())
            .unwrap_or_else(|| "now".to_string());
        let learned = if record.learned { " learned".green().to_string() } else { String::new() };
        println!(
            "  - {} reps: {}, next: {}, seen: {}{}",
            spelling.bold(),
            record.repetition_count,
            next,
            record.appearances,
            learned
        );
    }
    Ok(())
}

fn handle_stats_command(service: &Service, user_id: i64) -> Result<()> {
    let stats = service.stats(user_id)?;
    println!("{} {}", "Stats for user".cyan(), user_id);
    println!("  enrolled:    {}", stats.enrolled);
    println!("  learned:     {}", stats.learned);
    println!("  due today:   {}", stats.due_today);
    println!("  reviews:     {}", stats.total_appearances);
    println!("  repetitions: {}", stats.total_repetitions);
    Ok(())
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration; it decides the log level
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    // Setup logging
    setup_logging(&config).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).context("Application failed")?;

    Ok(())
}
