use clap::Parser;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;

mod agents;
mod cli;
mod commands;
mod config;
mod console;
mod model;
mod render;
mod session;
mod store;

use cli::{Cli, Commands};
use commands::chat::Entry;
use config::{Config, LogLevel};

fn setup_logging(log_level: &LogLevel) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("parley")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("parley.log");

    // Setup env_logger with file output; the terminal belongs to the chat
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // RUST_LOG env var takes precedence, otherwise use config log_level
    let mut builder = env_logger::Builder::new();

    if std::env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        builder.filter_level(log_level.as_filter());
    }

    builder.target(env_logger::Target::Pipe(target)).init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn run(cli: Cli, mut config: Config) -> Result<()> {
    if let Some(model) = cli.model {
        config.model.name = model;
    }
    let store_path = config.store_path(cli.store.as_ref());

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => commands::chat::run(Entry::Menu, &config.model, &store_path),
        Commands::Code => commands::chat::run(Entry::Code, &config.model, &store_path),
        Commands::Travel { year } => commands::chat::run(Entry::Travel(year.as_deref()), &config.model, &store_path),
        Commands::History { action } => commands::history::run(action, &store_path),
        Commands::Completions { shell } => commands::completions::run(shell),
    }
}

fn main() -> Result<()> {
    // Parse CLI arguments first
    let cli = Cli::parse();

    // Load configuration (before logging, so log messages in Config::load are silent)
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(&config.log_level).context("Failed to setup logging")?;

    info!("Starting parley with config from: {:?}", cli.config);

    run(cli, config).context("Command failed")?;

    Ok(())
}
