use clap::Parser;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;

mod cli;
mod commands;
mod config;
mod duration;
mod event;
mod handler;

use cli::{Cli, Commands};
use config::Config;

fn setup_logging(filter: log::LevelFilter) -> Result<()> {
    // Diagnostics never share the annotation streams, so logs go to a file
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("runmark")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("runmark.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // RUST_LOG env var takes precedence, otherwise use the resolved level
    let mut builder = env_logger::Builder::new();

    if std::env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        builder.filter_level(filter);
    }

    builder.target(env_logger::Target::Pipe(target)).init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn effective_filter(cli: &Cli, config: &Config) -> log::LevelFilter {
    if cli.quiet {
        log::LevelFilter::Error
    } else if cli.verbose {
        log::LevelFilter::Debug
    } else {
        config.log_level.as_filter()
    }
}

fn run(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Annotate { events } => commands::annotate::run(events.as_deref(), &config),
        Commands::Handlers => commands::handlers::run(&config),
    }
}

fn main() -> Result<()> {
    // Parse CLI arguments first
    let cli = Cli::parse();

    // Load configuration (before logging, so log messages in Config::load are silent)
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    // Setup logging with log level from config (or RUST_LOG env var)
    setup_logging(effective_filter(&cli, &config)).context("Failed to setup logging")?;

    info!("Starting runmark with config from: {:?}", cli.config);

    // Run the command
    run(cli, config).context("Command failed")?;

    Ok(())
}
