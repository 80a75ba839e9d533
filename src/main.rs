use clap::Parser;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;

mod cli;
mod commands;

use cli::{Cli, Commands};
use goodlog::config::{Config, LogLevel};
use goodlog::sink::{EVENT_TARGET, SinkKind};

fn setup_logging(log_level: LogLevel, sink: SinkKind) -> Result<()> {
    let mut builder = env_logger::Builder::new();

    // RUST_LOG env var takes precedence, otherwise use config log_level
    if std::env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        builder.filter_level(log_level.as_filter());
    }

    if sink == SinkKind::Log {
        // Event lines share this logger and go to stderr at every level
        builder.filter_module(EVENT_TARGET, log::LevelFilter::Trace);
        builder.init();
        info!("Logging initialized, writing to stderr");
        return Ok(());
    }

    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("goodlog")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("goodlog.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    builder.target(env_logger::Target::Pipe(target)).init();

    info!("Logging initialized, writing to: {}", log_file.display());
    info!(
        "Log level: {} (from {})",
        log_level.as_filter(),
        if std::env::var("RUST_LOG").is_ok() { "RUST_LOG env" } else { "config" }
    );
    Ok(())
}

fn run(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Run {
            input,
            buffer,
            overrides,
        } => commands::run::run(input.as_deref(), buffer, &overrides, cli.quiet, &config),
        Commands::Render {
            event,
            format,
            overrides,
        } => commands::render::run(&event, cli::OutputFormat::resolve(format), &overrides, &config),
        Commands::Levels { preset, format } => {
            commands::levels::run(preset, cli::OutputFormat::resolve(format), &config)
        }
        Commands::Check { overrides } => commands::check::run(&overrides, cli.quiet, &config),
        Commands::Config { action } => commands::config::run(action, &config),
        Commands::Completions { shell } => commands::completions::run(shell),
    }
}

fn main() -> Result<()> {
    // Parse CLI arguments first
    let cli = Cli::parse();

    // Load configuration (before logging, so log messages in Config::load are silent)
    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    if cli.verbose {
        config.log_level = LogLevel::Debug;
    }

    let sink = match &cli.command {
        Commands::Run { overrides, .. } => overrides.sink.unwrap_or(config.sink.kind),
        _ => config.sink.kind,
    };

    // Setup logging with log level from config (or RUST_LOG env var)
    setup_logging(config.log_level, sink).context("Failed to setup logging")?;

    info!("Starting goodlog with config from: {:?}", cli.config);

    run(cli, config).context("Command failed")?;

    Ok(())
}
