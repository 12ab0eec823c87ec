//! Quotegate CLI application.

mod app;
mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use quotegate_config::load_config;
use quotegate_monitor::setup_logging;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Reports its own load errors, before any logging is set up
    let command = match cli.command {
        Commands::ValidateConfig(args) => return cli::commands::validate::run(&args, &cli.config),
        other => other,
    };

    let config = load_config(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;

    // Setup logging
    let log_level = cli
        .log_level
        .map(|l| l.as_str().to_string())
        .unwrap_or_else(|| config.logging.level.clone());
    let json = cli.json_logs || config.logging.format == "json";
    let _guard = setup_logging(&log_level, json, config.logging.file.as_deref().map(Path::new))
        .context("setting up logging")?;

    // Execute command
    match command {
        Commands::Serve(args) => cli::commands::serve::run(args, config).await,
        Commands::Price(args) => cli::commands::price::run(args, &config).await,
        Commands::History(args) => cli::commands::history::run(args, &config).await,
        Commands::Symbols => cli::commands::symbols::run(&config),
        Commands::ValidateConfig(_) => Ok(()),
    }
}
