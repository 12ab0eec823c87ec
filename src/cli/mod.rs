//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quotegate")]
#[command(author, version, about = "Caching crypto price proxy with rate-limit fallbacks")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", env = "QUOTEGATE_CONFIG")]
    pub config: PathBuf,

    /// Log level (overrides logging.level)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Fetch one quote and print it as JSON
    Price(PriceArgs),
    /// Fetch one history series and print it as JSON
    History(HistoryArgs),
    /// List supported symbols
    Symbols,
    /// Validate configuration
    ValidateConfig(ValidateArgs),
}

#[derive(clap::Args)]
pub struct ServeArgs {
    /// Listen address (overrides server.bind_addr)
    #[arg(short, long)]
    pub bind: Option<SocketAddr>,

    /// Serve the fixed demonstration history instead of calling upstream
    #[arg(long)]
    pub mock_history: bool,
}

#[derive(clap::Args)]
pub struct PriceArgs {
    /// Symbol to quote, e.g. BTC
    #[arg(short, long)]
    pub symbol: String,

    /// Quote currency
    #[arg(long, default_value = "USD")]
    pub currency: String,
}

#[derive(clap::Args)]
pub struct HistoryArgs {
    /// Symbol to fetch, e.g. ETH
    #[arg(short, long)]
    pub symbol: String,

    /// Number of days to cover
    #[arg(short, long, default_value = "1")]
    pub days: u32,

    /// Sampling interval (hourly, daily)
    #[arg(short, long, default_value = "hourly")]
    pub interval: String,

    /// Serve the fixed demonstration history instead of calling upstream
    #[arg(long)]
    pub mock_history: bool,
}

#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Print the effective configuration as TOML
    #[arg(long)]
    pub print: bool,
}
