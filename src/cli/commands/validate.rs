//! Validate configuration command.

use anyhow::Result;
use quotegate_config::load_config;
use std::path::Path;

use crate::cli::ValidateArgs;

pub fn run(args: &ValidateArgs, config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);
    if !config_path.exists() {
        println!("File not found, using defaults and environment only.");
    }

    match load_config(config_path) {
        Ok(config) => {
            println!("Configuration is valid!");
            println!();
            println!("Bind address: {}", config.server.bind_addr);
            println!("Price upstream: {}", config.upstream.price_base_url);
            println!("Kline upstream: {}", config.upstream.kline_base_url);
            println!("Upstream timeout: {}ms", config.upstream.timeout_ms);
            println!("API key: {}", if config.upstream.api_key.is_some() { "set" } else { "not set" });
            println!("Price TTL: {}s", config.cache.price_ttl_secs);
            println!("History TTL: {}s", config.cache.history_ttl_secs);
            println!("Cache capacity: {}", config.cache.max_entries);
            println!("Mock history: {}", config.history.mock);
            println!("Symbols: {}", config.symbol_table().len());
            println!("Log level: {}", config.logging.level);

            if args.print {
                let mut shown = config.clone();
                if shown.upstream.api_key.is_some() {
                    shown.upstream.api_key = Some("<redacted>".to_string());
                }
                println!();
                print!("{}", shown.to_toml()?);
            }
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
