//! List symbols command.

use anyhow::Result;
use quotegate_config::AppConfig;
use quotegate_core::types::QUOTE_CURRENCY;

pub fn run(config: &AppConfig) -> Result<()> {
    let table = config.symbol_table();

    println!("Supported Symbols (quoted in {})", QUOTE_CURRENCY);
    println!("═══════════════════════════════════════");
    for (symbol, ticker) in table.iter() {
        println!("  {:<8} → {}", symbol, ticker);
    }
    println!();
    println!("{} symbols. Override with a [symbols] table in the config file.", table.len());

    Ok(())
}
