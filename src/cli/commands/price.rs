//! One-shot quote command.

use anyhow::Result;
use quotegate_config::AppConfig;

use crate::app::build_state;
use crate::cli::PriceArgs;

pub async fn run(args: PriceArgs, config: &AppConfig) -> Result<()> {
    let state = build_state(config, false)?;
    let served = state.price.handle_price(&args.symbol, &args.currency).await?;
    println!("{}", serde_json::to_string_pretty(&served)?);
    Ok(())
}
