//! One-shot history command.

use anyhow::Result;
use quotegate_config::AppConfig;
use quotegate_core::types::HistoryInterval;

use crate::app::build_state;
use crate::cli::HistoryArgs;

pub async fn run(args: HistoryArgs, config: &AppConfig) -> Result<()> {
    let state = build_state(config, args.mock_history)?;
    let interval = HistoryInterval::parse_or_default(Some(&args.interval));

    let served = state
        .history
        .handle_history(&args.symbol, args.days, interval)
        .await?;
    println!("{}", serde_json::to_string_pretty(&served)?);
    Ok(())
}
