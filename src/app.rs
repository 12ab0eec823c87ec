//! Wiring of services from configuration.

use anyhow::{Context, Result};
use quotegate_config::AppConfig;
use quotegate_core::traits::{Clock, MarketDataClient, SystemClock};
use quotegate_data::CacheStore;
use quotegate_server::AppState;
use quotegate_service::{HistoryProvider, HistoryService, MockHistory, PriceService};
use quotegate_upstream::{BinanceClient, BinanceConfig};
use std::sync::Arc;
use tracing::info;

/// Build the shared services. `mock_history` forces mock mode on.
pub fn build_state(config: &AppConfig, mock_history: bool) -> Result<AppState> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let symbols = Arc::new(config.symbol_table());

    let client: Arc<dyn MarketDataClient> = Arc::new(
        BinanceClient::new(BinanceConfig {
            price_base_url: config.upstream.price_base_url.clone(),
            kline_base_url: config.upstream.kline_base_url.clone(),
            timeout: config.upstream.timeout(),
            api_key: config.upstream.api_key.clone(),
        })
        .context("building upstream client")?,
    );

    let max_entries = config.cache.max_entries;
    let price_cache = Arc::new(CacheStore::with_capacity(clock.clone(), max_entries));

    let price = Arc::new(PriceService::new(
        symbols.clone(),
        client.clone(),
        price_cache.clone(),
        config.cache.price_ttl(),
        clock.clone(),
    ));

    let history: Arc<dyn HistoryProvider> = if mock_history || config.history.mock {
        Arc::new(MockHistory::new(symbols.clone(), clock))
    } else {
        Arc::new(HistoryService::new(
            symbols.clone(),
            client,
            Arc::new(CacheStore::with_capacity(clock.clone(), max_entries)),
            price_cache,
            config.cache.history_ttl(),
            clock,
        ))
    };

    info!(
        symbols = symbols.len(),
        history = history.name(),
        price_ttl_secs = config.cache.price_ttl_secs,
        history_ttl_secs = config.cache.history_ttl_secs,
        max_entries,
        "services ready"
    );

    Ok(AppState::new(price, history))
}
