//! Current quote service.

use quotegate_core::error::{ServiceError, ServiceResult};
use quotegate_core::traits::{Clock, MarketDataClient};
use quotegate_core::types::{PricePayload, Served, SymbolTable, QUOTE_CURRENCY};
use quotegate_data::{CacheKey, CacheStore, Lookup};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

const RATE_LIMIT_WARNING: &str = "rate limit, serving cached price";

/// Serves spot quotes from cache, refreshing from upstream when stale.
pub struct PriceService {
    symbols: Arc<SymbolTable>,
    client: Arc<dyn MarketDataClient>,
    cache: Arc<CacheStore<PricePayload>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl PriceService {
    pub fn new(
        symbols: Arc<SymbolTable>,
        client: Arc<dyn MarketDataClient>,
        cache: Arc<CacheStore<PricePayload>>,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            symbols,
            client,
            cache,
            ttl,
            clock,
        }
    }

    /// The quote cache, shared with the history service for synthetic fallbacks.
    pub fn cache(&self) -> &Arc<CacheStore<PricePayload>> {
        &self.cache
    }

    /// Get the current price of `symbol` in `currency`.
    pub async fn handle_price(
        &self,
        symbol: &str,
        currency: &str,
    ) -> ServiceResult<Served<PricePayload>> {
        let ticker = self.symbols.resolve(symbol)?;
        let currency = currency.trim().to_uppercase();
        if currency != QUOTE_CURRENCY {
            return Err(ServiceError::UnsupportedCurrency(currency));
        }

        let key = CacheKey::price(ticker, &currency);
        if let Lookup::Fresh(payload) = self.cache.get(&key, self.ttl) {
            debug!(%key, "price cache hit");
            return Ok(Served::cached(payload));
        }

        match self.client.fetch_price(ticker).await {
            Ok(spot) => {
                let payload = PricePayload {
                    symbol: symbol.trim().to_uppercase(),
                    currency,
                    price: spot.price,
                    source: spot.source,
                    timestamp: self.clock.now(),
                };
                self.cache.set(key, payload.clone());
                info!(ticker, price = payload.price, source = %payload.source, "price refreshed");
                Ok(Served::live(payload))
            }
            Err(e) => {
                warn!(ticker, error = %e, "price fetch failed");
                if e.is_rate_limited() {
                    if let Some(payload) = self.cache.get(&key, self.ttl).any() {
                        warn!(%key, "serving cached price after rate limit");
                        return Ok(Served::cached(payload).with_warning(RATE_LIMIT_WARNING));
                    }
                }
                Err(e.into())
            }
        }
    }
}
