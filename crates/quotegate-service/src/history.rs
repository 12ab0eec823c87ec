//! Historical series service.
//!
//! A request walks an explicit sequence of steps until one of them produces
//! an answer:
//!
//! ```text
//! CacheCheck ─fresh──────────────────────────────────────────▶ cached
//!     │ miss/stale
//!     ▼
//! Fetch(Primary) ─ok─▶ live     ─429─▶ Fetch(Degraded) ─ok─▶ live
//!     │ other failure                      │ failure (cause stays the 429)
//!     ▼                                    ▼
//! StaleFallback ─any entry─▶ cached + warning
//!     │ nothing cached, cause was 429
//!     ▼
//! SyntheticFallback ─spot price known─▶ flat series + warning
//! ```

use async_trait::async_trait;
use quotegate_core::error::{ServiceError, ServiceResult, UpstreamError, UpstreamErrorKind};
use quotegate_core::traits::{Clock, MarketDataClient};
use quotegate_core::types::{
    HistoryInterval, HistoryPayload, Point, PricePayload, Served, SymbolTable, QUOTE_CURRENCY,
};
use quotegate_data::{CacheKey, CacheStore, Lookup};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::klines::klines_to_series;
use crate::HistoryProvider;

/// Row limit of the degraded request made after a rate limit.
pub const DEGRADED_LIMIT: u32 = 30;
/// Number of points in a synthetic fallback series.
pub const SYNTHETIC_POINTS: usize = 12;
/// Spacing of synthetic points (5 minutes).
pub const SYNTHETIC_STEP_MS: i64 = 5 * 60 * 1000;

const SYNTHETIC_SOURCE: &str = "synthetic-fallback";
const SYNTHETIC_WARNING: &str = "rate limit, serving synthetic fallback series";

/// One upstream request in the history fetch policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPlan {
    /// What the caller asked for.
    Primary { interval: HistoryInterval, limit: u32 },
    /// Cheaper request made once after a rate limit: daily rows, fixed limit.
    Degraded,
}

impl FetchPlan {
    pub fn primary(interval: HistoryInterval, days: u32) -> Self {
        FetchPlan::Primary {
            interval,
            limit: interval.row_limit(days),
        }
    }

    pub fn interval(&self) -> HistoryInterval {
        match self {
            FetchPlan::Primary { interval, .. } => *interval,
            FetchPlan::Degraded => HistoryInterval::Daily,
        }
    }

    pub fn limit(&self) -> u32 {
        match self {
            FetchPlan::Primary { limit, .. } => *limit,
            FetchPlan::Degraded => DEGRADED_LIMIT,
        }
    }

    /// The plan to try after this one failed with `error`, if any.
    pub fn next(&self, error: &UpstreamError) -> Option<FetchPlan> {
        match self {
            FetchPlan::Primary { .. } if error.is_rate_limited() => Some(FetchPlan::Degraded),
            _ => None,
        }
    }
}

#[derive(Debug)]
enum HistoryStep {
    CacheCheck,
    Fetch(FetchPlan),
    StaleFallback(UpstreamError),
    SyntheticFallback(UpstreamError),
}

/// Parameters of one history request after validation.
struct HistoryRequest<'a> {
    symbol: String,
    ticker: &'a str,
    days: u32,
    interval: HistoryInterval,
    key: CacheKey,
}

/// Live history backed by the upstream kline endpoint.
pub struct HistoryService {
    symbols: Arc<SymbolTable>,
    client: Arc<dyn MarketDataClient>,
    cache: Arc<CacheStore<HistoryPayload>>,
    price_cache: Arc<CacheStore<PricePayload>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl HistoryService {
    pub fn new(
        symbols: Arc<SymbolTable>,
        client: Arc<dyn MarketDataClient>,
        cache: Arc<CacheStore<HistoryPayload>>,
        price_cache: Arc<CacheStore<PricePayload>>,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            symbols,
            client,
            cache,
            price_cache,
            ttl,
            clock,
        }
    }

    pub fn cache(&self) -> &Arc<CacheStore<HistoryPayload>> {
        &self.cache
    }

    async fn fetch(
        &self,
        req: &HistoryRequest<'_>,
        plan: FetchPlan,
    ) -> Result<ServiceResult<HistoryPayload>, UpstreamError> {
        let interval = plan.interval();
        let rows = self
            .client
            .fetch_klines(req.ticker, interval.upstream_code(), plan.limit())
            .await?;

        let series = klines_to_series(&rows);
        if series.points.is_empty() {
            warn!(ticker = req.ticker, ?plan, "upstream returned no usable klines");
            return Ok(Err(ServiceError::HistoryUnavailable(req.symbol.clone())));
        }

        Ok(Ok(HistoryPayload {
            symbol: req.symbol.clone(),
            days: req.days,
            interval,
            points: series.points,
            volume_24h: series.quote_volume,
            source: self.client.name().to_string(),
        }))
    }

    /// Flat series at the last known spot price, if one is cached.
    fn synthetic(&self, req: &HistoryRequest<'_>) -> Option<HistoryPayload> {
        let spot = self
            .price_cache
            .get(&CacheKey::price(req.ticker, QUOTE_CURRENCY), Duration::ZERO)
            .any()?;

        let end = self.clock.now().timestamp_millis();
        let points = (0..SYNTHETIC_POINTS as i64)
            .rev()
            .map(|back| Point {
                t: end - back * SYNTHETIC_STEP_MS,
                price: spot.price,
            })
            .collect();

        Some(HistoryPayload {
            symbol: req.symbol.clone(),
            days: req.days,
            interval: req.interval,
            points,
            volume_24h: None,
            source: SYNTHETIC_SOURCE.to_string(),
        })
    }
}

fn stale_warning(cause: &UpstreamError) -> &'static str {
    if cause.is_rate_limited() {
        "rate limit, serving cached history"
    } else if cause.is_rejection() {
        "upstream rejected request, serving cached history"
    } else {
        "upstream unavailable, serving cached history"
    }
}

/// Error surfaced once every fallback is exhausted.
fn exhausted(cause: UpstreamError) -> ServiceError {
    if cause.kind == UpstreamErrorKind::Unauthorized {
        ServiceError::Unauthorized {
            details: cause.body,
        }
    } else {
        ServiceError::Upstream(cause)
    }
}

#[async_trait]
impl HistoryProvider for HistoryService {
    async fn handle_history(
        &self,
        symbol: &str,
        days: u32,
        interval: HistoryInterval,
    ) -> ServiceResult<Served<HistoryPayload>> {
        let ticker = self.symbols.resolve(symbol)?;
        if days == 0 {
            return Err(ServiceError::InvalidParameter(
                "days must be at least 1".to_string(),
            ));
        }

        let req = HistoryRequest {
            symbol: symbol.trim().to_uppercase(),
            ticker,
            days,
            interval,
            key: CacheKey::history(ticker, days, interval),
        };

        // Failure that opened a retry; fallbacks answer to it, not to the retry.
        let mut first_failure: Option<UpstreamError> = None;
        let mut step = HistoryStep::CacheCheck;
        loop {
            debug!(key = %req.key, ?step, "history step");
            step = match step {
                HistoryStep::CacheCheck => match self.cache.get(&req.key, self.ttl) {
                    Lookup::Fresh(payload) => return Ok(Served::cached(payload)),
                    _ => HistoryStep::Fetch(FetchPlan::primary(interval, days)),
                },

                HistoryStep::Fetch(plan) => match self.fetch(&req, plan).await {
                    Ok(result) => {
                        let payload = result?;
                        self.cache.set(req.key.clone(), payload.clone());
                        info!(
                            ticker,
                            points = payload.points.len(),
                            interval = %payload.interval,
                            "history refreshed"
                        );
                        return Ok(Served::live(payload));
                    }
                    Err(e) => {
                        warn!(ticker, ?plan, error = %e, "history fetch failed");
                        let next = plan.next(&e);
                        let cause = first_failure.take().unwrap_or(e);
                        match next {
                            Some(next) => {
                                first_failure = Some(cause);
                                HistoryStep::Fetch(next)
                            }
                            None => HistoryStep::StaleFallback(cause),
                        }
                    }
                },

                HistoryStep::StaleFallback(cause) => {
                    match self.cache.get(&req.key, self.ttl).any() {
                        Some(payload) => {
                            let warning = stale_warning(&cause);
                            warn!(key = %req.key, warning, "serving stale history");
                            return Ok(Served::cached(payload).with_warning(warning));
                        }
                        None if cause.is_rate_limited() => HistoryStep::SyntheticFallback(cause),
                        None => return Err(exhausted(cause)),
                    }
                }

                HistoryStep::SyntheticFallback(cause) => match self.synthetic(&req) {
                    Some(payload) => {
                        warn!(ticker, "serving synthetic history from cached spot price");
                        return Ok(Served::cached(payload).with_warning(SYNTHETIC_WARNING));
                    }
                    None => return Err(exhausted(cause)),
                },
            };
        }
    }

    fn name(&self) -> &str {
        "live"
    }
}
