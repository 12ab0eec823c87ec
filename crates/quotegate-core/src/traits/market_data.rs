//! Market data client trait definitions.

use crate::error::UpstreamError;
use crate::types::SpotPrice;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const OPEN_TIME: usize = 0;
const CLOSE: usize = 4;
const QUOTE_VOLUME: usize = 7;

/// One kline row exactly as the upstream returned it.
///
/// Binance encodes rows as positional arrays, numbers for times and strings
/// for decimals: `[open_time, open, high, low, close, volume, close_time,
/// quote_volume, trades, ...]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawKline(pub Vec<Value>);

impl RawKline {
    /// Open time in Unix milliseconds.
    pub fn open_time(&self) -> Option<i64> {
        self.0.get(OPEN_TIME).and_then(as_i64)
    }

    pub fn close(&self) -> Option<f64> {
        self.0.get(CLOSE).and_then(as_f64)
    }

    pub fn quote_volume(&self) -> Option<f64> {
        self.0.get(QUOTE_VOLUME).and_then(as_f64)
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
    .filter(|v: &f64| v.is_finite())
}

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Trait for upstream market data providers.
#[async_trait]
pub trait MarketDataClient: Send + Sync {
    /// Fetch the current spot price for a ticker.
    ///
    /// Implementations may try a secondary endpoint before giving up; the
    /// returned [`SpotPrice::source`] names the endpoint that answered.
    async fn fetch_price(&self, ticker: &str) -> Result<SpotPrice, UpstreamError>;

    /// Fetch kline rows, oldest first.
    ///
    /// # Arguments
    /// * `ticker` - Upstream ticker (e.g. `BTCUSDT`)
    /// * `interval` - Interval in the upstream vocabulary (`1h`, `1d`)
    /// * `limit` - Maximum number of rows
    async fn fetch_klines(
        &self,
        ticker: &str,
        interval: &str,
        limit: u32,
    ) -> Result<Vec<RawKline>, UpstreamError>;

    /// Get the provider name.
    fn name(&self) -> &str;
}
