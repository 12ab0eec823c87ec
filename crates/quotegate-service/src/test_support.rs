//! Scripted upstream and fixtures shared by the service tests.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use quotegate_core::error::UpstreamError;
use quotegate_core::traits::{ManualClock, MarketDataClient, RawKline};
use quotegate_core::types::SpotPrice;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(start_time()))
}

/// A full Binance-shaped kline row.
pub fn kline(open_time: i64, close: f64, quote_volume: f64) -> RawKline {
    RawKline(vec![
        json!(open_time),
        json!("1.0"),
        json!("2.0"),
        json!("0.5"),
        json!(close.to_string()),
        json!("10.0"),
        json!(open_time + 3_599_999),
        json!(quote_volume.to_string()),
        json!(42),
        json!("5.0"),
        json!("6.0"),
        json!("0"),
    ])
}

/// Responses are consumed in order; the last one repeats forever.
struct Script<T> {
    queue: VecDeque<Result<T, UpstreamError>>,
}

impl<T: Clone> Script<T> {
    fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    fn next(&mut self) -> Result<T, UpstreamError> {
        if self.queue.len() > 1 {
            self.queue.pop_front().unwrap()
        } else {
            self.queue
                .front()
                .cloned()
                .unwrap_or_else(|| Err(UpstreamError::network("nothing scripted")))
        }
    }
}

/// In-memory upstream that plays back scripted answers and records calls.
pub struct ScriptedClient {
    prices: Mutex<Script<SpotPrice>>,
    klines: Mutex<Script<Vec<RawKline>>>,
    price_calls: Mutex<Vec<String>>,
    kline_calls: Mutex<Vec<(String, u32)>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self {
            prices: Mutex::new(Script::new()),
            klines: Mutex::new(Script::new()),
            price_calls: Mutex::new(Vec::new()),
            kline_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn price_ok(self, price: f64) -> Self {
        self.prices.lock().unwrap().queue.push_back(Ok(SpotPrice {
            price,
            source: "scripted".to_string(),
        }));
        self
    }

    pub fn price_err(self, status: u16) -> Self {
        self.prices
            .lock()
            .unwrap()
            .queue
            .push_back(Err(UpstreamError::from_status(status, format!("status {}", status))));
        self
    }

    pub fn klines_ok(self, rows: Vec<RawKline>) -> Self {
        self.klines.lock().unwrap().queue.push_back(Ok(rows));
        self
    }

    pub fn klines_err(self, status: u16) -> Self {
        self.klines
            .lock()
            .unwrap()
            .queue
            .push_back(Err(UpstreamError::from_status(status, format!("status {}", status))));
        self
    }

    pub fn klines_timeout(self) -> Self {
        self.klines
            .lock()
            .unwrap()
            .queue
            .push_back(Err(UpstreamError::timeout("deadline elapsed")));
        self
    }

    pub fn price_calls(&self) -> usize {
        self.price_calls.lock().unwrap().len()
    }

    /// `(interval, limit)` of every kline request, in order.
    pub fn kline_calls(&self) -> Vec<(String, u32)> {
        self.kline_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MarketDataClient for ScriptedClient {
    async fn fetch_price(&self, ticker: &str) -> Result<SpotPrice, UpstreamError> {
        self.price_calls.lock().unwrap().push(ticker.to_string());
        // suspend like real I/O so concurrent callers interleave
        tokio::task::yield_now().await;
        self.prices.lock().unwrap().next()
    }

    async fn fetch_klines(
        &self,
        _ticker: &str,
        interval: &str,
        limit: u32,
    ) -> Result<Vec<RawKline>, UpstreamError> {
        self.kline_calls
            .lock()
            .unwrap()
            .push((interval.to_string(), limit));
        tokio::task::yield_now().await;
        self.klines.lock().unwrap().next()
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
