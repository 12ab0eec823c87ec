//! Binance public REST API client.

use async_trait::async_trait;
use quotegate_core::error::UpstreamError;
use quotegate_core::traits::{MarketDataClient, RawKline};
use quotegate_core::types::SpotPrice;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://api.binance.com";
const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);
const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// Binance client configuration.
#[derive(Debug, Clone)]
pub struct BinanceConfig {
    pub price_base_url: String,
    pub kline_base_url: String,
    pub timeout: Duration,
    /// Sent as `X-MBX-APIKEY` when present. Public endpoints do not need it.
    pub api_key: Option<String>,
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            price_base_url: DEFAULT_BASE_URL.to_string(),
            kline_base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            api_key: None,
        }
    }
}

/// Spot price endpoints, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceEndpoint {
    /// `/api/v3/ticker/price`, last traded price
    Ticker,
    /// `/api/v3/avgPrice`, rolling average; used when the ticker fails
    AveragePrice,
}

impl PriceEndpoint {
    /// The fixed fallback chain for spot prices.
    pub const CHAIN: [PriceEndpoint; 2] = [PriceEndpoint::Ticker, PriceEndpoint::AveragePrice];

    pub fn path(&self) -> &'static str {
        match self {
            PriceEndpoint::Ticker => "/api/v3/ticker/price",
            PriceEndpoint::AveragePrice => "/api/v3/avgPrice",
        }
    }

    pub fn source(&self) -> &'static str {
        match self {
            PriceEndpoint::Ticker => "binance",
            PriceEndpoint::AveragePrice => "binance-avg",
        }
    }
}

/// Binance API response types
#[derive(Debug, Deserialize)]
struct BinanceTickerPrice {
    #[allow(dead_code)]
    symbol: String,
    price: String,
}

#[derive(Debug, Deserialize)]
struct BinanceAvgPrice {
    #[allow(dead_code)]
    mins: u32,
    price: String,
}

/// Binance market data client.
pub struct BinanceClient {
    config: BinanceConfig,
    client: Client,
}

impl BinanceClient {
    /// Create a new Binance client.
    pub fn new(config: BinanceConfig) -> Result<Self, UpstreamError> {
        let mut headers = header::HeaderMap::new();
        if let Some(key) = config.api_key.as_deref().filter(|k| !k.is_empty()) {
            headers.insert(
                API_KEY_HEADER,
                header::HeaderValue::from_str(key)
                    .map_err(|e| UpstreamError::network(format!("invalid api key: {}", e)))?,
            );
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| UpstreamError::network(e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &BinanceConfig {
        &self.config
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, UpstreamError> {
        let resp = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(classify)?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let text = resp.text().await.unwrap_or_default();
            return Err(UpstreamError::from_status(status, text));
        }

        resp.json().await.map_err(classify)
    }

    async fn fetch_price_from(
        &self,
        endpoint: PriceEndpoint,
        ticker: &str,
    ) -> Result<SpotPrice, UpstreamError> {
        let url = format!("{}{}", self.config.price_base_url, endpoint.path());
        let params = [("symbol", ticker.to_string())];

        let raw = match endpoint {
            PriceEndpoint::Ticker => {
                self.get_json::<BinanceTickerPrice>(&url, &params).await?.price
            }
            PriceEndpoint::AveragePrice => {
                self.get_json::<BinanceAvgPrice>(&url, &params).await?.price
            }
        };

        Ok(SpotPrice {
            price: parse_price(&raw)?,
            source: endpoint.source().to_string(),
        })
    }
}

/// Binance quotes prices as decimal strings. `NaN` and infinities are rejected.
fn parse_price(raw: &str) -> Result<f64, UpstreamError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite())
        .ok_or_else(|| UpstreamError::decode(format!("unparsable price: {}", raw)))
}

fn classify(e: reqwest::Error) -> UpstreamError {
    if e.is_timeout() {
        UpstreamError::timeout(e.to_string())
    } else if e.is_decode() {
        UpstreamError::decode(e.to_string())
    } else {
        UpstreamError::network(e.to_string())
    }
}

#[async_trait]
impl MarketDataClient for BinanceClient {
    async fn fetch_price(&self, ticker: &str) -> Result<SpotPrice, UpstreamError> {
        let mut rate_limited = None;
        let mut last_error = None;

        for endpoint in PriceEndpoint::CHAIN {
            match self.fetch_price_from(endpoint, ticker).await {
                Ok(spot) => {
                    debug!(ticker, source = %spot.source, price = spot.price, "spot price fetched");
                    return Ok(spot);
                }
                Err(e) => {
                    warn!(ticker, endpoint = endpoint.path(), error = %e, "spot price endpoint failed");
                    if e.is_rate_limited() && rate_limited.is_none() {
                        rate_limited = Some(e);
                    } else {
                        last_error = Some(e);
                    }
                }
            }
        }

        // A rate limit anywhere in the chain wins so callers can serve stale quotes.
        Err(rate_limited
            .or(last_error)
            .unwrap_or_else(|| UpstreamError::network("no price endpoint available")))
    }

    async fn fetch_klines(
        &self,
        ticker: &str,
        interval: &str,
        limit: u32,
    ) -> Result<Vec<RawKline>, UpstreamError> {
        let url = format!("{}/api/v3/klines", self.config.kline_base_url);
        let params = [
            ("symbol", ticker.to_string()),
            ("interval", interval.to_string()),
            ("limit", limit.to_string()),
        ];

        let rows: Vec<RawKline> = self.get_json(&url, &params).await?;
        debug!(ticker, interval, limit, rows = rows.len(), "klines fetched");
        Ok(rows)
    }

    fn name(&self) -> &str {
        "binance"
    }
}
