//! Historical series types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound on rows per kline request accepted by the upstream.
pub const MAX_KLINE_LIMIT: u32 = 1000;

/// Sampling interval for history requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HistoryInterval {
    /// One point per hour
    #[default]
    Hourly,
    /// One point per day
    Daily,
}

impl HistoryInterval {
    /// Parse a caller-supplied interval, falling back to hourly for anything unknown.
    pub fn parse_or_default(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }

    /// Interval code in the upstream kline vocabulary.
    pub fn upstream_code(&self) -> &'static str {
        match self {
            HistoryInterval::Hourly => "1h",
            HistoryInterval::Daily => "1d",
        }
    }

    /// Number of rows needed to cover `days`, capped at [`MAX_KLINE_LIMIT`].
    pub fn row_limit(&self, days: u32) -> u32 {
        let rows = match self {
            HistoryInterval::Hourly => days.saturating_mul(24),
            HistoryInterval::Daily => days,
        };
        rows.min(MAX_KLINE_LIMIT)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryInterval::Hourly => "hourly",
            HistoryInterval::Daily => "daily",
        }
    }
}

impl fmt::Display for HistoryInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HistoryInterval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hourly" | "1h" | "hour" => Ok(HistoryInterval::Hourly),
            "daily" | "1d" | "day" => Ok(HistoryInterval::Daily),
            _ => Err(format!("Invalid interval: {}", s)),
        }
    }
}

/// A single price observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Unix timestamp in milliseconds
    pub t: i64,
    pub price: f64,
}

/// Normalized price history for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPayload {
    pub symbol: String,
    pub days: u32,
    pub interval: HistoryInterval,
    /// Oldest first
    pub points: Vec<Point>,
    /// Summed quote volume of the returned rows, if the upstream reported any
    #[serde(rename = "volume24h")]
    pub volume_24h: Option<f64>,
    pub source: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_codes() {
        assert_eq!(HistoryInterval::Hourly.upstream_code(), "1h");
        assert_eq!(HistoryInterval::Daily.upstream_code(), "1d");
    }

    #[test]
    fn test_parse_or_default() {
        assert_eq!(HistoryInterval::parse_or_default(Some("daily")), HistoryInterval::Daily);
        assert_eq!(HistoryInterval::parse_or_default(Some("HOURLY")), HistoryInterval::Hourly);
        assert_eq!(HistoryInterval::parse_or_default(Some("weekly")), HistoryInterval::Hourly);
        assert_eq!(HistoryInterval::parse_or_default(None), HistoryInterval::Hourly);
    }

    #[test]
    fn test_row_limit() {
        assert_eq!(HistoryInterval::Hourly.row_limit(1), 24);
        assert_eq!(HistoryInterval::Hourly.row_limit(7), 168);
        assert_eq!(HistoryInterval::Hourly.row_limit(90), MAX_KLINE_LIMIT);
        assert_eq!(HistoryInterval::Daily.row_limit(30), 30);
        assert_eq!(HistoryInterval::Daily.row_limit(5000), MAX_KLINE_LIMIT);
    }

    #[test]
    fn test_payload_serializes_volume_as_null() {
        let payload = HistoryPayload {
            symbol: "BTC".to_string(),
            days: 1,
            interval: HistoryInterval::Daily,
            points: vec![Point { t: 1, price: 2.0 }],
            volume_24h: None,
            source: "binance-klines".to_string(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["interval"], "daily");
        assert!(json["volume24h"].is_null());
        assert_eq!(json["points"][0]["t"], 1);
    }
}
