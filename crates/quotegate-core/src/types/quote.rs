//! Spot quote payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A spot price as reported by the upstream provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotPrice {
    pub price: f64,
    /// Which upstream endpoint produced the price.
    pub source: String,
}

/// Normalized current quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePayload {
    /// Public symbol as requested (e.g. `BTC`)
    pub symbol: String,
    /// Quote currency, always `USD`
    pub currency: String,
    pub price: f64,
    pub source: String,
    /// When the price was fetched from upstream
    pub timestamp: DateTime<Utc>,
}

/// A payload annotated with how it was obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Served<T> {
    #[serde(flatten)]
    pub payload: T,
    /// True when the payload did not come from a fetch made for this request.
    pub cached: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl<T> Served<T> {
    /// Freshly fetched from upstream.
    pub fn live(payload: T) -> Self {
        Self {
            payload,
            cached: false,
            warning: None,
        }
    }

    /// Served from cache or from a fallback.
    pub fn cached(payload: T) -> Self {
        Self {
            payload,
            cached: true,
            warning: None,
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warning = Some(warning.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn payload() -> PricePayload {
        PricePayload {
            symbol: "BTC".to_string(),
            currency: "USD".to_string(),
            price: 88000.5,
            source: "binance".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_served_flattens_payload() {
        let json = serde_json::to_value(Served::live(payload())).unwrap();
        assert_eq!(json["symbol"], "BTC");
        assert_eq!(json["price"], 88000.5);
        assert_eq!(json["cached"], false);
        assert!(json.get("warning").is_none());
    }

    #[test]
    fn test_served_with_warning() {
        let served = Served::cached(payload()).with_warning("rate limit, serving cached price");
        let json = serde_json::to_value(&served).unwrap();
        assert_eq!(json["cached"], true);
        assert_eq!(json["warning"], "rate limit, serving cached price");
        assert_eq!(json["timestamp"], "2024-03-01T12:00:00Z");
    }
}
