//! Offline history for development.

use async_trait::async_trait;
use quotegate_core::error::{ServiceError, ServiceResult};
use quotegate_core::traits::Clock;
use quotegate_core::types::{HistoryInterval, HistoryPayload, Point, Served, SymbolTable};
use std::sync::Arc;

use crate::HistoryProvider;

pub const MOCK_SOURCE: &str = "mock-history";

const MOCK_PRICES: [f64; 6] = [64210.5, 64388.0, 64102.75, 64550.25, 64890.0, 65012.4];
const MOCK_VOLUME: f64 = 1_250_000_000.0;
const HOUR_MS: i64 = 3_600_000;

/// Returns the same six-point demonstration series for every request.
///
/// Never touches the network or the caches.
pub struct MockHistory {
    symbols: Arc<SymbolTable>,
    clock: Arc<dyn Clock>,
}

impl MockHistory {
    pub fn new(symbols: Arc<SymbolTable>, clock: Arc<dyn Clock>) -> Self {
        Self { symbols, clock }
    }
}

#[async_trait]
impl HistoryProvider for MockHistory {
    async fn handle_history(
        &self,
        symbol: &str,
        days: u32,
        interval: HistoryInterval,
    ) -> ServiceResult<Served<HistoryPayload>> {
        self.symbols.resolve(symbol)?;
        if days == 0 {
            return Err(ServiceError::InvalidParameter(
                "days must be at least 1".to_string(),
            ));
        }

        // hourly points ending at the current hour
        let now = self.clock.now().timestamp_millis();
        let end = now - now.rem_euclid(HOUR_MS);
        let last = MOCK_PRICES.len() as i64 - 1;
        let points = MOCK_PRICES
            .iter()
            .enumerate()
            .map(|(i, &price)| Point {
                t: end - (last - i as i64) * HOUR_MS,
                price,
            })
            .collect();

        Ok(Served::live(HistoryPayload {
            symbol: symbol.trim().to_uppercase(),
            days,
            interval,
            points,
            volume_24h: Some(MOCK_VOLUME),
            source: MOCK_SOURCE.to_string(),
        }))
    }

    fn name(&self) -> &str {
        "mock"
    }
}
