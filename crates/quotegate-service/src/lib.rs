//! Price and history services.
//!
//! Both services sit between callers and the upstream provider: they answer
//! from cache when they can, fetch when they must, and fall back to stale or
//! synthetic data when the upstream is unavailable.

mod history;
mod klines;
mod mock;
mod price;

#[cfg(test)]
mod test_support;

pub use history::{FetchPlan, HistoryService, DEGRADED_LIMIT, SYNTHETIC_POINTS, SYNTHETIC_STEP_MS};
pub use klines::{klines_to_series, KlineSeries};
pub use mock::{MockHistory, MOCK_SOURCE};
pub use price::PriceService;

use async_trait::async_trait;
use quotegate_core::error::ServiceResult;
use quotegate_core::types::{HistoryInterval, HistoryPayload, Served};

/// Something that can answer history requests.
///
/// The live implementation is [`HistoryService`]; [`MockHistory`] replaces it
/// wholesale when mock mode is selected at startup.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    async fn handle_history(
        &self,
        symbol: &str,
        days: u32,
        interval: HistoryInterval,
    ) -> ServiceResult<Served<HistoryPayload>>;

    fn name(&self) -> &str;
}
