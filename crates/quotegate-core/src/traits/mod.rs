//! Core traits for the quote proxy.

mod clock;
mod market_data;

pub use clock::{Clock, ManualClock, SystemClock};
pub use market_data::{MarketDataClient, RawKline};
