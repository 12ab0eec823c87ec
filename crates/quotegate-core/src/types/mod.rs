//! Core data types for the quote proxy.

mod history;
mod quote;
mod symbol;

pub use history::{HistoryInterval, HistoryPayload, Point, MAX_KLINE_LIMIT};
pub use quote::{PricePayload, Served, SpotPrice};
pub use symbol::{SymbolTable, QUOTE_CURRENCY};
