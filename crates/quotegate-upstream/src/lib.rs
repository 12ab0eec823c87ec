//! Upstream market data provider clients.

mod binance;

pub use binance::{BinanceClient, BinanceConfig, PriceEndpoint};
