//! Core types and traits for the quote proxy.
//!
//! This crate provides the foundational building blocks including:
//! - Quote and history payloads served to callers
//! - The symbol table used to resolve public symbols to upstream tickers
//! - Error taxonomy shared by the upstream client and the services
//! - Core traits for market data clients and clocks

pub mod types;
pub mod traits;
pub mod error;

pub use error::{ServiceError, ServiceResult, UpstreamError, UpstreamErrorKind};
pub use types::*;
pub use traits::*;
