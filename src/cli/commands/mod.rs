//! CLI command implementations.

pub mod history;
pub mod price;
pub mod serve;
pub mod symbols;
pub mod validate;
