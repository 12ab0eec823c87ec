//! Public symbol to upstream ticker resolution.

use std::collections::BTreeMap;

use crate::error::ServiceError;

/// The only quote currency callers may ask for.
pub const QUOTE_CURRENCY: &str = "USD";

const DEFAULT_SYMBOLS: &[(&str, &str)] = &[
    ("BTC", "BTCUSDT"),
    ("ETH", "ETHUSDT"),
    ("SOL", "SOLUSDT"),
    ("BNB", "BNBUSDT"),
    ("XRP", "XRPUSDT"),
    ("ADA", "ADAUSDT"),
    ("DOGE", "DOGEUSDT"),
];

/// Fixed mapping from public symbol (`BTC`) to upstream ticker (`BTCUSDT`).
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolTable {
    entries: BTreeMap<String, String>,
}

impl SymbolTable {
    /// Build a table from `(symbol, ticker)` pairs. Both sides are upper-cased.
    pub fn from_pairs<I, S, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let entries = pairs
            .into_iter()
            .map(|(symbol, ticker)| {
                (
                    symbol.as_ref().trim().to_uppercase(),
                    ticker.as_ref().trim().to_uppercase(),
                )
            })
            .collect();
        Self { entries }
    }

    /// Resolve a public symbol to its upstream ticker.
    pub fn resolve(&self, symbol: &str) -> Result<&str, ServiceError> {
        let key = symbol.trim().to_uppercase();
        self.entries
            .get(&key)
            .map(String::as_str)
            .ok_or_else(|| ServiceError::UnsupportedSymbol(symbol.trim().to_string()))
    }

    /// Iterate `(symbol, ticker)` pairs in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(s, t)| (s.as_str(), t.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_SYMBOLS.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_default_symbol_resolves() {
        let table = SymbolTable::default();
        for (symbol, ticker) in DEFAULT_SYMBOLS {
            assert_eq!(table.resolve(symbol).unwrap(), *ticker);
        }
        assert_eq!(table.len(), DEFAULT_SYMBOLS.len());
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let table = SymbolTable::default();
        assert_eq!(table.resolve("btc").unwrap(), "BTCUSDT");
        assert_eq!(table.resolve(" Eth ").unwrap(), "ETHUSDT");
    }

    #[test]
    fn test_unknown_symbol_rejected() {
        let table = SymbolTable::default();
        assert_eq!(
            table.resolve("FOO"),
            Err(ServiceError::UnsupportedSymbol("FOO".to_string()))
        );
        assert!(table.resolve("").is_err());
        // tickers are not public symbols
        assert!(table.resolve("BTCUSDT").is_err());
    }

    #[test]
    fn test_from_pairs_normalizes() {
        let table = SymbolTable::from_pairs([("ltc", "ltcusdt")]);
        assert_eq!(table.resolve("LTC").unwrap(), "LTCUSDT");
        assert!(table.resolve("BTC").is_err());
    }
}
