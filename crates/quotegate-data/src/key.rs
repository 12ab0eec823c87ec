//! Cache key construction.

use quotegate_core::types::HistoryInterval;
use std::fmt;

const SEP: char = '|';
const ESC: char = '\\';

/// Opaque cache key.
///
/// Components are joined with `|`. A literal `|` or `\` inside a component is
/// backslash-escaped, so distinct tuples never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key for a spot quote: `(ticker, currency)`.
    pub fn price(ticker: &str, currency: &str) -> Self {
        Self(format!(
            "price{SEP}{}{SEP}{}",
            clean(ticker).to_uppercase(),
            clean(currency).to_uppercase()
        ))
    }

    /// Key for a history series: `(ticker, "usd", days, interval)`.
    pub fn history(ticker: &str, days: u32, interval: HistoryInterval) -> Self {
        Self(format!(
            "history{SEP}{}{SEP}usd{SEP}{}{SEP}{}",
            clean(ticker).to_uppercase(),
            days,
            interval.as_str()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn clean(component: &str) -> String {
    let mut out = String::with_capacity(component.len());
    for c in component.trim().chars() {
        if c == SEP || c == ESC {
            out.push(ESC);
        }
        out.push(c);
    }
    out
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_key_shapes() {
        assert_eq!(CacheKey::price("BTCUSDT", "usd").as_str(), "price|BTCUSDT|USD");
        assert_eq!(
            CacheKey::history("btcusdt", 7, HistoryInterval::Daily).as_str(),
            "history|BTCUSDT|usd|7|daily"
        );
    }

    #[test]
    fn test_distinct_tuples_give_distinct_keys() {
        let mut seen = HashSet::new();
        for ticker in ["BTCUSDT", "ETHUSDT", "BTCUSDT1"] {
            for days in [1, 11, 111] {
                for interval in [HistoryInterval::Hourly, HistoryInterval::Daily] {
                    assert!(seen.insert(CacheKey::history(ticker, days, interval)));
                }
            }
            assert!(seen.insert(CacheKey::price(ticker, "USD")));
        }
    }

    #[test]
    fn test_separator_cannot_be_injected() {
        assert_ne!(
            CacheKey::price("A|B", "USD"),
            CacheKey::price("A", "B|USD")
        );
        assert_ne!(CacheKey::price("A|B", "USD"), CacheKey::price("AB", "USD"));
        assert_ne!(
            CacheKey::history("A|B", 1, HistoryInterval::Daily),
            CacheKey::history("AB", 1, HistoryInterval::Daily)
        );
        assert_eq!(CacheKey::price("a|b", "usd").as_str(), "price|A\\|B|USD");
    }

    #[test]
    fn test_escape_character_is_escaped() {
        // a trailing backslash must not swallow the separator
        assert_ne!(
            CacheKey::price("A\\", "B"),
            CacheKey::price("A", "\\|B")
        );
        assert_ne!(CacheKey::price("A\\|B", "USD"), CacheKey::price("A|B", "USD"));
    }
}
