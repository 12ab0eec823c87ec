//! Configuration structures.

use quotegate_core::types::SymbolTable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::time::Duration;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub upstream: UpstreamSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub history: HistorySettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Public symbol → upstream ticker. Empty means the built-in table.
    #[serde(default)]
    pub symbols: BTreeMap<String, String>,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8787".to_string(),
        }
    }
}

/// Upstream provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamSettings {
    pub price_base_url: String,
    pub kline_base_url: String,
    pub timeout_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            price_base_url: "https://api.binance.com".to_string(),
            kline_base_url: "https://api.binance.com".to_string(),
            timeout_ms: 5000,
            api_key: None,
        }
    }
}

impl UpstreamSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Cache policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub price_ttl_secs: u64,
    pub history_ttl_secs: u64,
    /// Per-store entry limit, 0 = unlimited
    pub max_entries: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            price_ttl_secs: 30,
            history_ttl_secs: 600,
            max_entries: 1024,
        }
    }
}

impl CacheSettings {
    pub fn price_ttl(&self) -> Duration {
        Duration::from_secs(self.price_ttl_secs)
    }

    pub fn history_ttl(&self) -> Duration {
        Duration::from_secs(self.history_ttl_secs)
    }
}

/// History endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HistorySettings {
    /// Serve a fixed demonstration series instead of calling upstream.
    pub mock: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

impl AppConfig {
    /// Symbol table from the `[symbols]` section, or the built-in one.
    pub fn symbol_table(&self) -> SymbolTable {
        if self.symbols.is_empty() {
            SymbolTable::default()
        } else {
            SymbolTable::from_pairs(&self.symbols)
        }
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, config::ConfigError> {
        self.server.bind_addr.parse().map_err(|e| {
            config::ConfigError::Message(format!(
                "invalid server.bind_addr '{}': {}",
                self.server.bind_addr, e
            ))
        })
    }

    /// Reject settings the services cannot run with.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        let fail = |msg: &str| Err(config::ConfigError::Message(msg.to_string()));

        self.bind_addr()?;
        if self.upstream.timeout_ms == 0 {
            return fail("upstream.timeout_ms must be greater than zero");
        }
        if self.upstream.price_base_url.trim().is_empty()
            || self.upstream.kline_base_url.trim().is_empty()
        {
            return fail("upstream base URLs must not be empty");
        }
        if self.cache.price_ttl_secs == 0 || self.cache.history_ttl_secs == 0 {
            return fail("cache TTLs must be greater than zero");
        }
        if !["pretty", "json"].contains(&self.logging.format.as_str()) {
            return fail("logging.format must be 'pretty' or 'json'");
        }
        if self
            .symbols
            .iter()
            .any(|(s, t)| s.trim().is_empty() || t.trim().is_empty())
        {
            return fail("symbols entries must not be empty");
        }
        Ok(())
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
