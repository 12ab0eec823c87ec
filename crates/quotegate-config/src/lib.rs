//! Configuration management.

mod settings;

pub use settings::{
    AppConfig, CacheSettings, HistorySettings, LoggingConfig, ServerSettings, UpstreamSettings,
};

pub use config::ConfigError;

use config::{Config, Environment, File};
use std::path::Path;

/// Environment variable prefix, e.g. `QUOTEGATE__CACHE__PRICE_TTL_SECS=10`.
pub const ENV_PREFIX: &str = "QUOTEGATE";

/// Load configuration from built-in defaults, an optional file and the environment.
///
/// A missing file is not an error; every setting has a default.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app: AppConfig = config.try_deserialize()?;
    app.validate()?;
    Ok(app)
}
