//! Logging and tracing setup.

mod logging;

pub use logging::{setup_logging, LoggingError};
pub use tracing_appender::non_blocking::WorkerGuard;
