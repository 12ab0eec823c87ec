//! Error types for the quote proxy.

use std::fmt;
use thiserror::Error;

/// Classification of an upstream failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpstreamErrorKind {
    /// HTTP 429.
    RateLimited,
    /// HTTP 401.
    Unauthorized,
    /// HTTP 403.
    Rejected,
    /// Any other non-success HTTP status.
    Status,
    /// The request exceeded the client timeout.
    Timeout,
    /// Connection or transport failure without a status.
    Network,
    /// The response body could not be understood.
    Decode,
}

impl fmt::Display for UpstreamErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UpstreamErrorKind::RateLimited => "rate limited",
            UpstreamErrorKind::Unauthorized => "unauthorized",
            UpstreamErrorKind::Rejected => "rejected",
            UpstreamErrorKind::Status => "error status",
            UpstreamErrorKind::Timeout => "timeout",
            UpstreamErrorKind::Network => "network error",
            UpstreamErrorKind::Decode => "decode error",
        };
        write!(f, "{}", s)
    }
}

/// Failure reported by the upstream market data provider.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Upstream {kind}{}", status_suffix(.status))]
pub struct UpstreamError {
    pub kind: UpstreamErrorKind,
    /// HTTP status, when the provider answered at all.
    pub status: Option<u16>,
    /// Raw upstream body, or the transport error text when there is no body.
    pub body: Option<String>,
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP {})", code),
        None => String::new(),
    }
}

impl UpstreamError {
    /// Classify a non-success HTTP response.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let kind = match status {
            429 => UpstreamErrorKind::RateLimited,
            401 => UpstreamErrorKind::Unauthorized,
            403 => UpstreamErrorKind::Rejected,
            _ => UpstreamErrorKind::Status,
        };
        let body = body.into();
        Self {
            kind,
            status: Some(status),
            body: if body.is_empty() { None } else { Some(body) },
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::without_status(UpstreamErrorKind::Timeout, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::without_status(UpstreamErrorKind::Network, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::without_status(UpstreamErrorKind::Decode, message)
    }

    fn without_status(kind: UpstreamErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            body: Some(message.into()),
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        self.kind == UpstreamErrorKind::RateLimited
    }

    /// True for 401 and 403 answers.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self.kind,
            UpstreamErrorKind::Unauthorized | UpstreamErrorKind::Rejected
        )
    }

    /// Status to report to a caller once every fallback is exhausted.
    pub fn http_status(&self) -> u16 {
        match (self.status, self.kind) {
            (Some(code), _) => code,
            (None, UpstreamErrorKind::Timeout) => 504,
            (None, _) => 502,
        }
    }
}

/// Errors returned by the price and history services.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("Unsupported symbol: {0}")]
    UnsupportedSymbol(String),

    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("Upstream rejected our credentials")]
    Unauthorized { details: Option<String> },

    #[error("No history data available for {0}")]
    HistoryUnavailable(String),
}

impl ServiceError {
    /// HTTP status code callers should see for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::UnsupportedSymbol(_)
            | ServiceError::UnsupportedCurrency(_)
            | ServiceError::InvalidParameter(_) => 400,
            ServiceError::Upstream(e) => e.http_status(),
            ServiceError::Unauthorized { .. } => 401,
            ServiceError::HistoryUnavailable(_) => 502,
        }
    }

    /// Upstream diagnostics worth passing on to the caller.
    pub fn details(&self) -> Option<&str> {
        match self {
            ServiceError::Upstream(e) => e.body.as_deref(),
            ServiceError::Unauthorized { details } => details.as_deref(),
            _ => None,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.http_status() == 400
    }
}

/// Result type alias for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
