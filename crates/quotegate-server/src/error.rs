//! Service errors as JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use quotegate_core::error::ServiceError;
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

/// A [`ServiceError`] on its way out as `{error, details?}`.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::BAD_GATEWAY);
        if !self.0.is_client_error() {
            warn!(status = status.as_u16(), error = %self.0, "request failed");
        }
        let body = ErrorBody {
            error: self.0.to_string(),
            details: self.0.details().map(str::to_string),
        };
        (status, Json(body)).into_response()
    }
}
