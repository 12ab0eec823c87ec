//! Request handlers.

use axum::extract::{Query, State};
use axum::Json;
use quotegate_core::error::ServiceError;
use quotegate_core::types::{HistoryInterval, HistoryPayload, PricePayload, Served, QUOTE_CURRENCY};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{ApiError, AppState};

const DEFAULT_DAYS: u32 = 1;

#[derive(Debug, Default, Deserialize)]
pub struct PriceQuery {
    symbol: Option<String>,
    currency: Option<String>,
}

/// Raw strings so malformed values surface as `{error}` bodies.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    symbol: Option<String>,
    days: Option<String>,
    interval: Option<String>,
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn price(
    State(state): State<AppState>,
    Query(query): Query<PriceQuery>,
) -> Result<Json<Served<PricePayload>>, ApiError> {
    let symbol = required_symbol(query.symbol.as_deref())?;
    let currency = query
        .currency
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or(QUOTE_CURRENCY);

    let served = state.price.handle_price(symbol, currency).await?;
    Ok(Json(served))
}

pub async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Served<HistoryPayload>>, ApiError> {
    let symbol = required_symbol(query.symbol.as_deref())?;
    let days = parse_days(query.days.as_deref())?;
    let interval = HistoryInterval::parse_or_default(query.interval.as_deref());

    let served = state.history.handle_history(symbol, days, interval).await?;
    Ok(Json(served))
}

fn required_symbol(symbol: Option<&str>) -> Result<&str, ServiceError> {
    match symbol {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(ServiceError::InvalidParameter(
            "symbol is required".to_string(),
        )),
    }
}

fn parse_days(days: Option<&str>) -> Result<u32, ServiceError> {
    match days.map(str::trim).filter(|d| !d.is_empty()) {
        None => Ok(DEFAULT_DAYS),
        Some(raw) => raw
            .parse::<u32>()
            .ok()
            .filter(|d| *d >= 1)
            .ok_or_else(|| {
                ServiceError::InvalidParameter(format!("days must be a positive integer, got '{}'", raw))
            }),
    }
}
