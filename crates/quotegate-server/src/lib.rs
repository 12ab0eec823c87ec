//! HTTP surface: `/health`, `/price` and `/history`.

mod error;
mod handlers;

pub use error::ApiError;

use axum::body::Body;
use axum::http::Request;
use axum::routing::get;
use axum::Router;
use quotegate_service::{HistoryProvider, PriceService};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, info_span};
use uuid::Uuid;

/// Services shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub price: Arc<PriceService>,
    pub history: Arc<dyn HistoryProvider>,
}

impl AppState {
    pub fn new(price: Arc<PriceService>, history: Arc<dyn HistoryProvider>) -> Self {
        Self { price, history }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let trace = TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
        info_span!(
            "request",
            id = %Uuid::new_v4(),
            method = %req.method(),
            uri = %req.uri(),
        )
    });

    Router::new()
        .route("/health", get(handlers::health))
        .route("/price", get(handlers::price))
        .route("/history", get(handlers::history))
        .with_state(state)
        .layer(trace)
        .layer(CorsLayer::permissive())
}

/// Serve until `shutdown` resolves, then drain in-flight requests.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, history = state.history.name(), "listening");
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("server stopped");
    Ok(())
}
