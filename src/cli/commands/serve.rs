//! HTTP server command.

use anyhow::{Context, Result};
use quotegate_config::AppConfig;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::app::build_state;
use crate::cli::ServeArgs;

pub async fn run(args: ServeArgs, config: AppConfig) -> Result<()> {
    let addr = match args.bind {
        Some(addr) => addr,
        None => config.bind_addr()?,
    };
    let state = build_state(&config, args.mock_history)?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    quotegate_server::serve(listener, state, shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Ctrl-C received, shutting down"),
        Err(e) => warn!(error = %e, "cannot listen for Ctrl-C, shutting down"),
    }
}
