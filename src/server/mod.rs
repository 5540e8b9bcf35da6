use anyhow::{Context, Result};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::analyze::IssueAnalyzer;

mod routes;

pub use routes::{router, ApiError, ServerState};

/// Build the application with its state and request tracing
pub fn app(analyzer: IssueAnalyzer) -> axum::Router {
    routes::router()
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(analyzer))
}

/// Serve the analysis API on `addr` until Ctrl-C
pub async fn run_server(addr: &str, analyzer: IssueAnalyzer) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app(analyzer))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown requested");
    }
}
