//! HTTP API exposing the organization profile extractor.
//!
//! Routes:
//! - `POST /api/scrape`: `{ "url": "..." }` → `{ "data": <profile> }`
//! - `GET /health`: liveness check

mod error;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;
use tracing::info;

use orgscrape_extractor::PageExtractor;
use orgscrape_shared::{AppConfig, OrgScrapeError, Result};

pub use error::ApiError;
pub use routes::{ScrapeRequest, ScrapeResponse};

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct ApiState {
    extractor: Arc<PageExtractor>,
    allow_private_hosts: bool,
}

impl ApiState {
    pub fn new(extractor: PageExtractor, allow_private_hosts: bool) -> Self {
        Self {
            extractor: Arc::new(extractor),
            allow_private_hosts,
        }
    }

    /// Build state from the loaded application config.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let allow_private_hosts = config.server.allow_private_hosts;
        let extractor = PageExtractor::new(&config.fetch, allow_private_hosts)?;
        Ok(Self::new(extractor, allow_private_hosts))
    }
}

/// Build the application router.
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/scrape", post(routes::scrape_handler))
        .route("/health", get(routes::health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve the API until Ctrl-C.
pub async fn serve(addr: SocketAddr, state: ApiState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| OrgScrapeError::config(format!("cannot bind {addr}: {e}")))?;

    info!(%addr, "API listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| OrgScrapeError::config(format!("server error: {e}")))?;

    info!("API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
