//! Request handlers.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};
use tracing::info;

use orgscrape_extractor::parse_target_url;
use orgscrape_shared::{OrgScrapeError, ScrapedOrganizationProfile};

use crate::error::ApiError;
use crate::ApiState;

/// Body of `POST /api/scrape`.
#[derive(Debug, Deserialize)]
pub struct ScrapeRequest {
    pub url: String,
}

/// Successful `POST /api/scrape` response.
#[derive(Debug, Serialize)]
pub struct ScrapeResponse {
    pub data: ScrapedOrganizationProfile,
}

/// Validate the target URL, then fetch and extract it.
///
/// Malformed bodies and rejected URLs never reach the network.
pub async fn scrape_handler(
    State(state): State<ApiState>,
    payload: Result<Json<ScrapeRequest>, JsonRejection>,
) -> Result<Json<ScrapeResponse>, ApiError> {
    let Json(request) =
        payload.map_err(|e| OrgScrapeError::validation(format!("malformed request body: {e}")))?;

    let url = parse_target_url(&request.url, state.allow_private_hosts)?;
    info!(%url, "scrape requested");

    let data = state.extractor.extract(&url).await?;
    Ok(Json(ScrapeResponse { data }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Liveness check.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
