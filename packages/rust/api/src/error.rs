//! Mapping of [`OrgScrapeError`] onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::warn;

use orgscrape_shared::OrgScrapeError;

/// Error returned by API handlers; renders as `{ "error": { ... } }`.
#[derive(Debug)]
pub struct ApiError(pub OrgScrapeError);

impl From<OrgScrapeError> for ApiError {
    fn from(err: OrgScrapeError) -> Self {
        Self(err)
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    kind: &'static str,
    message: String,
    /// Upstream HTTP status for fetch failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
}

impl ApiError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            OrgScrapeError::Validation { .. } => (StatusCode::BAD_REQUEST, "invalid_request"),
            OrgScrapeError::Fetch { .. } => (StatusCode::BAD_GATEWAY, "fetch"),
            OrgScrapeError::Parse { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "parse"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();
        warn!(kind, status = status.as_u16(), error = %self.0, "request failed");

        let body = ErrorBody {
            error: ErrorDetail {
                kind,
                message: self.0.to_string(),
                status: self.0.upstream_status(),
            },
        };
        (status, Json(body)).into_response()
    }
}
