//! System endpoints: health check and UI configuration.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::domain::DateFilter;
use crate::domain::event::SPORTS;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Choices offered by the event form and list filters.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SportsConfigResponse {
    /// Suggested sport names. Other values are accepted.
    sports: Vec<&'static str>,
    /// Accepted `date` filter values.
    date_filters: Vec<&'static str>,
    /// Accepted `sort` values.
    sort_options: Vec<&'static str>,
}

/// `GET /config/sports` — Sport vocabulary and filter options.
#[utoipa::path(
    get,
    path = "/config/sports",
    tag = "System",
    summary = "List sports and filter options",
    description = "Returns the suggested sport vocabulary and the accepted date filter and sort values.",
    responses(
        (status = 200, description = "Form configuration", body = SportsConfigResponse),
    )
)]
pub async fn sports_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(SportsConfigResponse {
            sports: SPORTS.to_vec(),
            date_filters: DateFilter::ALL.iter().map(DateFilter::as_str).collect(),
            sort_options: vec!["date-asc", "date-desc", "name-asc", "name-desc"],
        }),
    )
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/sports", get(sports_handler))
}
