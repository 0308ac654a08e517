//! Health and metrics endpoints.

use axum::{Json, extract::State, response::IntoResponse};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, HealthDto};

/// GET /api/health
/// Liveness that also proves the database answers.
pub async fn health(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<HealthDto>>, ApiError> {
    state.store().ping().await.map_err(|e| {
        tracing::warn!(error = %e, "Health check failed");
        ApiError::ServiceUnavailable("Database unavailable".to_string())
    })?;

    Ok(Json(ApiResponse::success(HealthDto {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime: state.start_time.elapsed().as_secs(),
    })))
}

/// GET /api/metrics
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.prometheus_handle.as_ref().map_or_else(
        || "Metrics not enabled or failed to initialize".to_string(),
        metrics_exporter_prometheus::PrometheusHandle::render,
    )
}
