//! Prometheus scrape endpoint.

use crate::state::AppState;
use axum::{extract::State, http::header, http::StatusCode, response::IntoResponse};

/// Render metrics in the Prometheus text format.
///
/// Returns 404 when this process did not install a recorder.
///
/// # Endpoint
///
/// ```text
/// GET /metrics
/// ```
#[allow(clippy::unused_async)] // Axum handler signature requires async
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    match state.metrics.as_ref().and_then(|server| server.render()) {
        Some(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed").into_response(),
    }
}
