//! Health check endpoints.
//!
//! These endpoints are used by load balancers and monitoring systems
//! to verify service health.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use cinema_booking_runtime::{HealthCheck, HealthReport, HealthStatus};

/// Simple health check endpoint (for basic liveness).
///
/// Returns 200 OK to indicate the process is serving requests.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

/// Readiness report covering the catalog and the connection hub.
///
/// # Status Codes
///
/// - 200 OK: Healthy or Degraded
/// - 503 Service Unavailable: Unhealthy
///
/// # Endpoint
///
/// ```text
/// GET /health/ready
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "checks": [
///     { "component": "catalog", "status": "healthy", "metadata": [["shows", "9"]] },
///     { "component": "connection_hub", "status": "healthy", "metadata": [["sessions", "2"], ["max_sessions", "1000"]] }
///   ],
///   "timestamp": "2025-09-11T19:30:00Z"
/// }
/// ```
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let catalog = if state.catalog.is_empty() {
        HealthCheck::unhealthy("catalog", "No shows loaded")
    } else {
        HealthCheck::healthy("catalog")
    }
    .with_metadata("shows", state.catalog.len().to_string());

    let report = HealthReport::new(vec![catalog, state.hub.health().await]);

    let status = match report.status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status, Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinema_booking_core::{Show, ShowCatalog};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_simple_health_check() {
        let (status, body) = health_check().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn test_readiness_with_catalog() {
        let catalog = Arc::new(ShowCatalog::new(vec![Show::new("PVR", "Inception", "19:30")]));
        let (status, Json(report)) = readiness(State(AppState::new(catalog, 10))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(report.status, HealthStatus::Healthy);
        assert_eq!(report.checks.len(), 2);
        assert_eq!(report.checks[0].metadata_value("shows"), Some("1"));
        assert_eq!(report.checks[1].metadata_value("sessions"), Some("0"));
    }

    #[tokio::test]
    async fn test_readiness_without_shows() {
        let state = AppState::new(Arc::new(ShowCatalog::new(Vec::new())), 10);
        let (status, Json(report)) = readiness(State(state)).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(report.status, HealthStatus::Unhealthy);
    }
}
