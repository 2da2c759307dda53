//! Application state for Axum handlers.

use cinema_booking_core::{MessageRouter, ShowCatalog};
use cinema_booking_runtime::metrics::MetricsServer;
use cinema_booking_runtime::ConnectionHub;
use std::sync::Arc;

/// Hub type used by the server.
pub type BookingHub = ConnectionHub<MessageRouter>;

/// Application state shared across all HTTP handlers.
///
/// Cloning is cheap; every field is reference counted.
#[derive(Clone)]
pub struct AppState {
    /// Live sessions and broadcast fan-out
    pub hub: Arc<BookingHub>,
    /// Shows served by this instance
    pub catalog: Arc<ShowCatalog>,
    /// Prometheus recorder, if this process installed one
    pub metrics: Option<Arc<MetricsServer>>,
}

impl AppState {
    /// Build state over `catalog`, accepting at most `max_connections`
    /// WebSocket sessions.
    #[must_use]
    pub fn new(catalog: Arc<ShowCatalog>, max_connections: usize) -> Self {
        let hub = ConnectionHub::new(MessageRouter::new(Arc::clone(&catalog)))
            .with_max_sessions(max_connections);
        Self {
            hub: Arc::new(hub),
            catalog,
            metrics: None,
        }
    }

    /// Attach a started metrics server for the `/metrics` route.
    #[must_use]
    pub fn with_metrics(mut self, metrics: MetricsServer) -> Self {
        self.metrics = Some(Arc::new(metrics));
        self
    }
}
