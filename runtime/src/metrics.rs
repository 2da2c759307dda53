//! Prometheus metrics for the booking server.
//!
//! Recorders are zero-sized handles over the global `metrics` recorder:
//! - Session lifecycle (connects, disconnects, active gauge, write failures)
//! - Booking outcomes and dispatch latency
//! - Broadcast fan-out
//!
//! Recording is a no-op until [`MetricsServer::start`] installs the
//! Prometheus recorder, so the hub can record unconditionally.
//!
//! # Example
//!
//! ```rust,no_run
//! use cinema_booking_runtime::metrics::MetricsServer;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut server = MetricsServer::new();
//! server.start()?;
//!
//! // Text exposition for a `/metrics` route
//! let body = server.render().unwrap_or_default();
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;
use thiserror::Error;

pub use metrics::{counter, gauge, histogram};

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Prometheus recorder plus the handle used to render it.
///
/// The server does not listen on its own port; the web layer exposes
/// [`render`](Self::render) on `/metrics`.
#[derive(Default)]
pub struct MetricsServer {
    handle: Option<PrometheusHandle>,
}

impl MetricsServer {
    /// Create an uninstalled metrics server.
    #[must_use]
    pub const fn new() -> Self {
        Self { handle: None }
    }

    /// Describe all metrics and install the Prometheus recorder.
    ///
    /// # Errors
    ///
    /// Returns error if the exporter cannot be built or installed.
    ///
    /// # Note
    ///
    /// A recorder can only be installed once per process. If one is already
    /// installed this logs a warning, returns `Ok`, and [`render`](Self::render)
    /// keeps returning `None`.
    pub fn start(&mut self) -> Result<(), MetricsError> {
        register_metrics();

        let builder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                &[
                    0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5,
                ],
            )
            .map_err(|e| MetricsError::Build(e.to_string()))?;

        match builder.install_recorder() {
            Ok(handle) => {
                self.handle = Some(handle);
                tracing::info!("Prometheus recorder installed");
                Ok(())
            }
            Err(e) => {
                let err_msg = e.to_string();
                if err_msg.contains("already initialized") {
                    tracing::warn!("Metrics recorder already initialized, skipping re-initialization");
                    Ok(())
                } else {
                    Err(MetricsError::Install(err_msg))
                }
            }
        }
    }

    /// Get the metrics handle for rendering.
    #[must_use]
    pub const fn handle(&self) -> Option<&PrometheusHandle> {
        self.handle.as_ref()
    }

    /// Render current metrics in Prometheus text format.
    ///
    /// Returns `None` if this instance did not install the recorder.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }
}

fn register_metrics() {
    // Sessions
    describe_counter!(
        "cinema_sessions_connected_total",
        "Total number of sessions that became active"
    );
    describe_counter!(
        "cinema_sessions_disconnected_total",
        "Total number of sessions removed from the registry"
    );
    describe_gauge!(
        "cinema_sessions_active",
        "Number of sessions currently registered"
    );
    describe_counter!(
        "cinema_session_write_errors_total",
        "Total number of failed writes to a session transport"
    );

    // Bookings
    describe_counter!(
        "cinema_bookings_succeeded_total",
        "Total number of booking requests that reserved seats"
    );
    describe_counter!(
        "cinema_bookings_rejected_total",
        "Total number of booking requests rejected"
    );
    describe_histogram!(
        "cinema_dispatch_duration_seconds",
        "Time taken to dispatch one inbound message"
    );

    // Broadcasts
    describe_counter!(
        "cinema_broadcasts_total",
        "Total number of update broadcasts"
    );
    describe_counter!(
        "cinema_broadcast_recipients_total",
        "Total number of update frames enqueued by broadcasts"
    );
}

/// Session lifecycle metrics recorder.
pub struct SessionMetrics;

impl SessionMetrics {
    /// Record a session becoming active.
    #[allow(clippy::cast_precision_loss)] // session counts stay far below 2^52
    pub fn record_connected(active: usize) {
        counter!("cinema_sessions_connected_total").increment(1);
        gauge!("cinema_sessions_active").set(active as f64);
    }

    /// Record a session leaving the registry.
    #[allow(clippy::cast_precision_loss)]
    pub fn record_disconnected(active: usize) {
        counter!("cinema_sessions_disconnected_total").increment(1);
        gauge!("cinema_sessions_active").set(active as f64);
    }

    /// Record a failed transport write.
    pub fn record_write_error() {
        counter!("cinema_session_write_errors_total").increment(1);
    }
}

/// Booking metrics recorder.
pub struct BookingMetrics;

impl BookingMetrics {
    /// Record one dispatched message.
    pub fn record_dispatch(duration: Duration) {
        histogram!("cinema_dispatch_duration_seconds").record(duration.as_secs_f64());
    }

    /// Record a booking outcome.
    pub fn record_outcome(success: bool) {
        if success {
            counter!("cinema_bookings_succeeded_total").increment(1);
        } else {
            counter!("cinema_bookings_rejected_total").increment(1);
        }
    }
}

/// Broadcast metrics recorder.
pub struct BroadcastMetrics;

impl BroadcastMetrics {
    /// Record one broadcast reaching `recipients` sessions.
    pub fn record_broadcast(recipients: usize) {
        counter!("cinema_broadcasts_total").increment(1);
        counter!("cinema_broadcast_recipients_total").increment(recipients as u64);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_metrics_server_creation() {
        let server = MetricsServer::new();
        assert!(server.handle().is_none());
        assert!(server.render().is_none());
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        SessionMetrics::record_connected(1);
        BookingMetrics::record_outcome(true);
        BroadcastMetrics::record_broadcast(3);
    }

    #[test]
    fn test_metrics_server_render() {
        let mut server = MetricsServer::new();
        server.start().unwrap();

        SessionMetrics::record_connected(2);
        SessionMetrics::record_write_error();
        BookingMetrics::record_outcome(false);
        BookingMetrics::record_dispatch(Duration::from_micros(40));
        BroadcastMetrics::record_broadcast(2);

        // Another test in this binary may have installed the recorder first.
        if let Some(rendered) = server.render() {
            assert!(rendered.contains("cinema_sessions_connected_total"));
            assert!(rendered.contains("cinema_bookings_rejected_total"));
            assert!(rendered.contains("cinema_broadcast_recipients_total"));
        }
    }
}
