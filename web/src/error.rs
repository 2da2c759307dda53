//! Error types for the booking server.

use cinema_booking_runtime::metrics::MetricsError;
use thiserror::Error;

/// Errors that stop the server from starting or serving.
///
/// Per-connection failures are never reported here; they close only the
/// affected session.
#[derive(Error, Debug)]
pub enum ServerError {
    /// The listener could not be bound
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        /// Address that was requested
        addr: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The HTTP server stopped with an error
    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),

    /// The metrics recorder could not be installed
    #[error(transparent)]
    Metrics(#[from] MetricsError),
}
