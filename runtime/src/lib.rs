//! # Cinema Booking Runtime
//!
//! Session plumbing for the cinema booking service.
//!
//! This crate owns everything between a transport and the business logic in
//! `cinema-booking-core`:
//!
//! ## Core Components
//!
//! - **`ConnectionHub`**: The live session set, inbound dispatch and broadcast fan-out
//! - **Session**: Per-connection state machine (`Connecting → Active → Closed`)
//!   with a private FIFO queue drained by a single writer task
//! - **Metrics**: Prometheus recorders for sessions, bookings and broadcasts
//! - **Health**: Component health checks aggregated into a report
//!
//! The hub is transport-agnostic: a session writes to any
//! `futures::Sink<String>`, so the same code drives WebSocket connections in
//! production and channel-backed sinks in tests.
//!
//! ## Example
//!
//! ```ignore
//! use cinema_booking_core::MessageRouter;
//! use cinema_booking_runtime::ConnectionHub;
//!
//! let hub = ConnectionHub::new(MessageRouter::new(catalog));
//!
//! // Register a transport; the initial snapshot is queued immediately
//! let session = hub.connect(sink).await;
//!
//! // Route a frame; a successful booking also broadcasts an update
//! hub.handle_inbound(session.id(), "PVR,Inception,3,4").await?;
//!
//! hub.disconnect(session.id()).await;
//! ```

use serde::Serialize;

/// Live session set and broadcast fan-out
pub mod hub;

/// Session identity, lifecycle and writer task
pub mod session;

/// Prometheus metrics for observability
pub mod metrics;

/// Error types for the connection hub
pub mod error {
    use crate::session::SessionId;
    use thiserror::Error;

    /// Errors returned by [`ConnectionHub`](crate::hub::ConnectionHub) operations
    ///
    /// Transport failures never surface here: a failed write closes the
    /// session from inside its writer task.
    #[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
    pub enum HubError {
        /// The session is not (or no longer) registered
        #[error("Session {0} is not registered")]
        SessionNotFound(SessionId),

        /// The session's writer stopped before the response could be queued
        #[error("Session {0} is closed")]
        SessionClosed(SessionId),
    }
}

pub use error::HubError;
pub use hub::ConnectionHub;
pub use session::{Session, SessionId, SessionState};

/// Health check status levels
///
/// Indicates the current health state of a component or system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Component is fully operational
    Healthy,

    /// Component is operational but constrained (e.g., session limit reached)
    Degraded,

    /// Component is not operational
    Unhealthy,
}

impl HealthStatus {
    /// Check if status is healthy
    #[must_use]
    pub const fn is_healthy(self) -> bool {
        matches!(self, Self::Healthy)
    }

    /// Check if status is unhealthy
    #[must_use]
    pub const fn is_unhealthy(self) -> bool {
        matches!(self, Self::Unhealthy)
    }

    /// Get the worst status between two statuses
    #[must_use]
    pub const fn worst(self, other: Self) -> Self {
        match (self, other) {
            (Self::Unhealthy, _) | (_, Self::Unhealthy) => Self::Unhealthy,
            (Self::Degraded, _) | (_, Self::Degraded) => Self::Degraded,
            _ => Self::Healthy,
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Degraded => write!(f, "degraded"),
            Self::Unhealthy => write!(f, "unhealthy"),
        }
    }
}

/// Health check result for a component
#[derive(Debug, Clone, Serialize)]
pub struct HealthCheck {
    /// Name of the component being checked
    pub component: String,

    /// Current health status
    pub status: HealthStatus,

    /// Optional message providing details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Key/value details (e.g., session counts)
    pub metadata: Vec<(String, String)>,
}

impl HealthCheck {
    /// Create a healthy check result
    #[must_use]
    pub fn healthy(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            status: HealthStatus::Healthy,
            message: None,
            metadata: Vec::new(),
        }
    }

    /// Create a degraded check result
    #[must_use]
    pub fn degraded(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            status: HealthStatus::Degraded,
            message: Some(message.into()),
            metadata: Vec::new(),
        }
    }

    /// Create an unhealthy check result
    #[must_use]
    pub fn unhealthy(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            status: HealthStatus::Unhealthy,
            message: Some(message.into()),
            metadata: Vec::new(),
        }
    }

    /// Add metadata to the health check
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.push((key.into(), value.into()));
        self
    }

    /// Look up a metadata value by key
    #[must_use]
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Aggregated health report
///
/// Combines component checks into an overall service status.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    /// Overall status (worst of all checks)
    pub status: HealthStatus,

    /// Individual component checks
    pub checks: Vec<HealthCheck>,

    /// Timestamp when report was generated
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl HealthReport {
    /// Create a new health report from checks
    #[must_use]
    pub fn new(checks: Vec<HealthCheck>) -> Self {
        let status = checks
            .iter()
            .map(|c| c.status)
            .fold(HealthStatus::Healthy, HealthStatus::worst);

        Self {
            status,
            checks,
            timestamp: chrono::Utc::now(),
        }
    }

    /// Check if overall service is healthy
    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        self.status.is_healthy()
    }
}
