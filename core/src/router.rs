//! Inbound message routing.
//!
//! [`Dispatcher`] is the seam between the connection hub and the business
//! logic: the hub only knows how to ask for an initial message, dispatch an
//! inbound frame, and ask for the broadcast message. [`MessageRouter`] is the
//! production implementation.

use crate::booking::BookingService;
use crate::catalog::ShowCatalog;
use crate::protocol::{self, SnapshotKind, GET_DATA, REFRESH};
use std::sync::Arc;

/// Response to one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteOutcome {
    /// Text to send back to the originating session
    pub response: String,
    /// Whether every session should also receive an update snapshot
    pub should_broadcast: bool,
}

impl RouteOutcome {
    /// A reply that does not trigger a broadcast.
    #[must_use]
    pub const fn reply(response: String) -> Self {
        Self {
            response,
            should_broadcast: false,
        }
    }
}

/// Business logic as seen by the connection hub.
///
/// Implementations must be callable concurrently from any thread.
pub trait Dispatcher: Send + Sync + 'static {
    /// Message enqueued to a session as soon as it becomes active.
    fn initial_message(&self) -> String;

    /// Handle one inbound text frame.
    fn dispatch(&self, message: &str) -> RouteOutcome;

    /// Message fanned out to every session when a dispatch asks for it.
    fn update_message(&self) -> String;
}

/// Classifies inbound text and forwards bookings to [`BookingService`].
#[derive(Debug, Clone)]
pub struct MessageRouter {
    bookings: BookingService,
}

impl MessageRouter {
    /// Create a router over a shared catalog.
    #[must_use]
    pub fn new(catalog: Arc<ShowCatalog>) -> Self {
        Self {
            bookings: BookingService::new(catalog),
        }
    }

    /// Route one inbound message.
    ///
    /// - `get_data` / `refresh` → initial snapshot
    /// - contains a comma → booking request
    /// - anything else → `Echo: <message>` plus snapshot
    #[must_use]
    pub fn route(&self, message: &str) -> RouteOutcome {
        if message == GET_DATA || message == REFRESH {
            return RouteOutcome::reply(self.snapshot(SnapshotKind::Initial));
        }

        if message.contains(',') {
            let outcome = self.bookings.process(message);
            return RouteOutcome {
                response: outcome.response,
                should_broadcast: outcome.should_broadcast,
            };
        }

        RouteOutcome::reply(format!(
            "Echo: {message}\n\n{}",
            self.snapshot(SnapshotKind::Initial)
        ))
    }

    /// Render the current catalog.
    #[must_use]
    pub fn snapshot(&self, kind: SnapshotKind) -> String {
        protocol::format_snapshot(self.bookings.catalog(), kind)
    }
}

impl Dispatcher for MessageRouter {
    fn initial_message(&self) -> String {
        self.snapshot(SnapshotKind::Initial)
    }

    fn dispatch(&self, message: &str) -> RouteOutcome {
        self.route(message)
    }

    fn update_message(&self) -> String {
        self.snapshot(SnapshotKind::Update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Show;

    fn router() -> MessageRouter {
        MessageRouter::new(Arc::new(ShowCatalog::new(vec![Show::new(
            "PVR",
            "Inception",
            "2025-09-11 19:30",
        )])))
    }

    #[test]
    fn test_data_requests() {
        let router = router();
        for command in ["get_data", "refresh"] {
            let outcome = router.route(command);
            assert!(outcome.response.starts_with("=== CINEMA DATA STREAM ===\n"));
            assert!(!outcome.should_broadcast);
        }
    }

    #[test]
    fn test_data_request_must_match_exactly() {
        let outcome = router().route("get_data ");
        assert!(outcome.response.starts_with("Echo: get_data \n\n=== CINEMA DATA STREAM ==="));
    }

    #[test]
    fn test_booking_propagates_broadcast() {
        let router = router();
        let outcome = router.route("PVR,Inception,3,4");
        assert!(outcome.response.starts_with("SUCCESS: Booked seats 3, 4"));
        assert!(outcome.should_broadcast);

        let outcome = router.route("PVR,Inception,3");
        assert!(outcome.response.starts_with("ERROR:"));
        assert!(!outcome.should_broadcast);
    }

    #[test]
    fn test_unrecognized_message_is_echoed() {
        let outcome = router().route("hello");
        assert!(outcome.response.starts_with("Echo: hello\n\n=== CINEMA DATA STREAM ==="));
        assert!(!outcome.should_broadcast);
    }

    #[test]
    fn test_dispatcher_messages() {
        let router = router();
        assert!(router.initial_message().starts_with("=== CINEMA DATA STREAM ==="));
        assert!(router
            .update_message()
            .starts_with("BOOKING_UPDATE:\n=== UPDATED CINEMA DATA ===\n"));
    }
}
