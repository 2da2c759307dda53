//! Connection hub: the live session set and broadcast fan-out.
//!
//! # Architecture
//!
//! ```text
//! transport ──text──> handle_inbound ──> Dispatcher::dispatch
//!                          │                     │
//!                          │<── RouteOutcome ────┘
//!                          ├─ enqueue response ──> originator queue ──> writer ──> sink
//!                          └─ should_broadcast?
//!                                └─ enqueue update ──> every queue ──> writer ──> sink
//! ```
//!
//! The registry lock is held only to insert, remove, or iterate. It is never
//! held while the dispatcher runs, and enqueueing never awaits.

use crate::error::HubError;
use crate::metrics::{BookingMetrics, BroadcastMetrics, SessionMetrics};
use crate::session::{PendingSession, Session, SessionHandle, SessionId, SessionRegistry};
use crate::HealthCheck;
use cinema_booking_core::protocol::{ERROR_PREFIX, SUCCESS_PREFIX};
use cinema_booking_core::{Dispatcher, RouteOutcome};
use futures::Sink;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Tracks live sessions and routes their traffic through a [`Dispatcher`].
///
/// # Example
///
/// ```ignore
/// let hub = ConnectionHub::new(MessageRouter::new(catalog));
/// let session = hub.connect(sink).await;
/// hub.handle_inbound(session.id(), "PVR,Inception,3,4").await?;
/// ```
pub struct ConnectionHub<D: Dispatcher> {
    dispatcher: D,
    sessions: SessionRegistry,
    next_id: AtomicU64,
    max_sessions: Option<usize>,
}

impl<D: Dispatcher> ConnectionHub<D> {
    /// Create a hub with no session limit.
    #[must_use]
    pub fn new(dispatcher: D) -> Self {
        Self {
            dispatcher,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            next_id: AtomicU64::new(1),
            max_sessions: None,
        }
    }

    /// Cap the number of sessions accepted by
    /// [`try_connect`](Self::try_connect).
    #[must_use]
    pub const fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = Some(max_sessions);
        self
    }

    /// The dispatcher this hub routes through.
    #[must_use]
    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// Register a new session writing to `sink`, ignoring the session limit.
    ///
    /// The session moves `Connecting → Active`, is registered, and has the
    /// dispatcher's initial message queued ahead of anything else.
    pub async fn connect<S>(&self, sink: S) -> Session
    where
        S: Sink<String> + Unpin + Send + 'static,
        S::Error: fmt::Display + Send,
    {
        let pending = self.pending();
        let mut sessions = self.sessions.write().await;
        self.register(&mut sessions, pending, sink)
    }

    /// Register a new session unless the session limit is reached.
    ///
    /// The limit is checked under the same registry lock that inserts the
    /// session, so concurrent callers can never exceed it. On `None` the
    /// sink is dropped without anything being written to it.
    pub async fn try_connect<S>(&self, sink: S) -> Option<Session>
    where
        S: Sink<String> + Unpin + Send + 'static,
        S::Error: fmt::Display + Send,
    {
        let pending = self.pending();
        let mut sessions = self.sessions.write().await;
        if self.max_sessions.is_some_and(|max| sessions.len() >= max) {
            debug!(session_id = %pending.id, total_sessions = sessions.len(), "Session limit reached");
            return None;
        }
        Some(self.register(&mut sessions, pending, sink))
    }

    /// Allocate an id and queue the initial message.
    fn pending(&self) -> PendingSession {
        let id = SessionId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let pending = PendingSession::new(id);

        // Queued before registration so no broadcast can overtake it.
        pending.handle.enqueue(self.dispatcher.initial_message());
        pending
    }

    // The writer starts under the registry lock, so anyone who has seen the
    // initial frame also sees the session registered.
    fn register<S>(
        &self,
        sessions: &mut HashMap<SessionId, SessionHandle>,
        pending: PendingSession,
        sink: S,
    ) -> Session
    where
        S: Sink<String> + Unpin + Send + 'static,
        S::Error: fmt::Display + Send,
    {
        let id = pending.id;
        let (handle, session) = pending.activate(sink, Arc::clone(&self.sessions));
        sessions.insert(id, handle);
        let total = sessions.len();

        SessionMetrics::record_connected(total);
        info!(session_id = %id, total_sessions = total, "Session connected");
        session
    }

    /// Dispatch one inbound text frame from `id`.
    ///
    /// The response is queued to the originator. If the dispatcher asks for
    /// a broadcast, the update message is then queued to every registered
    /// session, originator included, before this returns.
    ///
    /// # Errors
    ///
    /// - [`HubError::SessionNotFound`] if `id` is not registered; nothing is
    ///   dispatched.
    /// - [`HubError::SessionClosed`] if the originator's writer stopped while
    ///   the message was being dispatched.
    pub async fn handle_inbound(&self, id: SessionId, text: &str) -> Result<RouteOutcome, HubError> {
        let sender = self
            .sessions
            .read()
            .await
            .get(&id)
            .map(SessionHandle::sender)
            .ok_or(HubError::SessionNotFound(id))?;

        let started = Instant::now();
        let outcome = self.dispatcher.dispatch(text);
        BookingMetrics::record_dispatch(started.elapsed());
        if let Some(success) = booking_result(&outcome.response) {
            BookingMetrics::record_outcome(success);
        }
        debug!(session_id = %id, broadcast = outcome.should_broadcast, "Message dispatched");

        let delivered = sender.send(outcome.response.clone()).is_ok();

        if outcome.should_broadcast {
            self.broadcast(self.dispatcher.update_message()).await;
        }

        if delivered {
            Ok(outcome)
        } else {
            Err(HubError::SessionClosed(id))
        }
    }

    /// Queue `message` to every registered session.
    ///
    /// Returns the number of sessions it was queued to.
    pub async fn broadcast(&self, message: String) -> usize {
        let recipients = {
            let sessions = self.sessions.read().await;
            sessions
                .values()
                .filter(|handle| handle.enqueue(message.clone()))
                .count()
        };

        BroadcastMetrics::record_broadcast(recipients);
        debug!(recipients, "Broadcast queued");
        recipients
    }

    /// Remove a session. Frames already queued are still written; nothing
    /// new is accepted.
    ///
    /// Returns `false` if the session was not registered.
    pub async fn disconnect(&self, id: SessionId) -> bool {
        let removed = {
            let mut sessions = self.sessions.write().await;
            sessions.remove(&id).map(|_| sessions.len())
        };

        match removed {
            Some(remaining) => {
                SessionMetrics::record_disconnected(remaining);
                info!(session_id = %id, total_sessions = remaining, "Session disconnected");
                true
            }
            None => false,
        }
    }

    /// Remove every session, returning them so callers can wait for each
    /// writer to flush and close.
    pub async fn close_all(&self) -> Vec<Session> {
        let drained: Vec<Session> = {
            let mut sessions = self.sessions.write().await;
            sessions.drain().map(|(_, handle)| handle.into_session()).collect()
        };

        for _ in &drained {
            SessionMetrics::record_disconnected(0);
        }
        if !drained.is_empty() {
            info!(sessions = drained.len(), "All sessions closed");
        }
        drained
    }

    /// Number of registered sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether another session may be accepted under the configured limit.
    pub async fn has_capacity(&self) -> bool {
        match self.max_sessions {
            Some(max) => self.session_count().await < max,
            None => true,
        }
    }

    /// Health of the hub.
    ///
    /// Degraded once the session limit is reached.
    pub async fn health(&self) -> HealthCheck {
        let count = self.session_count().await;

        let check = match self.max_sessions {
            Some(max) if count >= max => {
                HealthCheck::degraded("connection_hub", format!("Session limit reached ({max})"))
            }
            _ => HealthCheck::healthy("connection_hub"),
        };

        let check = check.with_metadata("sessions", count.to_string());
        match self.max_sessions {
            Some(max) => check.with_metadata("max_sessions", max.to_string()),
            None => check,
        }
    }
}

/// `Some(success)` if `response` answers a booking request.
fn booking_result(response: &str) -> Option<bool> {
    if response.starts_with(SUCCESS_PREFIX) {
        Some(true)
    } else if response.starts_with(ERROR_PREFIX) {
        Some(false)
    } else {
        None
    }
}

impl<D: Dispatcher> fmt::Debug for ConnectionHub<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionHub")
            .field("next_id", &self.next_id)
            .field("max_sessions", &self.max_sessions)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_result() {
        assert_eq!(booking_result("SUCCESS: Booked seats 1 for A at B\n\n"), Some(true));
        assert_eq!(booking_result("ERROR: Show not found - A at B\n\n"), Some(false));
        assert_eq!(booking_result("Echo: SUCCESS: fake\n\n"), None);
        assert_eq!(booking_result("=== CINEMA DATA STREAM ===\n"), None);
    }
}
