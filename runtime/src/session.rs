//! Session identity, lifecycle state, and the per-session writer.
//!
//! Each session owns an unbounded FIFO queue drained by exactly one writer
//! task. The writer awaits every `Sink::send` before taking the next frame,
//! so at most one write is ever outstanding on a transport.

use crate::metrics::SessionMetrics;
use futures::{Sink, SinkExt};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{mpsc, watch, RwLock};
use tracing::{debug, warn};

/// Process-unique session identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a session: `Connecting → Active → Closed`.
///
/// `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Transport accepted, not yet registered
    Connecting,
    /// Registered; receives responses and broadcasts
    Active,
    /// Removed from the registry; nothing more is delivered
    Closed,
}

impl SessionState {
    /// Check if the session reached its terminal state
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connecting => write!(f, "connecting"),
            Self::Active => write!(f, "active"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Caller-side view of a registered session.
///
/// Returned by [`ConnectionHub::connect`](crate::hub::ConnectionHub::connect).
/// Dropping it does not close the session; call
/// [`ConnectionHub::disconnect`](crate::hub::ConnectionHub::disconnect).
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    state: watch::Receiver<SessionState>,
}

impl Session {
    /// The session's identifier.
    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Wait until the session is closed.
    ///
    /// Resolves once the writer has stopped, either because the session was
    /// disconnected or because a write failed.
    pub async fn closed(&mut self) {
        // An error means the writer dropped its sender, which only happens on close.
        let _ = self.state.wait_for(|state| state.is_closed()).await;
    }
}

/// Registry entry: the session's queue and state.
#[derive(Debug)]
pub(crate) struct SessionHandle {
    outbound: mpsc::UnboundedSender<String>,
    session: Session,
}

impl SessionHandle {
    pub(crate) fn into_session(self) -> Session {
        self.session
    }

    pub(crate) fn sender(&self) -> mpsc::UnboundedSender<String> {
        self.outbound.clone()
    }

    /// Enqueue without waiting. Fails only once the writer has stopped.
    pub(crate) fn enqueue(&self, frame: String) -> bool {
        self.outbound.send(frame).is_ok()
    }
}

/// Shared map of live sessions.
pub(crate) type SessionRegistry = Arc<RwLock<HashMap<SessionId, SessionHandle>>>;

/// Queue, state channel and handle for a session that is still `Connecting`.
pub(crate) struct PendingSession {
    pub(crate) id: SessionId,
    pub(crate) handle: SessionHandle,
    pub(crate) session: Session,
    outbound: mpsc::UnboundedReceiver<String>,
    state: watch::Sender<SessionState>,
}

impl PendingSession {
    pub(crate) fn new(id: SessionId) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(SessionState::Connecting);
        let session = Session {
            id,
            state: state_rx,
        };
        Self {
            id,
            handle: SessionHandle {
                outbound: tx,
                session: session.clone(),
            },
            session,
            outbound: rx,
            state: state_tx,
        }
    }

    /// Mark the session active and start its writer over `sink`.
    pub(crate) fn activate<S>(self, sink: S, registry: SessionRegistry) -> (SessionHandle, Session)
    where
        S: Sink<String> + Unpin + Send + 'static,
        S::Error: fmt::Display + Send,
    {
        self.state.send_replace(SessionState::Active);
        tokio::spawn(write_loop(self.id, sink, self.outbound, self.state, registry));
        (self.handle, self.session)
    }
}

/// Drain the queue into the transport, one write at a time.
///
/// Ends when every sender is gone (disconnect) or a write fails. Either way
/// the session is removed from the registry and marked closed.
async fn write_loop<S>(
    id: SessionId,
    mut sink: S,
    mut outbound: mpsc::UnboundedReceiver<String>,
    state: watch::Sender<SessionState>,
    registry: SessionRegistry,
) where
    S: Sink<String> + Unpin + Send + 'static,
    S::Error: fmt::Display + Send,
{
    while let Some(frame) = outbound.recv().await {
        if let Err(e) = sink.send(frame).await {
            warn!(session_id = %id, error = %e, "Write failed, closing session");
            SessionMetrics::record_write_error();
            break;
        }
    }

    // Stop accepting frames before leaving the registry.
    outbound.close();
    let removed = {
        let mut sessions = registry.write().await;
        sessions.remove(&id).map(|_| sessions.len())
    };
    if let Some(remaining) = removed {
        SessionMetrics::record_disconnected(remaining);
        debug!(session_id = %id, total_sessions = remaining, "Session removed after write loop ended");
    }

    state.send_replace(SessionState::Closed);
    let _ = sink.close().await;
    debug!(session_id = %id, "Writer stopped");
}
