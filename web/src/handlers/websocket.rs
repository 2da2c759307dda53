//! WebSocket endpoint carrying the booking text protocol.
//!
//! # Architecture
//!
//! ```text
//! Client            WebSocket Handler             ConnectionHub
//!   │                      │                            │
//!   ├─ Connect ───────────>│                            │
//!   │                      ├─ try_connect(sink) ───────>│
//!   │<─ initial snapshot ──┼────────── writer task ─────┤
//!   │                      │                            │
//!   ├─ "PVR,Inception,3" ─>│                            │
//!   │                      ├─ handle_inbound() ────────>│
//!   │<─ SUCCESS: ... ──────┼────────── writer task ─────┤
//!   │<─ BOOKING_UPDATE ────┼────────── writer task ─────┤ (every session)
//! ```
//!
//! Every frame is a text message. The read half stays in this handler; the
//! write half is handed to the hub, whose writer task is the only thing that
//! ever writes to the socket.

use crate::state::{AppState, BookingHub};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures::{future, stream::StreamExt, SinkExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Upgrade to a WebSocket session.
///
/// Returns 503 Service Unavailable once the hub's session limit is reached.
///
/// # Endpoint
///
/// ```text
/// GET /ws   (also served on /)
/// ```
pub async fn upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    if !state.hub.has_capacity().await {
        let current_connections = state.hub.session_count().await;
        warn!(current_connections, "WebSocket connection limit exceeded");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            "Too many connections. Please try again later.",
        )
            .into_response();
    }

    debug!("WebSocket upgrade accepted");
    ws.on_upgrade(move |socket| handle_socket(socket, state.hub))
}

/// Run one session until the client goes away or its writer fails.
async fn handle_socket(socket: WebSocket, hub: Arc<BookingHub>) {
    let (sender, mut receiver) = socket.split();
    let sink = sender.with(|text: String| future::ready(Ok::<_, axum::Error>(Message::Text(text))));

    // Upgrades racing past the check in `upgrade` are turned away here.
    let Some(mut session) = hub.try_connect(sink).await else {
        warn!("WebSocket connection limit exceeded after upgrade, closing");
        return;
    };
    let id = session.id();

    loop {
        let frame = tokio::select! {
            () = session.closed() => {
                debug!(session_id = %id, "Writer closed the session");
                break;
            }
            frame = receiver.next() => frame,
        };

        match frame {
            Some(Ok(Message::Text(text))) => {
                if let Err(e) = hub.handle_inbound(id, &text).await {
                    debug!(session_id = %id, error = %e, "Dropping inbound frame");
                    break;
                }
            }
            Some(Ok(Message::Binary(_))) => {
                warn!(session_id = %id, "Ignoring binary frame");
            }
            // Pings are answered by axum
            Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
            Some(Ok(Message::Close(_))) | None => break,
            Some(Err(e)) => {
                debug!(session_id = %id, error = %e, "Read failed");
                break;
            }
        }
    }

    hub.disconnect(id).await;
    info!(session_id = %id, "WebSocket session ended");
}
