//! What the listener has received so far.

use cinema_booking_core::protocol::{carries_snapshot, parse_snapshot, ParsedShow, ServerMessage};
use std::sync::{PoisonError, RwLock};
use tokio::sync::watch;
use tracing::{debug, info};

#[derive(Debug, Default)]
struct Received {
    last_response: String,
    last_booking_response: String,
    shows: Vec<ParsedShow>,
}

/// State shared between [`CinemaClient`](crate::CinemaClient) and its
/// listener task.
#[derive(Debug)]
pub(crate) struct ClientState {
    received: RwLock<Received>,
    frames: watch::Sender<u64>,
}

impl Default for ClientState {
    fn default() -> Self {
        Self {
            received: RwLock::default(),
            frames: watch::Sender::new(0),
        }
    }
}

impl ClientState {
    /// Record one text frame from the server.
    ///
    /// Every frame becomes the last response. Booking responses are kept
    /// separately, and any frame carrying a snapshot replaces the show list.
    pub(crate) fn process_frame(&self, frame: &str) {
        {
            let mut received = self.received.write().unwrap_or_else(PoisonError::into_inner);
            received.last_response = frame.to_string();

            match ServerMessage::classify(frame) {
                ServerMessage::BookingResponse { success } => {
                    debug!(success, "Booking response received");
                    received.last_booking_response = frame.to_string();
                    if carries_snapshot(frame) {
                        received.shows = parse_snapshot(frame);
                    }
                }
                ServerMessage::Snapshot(kind) => {
                    received.shows = parse_snapshot(frame);
                    debug!(?kind, shows = received.shows.len(), "Snapshot received");
                }
                ServerMessage::Other => {
                    info!(message = %frame.trim_end(), "Server update");
                }
            }
        }
        self.frames.send_modify(|count| *count += 1);
    }

    pub(crate) fn last_response(&self) -> String {
        self.read(|received| received.last_response.clone())
    }

    pub(crate) fn last_booking_response(&self) -> String {
        self.read(|received| received.last_booking_response.clone())
    }

    pub(crate) fn shows(&self) -> Vec<ParsedShow> {
        self.read(|received| received.shows.clone())
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<u64> {
        self.frames.subscribe()
    }

    fn read<T>(&self, f: impl FnOnce(&Received) -> T) -> T {
        f(&self.received.read().unwrap_or_else(PoisonError::into_inner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinema_booking_core::protocol::{format_snapshot, SnapshotKind};
    use cinema_booking_testing::fixtures;

    #[test]
    fn test_initial_snapshot_replaces_shows() {
        let state = ClientState::default();
        let snapshot = format_snapshot(&fixtures::small_catalog(), SnapshotKind::Initial);

        state.process_frame(&snapshot);

        assert_eq!(state.last_response(), snapshot);
        assert_eq!(state.shows().len(), 3);
        assert!(state.last_booking_response().is_empty());
        assert_eq!(*state.subscribe().borrow(), 1);
    }

    #[test]
    fn test_booking_response_is_stored_separately() {
        let state = ClientState::default();
        let catalog = fixtures::small_catalog();
        let response = format!(
            "SUCCESS: Booked seats 5 for Tenet at PVR\n\n{}",
            format_snapshot(&catalog, SnapshotKind::Initial)
        );

        state.process_frame(&response);
        state.process_frame("Echo: hello\n");

        assert_eq!(state.last_booking_response(), response);
        assert_eq!(state.last_response(), "Echo: hello\n");
        assert_eq!(state.shows().len(), 3);
    }

    #[test]
    fn test_error_without_snapshot_keeps_shows() {
        let state = ClientState::default();
        state.process_frame(&format_snapshot(&fixtures::small_catalog(), SnapshotKind::Initial));

        state.process_frame("ERROR: Invalid booking format. Use: theater,movie,seat1,seat2,...");

        assert!(state.last_booking_response().starts_with("ERROR:"));
        assert_eq!(state.shows().len(), 3);
    }

    #[test]
    fn test_update_snapshot_rebuilds_from_scratch() {
        let state = ClientState::default();
        state.process_frame(&format_snapshot(&fixtures::small_catalog(), SnapshotKind::Initial));

        let update = format_snapshot(&fixtures::single_show(), SnapshotKind::Update);
        state.process_frame(&update);

        assert_eq!(state.shows().len(), 1);
        assert_eq!(state.last_response(), update);
    }
}
