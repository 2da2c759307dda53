//! # Cinema Booking Testing
//!
//! Testing utilities and helpers for the cinema booking service.
//!
//! This crate provides:
//! - Channel-backed sinks standing in for a session's transport
//! - Catalog fixtures
//! - Property-based testing strategies
//! - A Given-When-Then harness for the message router
//!
//! ## Example
//!
//! ```ignore
//! use cinema_booking_testing::{channel_sink, fixtures};
//!
//! #[tokio::test]
//! async fn test_initial_snapshot() {
//!     let hub = ConnectionHub::new(MessageRouter::new(fixtures::single_show()));
//!     let (sink, mut probe) = channel_sink();
//!
//!     hub.connect(sink).await;
//!
//!     let frame = probe.next_frame().await.unwrap();
//!     assert!(frame.starts_with("=== CINEMA DATA STREAM ==="));
//! }
//! ```

pub mod router_test;

pub use router_test::{assertions, RouterTest};

/// Mock transports for testing.
///
/// The connection hub writes to any `futures::Sink<String>`; these sinks
/// forward every frame to a [`SinkProbe`] and can be told to start failing.
pub mod mocks {
    use futures::Sink;
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use std::time::Duration;
    use tokio::sync::mpsc;

    /// How long [`SinkProbe::next_frame`] waits before giving up.
    pub const FRAME_TIMEOUT: Duration = Duration::from_secs(2);

    /// Sink that forwards frames to a [`SinkProbe`].
    #[derive(Debug)]
    pub struct ChannelSink {
        tx: mpsc::UnboundedSender<String>,
        fail_after: Option<usize>,
        sent: usize,
    }

    impl ChannelSink {
        fn broken_pipe() -> io::Error {
            io::Error::new(io::ErrorKind::BrokenPipe, "transport closed")
        }
    }

    impl Sink<String> for ChannelSink {
        type Error = io::Error;

        fn poll_ready(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            if self.fail_after.is_some_and(|limit| self.sent >= limit) {
                return Poll::Ready(Err(Self::broken_pipe()));
            }
            Poll::Ready(Ok(()))
        }

        fn start_send(mut self: Pin<&mut Self>, item: String) -> Result<(), Self::Error> {
            self.sent += 1;
            self.tx.send(item).map_err(|_| Self::broken_pipe())
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }
    }

    /// Receiving end of a [`ChannelSink`].
    #[derive(Debug)]
    pub struct SinkProbe {
        rx: mpsc::UnboundedReceiver<String>,
    }

    impl SinkProbe {
        /// Next frame written to the sink, or `None` on timeout/close.
        pub async fn next_frame(&mut self) -> Option<String> {
            tokio::time::timeout(FRAME_TIMEOUT, self.rx.recv())
                .await
                .ok()
                .flatten()
        }

        /// Collect exactly `count` frames, stopping early on timeout.
        pub async fn frames(&mut self, count: usize) -> Vec<String> {
            let mut frames = Vec::with_capacity(count);
            while frames.len() < count {
                match self.next_frame().await {
                    Some(frame) => frames.push(frame),
                    None => break,
                }
            }
            frames
        }

        /// Frames already delivered, without waiting.
        pub fn drain(&mut self) -> Vec<String> {
            let mut frames = Vec::new();
            while let Ok(frame) = self.rx.try_recv() {
                frames.push(frame);
            }
            frames
        }
    }

    /// A sink that never fails.
    #[must_use]
    pub fn channel_sink() -> (ChannelSink, SinkProbe) {
        failing_sink_after(usize::MAX)
    }

    /// A sink whose writes fail once `limit` frames have been written.
    #[must_use]
    pub fn failing_sink_after(limit: usize) -> (ChannelSink, SinkProbe) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = ChannelSink {
            tx,
            fail_after: (limit != usize::MAX).then_some(limit),
            sent: 0,
        };
        (sink, SinkProbe { rx })
    }
}

/// Catalog fixtures.
pub mod fixtures {
    use cinema_booking_core::{SeatMap, Show, ShowCatalog};
    use std::sync::Arc;

    /// Date used by every fixture show.
    pub const SHOW_TIME: &str = "2025-09-11 19:30";

    /// One fully available show: Inception at PVR.
    #[must_use]
    pub fn single_show() -> Arc<ShowCatalog> {
        Arc::new(ShowCatalog::new(vec![Show::new("PVR", "Inception", SHOW_TIME)]))
    }

    /// Two theaters, three shows, with a few seats already taken.
    ///
    /// - PVR / Inception: 1, 2 booked
    /// - PVR / Tenet: all available
    /// - Cinepolis / Inception: sold out
    #[must_use]
    pub fn small_catalog() -> Arc<ShowCatalog> {
        Arc::new(ShowCatalog::new(vec![
            Show::with_seats("PVR", "Inception", SHOW_TIME, SeatMap::with_booked(&[1, 2])),
            Show::new("PVR", "Tenet", SHOW_TIME),
            Show::with_seats("Cinepolis", "Inception", SHOW_TIME, SeatMap::all_booked()),
        ]))
    }

    /// Build a catalog from `(theater, movie, booked seats)` rows.
    #[must_use]
    pub fn catalog_with(rows: &[(&str, &str, &[u8])]) -> Arc<ShowCatalog> {
        Arc::new(
            rows.iter()
                .map(|(theater, movie, booked)| {
                    Show::with_seats(*theater, *movie, SHOW_TIME, SeatMap::with_booked(booked))
                })
                .collect(),
        )
    }
}

/// Property-based testing strategies using proptest.
pub mod properties {
    use cinema_booking_core::{SeatMap, SEAT_COUNT};
    use proptest::prelude::*;

    /// A valid seat number in `1..=20`.
    pub fn valid_seat() -> impl Strategy<Value = u8> {
        1..=20u8
    }

    /// Any seat number, including out-of-range values around the bounds.
    pub fn any_seat() -> impl Strategy<Value = u8> {
        prop_oneof![
            8 => valid_seat(),
            1 => Just(0u8),
            1 => 21..=30u8,
        ]
    }

    /// A request-shaped list of seat numbers (may contain duplicates).
    pub fn seat_request() -> impl Strategy<Value = Vec<u8>> {
        prop::collection::vec(any_seat(), 0..8)
    }

    /// An arbitrary booking pattern.
    pub fn seat_map() -> impl Strategy<Value = SeatMap> {
        prop::array::uniform20(any::<bool>()).prop_map(SeatMap::from_pattern)
    }

    /// Names safe to embed in the comma-separated request format.
    pub fn name() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z0-9 ]{0,11}".prop_map(|s| s.trim_end().to_string())
    }

    const _: () = assert!(SEAT_COUNT == 20, "uniform20 must match SEAT_COUNT");
}

pub use mocks::{channel_sink, failing_sink_after, ChannelSink, SinkProbe};
