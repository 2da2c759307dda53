//! # Cinema Booking Core
//!
//! Domain types and business logic for the live cinema seat booking service.
//!
//! This crate is transport-agnostic: everything here is synchronous and can be
//! called from any thread. The connection hub (`cinema-booking-runtime`) and
//! the WebSocket shell (`cinema-booking-web`) sit on top of it.
//!
//! ## Components
//!
//! - [`SeatLedger`]: 20-seat bitmap per show with atomic, all-or-nothing reservation
//! - [`ShowCatalog`]: ordered list of shows grouped by theater in first-seen order
//! - [`protocol`]: snapshot formatting/parsing and booking request parsing
//! - [`BookingService`]: validate → look up → reserve → respond
//! - [`MessageRouter`]: classifies inbound text and implements [`Dispatcher`]
//!
//! ## Request Flow
//!
//! ```text
//! inbound text
//!      │
//!      ▼
//! ┌───────────────┐  get_data / refresh   ┌──────────────────┐
//! │ MessageRouter │──────────────────────>│ format_snapshot  │
//! └───────┬───────┘                       └──────────────────┘
//!         │ "theater,movie,seat..."
//!         ▼
//! ┌────────────────┐   find_show   ┌─────────────┐  reserve  ┌────────────┐
//! │ BookingService │──────────────>│ ShowCatalog │──────────>│ SeatLedger │
//! └────────────────┘               └─────────────┘           └────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use cinema_booking_core::{MessageRouter, Show, ShowCatalog};
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(ShowCatalog::new(vec![
//!     Show::new("PVR", "Inception", "2025-09-11 19:30"),
//! ]));
//! let router = MessageRouter::new(catalog);
//!
//! let outcome = router.route("PVR,Inception,3,4");
//! assert!(outcome.response.starts_with("SUCCESS: Booked seats 3, 4"));
//! assert!(outcome.should_broadcast);
//! ```

#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

pub mod booking;
pub mod catalog;
pub mod error;
pub mod ledger;
pub mod protocol;
pub mod router;
pub mod seat;

pub use booking::{BookingOutcome, BookingService};
pub use catalog::{Show, ShowCatalog};
pub use error::BookingError;
pub use ledger::SeatLedger;
pub use protocol::{BookingRequest, ParsedShow, ServerMessage, SnapshotKind};
pub use router::{Dispatcher, MessageRouter, RouteOutcome};
pub use seat::{SeatMap, SEAT_COUNT};
