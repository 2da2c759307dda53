//! # Cinema Booking Client
//!
//! WebSocket client for the cinema booking server.
//!
//! [`CinemaClient`] connects to the server's root endpoint, sends text
//! commands and runs a background listener that keeps the latest snapshot
//! parsed into [`ParsedShow`](cinema_booking_core::protocol::ParsedShow)s.
//! Interactive input is left to the caller.

#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
mod state;

pub use client::CinemaClient;
pub use config::ClientConfig;
pub use error::ClientError;
