//! Booking service: validate → look up → reserve → respond.
//!
//! Every response, success or failure, ends with a freshly formatted initial
//! snapshot so a client can resynchronize from any single response. Only a
//! successful reservation asks the hub to broadcast.

use crate::catalog::ShowCatalog;
use crate::error::BookingError;
use crate::protocol::{self, BookingRequest, SnapshotKind};
use std::sync::Arc;
use tracing::{debug, info};

/// Result of processing one booking request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingOutcome {
    /// Whether seats were reserved
    pub success: bool,
    /// Full response text, snapshot included
    pub response: String,
    /// Whether every session should receive an update snapshot
    pub should_broadcast: bool,
}

/// Processes `theater,movie,seat...` requests against a catalog.
#[derive(Debug, Clone)]
pub struct BookingService {
    catalog: Arc<ShowCatalog>,
}

impl BookingService {
    /// Create a booking service over a shared catalog.
    #[must_use]
    pub const fn new(catalog: Arc<ShowCatalog>) -> Self {
        Self { catalog }
    }

    /// The catalog this service books against.
    #[must_use]
    pub fn catalog(&self) -> &ShowCatalog {
        &self.catalog
    }

    /// Process a raw booking request.
    ///
    /// State is only mutated on the success path; every error leaves all
    /// ledgers untouched.
    #[must_use]
    pub fn process(&self, raw: &str) -> BookingOutcome {
        match self.book(raw) {
            Ok(request) => {
                let seats = request.seats_ascending();
                info!(
                    theater = %request.theater,
                    movie = %request.movie,
                    seats = ?seats,
                    "Seats booked"
                );
                BookingOutcome {
                    success: true,
                    response: format!(
                        "SUCCESS: Booked seats {} for {} at {}\n\n{}",
                        protocol::join_seats(&seats),
                        request.movie,
                        request.theater,
                        self.snapshot()
                    ),
                    should_broadcast: true,
                }
            }
            Err(error) => {
                debug!(request = raw, %error, "Booking rejected");
                BookingOutcome {
                    success: false,
                    response: format!("ERROR: {error}\n\n{}", self.snapshot()),
                    should_broadcast: false,
                }
            }
        }
    }

    /// Parse, resolve and reserve.
    ///
    /// # Errors
    ///
    /// Returns the first [`BookingError`] encountered; nothing is reserved.
    pub fn book(&self, raw: &str) -> Result<BookingRequest, BookingError> {
        let request = BookingRequest::parse(raw)?;

        let show = self
            .catalog
            .find_show(&request.theater, &request.movie)
            .ok_or_else(|| BookingError::ShowNotFound {
                theater: request.theater.clone(),
                movie: request.movie.clone(),
            })?;

        if show.ledger().reserve(&request.seats) {
            Ok(request)
        } else {
            Err(BookingError::SeatsUnavailable)
        }
    }

    fn snapshot(&self) -> String {
        protocol::format_snapshot(&self.catalog, SnapshotKind::Initial)
    }
}
