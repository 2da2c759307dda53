//! Booking errors.
//!
//! These never become transport failures. Each variant's `Display` output is
//! exactly the reason text that follows `ERROR: ` in the response sent back to
//! the client.

use thiserror::Error;

/// Reasons a booking request is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// Fewer than three comma-separated fields.
    #[error("Invalid booking format. Use: theater,movie,seat1,seat2,...")]
    InvalidFormat,

    /// A seat field parsed as an integer outside `1..=20`.
    #[error("Invalid seat number {0}. Must be 1-20.")]
    InvalidSeatNumber(String),

    /// A seat field that is not an integer.
    #[error("Invalid seat number format: {0}")]
    InvalidSeatFormat(String),

    /// No show matches the (theater, movie) pair.
    #[error("Show not found - {movie} at {theater}")]
    ShowNotFound {
        /// Requested theater
        theater: String,
        /// Requested movie
        movie: String,
    },

    /// The ledger refused the reservation.
    #[error("One or more seats are already booked or invalid")]
    SeatsUnavailable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_match_wire_text() {
        assert_eq!(
            BookingError::InvalidSeatNumber("21".into()).to_string(),
            "Invalid seat number 21. Must be 1-20."
        );
        assert_eq!(
            BookingError::ShowNotFound {
                theater: "IMAX".into(),
                movie: "Inception".into(),
            }
            .to_string(),
            "Show not found - Inception at IMAX"
        );
    }
}
