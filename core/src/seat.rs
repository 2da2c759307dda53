//! Fixed-size seat bitmap shared by the server ledger and the client-side parser.

use serde::{Deserialize, Serialize};

/// Number of seats in every show.
pub const SEAT_COUNT: usize = 20;

/// Booking state of every seat in one show.
///
/// Index `i` holds seat number `i + 1`; `false` means available, `true`
/// means booked. The length is fixed at [`SEAT_COUNT`], so seat numbers
/// outside `1..=20` can never be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatMap {
    booked: [bool; SEAT_COUNT],
}

impl Default for SeatMap {
    fn default() -> Self {
        Self::all_available()
    }
}

impl SeatMap {
    /// A map with every seat available.
    #[must_use]
    pub const fn all_available() -> Self {
        Self {
            booked: [false; SEAT_COUNT],
        }
    }

    /// A map with every seat booked.
    #[must_use]
    pub const fn all_booked() -> Self {
        Self {
            booked: [true; SEAT_COUNT],
        }
    }

    /// Build a map from a raw booking pattern (`true` = booked).
    #[must_use]
    pub const fn from_pattern(booked: [bool; SEAT_COUNT]) -> Self {
        Self { booked }
    }

    /// Build a map where exactly the given seats are booked.
    ///
    /// Seat numbers outside `1..=20` are ignored.
    #[must_use]
    pub fn with_booked(seats: &[u8]) -> Self {
        let mut map = Self::all_available();
        for &seat in seats {
            if let Some(index) = seat_index(seat) {
                map.booked[index] = true;
            }
        }
        map
    }

    /// Whether `seat` is a valid seat number (`1..=20`).
    #[must_use]
    pub const fn is_valid_seat(seat: u8) -> bool {
        seat_index(seat).is_some()
    }

    /// Whether the seat is booked. Invalid seat numbers report `None`.
    #[must_use]
    pub const fn is_booked(&self, seat: u8) -> Option<bool> {
        match seat_index(seat) {
            Some(index) => Some(self.booked[index]),
            None => None,
        }
    }

    /// Mark a seat booked. Returns `false` if the seat number is invalid.
    pub const fn book(&mut self, seat: u8) -> bool {
        self.set(seat, true)
    }

    /// Mark a seat available. Returns `false` if the seat number is invalid.
    pub const fn release(&mut self, seat: u8) -> bool {
        self.set(seat, false)
    }

    const fn set(&mut self, seat: u8, booked: bool) -> bool {
        match seat_index(seat) {
            Some(index) => {
                self.booked[index] = booked;
                true
            }
            None => false,
        }
    }

    /// Available seat numbers in ascending order.
    #[must_use]
    pub fn available_seats(&self) -> Vec<u8> {
        self.seats_where(false)
    }

    /// Booked seat numbers in ascending order.
    #[must_use]
    pub fn booked_seats(&self) -> Vec<u8> {
        self.seats_where(true)
    }

    /// Number of available seats.
    #[must_use]
    pub fn available_count(&self) -> usize {
        self.booked.iter().filter(|booked| !**booked).count()
    }

    #[allow(clippy::cast_possible_truncation)] // SEAT_COUNT fits in u8
    fn seats_where(&self, booked: bool) -> Vec<u8> {
        (1..=SEAT_COUNT as u8)
            .zip(self.booked.iter())
            .filter(|(_, state)| **state == booked)
            .map(|(seat, _)| seat)
            .collect()
    }
}

/// Zero-based index for a one-based seat number.
const fn seat_index(seat: u8) -> Option<usize> {
    if seat >= 1 && (seat as usize) <= SEAT_COUNT {
        Some(seat as usize - 1)
    } else {
        None
    }
}
