//! Per-show seat ledger with atomic, all-or-nothing reservation.
//!
//! Every show owns exactly one [`SeatLedger`]. The ledger is the only
//! synchronization point for that show's seats: reservations on different
//! shows never contend, and no code path ever holds two ledgers' locks at
//! once.
//!
//! # Concurrency
//!
//! ```text
//! available_seats()  ──> read lock   (readers never block each other)
//! reserve(seats)     ──> write lock  (validate all, then mark all)
//! ```
//!
//! The whole check-then-set sequence of [`SeatLedger::reserve`] runs under one
//! unbroken exclusive hold, so two callers asking for overlapping seats
//! serialize in lock-acquisition order and exactly one of them succeeds.

use crate::seat::SeatMap;
use std::sync::{PoisonError, RwLock};

/// Thread-safe booking state of one show's 20 seats.
#[derive(Debug, Default)]
pub struct SeatLedger {
    seats: RwLock<SeatMap>,
}

impl SeatLedger {
    /// Create a ledger with every seat available.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger seeded with an existing booking pattern.
    #[must_use]
    pub const fn from_map(map: SeatMap) -> Self {
        Self {
            seats: RwLock::new(map),
        }
    }

    /// Available seat numbers (1-based), ascending.
    #[must_use]
    pub fn available_seats(&self) -> Vec<u8> {
        self.snapshot().available_seats()
    }

    /// Consistent copy of the current seat map.
    #[must_use]
    pub fn snapshot(&self) -> SeatMap {
        // Writers only assign after validation completes, so a poisoned
        // lock still guards a consistent map.
        *self.seats.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reserve every seat in `seats`, or none of them.
    ///
    /// Returns `false` without mutating anything if any seat number is
    /// outside `1..=20` or already booked. Duplicate seat numbers are treated
    /// as one seat. An empty slice succeeds without touching the ledger.
    #[must_use]
    pub fn reserve(&self, seats: &[u8]) -> bool {
        let mut map = self.seats.write().unwrap_or_else(PoisonError::into_inner);

        let all_free = seats
            .iter()
            .all(|&seat| map.is_booked(seat) == Some(false));
        if !all_free {
            return false;
        }

        for &seat in seats {
            map.book(seat);
        }
        true
    }
}
