//! Default catalog the server starts with.
//!
//! Nine shows (three theaters × three movies) at one date, seeded by cycling
//! through three booking patterns in theater-major order.

use cinema_booking_core::{SeatMap, Show, ShowCatalog, SEAT_COUNT};
use tracing::info;

/// Theaters, in wire order.
pub const THEATERS: [&str; 3] = ["PVR", "IMAX", "Cinepolis"];

/// Movies shown in every theater.
pub const MOVIES: [&str; 3] = ["Inception", "Interstellar", "Tenet"];

/// Date and time of every seeded show.
pub const SHOW_TIME: &str = "2025-09-11 19:30";

const T: bool = true;
const F: bool = false;

/// Booking patterns (`true` = booked), applied to shows in rotation.
pub const PATTERNS: [[bool; SEAT_COUNT]; 3] = [
    [T, T, F, F, T, F, F, F, F, T, T, F, F, T, T, F, F, F, T, F],
    [F, T, F, T, F, T, F, T, T, F, F, T, T, F, F, T, T, F, F, T],
    [T, F, T, T, T, F, T, T, F, T, T, F, T, T, T, F, F, T, T, T],
];

/// Build the default catalog.
#[must_use]
pub fn default_catalog() -> ShowCatalog {
    THEATERS
        .iter()
        .flat_map(|theater| MOVIES.iter().map(move |movie| (*theater, *movie)))
        .zip(PATTERNS.iter().cycle())
        .map(|((theater, movie), pattern)| {
            Show::with_seats(theater, movie, SHOW_TIME, SeatMap::from_pattern(*pattern))
        })
        .collect()
}

/// Log free seats per show, grouped by theater.
pub fn log_availability(catalog: &ShowCatalog) {
    for theater in catalog.theaters_in_order() {
        for show in catalog.shows_for_theater(theater) {
            info!(
                theater,
                movie = show.movie(),
                free_seats = ?show.ledger().available_seats(),
                "Initial availability"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_default_catalog_layout() {
        let catalog = default_catalog();
        assert_eq!(catalog.len(), 9);
        assert_eq!(catalog.theaters_in_order(), THEATERS.to_vec());

        let movies: Vec<_> = catalog.shows_for_theater("IMAX").map(Show::movie).collect();
        assert_eq!(movies, MOVIES.to_vec());
    }

    #[test]
    fn test_patterns_rotate_theater_major() {
        let catalog = default_catalog();
        let free = |theater, movie| {
            catalog
                .find_show(theater, movie)
                .unwrap()
                .ledger()
                .available_seats()
        };

        assert_eq!(free("PVR", "Inception"), vec![3, 4, 6, 7, 8, 9, 12, 13, 16, 17, 18, 20]);
        assert_eq!(free("PVR", "Interstellar"), vec![1, 3, 5, 7, 10, 11, 14, 15, 18, 19]);
        assert_eq!(free("PVR", "Tenet"), vec![2, 6, 9, 12, 16, 17]);
        // fourth show wraps back to the first pattern
        assert_eq!(free("IMAX", "Inception"), free("PVR", "Inception"));
        assert_eq!(free("Cinepolis", "Tenet"), free("PVR", "Tenet"));
    }
}
