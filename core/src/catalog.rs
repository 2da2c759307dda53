//! Show catalog: the fixed, ordered list of shows the server knows about.
//!
//! Order matters. Theaters are enumerated in the order they first appear in
//! the show list (not alphabetically), and shows within a theater keep
//! insertion order; the wire format groups output by exactly this order.
//!
//! The (theater, movie) pair is not enforced unique. Lookups return the first
//! match, so a later duplicate is listed in snapshots but can never be booked.

use crate::ledger::SeatLedger;
use crate::seat::SeatMap;

/// One screening: a movie at a theater, with its own seat ledger.
#[derive(Debug)]
pub struct Show {
    theater: String,
    movie: String,
    date_time: String,
    ledger: SeatLedger,
}

impl Show {
    /// Create a show with every seat available.
    pub fn new(
        theater: impl Into<String>,
        movie: impl Into<String>,
        date_time: impl Into<String>,
    ) -> Self {
        Self::with_seats(theater, movie, date_time, SeatMap::all_available())
    }

    /// Create a show seeded with an existing booking pattern.
    pub fn with_seats(
        theater: impl Into<String>,
        movie: impl Into<String>,
        date_time: impl Into<String>,
        seats: SeatMap,
    ) -> Self {
        Self {
            theater: theater.into(),
            movie: movie.into(),
            date_time: date_time.into(),
            ledger: SeatLedger::from_map(seats),
        }
    }

    /// Theater name.
    #[must_use]
    pub fn theater(&self) -> &str {
        &self.theater
    }

    /// Movie title.
    #[must_use]
    pub fn movie(&self) -> &str {
        &self.movie
    }

    /// Display date/time (opaque string).
    #[must_use]
    pub fn date_time(&self) -> &str {
        &self.date_time
    }

    /// The show's seat ledger.
    #[must_use]
    pub const fn ledger(&self) -> &SeatLedger {
        &self.ledger
    }
}

/// Ordered, immutable collection of shows.
///
/// Seat state is mutated only through each show's [`SeatLedger`], so the
/// catalog itself can be shared behind an `Arc` without further locking.
#[derive(Debug, Default)]
pub struct ShowCatalog {
    shows: Vec<Show>,
}

impl ShowCatalog {
    /// Create a catalog from shows in display order.
    #[must_use]
    pub const fn new(shows: Vec<Show>) -> Self {
        Self { shows }
    }

    /// First show matching both theater and movie exactly.
    #[must_use]
    pub fn find_show(&self, theater: &str, movie: &str) -> Option<&Show> {
        self.shows
            .iter()
            .find(|show| show.theater == theater && show.movie == movie)
    }

    /// Distinct theater names in first-seen order.
    #[must_use]
    pub fn theaters_in_order(&self) -> Vec<&str> {
        let mut theaters: Vec<&str> = Vec::new();
        for show in &self.shows {
            if !theaters.contains(&show.theater.as_str()) {
                theaters.push(&show.theater);
            }
        }
        theaters
    }

    /// Shows of one theater, in catalog order.
    pub fn shows_for_theater<'a>(&'a self, theater: &'a str) -> impl Iterator<Item = &'a Show> {
        self.shows.iter().filter(move |show| show.theater == theater)
    }

    /// All shows in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, Show> {
        self.shows.iter()
    }

    /// Number of shows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shows.len()
    }

    /// Whether the catalog has no shows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shows.is_empty()
    }
}

impl<'a> IntoIterator for &'a ShowCatalog {
    type Item = &'a Show;
    type IntoIter = std::slice::Iter<'a, Show>;

    fn into_iter(self) -> Self::IntoIter {
        self.shows.iter()
    }
}

impl FromIterator<Show> for ShowCatalog {
    fn from_iter<I: IntoIterator<Item = Show>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
