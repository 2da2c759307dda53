//! Line-oriented wire protocol.
//!
//! The text format is a compatibility contract with existing clients: marker
//! lines and prefixes must match byte for byte.
//!
//! # Snapshot Format
//!
//! ```text
//! === CINEMA DATA STREAM ===
//! Theater: PVR
//!   Movie: Inception (2025-09-11 19:30)
//!     Available seats: 3, 4, 6, 7 (Total: 4/20)
//!   Movie: Tenet (2025-09-11 19:30)
//!     Available seats: SOLD OUT (Total: 0/20)
//!
//! === END CINEMA DATA ===
//! ```
//!
//! Update snapshots (pushed to every session after a successful booking) use
//! `BOOKING_UPDATE:` / `=== UPDATED CINEMA DATA ===` as the header and
//! `=== END UPDATED DATA ===` as the footer.
//!
//! # Client Commands
//!
//! - `get_data`, `refresh`: request a snapshot
//! - `<theater>,<movie>,<seat>[,<seat>...]`: booking request
//! - anything else is echoed back

use crate::catalog::ShowCatalog;
use crate::error::BookingError;
use crate::seat::{SeatMap, SEAT_COUNT};
use std::collections::BTreeSet;
use std::fmt::{self, Write as _};

/// Snapshot request command.
pub const GET_DATA: &str = "get_data";
/// Alias of [`GET_DATA`].
pub const REFRESH: &str = "refresh";

/// Header of an initial snapshot.
pub const CINEMA_DATA_STREAM: &str = "=== CINEMA DATA STREAM ===";
/// Footer of an initial snapshot.
pub const END_CINEMA_DATA: &str = "=== END CINEMA DATA ===";
/// First header line of an update snapshot.
pub const BOOKING_UPDATE: &str = "BOOKING_UPDATE:";
/// Second header line of an update snapshot.
pub const UPDATED_CINEMA_DATA: &str = "=== UPDATED CINEMA DATA ===";
/// Footer of an update snapshot.
pub const END_UPDATED_DATA: &str = "=== END UPDATED DATA ===";

/// Prefix of a theater line.
pub const THEATER_PREFIX: &str = "Theater: ";
/// Prefix of a movie line.
pub const MOVIE_PREFIX: &str = "  Movie: ";
/// Marker of an availability line.
pub const SEATS_PREFIX: &str = "    Available seats:";
/// Rendered in place of seat numbers when nothing is left.
pub const SOLD_OUT: &str = "SOLD OUT";

/// Prefix of a successful booking response.
pub const SUCCESS_PREFIX: &str = "SUCCESS:";
/// Prefix of a rejected request.
pub const ERROR_PREFIX: &str = "ERROR:";

const TOTAL_MARKER: &str = "(Total:";

/// Which header/footer pair a snapshot carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotKind {
    /// Sent on connect, on request, and appended to every response.
    Initial,
    /// Broadcast to every session after a successful booking.
    Update,
}

impl SnapshotKind {
    /// Header line(s), without the trailing newline.
    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::Initial => CINEMA_DATA_STREAM,
            Self::Update => "BOOKING_UPDATE:\n=== UPDATED CINEMA DATA ===",
        }
    }

    /// Footer line, without the trailing newline.
    #[must_use]
    pub const fn footer(self) -> &'static str {
        match self {
            Self::Initial => END_CINEMA_DATA,
            Self::Update => END_UPDATED_DATA,
        }
    }
}

/// Render the catalog's current availability.
///
/// Theaters appear in first-seen order and shows in catalog order. Each
/// show's ledger is read independently, so the snapshot is consistent per
/// show, not across shows.
#[must_use]
pub fn format_snapshot(catalog: &ShowCatalog, kind: SnapshotKind) -> String {
    let mut out = String::with_capacity(64 + catalog.len() * 96);
    let _ = writeln!(out, "{}", kind.header());

    for theater in catalog.theaters_in_order() {
        let _ = writeln!(out, "{THEATER_PREFIX}{theater}");
        for show in catalog.shows_for_theater(theater) {
            let available = show.ledger().available_seats();
            let _ = writeln!(out, "{MOVIE_PREFIX}{} ({})", show.movie(), show.date_time());
            let _ = writeln!(
                out,
                "{SEATS_PREFIX} {} (Total: {}/{SEAT_COUNT})",
                seat_list(&available),
                available.len()
            );
        }
        out.push('\n');
    }

    let _ = writeln!(out, "{}", kind.footer());
    out
}

fn seat_list(seats: &[u8]) -> String {
    if seats.is_empty() {
        return SOLD_OUT.to_string();
    }
    join_seats(seats)
}

/// Seat numbers joined with `", "`.
#[must_use]
pub fn join_seats(seats: &[u8]) -> String {
    seats
        .iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// One show reconstructed from snapshot text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedShow {
    /// Theater name
    pub theater: String,
    /// Movie title
    pub movie: String,
    /// Display date/time
    pub date_time: String,
    /// Seat state as rendered in the snapshot
    pub seats: SeatMap,
}

/// Rebuild the show list from snapshot text.
///
/// Parsing is lenient: unknown lines, malformed movie lines, unparsable seat
/// tokens and out-of-range seat numbers are skipped. A movie without an
/// availability line keeps every seat available. Each call starts from
/// scratch; nothing is merged with earlier results.
#[must_use]
pub fn parse_snapshot(text: &str) -> Vec<ParsedShow> {
    let mut shows: Vec<ParsedShow> = Vec::new();
    let mut current_theater: Option<&str> = None;
    let mut has_current_show = false;

    for line in text.lines() {
        if let Some(theater) = line.strip_prefix(THEATER_PREFIX) {
            current_theater = Some(theater);
            has_current_show = false;
        } else if let Some(movie_line) = line.strip_prefix(MOVIE_PREFIX) {
            let Some(theater) = current_theater.filter(|t| !t.is_empty()) else {
                continue;
            };
            if let Some((movie, date_time)) = split_movie_line(movie_line) {
                shows.push(ParsedShow {
                    theater: theater.to_string(),
                    movie: movie.to_string(),
                    date_time: date_time.to_string(),
                    seats: SeatMap::all_available(),
                });
                has_current_show = true;
            }
        } else if line.contains(SEATS_PREFIX) && has_current_show {
            if let Some(show) = shows.last_mut() {
                show.seats = parse_seat_line(line);
            }
        }
    }

    shows
}

/// `"Inception (2025-09-11 19:30)"` → `("Inception", "2025-09-11 19:30")`.
fn split_movie_line(movie_line: &str) -> Option<(&str, &str)> {
    let open = movie_line.find(" (")?;
    let title = &movie_line[..open];
    let rest = &movie_line[open + 2..];
    let close = rest.find(')')?;
    if close == 0 {
        return None;
    }
    Some((title, &rest[..close]))
}

fn parse_seat_line(line: &str) -> SeatMap {
    let after_colon = line.split_once(':').map_or("", |(_, rest)| rest);
    let seats = after_colon
        .find(TOTAL_MARKER)
        .map_or(after_colon, |pos| &after_colon[..pos]);

    let mut map = SeatMap::all_booked();
    for token in seats.replace(',', " ").split_whitespace() {
        if let Ok(seat) = token.parse::<u8>() {
            // out-of-range values are ignored by release()
            map.release(seat);
        }
    }
    map
}

/// A parsed `theater,movie,seat[,seat...]` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    /// Theater name (matched exactly)
    pub theater: String,
    /// Movie title (matched exactly)
    pub movie: String,
    /// Seat numbers in request order, each within `1..=20`
    pub seats: Vec<u8>,
}

impl BookingRequest {
    /// Create a request from already-validated parts.
    pub fn new(theater: impl Into<String>, movie: impl Into<String>, seats: Vec<u8>) -> Self {
        Self {
            theater: theater.into(),
            movie: movie.into(),
            seats,
        }
    }

    /// Parse and validate a booking request.
    ///
    /// A single empty field left by a trailing comma is dropped. Any seat
    /// field that is not an integer, or lies outside `1..=20`, rejects the
    /// whole request.
    ///
    /// # Errors
    ///
    /// - [`BookingError::InvalidFormat`] if fewer than three fields remain
    /// - [`BookingError::InvalidSeatFormat`] for a non-integer seat field
    /// - [`BookingError::InvalidSeatNumber`] for an out-of-range seat
    pub fn parse(text: &str) -> Result<Self, BookingError> {
        let mut fields: Vec<&str> = text.split(',').collect();
        if text.ends_with(',') {
            fields.pop();
        }

        let [theater, movie, seat_fields @ ..] = fields.as_slice() else {
            return Err(BookingError::InvalidFormat);
        };
        if seat_fields.is_empty() {
            return Err(BookingError::InvalidFormat);
        }

        let seats = seat_fields
            .iter()
            .map(|field| parse_seat_field(field))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(*theater, *movie, seats))
    }

    /// Distinct seat numbers in ascending order.
    #[must_use]
    pub fn seats_ascending(&self) -> Vec<u8> {
        self.seats
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl fmt::Display for BookingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.theater, self.movie)?;
        for seat in &self.seats {
            write!(f, ",{seat}")?;
        }
        Ok(())
    }
}

fn parse_seat_field(field: &str) -> Result<u8, BookingError> {
    let value: i64 = field
        .trim()
        .parse()
        .map_err(|_| BookingError::InvalidSeatFormat(field.to_string()))?;

    u8::try_from(value)
        .ok()
        .filter(|seat| SeatMap::is_valid_seat(*seat))
        .ok_or_else(|| BookingError::InvalidSeatNumber(field.to_string()))
}

/// What kind of frame a client received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerMessage {
    /// Response to a booking request (`SUCCESS:` or `ERROR:`).
    BookingResponse {
        /// Whether the booking went through
        success: bool,
    },
    /// A bare snapshot.
    Snapshot(SnapshotKind),
    /// Anything else (echo replies, free text).
    Other,
}

impl ServerMessage {
    /// Classify a server frame.
    ///
    /// Booking responses take precedence even though they also carry a
    /// snapshot; use [`carries_snapshot`] to decide whether to re-parse.
    #[must_use]
    pub fn classify(text: &str) -> Self {
        if text.contains(SUCCESS_PREFIX) {
            Self::BookingResponse { success: true }
        } else if text.contains(ERROR_PREFIX) {
            Self::BookingResponse { success: false }
        } else if text.contains(BOOKING_UPDATE) && text.contains(UPDATED_CINEMA_DATA) {
            Self::Snapshot(SnapshotKind::Update)
        } else if carries_snapshot(text) {
            Self::Snapshot(SnapshotKind::Initial)
        } else {
            Self::Other
        }
    }
}

/// Whether the frame contains an initial or update snapshot header.
#[must_use]
pub fn carries_snapshot(text: &str) -> bool {
    text.contains(CINEMA_DATA_STREAM) || text.contains(UPDATED_CINEMA_DATA)
}
