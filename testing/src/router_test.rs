//! Ergonomic testing utilities for the message router
//!
//! This module provides a fluent API for testing inbound messages with readable Given-When-Then syntax.

#![allow(clippy::module_name_repetitions)] // RouterTest is the natural name

use cinema_booking_core::{MessageRouter, RouteOutcome, ShowCatalog};
use std::sync::Arc;

/// Type alias for catalog assertion functions
type CatalogAssertion = Box<dyn FnOnce(&ShowCatalog)>;

/// Type alias for outcome assertion functions
type OutcomeAssertion = Box<dyn FnOnce(&RouteOutcome)>;

/// Fluent API for testing the router with Given-When-Then syntax
///
/// Messages are routed in order; outcome assertions run against the outcome
/// of the last message.
///
/// # Example
///
/// ```
/// use cinema_booking_core::{Show, ShowCatalog};
/// use cinema_booking_testing::{assertions, RouterTest};
///
/// RouterTest::new()
///     .given_catalog(ShowCatalog::new(vec![Show::new("PVR", "Inception", "19:30")]))
///     .when_message("PVR,Inception,3,4")
///     .then_outcome(|outcome| {
///         assertions::assert_response_starts_with(outcome, "SUCCESS: Booked seats 3, 4");
///         assert!(outcome.should_broadcast);
///     })
///     .then_catalog(|catalog| {
///         assertions::assert_booked(catalog, "PVR", "Inception", &[3, 4]);
///     })
///     .run();
/// ```
#[derive(Default)]
pub struct RouterTest {
    catalog: Option<ShowCatalog>,
    messages: Vec<String>,
    catalog_assertions: Vec<CatalogAssertion>,
    outcome_assertions: Vec<OutcomeAssertion>,
}

impl RouterTest {
    /// Create a new router test
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the catalog (Given)
    #[must_use]
    pub fn given_catalog(mut self, catalog: ShowCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Queue a message to route (When)
    #[must_use]
    pub fn when_message(mut self, message: impl Into<String>) -> Self {
        self.messages.push(message.into());
        self
    }

    /// Add an assertion about the resulting catalog (Then)
    #[must_use]
    pub fn then_catalog<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&ShowCatalog) + 'static,
    {
        self.catalog_assertions.push(Box::new(assertion));
        self
    }

    /// Add an assertion about the last outcome (Then)
    #[must_use]
    pub fn then_outcome<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&RouteOutcome) + 'static,
    {
        self.outcome_assertions.push(Box::new(assertion));
        self
    }

    /// Run the test and execute all assertions
    ///
    /// # Panics
    ///
    /// Panics if the catalog or a message is not set,
    /// or if any assertions fail.
    #[allow(clippy::panic)] // Test code can panic
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) {
        let catalog = Arc::new(
            self.catalog
                .expect("Catalog must be set with given_catalog()"),
        );
        assert!(
            !self.messages.is_empty(),
            "At least one message must be set with when_message()"
        );

        let router = MessageRouter::new(Arc::clone(&catalog));
        let mut last = None;
        for message in &self.messages {
            last = Some(router.route(message));
        }
        let outcome = last.expect("at least one message was routed");

        for assertion in self.outcome_assertions {
            assertion(&outcome);
        }

        for assertion in self.catalog_assertions {
            assertion(&catalog);
        }
    }
}

/// Helper assertions for outcomes and catalogs
pub mod assertions {
    use cinema_booking_core::{RouteOutcome, ShowCatalog};

    /// Assert the response starts with `prefix`
    ///
    /// # Panics
    ///
    /// Panics if the response has a different prefix.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_response_starts_with(outcome: &RouteOutcome, prefix: &str) {
        assert!(
            outcome.response.starts_with(prefix),
            "Expected response starting with {prefix:?}, but got {:?}",
            outcome.response
        );
    }

    /// Assert exactly `expected` seats are booked for a show
    ///
    /// # Panics
    ///
    /// Panics if the show does not exist or its booked seats differ.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_booked(catalog: &ShowCatalog, theater: &str, movie: &str, expected: &[u8]) {
        let Some(show) = catalog.find_show(theater, movie) else {
            panic!("Expected show {movie} at {theater}, but it is not in the catalog");
        };
        assert_eq!(
            show.ledger().snapshot().booked_seats(),
            expected,
            "Unexpected booked seats for {movie} at {theater}"
        );
    }

    /// Assert no seat in the catalog is booked
    ///
    /// # Panics
    ///
    /// Panics if any show has a booked seat.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_untouched(catalog: &ShowCatalog) {
        for show in catalog {
            assert!(
                show.ledger().snapshot().booked_seats().is_empty(),
                "Expected no bookings, but {} at {} has {:?}",
                show.movie(),
                show.theater(),
                show.ledger().snapshot().booked_seats()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinema_booking_core::Show;

    fn catalog() -> ShowCatalog {
        ShowCatalog::new(vec![Show::new("PVR", "Inception", "19:30")])
    }

    #[test]
    fn test_router_test_booking() {
        RouterTest::new()
            .given_catalog(catalog())
            .when_message("PVR,Inception,1,2")
            .then_outcome(|outcome| {
                assertions::assert_response_starts_with(outcome, "SUCCESS: Booked seats 1, 2");
            })
            .then_catalog(|catalog| {
                assertions::assert_booked(catalog, "PVR", "Inception", &[1, 2]);
            })
            .run();
    }

    #[test]
    fn test_router_test_sequence_uses_last_outcome() {
        RouterTest::new()
            .given_catalog(catalog())
            .when_message("PVR,Inception,1")
            .when_message("PVR,Inception,1")
            .then_outcome(|outcome| {
                assertions::assert_response_starts_with(
                    outcome,
                    "ERROR: One or more seats are already booked or invalid",
                );
                assert!(!outcome.should_broadcast);
            })
            .run();
    }

    #[test]
    fn test_assert_untouched() {
        assertions::assert_untouched(&catalog());
    }
}
