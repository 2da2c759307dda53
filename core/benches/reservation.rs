//! Reservation and snapshot benchmarks
//!
//! Measures the cost of the hot paths behind every inbound frame: an atomic
//! multi-seat reservation, a full booking round (parse, reserve, render), and
//! snapshot formatting/parsing.
//!
//! Run with: `cargo bench --bench reservation`

#![allow(missing_docs)] // Benchmarks don't need extensive docs
#![allow(clippy::expect_used)] // Benchmarks can use expect for setup

use cinema_booking_core::protocol::{format_snapshot, parse_snapshot};
use cinema_booking_core::{BookingService, SeatLedger, Show, ShowCatalog, SnapshotKind};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;

// ============================================================================
// Benchmark Fixtures
// ============================================================================

const THEATERS: [&str; 3] = ["PVR", "IMAX", "Cinepolis"];
const MOVIES: [&str; 3] = ["Inception", "Interstellar", "Tenet"];

fn catalog() -> Arc<ShowCatalog> {
    Arc::new(
        THEATERS
            .iter()
            .flat_map(|theater| {
                MOVIES
                    .iter()
                    .map(move |movie| Show::new(*theater, *movie, "2025-09-11 19:30"))
            })
            .collect(),
    )
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_reserve(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger");

    group.bench_function("reserve_and_fail", |b| {
        let ledger = SeatLedger::new();
        assert!(ledger.reserve(&[5]));
        // seat 5 is taken, so every iteration walks the check path only
        b.iter(|| black_box(ledger.reserve(black_box(&[1, 2, 3, 4, 5]))));
    });

    group.bench_function("reserve_fresh_ledger", |b| {
        b.iter(|| {
            let ledger = SeatLedger::new();
            black_box(ledger.reserve(black_box(&[1, 5, 10, 15, 20])))
        });
    });

    group.bench_function("available_seats", |b| {
        let ledger = SeatLedger::new();
        assert!(ledger.reserve(&[2, 4, 6, 8]));
        b.iter(|| black_box(ledger.available_seats()));
    });

    group.finish();
}

fn bench_booking(c: &mut Criterion) {
    let mut group = c.benchmark_group("booking");

    group.bench_function("rejected_booking", |b| {
        let service = BookingService::new(catalog());
        assert!(service.process("IMAX,Tenet,7").success);
        b.iter(|| black_box(service.process(black_box("IMAX,Tenet,7,8"))));
    });

    group.bench_function("unknown_show", |b| {
        let service = BookingService::new(catalog());
        b.iter(|| black_box(service.process(black_box("Nowhere,Tenet,1"))));
    });

    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot");
    let catalog = catalog();
    let text = format_snapshot(&catalog, SnapshotKind::Update);

    group.bench_function("format_update", |b| {
        b.iter(|| black_box(format_snapshot(black_box(&catalog), SnapshotKind::Update)));
    });

    group.bench_function("parse_update", |b| {
        b.iter(|| black_box(parse_snapshot(black_box(&text))));
    });

    group.finish();
}

criterion_group!(benches, bench_reserve, bench_booking, bench_snapshot);
criterion_main!(benches);
