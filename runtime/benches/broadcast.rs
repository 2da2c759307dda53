//! Broadcast fan-out benchmarks
//!
//! Measures the cost of queueing an update snapshot to every registered
//! session, and of a full inbound round (dispatch plus reply).
//!
//! Run with: `cargo bench --bench broadcast`

#![allow(missing_docs)] // Benchmarks don't need extensive docs
#![allow(clippy::expect_used)] // Benchmarks can use expect for setup

use cinema_booking_core::{MessageRouter, Show, ShowCatalog};
use cinema_booking_runtime::ConnectionHub;
use cinema_booking_testing::{channel_sink, SinkProbe};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Benchmark Fixtures
// ============================================================================

fn router() -> MessageRouter {
    MessageRouter::new(Arc::new(ShowCatalog::new(vec![
        Show::new("PVR", "Inception", "2025-09-11 19:30"),
        Show::new("IMAX", "Tenet", "2025-09-11 19:30"),
    ])))
}

async fn hub_with_sessions(count: usize) -> (ConnectionHub<MessageRouter>, Vec<SinkProbe>) {
    let hub = ConnectionHub::new(router());
    let mut probes = Vec::with_capacity(count);
    for _ in 0..count {
        let (sink, probe) = channel_sink();
        hub.connect(sink).await;
        probes.push(probe);
    }
    (hub, probes)
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_broadcast_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("broadcast_fan_out");
    group.measurement_time(Duration::from_secs(5));

    let runtime = tokio::runtime::Runtime::new().expect("Failed to create runtime");

    for sessions in [1_usize, 10, 100] {
        let (hub, mut probes) = runtime.block_on(hub_with_sessions(sessions));
        let update = hub_update(&hub);

        group.bench_with_input(BenchmarkId::from_parameter(sessions), &sessions, |b, _| {
            b.to_async(&runtime)
                .iter(|| async { black_box(hub.broadcast(update.clone()).await) });
        });

        // Keep the probes from growing without bound between groups.
        for probe in &mut probes {
            probe.drain();
        }
    }

    group.finish();
}

fn bench_inbound_round(c: &mut Criterion) {
    let mut group = c.benchmark_group("inbound");
    let runtime = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    let (hub, _probes) = runtime.block_on(hub_with_sessions(1));
    let (sink, _probe) = channel_sink();
    let session = runtime.block_on(hub.connect(sink));

    group.bench_function("refresh", |b| {
        b.to_async(&runtime).iter(|| async {
            black_box(hub.handle_inbound(session.id(), "refresh").await.expect("registered"))
        });
    });

    group.finish();
}

fn hub_update(hub: &ConnectionHub<MessageRouter>) -> String {
    use cinema_booking_core::Dispatcher;
    hub.dispatcher().update_message()
}

criterion_group!(benches, bench_broadcast_fan_out, bench_inbound_round);
criterion_main!(benches);
