//! Cinema booking server
//!
//! Serves the default catalog over WebSocket.
//!
//! # Usage
//!
//! ```bash
//! # Defaults: 0.0.0.0:8080, at most 1000 sessions
//! cargo run --bin server
//!
//! # Override via environment or .env
//! PORT=9000 RUST_LOG=debug cargo run --bin server
//! ```

use cinema_booking_runtime::metrics::MetricsServer;
use cinema_booking_web::{seed, AppState, Config};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cinema_booking=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!(
        addr = %config.server.bind_address(),
        max_connections = config.server.max_connections,
        "Configuration loaded"
    );

    let catalog = Arc::new(seed::default_catalog());
    seed::log_availability(&catalog);

    let mut metrics = MetricsServer::new();
    metrics.start()?;

    let state = AppState::new(catalog, config.server.max_connections).with_metrics(metrics);

    tracing::info!("Press Ctrl+C to shutdown");
    cinema_booking_web::run(&config, state).await?;

    Ok(())
}
