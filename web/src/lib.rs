//! Axum WebSocket server for the cinema booking service.
//!
//! # Routes
//!
//! | Route           | Purpose                                   |
//! |-----------------|-------------------------------------------|
//! | `GET /`, `/ws`  | WebSocket upgrade carrying the text protocol |
//! | `GET /health`   | Liveness                                  |
//! | `GET /health/ready` | JSON readiness report                 |
//! | `GET /metrics`  | Prometheus exposition                     |
//!
//! # Example
//!
//! ```ignore
//! use cinema_booking_web::{seed, AppState, Config};
//!
//! let config = Config::from_env();
//! let state = AppState::new(Arc::new(seed::default_catalog()), config.server.max_connections);
//! cinema_booking_web::run(&config, state).await?;
//! ```

#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod seed;
pub mod state;

pub use config::{Config, ServerConfig};
pub use error::ServerError;
pub use state::AppState;

use axum::{routing::get, Router};
use futures::future;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::websocket::upgrade))
        .route("/ws", get(handlers::websocket::upgrade))
        .route("/health", get(handlers::health_check))
        .route("/health/ready", get(handlers::readiness))
        .route("/metrics", get(handlers::metrics::metrics))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Bind `config.server` and serve until Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Returns [`ServerError::Bind`] if the address cannot be bound and
/// [`ServerError::Serve`] if the server fails while running.
pub async fn run(config: &Config, state: AppState) -> Result<(), ServerError> {
    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind { addr: addr.clone(), source })?;

    info!(%addr, "WebSocket server listening");
    serve(listener, state, shutdown_signal(), config.server.shutdown_timeout()).await
}

/// Serve on an already bound listener until `shutdown` resolves.
///
/// Once `shutdown` resolves, every open WebSocket session is closed and
/// given `grace` to flush its queue before the server returns.
///
/// # Errors
///
/// Returns [`ServerError::Serve`] if the server fails while running.
pub async fn serve<F>(
    listener: TcpListener,
    state: AppState,
    shutdown: F,
    grace: Duration,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let hub = Arc::clone(&state.hub);
    let app = build_router(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServerError::Serve)?;

    // Upgraded connections outlive the HTTP server; close them explicitly.
    let sessions = hub.close_all().await;
    if !sessions.is_empty() {
        let closed = future::join_all(sessions.into_iter().map(|mut session| async move {
            session.closed().await;
        }));
        if tokio::time::timeout(grace, closed).await.is_err() {
            warn!(grace_secs = grace.as_secs(), "Shutdown timed out with sessions still open");
        }
    }

    info!("Server stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        () = terminate => {
            info!("Received SIGTERM signal");
        }
    }
}
