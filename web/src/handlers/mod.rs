//! HTTP request handlers.

pub mod health;
pub mod metrics;
pub mod websocket;

pub use health::{health_check, readiness};
