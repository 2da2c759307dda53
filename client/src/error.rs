//! Error types for the booking client.

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Errors returned by [`CinemaClient`](crate::CinemaClient).
#[derive(Error, Debug)]
pub enum ClientError {
    /// Host or port was empty or not a valid port number
    #[error("Invalid server address: {0}")]
    InvalidAddress(String),

    /// `connect` was called on a connected client
    #[error("Already connected to server")]
    AlreadyConnected,

    /// The client has no live connection
    #[error("Not connected to server")]
    NotConnected,

    /// Handshake or transport failure
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] Box<tungstenite::Error>),
}

impl From<tungstenite::Error> for ClientError {
    fn from(error: tungstenite::Error) -> Self {
        Self::WebSocket(Box::new(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            ClientError::InvalidAddress(":8080".to_string()).to_string(),
            "Invalid server address: :8080"
        );
        let error: ClientError = tungstenite::Error::ConnectionClosed.into();
        assert!(error.to_string().starts_with("WebSocket error:"));
    }
}
