//! WebSocket connection and background listener.

use crate::error::ClientError;
use crate::state::ClientState;
use cinema_booking_core::protocol::{BookingRequest, ParsedShow, GET_DATA};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{watch, Mutex as AsyncMutex};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How long `disconnect` waits for the server to acknowledge the close.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

/// Client for the cinema booking server.
///
/// After [`connect`](Self::connect), a background task reads every frame the
/// server pushes and keeps the latest response, the latest booking response
/// and the parsed show list up to date.
///
/// # Example
///
/// ```ignore
/// use cinema_booking_client::{CinemaClient, ClientConfig};
///
/// let config = ClientConfig::from_env();
/// let client = CinemaClient::new();
/// client.connect(&config.host, &config.port).await?;
/// client.book("PVR", "Inception", &[3, 4]).await?;
/// ```
#[derive(Debug, Default)]
pub struct CinemaClient {
    state: Arc<ClientState>,
    connected: Arc<AtomicBool>,
    writer: AsyncMutex<Option<SplitSink<WsStream, Message>>>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl CinemaClient {
    /// Create a disconnected client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect to `ws://host:port/` and start the listener.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidAddress`] if `host` or `port` is empty, or `port` is not a number
    /// - [`ClientError::AlreadyConnected`] if the client is already connected
    /// - [`ClientError::WebSocket`] if the handshake fails
    pub async fn connect(&self, host: &str, port: &str) -> Result<(), ClientError> {
        if host.trim().is_empty() || port.parse::<u16>().is_err() {
            return Err(ClientError::InvalidAddress(format!("{host}:{port}")));
        }

        let mut writer = self.writer.lock().await;
        if self.is_connected() {
            return Err(ClientError::AlreadyConnected);
        }

        let (stream, _) = connect_async(format!("ws://{host}:{port}/")).await?;
        let (sink, stream) = stream.split();
        *writer = Some(sink);
        self.connected.store(true, Ordering::SeqCst);

        let handle = tokio::spawn(listen(
            stream,
            Arc::clone(&self.state),
            Arc::clone(&self.connected),
        ));
        if let Some(previous) = self.listener_slot().replace(handle) {
            previous.abort();
        }

        info!(%host, %port, "Connected to Cinema Server");
        Ok(())
    }

    /// Send a raw text frame.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotConnected`] without a live connection and
    /// [`ClientError::WebSocket`] if the write fails. A failed write marks
    /// the client disconnected.
    pub async fn send(&self, text: &str) -> Result<(), ClientError> {
        if !self.is_connected() {
            return Err(ClientError::NotConnected);
        }

        let mut writer = self.writer.lock().await;
        let sink = writer.as_mut().ok_or(ClientError::NotConnected)?;
        if let Err(e) = sink.send(Message::Text(text.to_string())).await {
            warn!(error = %e, "Send failed");
            self.connected.store(false, Ordering::SeqCst);
            return Err(e.into());
        }
        Ok(())
    }

    /// Request a fresh snapshot.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn request_data(&self) -> Result<(), ClientError> {
        self.send(GET_DATA).await
    }

    /// Send a `theater,movie,seat[,seat...]` booking request.
    ///
    /// Seats are sent as given; the server validates them.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn book(&self, theater: &str, movie: &str, seats: &[u8]) -> Result<(), ClientError> {
        let request = BookingRequest::new(theater, movie, seats.to_vec());
        self.send(&request.to_string()).await
    }

    /// Close the connection. Safe to call more than once.
    pub async fn disconnect(&self) {
        let sink = self.writer.lock().await.take();
        self.connected.store(false, Ordering::SeqCst);

        if let Some(mut sink) = sink {
            if let Err(e) = sink.close().await {
                debug!(error = %e, "Close handshake failed");
            }
        }

        let listener = self.listener_slot().take();
        if let Some(mut handle) = listener {
            if tokio::time::timeout(CLOSE_TIMEOUT, &mut handle).await.is_err() {
                handle.abort();
            }
            info!("Disconnected from server");
        }
    }

    /// Whether the connection is still live.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// The most recent frame of any kind.
    #[must_use]
    pub fn last_response(&self) -> String {
        self.state.last_response()
    }

    /// The most recent `SUCCESS:` or `ERROR:` response.
    #[must_use]
    pub fn last_booking_response(&self) -> String {
        self.state.last_booking_response()
    }

    /// Shows from the most recent snapshot.
    #[must_use]
    pub fn shows(&self) -> Vec<ParsedShow> {
        self.state.shows()
    }

    /// Count of frames received so far; changes on every frame.
    #[must_use]
    pub fn frames(&self) -> watch::Receiver<u64> {
        self.state.subscribe()
    }

    fn listener_slot(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.listener.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for CinemaClient {
    fn drop(&mut self) {
        if let Some(handle) = self.listener_slot().take() {
            handle.abort();
        }
    }
}

async fn listen(mut stream: SplitStream<WsStream>, state: Arc<ClientState>, connected: Arc<AtomicBool>) {
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => state.process_frame(&text),
            Ok(Message::Close(_)) => {
                debug!("Server closed the connection");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "Read failed");
                break;
            }
        }
    }
    connected.store(false, Ordering::SeqCst);
    debug!("Listener stopped");
}
