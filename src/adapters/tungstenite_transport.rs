//! Tungstenite-based status channel transport.
//!
//! Construction (URL parsing, scheme checks) happens synchronously inside
//! [`ChannelTransport::open`]; the connect and handshake run on a background
//! task and report their outcome as link events, the way a browser socket
//! does.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use crate::traits::{ChannelTransport, TransportError, TransportEvent, TransportLink};

/// WebSocket transport using tokio-tungstenite.
///
/// # Example
///
/// ```ignore
/// use arena_dashboard::adapters::TungsteniteTransport;
/// use arena_dashboard::traits::ChannelTransport;
///
/// let transport = TungsteniteTransport::new();
/// let mut link = transport.open("ws://127.0.0.1:8765/game_running").await?;
/// while let Some(event) = link.events.recv().await {
///     println!("{:?}", event);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct TungsteniteTransport {
    /// Refuse `ws://` URLs at construction
    secure_only: bool,
    /// Capacity of the event and outbound channels
    buffer: usize,
}

impl TungsteniteTransport {
    pub fn new() -> Self {
        Self {
            secure_only: false,
            buffer: 100,
        }
    }

    /// Refuse plain-text sockets, like a page served over https.
    pub fn secure_only(mut self, secure_only: bool) -> Self {
        self.secure_only = secure_only;
        self
    }

    /// Build the handshake request, rejecting URLs this transport cannot use.
    fn build_request(&self, url: &str) -> Result<Request, TransportError> {
        let request = url
            .into_client_request()
            .map_err(|e| TransportError::InvalidUrl(format!("{}: {}", url, e)))?;

        match request.uri().scheme_str() {
            Some("wss") => Ok(request),
            Some("ws") if self.secure_only => Err(TransportError::InsecureScheme(url.to_string())),
            Some("ws") => Ok(request),
            Some(other) => Err(TransportError::UnsupportedScheme(other.to_string())),
            None => Err(TransportError::InvalidUrl(format!("{}: missing scheme", url))),
        }
    }
}

impl Default for TungsteniteTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChannelTransport for TungsteniteTransport {
    async fn open(&self, url: &str) -> Result<TransportLink, TransportError> {
        let request = self.build_request(url)?;

        let (event_tx, event_rx) = mpsc::channel(self.buffer);
        let (outbound_tx, outbound_rx) = mpsc::channel(self.buffer);

        let url = url.to_string();
        tokio::spawn(async move {
            run_socket(url, request, event_tx, outbound_rx).await;
        });

        Ok(TransportLink::new(event_rx, outbound_tx))
    }
}

/// Connect, then pump frames until the socket ends.
async fn run_socket(
    url: String,
    request: Request,
    events: mpsc::Sender<TransportEvent>,
    mut outbound: mpsc::Receiver<String>,
) {
    let ws_stream = match connect_async(request).await {
        Ok((ws_stream, _)) => ws_stream,
        Err(e) => {
            warn!("Status channel connect to {} failed: {}", url, e);
            let _ = events.send(TransportEvent::Errored(e.to_string())).await;
            let _ = events
                .send(TransportEvent::Closed {
                    clean: false,
                    code: None,
                })
                .await;
            return;
        }
    };

    info!("Connected to status channel at {}", url);
    if events.send(TransportEvent::Opened).await.is_err() {
        return;
    }

    let (mut ws_sink, mut ws_stream) = ws_stream.split();
    let mut outbound_open = true;

    loop {
        tokio::select! {
            frame = ws_stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        debug!("Received status message: {}", text);
                        if events.send(TransportEvent::Message(text)).await.is_err() {
                            debug!("Event receiver dropped, closing socket");
                            let _ = ws_sink.close().await;
                            break;
                        }
                    }
                    Some(Ok(Message::Close(frame))) => {
                        let code = frame.map(|f| u16::from(f.code));
                        info!("Status channel closed by server (code {:?})", code);
                        // Completes the closing handshake
                        let _ = ws_sink.close().await;
                        let _ = events.send(TransportEvent::Closed { clean: true, code }).await;
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = ws_sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(_)) => {
                        // Binary, Pong and raw frames carry nothing to display
                    }
                    Some(Err(e)) => {
                        error!("Status channel error: {}", e);
                        let _ = events.send(TransportEvent::Errored(e.to_string())).await;
                        let _ = events
                            .send(TransportEvent::Closed { clean: false, code: None })
                            .await;
                        break;
                    }
                    None => {
                        info!("Status channel stream ended without a close frame");
                        let _ = events
                            .send(TransportEvent::Closed { clean: false, code: None })
                            .await;
                        break;
                    }
                }
            }
            text = outbound.recv(), if outbound_open => {
                match text {
                    Some(text) => {
                        if let Err(e) = ws_sink.send(Message::Text(text)).await {
                            error!("Failed to send status message: {}", e);
                            let _ = events.send(TransportEvent::Errored(e.to_string())).await;
                        }
                    }
                    None => {
                        // Outbound sender dropped: start the closing handshake
                        // and keep reading until the server answers.
                        debug!("Closing status channel");
                        outbound_open = false;
                        let _ = ws_sink.send(Message::Close(None)).await;
                    }
                }
            }
        }
    }

    debug!("Status channel socket task ended");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_request_accepts_ws_and_wss() {
        let transport = TungsteniteTransport::new();
        assert!(transport
            .build_request("ws://127.0.0.1:8765/game_running")
            .is_ok());
        assert!(transport
            .build_request("wss://127.0.0.1:8765/game_running")
            .is_ok());
    }

    #[test]
    fn test_build_request_secure_only_refuses_ws() {
        let transport = TungsteniteTransport::new().secure_only(true);
        assert_eq!(
            transport
                .build_request("ws://127.0.0.1:8765/game_running")
                .unwrap_err(),
            TransportError::InsecureScheme("ws://127.0.0.1:8765/game_running".to_string())
        );
        assert!(transport
            .build_request("wss://127.0.0.1:8765/game_running")
            .is_ok());
    }

    #[test]
    fn test_build_request_rejects_http_scheme() {
        let transport = TungsteniteTransport::new();
        assert!(transport
            .build_request("http://127.0.0.1:8765/game_running")
            .is_err());
    }

    #[test]
    fn test_build_request_rejects_garbage() {
        let transport = TungsteniteTransport::new();
        assert!(transport.build_request("not a url").is_err());
    }

    #[tokio::test]
    async fn test_refused_connection_is_a_runtime_failure() {
        let transport = TungsteniteTransport::new();
        let mut link = transport
            .open("ws://127.0.0.1:59999/game_running")
            .await
            .expect("construction should succeed");

        assert!(matches!(
            link.events.recv().await,
            Some(TransportEvent::Errored(_))
        ));
        assert_eq!(
            link.events.recv().await,
            Some(TransportEvent::Closed {
                clean: false,
                code: None
            })
        );
    }
}
