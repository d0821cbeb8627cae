//! Mock status channel transport for testing.
//!
//! Lets tests refuse schemes at construction time, inject lifecycle events
//! into a constructed link, and capture outbound text.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

use crate::traits::{ChannelTransport, TransportError, TransportEvent, TransportLink};

/// Close code reported when the client closes a mock link.
pub const NORMAL_CLOSURE: u16 = 1000;

/// Control handle for one link produced by [`MockTransport::open`].
#[derive(Debug, Clone)]
pub struct MockLinkHandle {
    url: String,
    events: mpsc::Sender<TransportEvent>,
    sent: Arc<Mutex<Vec<String>>>,
    client_closed: Arc<AtomicBool>,
}

impl MockLinkHandle {
    /// URL this link was opened for.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Deliver an arbitrary event to the client.
    pub async fn inject(&self, event: TransportEvent) {
        // Ignore send errors (client gone)
        let _ = self.events.send(event).await;
    }

    /// Simulate the handshake completing.
    pub async fn open(&self) {
        self.inject(TransportEvent::Opened).await;
    }

    /// Deliver an inbound text message.
    pub async fn inject_message(&self, text: &str) {
        self.inject(TransportEvent::Message(text.to_string())).await;
    }

    /// Simulate a transport error.
    pub async fn error(&self, detail: &str) {
        self.inject(TransportEvent::Errored(detail.to_string())).await;
    }

    /// Simulate the socket closing.
    pub async fn close(&self, clean: bool) {
        let code = clean.then_some(NORMAL_CLOSURE);
        self.inject(TransportEvent::Closed { clean, code }).await;
    }

    /// Outbound messages the client has sent, in order.
    pub fn sent_messages(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    /// Whether the client dropped its outbound sender.
    pub fn client_closed(&self) -> bool {
        self.client_closed.load(Ordering::SeqCst)
    }
}

/// Mock transport for testing.
///
/// By default every URL is accepted and the link opens immediately.
///
/// # Example
///
/// ```ignore
/// use arena_dashboard::adapters::MockTransport;
/// use arena_dashboard::traits::ChannelTransport;
///
/// let transport = MockTransport::new().with_echo(true);
/// transport.refuse_scheme("ws");
///
/// assert!(transport.open("ws://host/game_running").await.is_err());
/// let mut link = transport.open("wss://host/game_running").await?;
/// link.outbound.send("ping".to_string()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct MockTransport {
    /// Schemes that fail at construction
    refused_schemes: Arc<Mutex<Vec<String>>>,
    /// Every URL passed to `open`, including refused ones
    attempts: Arc<Mutex<Vec<String>>>,
    /// Handles for successfully constructed links
    links: Arc<Mutex<Vec<MockLinkHandle>>>,
    /// Send `Opened` as soon as a link is constructed
    auto_open: bool,
    /// Reflect outbound text back as inbound messages
    echo: bool,
    /// Report a clean close once the client drops its outbound sender
    close_reply: bool,
}

impl MockTransport {
    /// Create a mock that accepts everything and opens immediately.
    pub fn new() -> Self {
        Self {
            refused_schemes: Arc::new(Mutex::new(Vec::new())),
            attempts: Arc::new(Mutex::new(Vec::new())),
            links: Arc::new(Mutex::new(Vec::new())),
            auto_open: true,
            echo: false,
            close_reply: true,
        }
    }

    /// Leave links in the connecting phase until a test calls `open`.
    pub fn with_auto_open(mut self, auto_open: bool) -> Self {
        self.auto_open = auto_open;
        self
    }

    /// Reflect every outbound message back to the client.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Leave client-initiated closes unanswered, like a peer that hangs.
    pub fn with_close_reply(mut self, close_reply: bool) -> Self {
        self.close_reply = close_reply;
        self
    }

    /// Make construction fail for URLs with this scheme.
    pub fn refuse_scheme(&self, scheme: &str) {
        self.refused_schemes
            .lock()
            .unwrap()
            .push(scheme.to_string());
    }

    /// URLs passed to `open`, in call order.
    pub fn attempted_urls(&self) -> Vec<String> {
        self.attempts.lock().unwrap().clone()
    }

    /// Handle for the most recently constructed link.
    pub fn last_link(&self) -> Option<MockLinkHandle> {
        self.links.lock().unwrap().last().cloned()
    }

    /// Number of links constructed so far.
    pub fn link_count(&self) -> usize {
        self.links.lock().unwrap().len()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChannelTransport for MockTransport {
    async fn open(&self, url: &str) -> Result<TransportLink, TransportError> {
        self.attempts.lock().unwrap().push(url.to_string());

        let (scheme, _) = url
            .split_once("://")
            .ok_or_else(|| TransportError::InvalidUrl(url.to_string()))?;
        if self
            .refused_schemes
            .lock()
            .unwrap()
            .iter()
            .any(|s| s == scheme)
        {
            return Err(match scheme {
                "ws" => TransportError::InsecureScheme(url.to_string()),
                other => TransportError::UnsupportedScheme(other.to_string()),
            });
        }

        let (event_tx, event_rx) = mpsc::channel(100);
        let (outbound_tx, mut outbound_rx) = mpsc::channel::<String>(100);

        let handle = MockLinkHandle {
            url: url.to_string(),
            events: event_tx.clone(),
            sent: Arc::new(Mutex::new(Vec::new())),
            client_closed: Arc::new(AtomicBool::new(false)),
        };

        if self.auto_open {
            let _ = event_tx.send(TransportEvent::Opened).await;
        }

        let sent = handle.sent.clone();
        let client_closed = handle.client_closed.clone();
        let echo = self.echo;
        let close_reply = self.close_reply;
        tokio::spawn(async move {
            while let Some(text) = outbound_rx.recv().await {
                sent.lock().unwrap().push(text.clone());
                if echo {
                    let _ = event_tx.send(TransportEvent::Message(text)).await;
                }
            }
            // Client dropped outbound: answer the close like a well-behaved server
            client_closed.store(true, Ordering::SeqCst);
            if !close_reply {
                return;
            }
            let _ = event_tx
                .send(TransportEvent::Closed {
                    clean: true,
                    code: Some(NORMAL_CLOSURE),
                })
                .await;
        });

        self.links.lock().unwrap().push(handle);
        Ok(TransportLink::new(event_rx, outbound_tx))
    }
}
