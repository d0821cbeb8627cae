//! Status channel transport trait abstraction.
//!
//! A transport turns a socket URL into a [`TransportLink`]: a stream of
//! lifecycle and message events plus a sender for outbound text. The channel
//! client never touches sockets directly, which lets tests drive every
//! lifecycle transition through [`crate::adapters::MockTransport`].

use async_trait::async_trait;
use tokio::sync::mpsc;

/// Transport errors.
///
/// Only construction-time failures are returned from [`ChannelTransport::open`].
/// Anything that goes wrong after the socket exists is reported as
/// [`TransportEvent::Errored`] and [`TransportEvent::Closed`] on the link.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    /// The URL could not be turned into a socket request
    InvalidUrl(String),
    /// The URL scheme is not a socket scheme
    UnsupportedScheme(String),
    /// The transport refuses plain-text sockets
    InsecureScheme(String),
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::InvalidUrl(msg) => write!(f, "Invalid socket URL: {}", msg),
            TransportError::UnsupportedScheme(scheme) => {
                write!(f, "Unsupported socket scheme: {}", scheme)
            }
            TransportError::InsecureScheme(url) => {
                write!(f, "Insecure socket refused: {}", url)
            }
        }
    }
}

impl std::error::Error for TransportError {}

/// Events delivered by a transport, in delivery order.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// The socket finished its handshake
    Opened,
    /// A text message arrived
    Message(String),
    /// The socket closed; `clean` is true when the closing handshake completed
    Closed { clean: bool, code: Option<u16> },
    /// The transport reported an error
    Errored(String),
}

/// A constructed socket: inbound events and the outbound text sender.
///
/// Dropping `outbound` asks the transport to close the socket gracefully.
#[derive(Debug)]
pub struct TransportLink {
    pub events: mpsc::Receiver<TransportEvent>,
    pub outbound: mpsc::Sender<String>,
}

impl TransportLink {
    pub fn new(events: mpsc::Receiver<TransportEvent>, outbound: mpsc::Sender<String>) -> Self {
        Self { events, outbound }
    }
}

/// Trait for opening status channel sockets.
#[async_trait]
pub trait ChannelTransport: Send + Sync {
    /// Construct a socket for `url`.
    ///
    /// Returns `Err` only when the socket cannot be constructed at all. A
    /// connection that is refused later still yields `Ok`, followed by
    /// `Errored` and `Closed { clean: false, .. }` events on the link.
    async fn open(&self, url: &str) -> Result<TransportLink, TransportError>;
}
