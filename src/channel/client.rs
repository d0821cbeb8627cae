//! Status channel client.
//!
//! Opens the socket (plain first, secure on a construction failure), turns
//! every transport event into a state transition and a status line, and
//! sends user input while the channel is open.

use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::state::ChannelState;
use super::status::StatusDisplay;
use crate::error::ChannelError;
use crate::traits::{ChannelTransport, TransportError, TransportEvent};

/// Socket path on the backend.
pub const DEFAULT_CHANNEL_PATH: &str = "/game_running";

/// Configuration for the channel client.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Backend `host:port`
    pub host: String,
    pub path: String,
    /// Retry with `wss://` when the `ws://` socket cannot be constructed
    pub secure_fallback: bool,
}

impl ChannelConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            path: DEFAULT_CHANNEL_PATH.to_string(),
            secure_fallback: true,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_secure_fallback(mut self, secure_fallback: bool) -> Self {
        self.secure_fallback = secure_fallback;
        self
    }

    pub fn plain_url(&self) -> String {
        format!("ws://{}{}", self.host, self.path)
    }

    pub fn secure_url(&self) -> String {
        format!("wss://{}{}", self.host, self.path)
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self::new("127.0.0.1:8765")
    }
}

/// A connected (or connecting) status channel.
///
/// # Example
///
/// ```ignore
/// let display = Arc::new(StatusDisplay::new(page, element_ids::STATUS));
/// let client = ChannelClient::init(transport, ChannelConfig::new("127.0.0.1:8765"), display).await?;
/// client.send_message("hello").await?;
/// client.teardown();
/// ```
pub struct ChannelClient {
    url: String,
    outbound: Mutex<Option<mpsc::Sender<String>>>,
    state_rx: watch::Receiver<ChannelState>,
    display: Arc<StatusDisplay>,
    task: JoinHandle<()>,
}

impl ChannelClient {
    /// Construct the socket and start consuming its events.
    ///
    /// Returns `Err` only when neither URL yields a socket; the failure is
    /// also shown as the status line.
    pub async fn init(
        transport: Arc<dyn ChannelTransport>,
        config: ChannelConfig,
        display: Arc<StatusDisplay>,
    ) -> Result<Self, ChannelError> {
        let plain = config.plain_url();
        let (url, link) = match transport.open(&plain).await {
            Ok(link) => (plain, link),
            Err(err) if config.secure_fallback => {
                warn!("Could not construct {}: {}; retrying over wss", plain, err);
                let secure = config.secure_url();
                match transport.open(&secure).await {
                    Ok(link) => (secure, link),
                    Err(err) => return Err(Self::give_up(&display, err)),
                }
            }
            Err(err) => return Err(Self::give_up(&display, err)),
        };

        info!("Status channel constructed for {}", url);

        let (state_tx, state_rx) = watch::channel(ChannelState::Connecting);
        let task = tokio::spawn(run_event_loop(link.events, state_tx, display.clone()));

        Ok(Self {
            url,
            outbound: Mutex::new(Some(link.outbound)),
            state_rx,
            display,
            task,
        })
    }

    fn give_up(display: &StatusDisplay, err: TransportError) -> ChannelError {
        error!("Status channel unavailable: {}", err);
        display.show(err.to_string());
        ChannelError::ConstructionFailed(err)
    }

    /// URL the socket was constructed for.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn state(&self) -> ChannelState {
        *self.state_rx.borrow()
    }

    /// Subscribe to state changes.
    pub fn state_receiver(&self) -> watch::Receiver<ChannelState> {
        self.state_rx.clone()
    }

    pub fn is_open(&self) -> bool {
        self.state().is_open()
    }

    pub fn display(&self) -> &Arc<StatusDisplay> {
        &self.display
    }

    /// Send one line of user input.
    ///
    /// Nothing is queued: sending while the channel is not open fails with
    /// [`ChannelError::NotConnected`].
    pub async fn send_message(&self, text: &str) -> Result<(), ChannelError> {
        if !self.is_open() {
            return Err(ChannelError::NotConnected);
        }
        let sender = self
            .outbound
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(ChannelError::NotConnected)?;

        debug!("Sending status channel message: {}", text);
        sender
            .send(text.to_string())
            .await
            .map_err(|e| ChannelError::SendFailed(e.to_string()))
    }

    /// Close the socket gracefully.
    ///
    /// The closing handshake completes in the background; its outcome arrives
    /// as a normal lifecycle event.
    pub fn teardown(&self) {
        let sender = self
            .outbound
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if sender.is_some() {
            info!("Closing status channel");
        }
    }

    /// Wait until the socket has closed.
    pub async fn closed(&self) -> ChannelState {
        let mut state_rx = self.state_rx.clone();
        let state = match state_rx.wait_for(|state| state.is_terminal()).await {
            Ok(state) => *state,
            // Event loop ended without a close event
            Err(_) => self.state(),
        };
        state
    }

    /// Stop consuming events without waiting for the close handshake.
    ///
    /// Nothing this socket reports afterwards reaches the status display.
    pub fn detach(&self) {
        if !self.task.is_finished() {
            debug!("Detaching status channel event loop for {}", self.url);
            self.task.abort();
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Apply transport events in delivery order until the socket closes.
async fn run_event_loop(
    mut events: mpsc::Receiver<TransportEvent>,
    state_tx: watch::Sender<ChannelState>,
    display: Arc<StatusDisplay>,
) {
    while let Some(event) = events.recv().await {
        match &event {
            TransportEvent::Opened => info!("Status channel open"),
            TransportEvent::Message(text) => debug!("Status message: {}", text),
            TransportEvent::Closed { clean: true, code } => {
                info!("Status channel closed cleanly (code {:?})", code)
            }
            TransportEvent::Closed { clean: false, code } => {
                warn!("Status channel broken (code {:?})", code)
            }
            TransportEvent::Errored(detail) => error!("Status channel error: {}", detail),
        }

        let current = *state_tx.borrow();
        let transition = current.apply(&event);
        display.show(transition.status_line);
        state_tx.send_replace(transition.next);

        if transition.next.is_terminal() {
            break;
        }
    }
    debug!("Status channel event loop ended");
}
