//! Channel lifecycle state machine.
//!
//! Transitions are pure: [`ChannelState::apply`] maps the current state and a
//! transport event to the next state plus the status line to show.

use std::fmt;

use crate::traits::TransportEvent;

/// Status line shown when the socket opens.
pub const OPENED_LINE: &str = "Connection to server started";
/// Status line shown after a completed closing handshake.
pub const CLEAN_CLOSE_LINE: &str = "Clean connection end";
/// Status line shown when the socket closes without a handshake.
pub const BROKEN_CLOSE_LINE: &str = "Connection broken";

/// Status channel state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Connecting,
    Open,
    Closed { clean: bool },
    Errored,
}

/// Outcome of applying one transport event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: ChannelState,
    pub status_line: String,
}

impl ChannelState {
    /// Apply a transport event.
    ///
    /// Every event yields exactly one status line. Messages leave the state
    /// unchanged. An error does not close the channel; a separate `Closed`
    /// event does.
    pub fn apply(self, event: &TransportEvent) -> Transition {
        let (next, status_line) = match event {
            TransportEvent::Opened => (ChannelState::Open, OPENED_LINE.to_string()),
            TransportEvent::Message(text) => (self, text.clone()),
            TransportEvent::Closed { clean: true, .. } => (
                ChannelState::Closed { clean: true },
                CLEAN_CLOSE_LINE.to_string(),
            ),
            TransportEvent::Closed { clean: false, .. } => (
                ChannelState::Closed { clean: false },
                BROKEN_CLOSE_LINE.to_string(),
            ),
            TransportEvent::Errored(detail) => (ChannelState::Errored, detail.clone()),
        };
        Transition { next, status_line }
    }

    pub fn is_open(self) -> bool {
        self == ChannelState::Open
    }

    /// No further transport events are expected.
    pub fn is_terminal(self) -> bool {
        matches!(self, ChannelState::Closed { .. })
    }
}

impl fmt::Display for ChannelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelState::Connecting => write!(f, "connecting"),
            ChannelState::Open => write!(f, "open"),
            ChannelState::Closed { clean: true } => write!(f, "closed"),
            ChannelState::Closed { clean: false } => write!(f, "broken"),
            ChannelState::Errored => write!(f, "errored"),
        }
    }
}
