//! Status channel errors.

use thiserror::Error;

use crate::traits::TransportError;

/// Errors surfaced by the channel client's public operations.
#[derive(Debug, Clone, Error)]
pub enum ChannelError {
    /// Neither the plain nor the secure socket could be constructed
    #[error("Could not open status channel: {0}")]
    ConstructionFailed(#[from] TransportError),

    /// A send was attempted while the channel was not open
    #[error("Not connected to the status channel")]
    NotConnected,

    /// The transport stopped accepting outbound messages
    #[error("Send failed: {0}")]
    SendFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_error_display() {
        assert_eq!(
            ChannelError::ConstructionFailed(TransportError::InvalidUrl("x".to_string()))
                .to_string(),
            "Could not open status channel: Invalid socket URL: x"
        );
        assert_eq!(
            ChannelError::NotConnected.to_string(),
            "Not connected to the status channel"
        );
        assert_eq!(
            ChannelError::SendFailed("closed".to_string()).to_string(),
            "Send failed: closed"
        );
    }
}
