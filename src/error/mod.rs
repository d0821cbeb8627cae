//! Error handling for the dashboard.
//!
//! - **Trait-boundary errors** ([`crate::traits::HttpError`],
//!   [`crate::traits::TransportError`]) describe what the adapters saw.
//! - **Domain errors** ([`ResultsError`], [`ChannelError`]) describe what an
//!   operation of the poller or channel client failed to do.
//! - **Unified error** ([`DashboardError`]) is what the page controller and
//!   the page server deal in, with [`DashboardResult<T>`] as the alias.
//!
//! Every failure is local: a poll failure becomes a fallback render, a
//! channel failure becomes a status line. Nothing here is fatal to the
//! process.

mod channel;
mod results;

pub use channel::ChannelError;
pub use results::ResultsError;

use thiserror::Error;

/// Unified error type for dashboard operations.
#[derive(Debug, Clone, Error)]
pub enum DashboardError {
    /// Results fetch or payload failure
    #[error(transparent)]
    Results(#[from] ResultsError),

    /// Status channel failure
    #[error(transparent)]
    Channel(#[from] ChannelError),

    /// Configuration could not be used
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DashboardError {
    /// Whether retrying the same operation later may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            DashboardError::Results(err) => err.is_retryable(),
            DashboardError::Channel(ChannelError::NotConnected) => true,
            DashboardError::Channel(_) => false,
            DashboardError::Config(_) => false,
        }
    }
}

/// Type alias for Results using [`DashboardError`].
pub type DashboardResult<T> = Result<T, DashboardError>;
