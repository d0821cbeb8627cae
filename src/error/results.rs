//! Results fetch and payload errors.

use thiserror::Error;

use crate::traits::HttpError;

/// Errors raised by one poll cycle.
///
/// None of these stop the poller: each one is logged, the "No Results"
/// fallback is rendered and the next poll is scheduled.
#[derive(Debug, Clone, Error)]
pub enum ResultsError {
    /// The request never produced a response
    #[error("Failed to fetch results: {0}")]
    Fetch(#[from] HttpError),

    /// The backend answered with a non-2xx status
    #[error("Results endpoint returned HTTP {status}")]
    HttpStatus { status: u16 },

    /// The body was not a JSON array of objects
    #[error("Invalid results payload: {0}")]
    InvalidPayload(String),
}

impl ResultsError {
    /// Whether a later poll may succeed without user action.
    pub fn is_retryable(&self) -> bool {
        match self {
            ResultsError::Fetch(HttpError::InvalidUrl(_)) => false,
            ResultsError::Fetch(_) => true,
            ResultsError::HttpStatus { status } => *status >= 500 || *status == 429,
            ResultsError::InvalidPayload(_) => true,
        }
    }
}
