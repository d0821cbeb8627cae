//! Mock implementations for testing.
//!
//! This module provides mock implementations of the trait abstractions,
//! enabling unit testing without a running backend.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client with configurable responses
//! - [`MockTransport`] - Status channel transport with event injection

pub mod http;
pub mod transport;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
pub use transport::{MockLinkHandle, MockTransport};
