//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`TungsteniteTransport`] - status channel socket using tokio-tungstenite
//! - [`MemoryPage`] - in-process page model served to the browser
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockHttpClient`] - Configurable HTTP responses
//! - [`mock::MockTransport`] - Event injection and outbound capture

pub mod memory_page;
pub mod mock;
pub mod reqwest_http;
pub mod tungstenite_transport;

pub use memory_page::{ElementState, MemoryPage, PageUpdate};
pub use mock::{MockHttpClient, MockTransport};
pub use reqwest_http::ReqwestHttpClient;
pub use tungstenite_transport::TungsteniteTransport;
