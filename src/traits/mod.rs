//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP client operations (GET, POST)
//! - [`ChannelTransport`] - status channel socket construction
//! - [`PageSurface`] - render target for page fragments

pub mod http;
pub mod page;
pub mod transport;

pub use http::{Headers, HttpClient, HttpError, Response};
pub use page::{element_ids, PageSurface};
pub use transport::{ChannelTransport, TransportError, TransportEvent, TransportLink};
