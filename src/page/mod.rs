//! Local page server.
//!
//! - [`html`] - the page shell
//! - [`server`] - axum routes for the shell, page updates and user actions

pub mod html;
pub mod server;

pub use html::PAGE_HTML;
pub use server::{router, start_page_server_on, PageServerState, SendRequest};
