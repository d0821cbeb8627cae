//! Results polling and the dynamic-schema table.
//!
//! - [`row`] - result rows and payload decoding
//! - [`schema`] - column inference
//! - [`html`] - escaping and replay link builders
//! - [`table`] - table construction and rendering
//! - [`poller`] - the sequential fetch-render-wait loop

pub mod html;
pub mod poller;
pub mod row;
pub mod schema;
pub mod table;

pub use poller::{PollOutcome, Poller, PollerConfig, PollerHandle};
pub use row::{ResultRow, ResultsCollection};
pub use schema::Schema;
pub use table::{render_results, Cell, ResultsTable, ResultsView, TableOptions};
