//! Page surface trait abstraction.
//!
//! Both update loops render into element slots addressed by id. The surface
//! owns the elements; the loops only ever replace an element's whole content
//! or scroll it.

/// Element ids the page shell provides.
pub mod element_ids {
    /// Container for the results table
    pub const RESULTS: &str = "myResults";
    /// Status line display
    pub const STATUS: &str = "subscribe";
    /// Outbound message input
    pub const MESSAGE_INPUT: &str = "message";
    /// Outbound message submit control
    pub const SUBMIT: &str = "submit";
    /// Sign-out control
    pub const SIGNOUT: &str = "signout";
}

/// A render target for page fragments.
pub trait PageSurface: Send + Sync {
    /// Replace the entire content of `element_id` with `html`.
    fn replace_content(&self, element_id: &str, html: String);

    /// Scroll `element_id` so that `offset` lines are above the viewport.
    fn scroll_to(&self, element_id: &str, offset: usize);
}
