//! Status channel: lifecycle state, status display and the client.

pub mod client;
pub mod state;
pub mod status;

pub use client::{ChannelClient, ChannelConfig, DEFAULT_CHANNEL_PATH};
pub use state::{ChannelState, Transition, BROKEN_CLOSE_LINE, CLEAN_CLOSE_LINE, OPENED_LINE};
pub use status::{StatusDisplay, StatusMessage};
