//! Arena dashboard - live results table and game-status channel for the
//! arena proxy.
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod channel;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod page;
pub mod results;
pub mod traits;
