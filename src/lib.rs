//! Dashboard backend for exploring FBI crime statistics.
//!
//! The crate exposes a retrying client for the upstream statistics API with a
//! mock-data fallback, a pure statistics calculator, a connection-test suite
//! probing every external dependency, and an Axum layer serving the results
//! as JSON for the dashboard UI.

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod probes;
pub mod stats;
