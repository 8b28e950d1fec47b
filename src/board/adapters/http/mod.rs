//! HTTP adapter for the remote board store.
//!
//! Talks to the task REST API with `reqwest` and normalizes both response
//! envelope shapes at this boundary.

pub mod config;
mod envelope;
mod store;

pub use config::{ConfigError, HttpStoreConfig};
pub use store::HttpBoardStore;
