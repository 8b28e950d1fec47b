//! In-memory adapter implementations for testing.
//!
//! The in-memory store stands in for the remote server without any network
//! dependency.

mod store;

pub use store::{InMemoryBoardStore, StoreOperation};
