//! Port contracts for board ordering and synchronization.
//!
//! Ports define infrastructure-agnostic interfaces used by board services.

pub mod gesture;
pub mod store;

pub use gesture::{DragEvent, DragEventHandler};
pub use store::{BoardStore, BoardStoreError, BoardStoreResult};

#[cfg(test)]
pub use store::MockBoardStore;
