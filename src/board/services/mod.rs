//! Application services for board ordering and synchronization.

mod board;
mod cache;
mod lists;
mod ordering;
mod sync;

pub use board::{Board, BoardColumn, PendingSync};
pub use cache::{BoardCache, BoardSnapshot, CacheError};
pub use lists::{ListLifecycleError, ListLifecycleResult, ListLifecycleService};
pub use ordering::{DragSession, DragState, OrderingEngine};
pub use sync::{SyncCoordinator, SyncError, SyncResult};
