//! Remote store port for tasks and lists.
//!
//! The remote store is authoritative. The engine mirrors it in a local cache
//! and only relies on the contract below; orphan reassignment on list
//! deletion is the store's responsibility.

use crate::board::domain::{
    BoardList, CommentDraft, ListDraft, ListId, ListPatch, OrderAssignment, StatusChange, Task,
    TaskDraft, TaskId, TaskPatch,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for remote store operations.
pub type BoardStoreResult<T> = Result<T, BoardStoreError>;

/// Remote task and list store contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BoardStore: Send + Sync {
    /// Returns every task on the board.
    async fn fetch_tasks(&self) -> BoardStoreResult<Vec<Task>>;

    /// Creates a task and returns its canonical form.
    async fn create_task(&self, draft: &TaskDraft) -> BoardStoreResult<Task>;

    /// Edits a task's descriptive fields and returns its canonical form.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::NotFound`] when the task does not exist.
    async fn update_task(&self, id: &TaskId, patch: &TaskPatch) -> BoardStoreResult<Task>;

    /// Deletes a task.
    async fn delete_task(&self, id: &TaskId) -> BoardStoreResult<()>;

    /// Moves a task to a list position and returns its canonical form.
    async fn update_task_status(
        &self,
        id: &TaskId,
        change: &StatusChange,
    ) -> BoardStoreResult<Task>;

    /// Applies a batch of placements.
    async fn reorder_tasks(&self, assignments: &[OrderAssignment]) -> BoardStoreResult<()>;

    /// Appends a comment and returns the updated task.
    async fn add_comment(&self, id: &TaskId, comment: &CommentDraft) -> BoardStoreResult<Task>;

    /// Returns every list in board order.
    async fn fetch_lists(&self) -> BoardStoreResult<Vec<BoardList>>;

    /// Creates a list and returns it with its assigned identifier.
    async fn create_list(&self, draft: &ListDraft) -> BoardStoreResult<BoardList>;

    /// Edits a list and returns its canonical form.
    async fn update_list(&self, id: &ListId, patch: &ListPatch) -> BoardStoreResult<BoardList>;

    /// Deletes a list, reassigning its tasks to the first remaining list.
    async fn delete_list(&self, id: &ListId) -> BoardStoreResult<()>;
}

/// Errors returned by remote store implementations.
#[derive(Debug, Clone, Error)]
pub enum BoardStoreError {
    /// The addressed resource does not exist remotely.
    #[error("remote resource not found: {0}")]
    NotFound(String),

    /// The store answered with a failure status.
    #[error("remote store rejected the request with status {status}: {message}")]
    Rejected {
        /// Status code reported by the store.
        status: u16,
        /// Message reported by the store.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("could not decode remote response: {0}")]
    Decode(String),

    /// The request could not be delivered.
    #[error("remote transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl BoardStoreError {
    /// Wraps a transport-layer error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
