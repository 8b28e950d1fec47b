//! Sync coordinator: optimistic apply, remote call, merge or recover.
//!
//! Every mutation is applied to the cache first. A successful remote call
//! merges the canonical response back by id; a failed one triggers a full
//! reload so the cache converges to what the store holds.

use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::cache::{BoardCache, CacheError};
use crate::board::{
    domain::{
        BoardDomainError, BoardList, Comment, CommentDraft, CommitPlan, ListDraft, ListId,
        ListPatch, OrderAssignment, Task, TaskDraft, TaskId, TaskPatch, next_order,
    },
    ports::{BoardStore, BoardStoreError},
};

/// Errors raised by the sync coordinator.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Input validation failed.
    #[error(transparent)]
    Domain(#[from] BoardDomainError),

    /// The cache could not be accessed.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The task is not in the cache.
    #[error("task {0} is not on the board")]
    TaskNotFound(TaskId),

    /// The list is not in the cache.
    #[error("list {0} is not on the board")]
    ListNotFound(ListId),

    /// The remote store call failed.
    #[error("{operation} failed remotely (board reloaded: {resynchronized}): {source}")]
    Remote {
        /// Operation that failed.
        operation: &'static str,
        /// Store error.
        #[source]
        source: BoardStoreError,
        /// Whether the recovery reload succeeded.
        resynchronized: bool,
    },

    /// Background persistence was requested outside a Tokio runtime.
    #[error("no Tokio runtime to persist the commit on: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),

    /// A background persistence task panicked or was cancelled.
    #[error("background sync task failed: {0}")]
    Background(#[from] tokio::task::JoinError),
}

/// Result type for sync coordinator operations.
pub type SyncResult<T> = Result<T, SyncError>;

fn stale_task(id: &TaskId) -> SyncError {
    warn!(task_id = %id, "task is not cached; nothing changed");
    SyncError::TaskNotFound(id.clone())
}

fn stale_list(id: &ListId) -> SyncError {
    warn!(list_id = %id, "list is not cached; nothing changed");
    SyncError::ListNotFound(id.clone())
}

/// Coordinates optimistic cache updates with the remote store.
pub struct SyncCoordinator<S, C>
where
    S: BoardStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    cache: BoardCache,
    clock: Arc<C>,
}

impl<S, C> Clone for SyncCoordinator<S, C>
where
    S: BoardStore,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cache: self.cache.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S, C> SyncCoordinator<S, C>
where
    S: BoardStore,
    C: Clock + Send + Sync,
{
    /// Creates a coordinator writing into `cache`.
    #[must_use]
    pub const fn new(store: Arc<S>, cache: BoardCache, clock: Arc<C>) -> Self {
        Self {
            store,
            cache,
            clock,
        }
    }

    /// Returns the cache this coordinator writes into.
    #[must_use]
    pub const fn cache(&self) -> &BoardCache {
        &self.cache
    }

    /// Replaces the cache with the store's lists and tasks.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Remote`] when either fetch fails; the cache is
    /// left untouched in that case.
    pub async fn reload(&self) -> SyncResult<()> {
        let (lists, tasks) = tokio::try_join!(self.store.fetch_lists(), self.store.fetch_tasks())
            .map_err(|source| SyncError::Remote {
                operation: "reload",
                source,
                resynchronized: false,
            })?;
        info!(lists = lists.len(), tasks = tasks.len(), "board reloaded");
        self.cache.replace(lists, tasks)?;
        Ok(())
    }

    /// Replaces the cached tasks with the store's tasks.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Remote`] when the fetch fails.
    pub async fn reload_tasks(&self) -> SyncResult<()> {
        let tasks = self
            .store
            .fetch_tasks()
            .await
            .map_err(|source| SyncError::Remote {
                operation: "reload tasks",
                source,
                resynchronized: false,
            })?;
        self.cache.replace_tasks(tasks)?;
        Ok(())
    }

    async fn recover(&self, operation: &'static str, source: BoardStoreError) -> SyncError {
        error!(operation, error = %source, "remote store call failed; reloading board");
        let resynchronized = match self.reload().await {
            Ok(()) => true,
            Err(err) => {
                error!(operation, error = %err, "recovery reload failed");
                false
            }
        };
        SyncError::Remote {
            operation,
            source,
            resynchronized,
        }
    }

    /// Persists a drag commit already applied to the cache.
    ///
    /// A reorder is sent as one batch. A move sends the moved task's status
    /// change, then any follow-up placements as a batch.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Remote`] after reloading the board when a call
    /// fails.
    pub async fn persist_commit(&self, plan: &CommitPlan) -> SyncResult<()> {
        match plan {
            CommitPlan::Reorder { assignments, .. } => {
                if let Err(err) = self.store.reorder_tasks(assignments).await {
                    return Err(self.recover("reorder tasks", err).await);
                }
            }
            CommitPlan::Move { moved, normalized } => {
                let canonical = match self
                    .store
                    .update_task_status(&moved.id, &moved.status_change())
                    .await
                {
                    Ok(task) => task,
                    Err(err) => return Err(self.recover("update task status", err).await),
                };
                self.merge_status_reply(moved, canonical)?;
                if !normalized.is_empty() {
                    if let Err(err) = self.store.reorder_tasks(normalized).await {
                        return Err(self.recover("reorder tasks", err).await);
                    }
                }
            }
        }
        Ok(())
    }

    /// Merges the canonical task returned for a status change, unless a
    /// newer drag has already moved the cached task elsewhere.
    fn merge_status_reply(&self, sent: &OrderAssignment, canonical: Task) -> SyncResult<()> {
        let merged = self.cache.update(|snapshot| {
            let Some(cached) = snapshot.task_mut(&sent.id) else {
                return false;
            };
            if cached.status() != &sent.status || cached.order() != sent.order {
                return false;
            }
            *cached = canonical;
            true
        })?;
        if !merged {
            debug!(task_id = %sent.id, "cached task moved again; status reply not merged");
        }
        Ok(())
    }

    /// Creates a task, showing it immediately under a temporary local id.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::ListNotFound`] when the draft's list is not
    /// cached, or [`SyncError::Remote`] after a failed call.
    pub async fn create_task(&self, draft: &TaskDraft) -> SyncResult<Task> {
        let local_id = TaskId::local();
        let placed = self.cache.update(|snapshot| {
            if snapshot.list(draft.status()).is_none() {
                return false;
            }
            let order = next_order(&snapshot.tasks, draft.status());
            snapshot
                .tasks
                .push(Task::from_draft(local_id.clone(), draft, order));
            true
        })?;
        if !placed {
            return Err(stale_list(draft.status()));
        }

        match self.store.create_task(draft).await {
            Ok(task) => {
                self.cache.replace_task(&local_id, task.clone())?;
                Ok(task)
            }
            Err(err) => Err(self.recover("create task", err).await),
        }
    }

    /// Edits a task's descriptive fields.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::TaskNotFound`] for uncached tasks, or
    /// [`SyncError::Remote`] after a failed call.
    pub async fn update_task(&self, id: &TaskId, patch: &TaskPatch) -> SyncResult<Task> {
        let found = self.cache.update(|snapshot| {
            let Some(task) = snapshot.task_mut(id) else {
                return false;
            };
            task.apply_patch(patch);
            true
        })?;
        if !found {
            return Err(stale_task(id));
        }

        match self.store.update_task(id, patch).await {
            Ok(task) => {
                self.cache.upsert_task(task.clone())?;
                Ok(task)
            }
            Err(err) => Err(self.recover("update task", err).await),
        }
    }

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::TaskNotFound`] for uncached tasks, or
    /// [`SyncError::Remote`] after a failed call.
    pub async fn delete_task(&self, id: &TaskId) -> SyncResult<()> {
        if self.cache.remove_task(id)?.is_none() {
            return Err(stale_task(id));
        }
        match self.store.delete_task(id).await {
            Ok(()) => Ok(()),
            Err(err) => Err(self.recover("delete task", err).await),
        }
    }

    /// Appends a comment, timestamped locally until the store answers.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::TaskNotFound`] for uncached tasks, or
    /// [`SyncError::Remote`] after a failed call.
    pub async fn add_comment(&self, id: &TaskId, draft: &CommentDraft) -> SyncResult<Task> {
        let comment = Comment::from_draft(draft, self.clock.utc());
        let found = self.cache.update(|snapshot| {
            let Some(task) = snapshot.task_mut(id) else {
                return false;
            };
            task.push_comment(comment);
            true
        })?;
        if !found {
            return Err(stale_task(id));
        }

        match self.store.add_comment(id, draft).await {
            Ok(task) => {
                self.cache.upsert_task(task.clone())?;
                Ok(task)
            }
            Err(err) => Err(self.recover("add comment", err).await),
        }
    }

    /// Creates a list and appends it once the store has assigned its id.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Remote`] after a failed call.
    pub async fn create_list(&self, draft: &ListDraft) -> SyncResult<BoardList> {
        match self.store.create_list(draft).await {
            Ok(list) => {
                self.cache.upsert_list(list.clone())?;
                Ok(list)
            }
            Err(err) => Err(self.recover("create list", err).await),
        }
    }

    /// Edits a list.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::ListNotFound`] for uncached lists, or
    /// [`SyncError::Remote`] after a failed call.
    pub async fn update_list(&self, id: &ListId, patch: &ListPatch) -> SyncResult<BoardList> {
        let found = self.cache.update(|snapshot| {
            let Some(list) = snapshot.lists.iter_mut().find(|list| list.id() == id) else {
                return false;
            };
            list.apply_patch(patch);
            true
        })?;
        if !found {
            return Err(stale_list(id));
        }

        match self.store.update_list(id, patch).await {
            Ok(list) => {
                self.cache.upsert_list(list.clone())?;
                Ok(list)
            }
            Err(err) => Err(self.recover("update list", err).await),
        }
    }

    /// Deletes a list, reassigning its tasks locally, then refetches tasks
    /// to adopt the store's reassignment.
    ///
    /// Callers enforce the minimum-list rule before calling this.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::ListNotFound`] when the list is unknown or is the
    /// only cached list, or [`SyncError::Remote`] after a failed call.
    pub async fn delete_list(&self, id: &ListId) -> SyncResult<()> {
        let Some(fallback) = self.cache.remove_list_and_reassign(id)? else {
            return Err(stale_list(id));
        };
        info!(list_id = %id, fallback = %fallback, "list removed locally");

        if let Err(err) = self.store.delete_list(id).await {
            return Err(self.recover("delete list", err).await);
        }
        if let Err(err) = self.reload_tasks().await {
            warn!(list_id = %id, error = %err, "task refetch after list delete failed");
            return match err {
                SyncError::Remote { source, .. } => Err(self.recover("delete list", source).await),
                other => Err(other),
            };
        }
        Ok(())
    }
}
