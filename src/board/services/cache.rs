//! Client-side cache of the board.
//!
//! One snapshot of lists and tasks shared between the ordering engine, the
//! list lifecycle manager and the sync coordinator. Reads are open to any
//! caller; writes are crate-private so every mutation goes through one of
//! those three components.

use chrono::NaiveDate;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;

use crate::board::domain::{BoardList, ListId, Task, TaskFilter, TaskId, next_order, visible_tasks};

/// Errors raised by cache access.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    /// A writer panicked while holding the cache lock.
    #[error("board cache lock poisoned: {0}")]
    Poisoned(String),
}

/// Point-in-time copy of the board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardSnapshot {
    /// Lists in board order.
    pub lists: Vec<BoardList>,
    /// Every task, in the order the store returned them.
    pub tasks: Vec<Task>,
}

impl BoardSnapshot {
    /// Returns the task with `id`, if cached.
    #[must_use]
    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    /// Returns the list with `id`, if cached.
    #[must_use]
    pub fn list(&self, id: &ListId) -> Option<&BoardList> {
        self.lists.iter().find(|list| list.id() == id)
    }

    pub(crate) fn task_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id() == id)
    }
}

/// Shared, thread-safe board cache.
#[derive(Debug, Clone, Default)]
pub struct BoardCache {
    inner: Arc<RwLock<BoardSnapshot>>,
}

impl BoardCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BoardSnapshot>, CacheError> {
        self.inner
            .read()
            .map_err(|err| CacheError::Poisoned(err.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BoardSnapshot>, CacheError> {
        self.inner
            .write()
            .map_err(|err| CacheError::Poisoned(err.to_string()))
    }

    /// Runs `read` against the current snapshot without copying it.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Poisoned`] when the lock is poisoned.
    pub fn with_snapshot<R>(&self, read: impl FnOnce(&BoardSnapshot) -> R) -> Result<R, CacheError> {
        let guard = self.read()?;
        Ok(read(&guard))
    }

    /// Returns a copy of the whole board.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Poisoned`] when the lock is poisoned.
    pub fn snapshot(&self) -> Result<BoardSnapshot, CacheError> {
        self.with_snapshot(BoardSnapshot::clone)
    }

    /// Returns a copy of every cached task.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Poisoned`] when the lock is poisoned.
    pub fn tasks(&self) -> Result<Vec<Task>, CacheError> {
        self.with_snapshot(|snapshot| snapshot.tasks.clone())
    }

    /// Returns a copy of the cached lists in board order.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Poisoned`] when the lock is poisoned.
    pub fn lists(&self) -> Result<Vec<BoardList>, CacheError> {
        self.with_snapshot(|snapshot| snapshot.lists.clone())
    }

    /// Returns a copy of the task with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Poisoned`] when the lock is poisoned.
    pub fn find_task(&self, id: &TaskId) -> Result<Option<Task>, CacheError> {
        self.with_snapshot(|snapshot| snapshot.task(id).cloned())
    }

    /// Returns the number of cached lists.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Poisoned`] when the lock is poisoned.
    pub fn list_count(&self) -> Result<usize, CacheError> {
        self.with_snapshot(|snapshot| snapshot.lists.len())
    }

    /// Returns copies of the tasks passing `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Poisoned`] when the lock is poisoned.
    pub fn visible_tasks(
        &self,
        filter: &TaskFilter,
        today: NaiveDate,
    ) -> Result<Vec<Task>, CacheError> {
        self.with_snapshot(|snapshot| {
            visible_tasks(&snapshot.tasks, filter, today)
                .into_iter()
                .cloned()
                .collect()
        })
    }

    pub(crate) fn update<R>(
        &self,
        change: impl FnOnce(&mut BoardSnapshot) -> R,
    ) -> Result<R, CacheError> {
        let mut guard = self.write()?;
        Ok(change(&mut guard))
    }

    pub(crate) fn replace(&self, lists: Vec<BoardList>, tasks: Vec<Task>) -> Result<(), CacheError> {
        self.update(|snapshot| *snapshot = BoardSnapshot { lists, tasks })
    }

    pub(crate) fn replace_tasks(&self, tasks: Vec<Task>) -> Result<(), CacheError> {
        self.update(|snapshot| snapshot.tasks = tasks)
    }

    /// Replaces the cached task with the same id, or appends it.
    pub(crate) fn upsert_task(&self, task: Task) -> Result<(), CacheError> {
        self.replace_task(&task.id().clone(), task)
    }

    /// Replaces the task cached under `previous` with `task`, which may carry
    /// a different id. Appends when `previous` is not cached.
    pub(crate) fn replace_task(&self, previous: &TaskId, task: Task) -> Result<(), CacheError> {
        self.update(|snapshot| match snapshot.task_mut(previous) {
            Some(slot) => *slot = task,
            None => snapshot.tasks.push(task),
        })
    }

    pub(crate) fn remove_task(&self, id: &TaskId) -> Result<Option<Task>, CacheError> {
        self.update(|snapshot| {
            let index = snapshot.tasks.iter().position(|task| task.id() == id)?;
            Some(snapshot.tasks.remove(index))
        })
    }

    pub(crate) fn upsert_list(&self, list: BoardList) -> Result<(), CacheError> {
        self.update(|snapshot| {
            match snapshot.lists.iter_mut().find(|cached| cached.id() == list.id()) {
                Some(slot) => *slot = list,
                None => snapshot.lists.push(list),
            }
        })
    }

    /// Removes a list and appends its tasks to the first remaining list.
    ///
    /// Returns the fallback list, or `None` when nothing was removed because
    /// the list is unknown or is the only one.
    pub(crate) fn remove_list_and_reassign(
        &self,
        id: &ListId,
    ) -> Result<Option<ListId>, CacheError> {
        self.update(|snapshot| {
            snapshot.list(id)?;
            let fallback = snapshot
                .lists
                .iter()
                .find(|list| list.id() != id)
                .map(|list| list.id().clone())?;
            snapshot.lists.retain(|list| list.id() != id);

            let mut next = next_order(&snapshot.tasks, &fallback);
            for task in snapshot.tasks.iter_mut().filter(|task| task.status() == id) {
                task.place(fallback.clone(), next);
                next = next.saturating_add(1);
            }
            Some(fallback)
        })
    }
}
