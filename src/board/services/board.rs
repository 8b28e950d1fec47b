//! Board facade wiring the cache, ordering engine, sync coordinator and list
//! lifecycle service together.

use mockable::Clock;
use std::sync::Arc;
use tokio::{runtime::Handle, task::JoinHandle};

use super::{
    cache::{BoardCache, CacheError},
    lists::{ListLifecycleResult, ListLifecycleService},
    ordering::{DragState, OrderingEngine},
    sync::{SyncCoordinator, SyncError, SyncResult},
};
use crate::board::{
    domain::{
        BoardList, CommentDraft, CommitPlan, ListId, ListPatch, Task, TaskDraft, TaskFilter,
        TaskId, TaskPatch, group_by_column,
    },
    ports::{BoardStore, DragEvent, DragEventHandler},
};

/// A list with its visible tasks in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardColumn {
    /// The list.
    pub list: BoardList,
    /// Tasks passing the filter, ordered by `order` then id.
    pub tasks: Vec<Task>,
}

/// Persistence of a committed drag running in the background.
#[derive(Debug)]
pub struct PendingSync {
    plan: CommitPlan,
    handle: JoinHandle<SyncResult<()>>,
}

impl PendingSync {
    /// Returns the commit being persisted.
    #[must_use]
    pub const fn plan(&self) -> &CommitPlan {
        &self.plan
    }

    /// Waits for persistence to finish.
    ///
    /// # Errors
    ///
    /// Returns the persistence error, or [`SyncError::Background`]
    /// when the task did not run to completion.
    pub async fn wait(self) -> SyncResult<()> {
        self.handle.await?
    }
}

/// A kanban board kept in sync with a remote store.
pub struct Board<S, C>
where
    S: BoardStore,
    C: Clock + Send + Sync,
{
    engine: OrderingEngine,
    sync: SyncCoordinator<S, C>,
    lists: ListLifecycleService<S, C>,
    clock: Arc<C>,
}

impl<S, C> Board<S, C>
where
    S: BoardStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates an empty board backed by `store`. Call [`Self::load`] to
    /// populate it.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        let cache = BoardCache::new();
        let sync = SyncCoordinator::new(store, cache.clone(), Arc::clone(&clock));
        Self {
            engine: OrderingEngine::new(cache),
            lists: ListLifecycleService::new(sync.clone()),
            sync,
            clock,
        }
    }

    /// Fetches lists and tasks, replacing the cache.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Remote`] when a fetch fails.
    pub async fn load(&self) -> SyncResult<()> {
        self.sync.reload().await
    }

    /// Returns the board cache.
    #[must_use]
    pub const fn cache(&self) -> &BoardCache {
        self.sync.cache()
    }

    /// Returns the sync coordinator.
    #[must_use]
    pub const fn sync(&self) -> &SyncCoordinator<S, C> {
        &self.sync
    }

    /// Returns the current drag state.
    #[must_use]
    pub const fn drag_state(&self) -> &DragState {
        self.engine.state()
    }

    /// Starts dragging a task.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the cache lock is poisoned.
    pub fn drag_start(&mut self, task_id: &str) -> Result<(), CacheError> {
        self.engine.drag_start(task_id)
    }

    /// Reports the element under the dragged task.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the cache lock is poisoned.
    pub fn drag_over(&mut self, active: &str, over: &str) -> Result<(), CacheError> {
        self.engine.drag_over(active, over)
    }

    /// Drops the dragged task. The cache is updated before this returns;
    /// persistence runs on a task spawned onto the current Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::NoRuntime`] without touching the drag when no
    /// runtime is available, or [`SyncError::Cache`] when the cache lock is
    /// poisoned.
    pub fn drag_end(
        &mut self,
        active: &str,
        over: Option<&str>,
    ) -> SyncResult<Option<PendingSync>> {
        let runtime = Handle::try_current()?;
        let Some(plan) = self.engine.drag_end(active, over)? else {
            return Ok(None);
        };
        let sync = self.sync.clone();
        let persisted = plan.clone();
        let handle = runtime.spawn(async move { sync.persist_commit(&persisted).await });
        Ok(Some(PendingSync { plan, handle }))
    }

    /// Drops the dragged task and waits for persistence.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] when the cache is poisoned or
    /// persistence fails; the board has been reloaded in the latter case.
    pub async fn drag_end_and_sync(
        &mut self,
        active: &str,
        over: Option<&str>,
    ) -> SyncResult<Option<CommitPlan>> {
        let Some(plan) = self.engine.drag_end(active, over)? else {
            return Ok(None);
        };
        self.sync.persist_commit(&plan).await?;
        Ok(Some(plan))
    }

    /// Returns the tasks passing `filter`, using the clock for today's date.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the cache lock is poisoned.
    pub fn visible_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, CacheError> {
        self.cache().visible_tasks(filter, self.clock.utc().date_naive())
    }

    /// Returns every list with its tasks passing `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the cache lock is poisoned.
    pub fn columns(&self, filter: &TaskFilter) -> Result<Vec<BoardColumn>, CacheError> {
        let today = self.clock.utc().date_naive();
        self.cache().with_snapshot(|snapshot| {
            group_by_column(&snapshot.lists, &snapshot.tasks, filter, today)
                .into_iter()
                .map(|column| BoardColumn {
                    list: column.list.clone(),
                    tasks: column.tasks.into_iter().cloned().collect(),
                })
                .collect()
        })
    }

    /// Creates a task at the end of its list.
    ///
    /// # Errors
    ///
    /// See [`SyncCoordinator::create_task`].
    pub async fn create_task(&self, draft: &TaskDraft) -> SyncResult<Task> {
        self.sync.create_task(draft).await
    }

    /// Edits a task.
    ///
    /// # Errors
    ///
    /// See [`SyncCoordinator::update_task`].
    pub async fn update_task(&self, id: &TaskId, patch: &TaskPatch) -> SyncResult<Task> {
        self.sync.update_task(id, patch).await
    }

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// See [`SyncCoordinator::delete_task`].
    pub async fn delete_task(&self, id: &TaskId) -> SyncResult<()> {
        self.sync.delete_task(id).await
    }

    /// Comments on a task.
    ///
    /// # Errors
    ///
    /// See [`SyncCoordinator::add_comment`].
    pub async fn add_comment(&self, id: &TaskId, draft: &CommentDraft) -> SyncResult<Task> {
        self.sync.add_comment(id, draft).await
    }

    /// Creates a list.
    ///
    /// # Errors
    ///
    /// See [`ListLifecycleService::create_list`].
    pub async fn create_list(&self, name: &str) -> ListLifecycleResult<BoardList> {
        self.lists.create_list(name).await
    }

    /// Edits a list.
    ///
    /// # Errors
    ///
    /// See [`ListLifecycleService::update_list`].
    pub async fn update_list(
        &self,
        id: &ListId,
        patch: &ListPatch,
    ) -> ListLifecycleResult<BoardList> {
        self.lists.update_list(id, patch).await
    }

    /// Deletes a list.
    ///
    /// # Errors
    ///
    /// See [`ListLifecycleService::delete_list`].
    pub async fn delete_list(&self, id: &ListId) -> ListLifecycleResult<()> {
        self.lists.delete_list(id).await
    }
}

impl<S, C> DragEventHandler for Board<S, C>
where
    S: BoardStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    type Commit = PendingSync;
    type Error = SyncError;

    fn on_drag_start(&mut self, event: &DragEvent) -> Result<(), Self::Error> {
        Ok(self.drag_start(event.active())?)
    }

    fn on_drag_over(&mut self, event: &DragEvent) -> Result<(), Self::Error> {
        match event.over_id() {
            Some(over) => Ok(self.drag_over(event.active(), over)?),
            None => Ok(()),
        }
    }

    fn on_drag_end(&mut self, event: &DragEvent) -> Result<Option<Self::Commit>, Self::Error> {
        self.drag_end(event.active(), event.over_id())
    }
}
