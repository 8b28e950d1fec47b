//! In-memory remote store for tests and local deterministic flows.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::board::{
    domain::{
        BoardList, Comment, CommentDraft, ListDraft, ListId, ListPatch, OrderAssignment,
        StatusChange, Task, TaskDraft, TaskId, TaskPatch, next_order,
    },
    ports::{BoardStore, BoardStoreError, BoardStoreResult},
};

/// Store operations, as recorded in the call log and targeted by failure
/// injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    /// `GET /tasks`
    FetchTasks,
    /// `POST /tasks`
    CreateTask,
    /// `PUT /tasks/:id`
    UpdateTask,
    /// `DELETE /tasks/:id`
    DeleteTask,
    /// `PATCH /tasks/:id/status`
    UpdateTaskStatus,
    /// `PATCH /tasks/reorder`
    ReorderTasks,
    /// `POST /tasks/:id/comments`
    AddComment,
    /// `GET /tasks/lists`
    FetchLists,
    /// `POST /tasks/lists`
    CreateList,
    /// `PUT /tasks/lists/:id`
    UpdateList,
    /// `DELETE /tasks/lists/:id`
    DeleteList,
}

/// Thread-safe in-memory board store.
///
/// Behaves as the authoritative server: it assigns identifiers, applies
/// placements and reassigns orphaned tasks when a list is deleted. Failures
/// can be injected per operation, and every call is logged so tests can
/// assert which requests were made.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBoardStore {
    state: Arc<RwLock<InMemoryBoardState>>,
}

#[derive(Debug, Default)]
struct InMemoryBoardState {
    lists: Vec<BoardList>,
    tasks: Vec<Task>,
    next_id: u64,
    failing: HashSet<StoreOperation>,
    calls: Vec<StoreOperation>,
}

impl InMemoryBoardState {
    fn mint(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn record(&mut self, operation: StoreOperation) -> BoardStoreResult<()> {
        self.calls.push(operation);
        if self.failing.contains(&operation) {
            return Err(BoardStoreError::Rejected {
                status: 503,
                message: format!("injected failure for {operation:?}"),
            });
        }
        Ok(())
    }

    fn task_mut(&mut self, id: &TaskId) -> BoardStoreResult<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|task| task.id() == id)
            .ok_or_else(|| BoardStoreError::NotFound(id.to_string()))
    }

    fn has_list(&self, id: &ListId) -> bool {
        self.lists.iter().any(|list| list.id() == id)
    }
}

fn poisoned(err: impl ToString) -> BoardStoreError {
    BoardStoreError::transport(std::io::Error::other(err.to_string()))
}

impl InMemoryBoardStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> BoardStoreResult<RwLockReadGuard<'_, InMemoryBoardState>> {
        self.state.read().map_err(poisoned)
    }

    fn write(&self) -> BoardStoreResult<RwLockWriteGuard<'_, InMemoryBoardState>> {
        self.state.write().map_err(poisoned)
    }

    /// Adds a list directly, bypassing the call log.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn seed_list(&self, draft: &ListDraft) -> BoardStoreResult<BoardList> {
        let mut state = self.write()?;
        let id = ListId::new(state.mint("list"))
            .map_err(|err| BoardStoreError::Decode(err.to_string()))?;
        let list = BoardList::from_draft(id, draft);
        state.lists.push(list.clone());
        Ok(list)
    }

    /// Adds a task at the end of its list, bypassing the call log.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn seed_task(&self, draft: &TaskDraft) -> BoardStoreResult<Task> {
        let mut state = self.write()?;
        insert_task(&mut state, draft)
    }

    /// Adds a fully specified task, bypassing the call log and any ordering
    /// rules. Useful for reproducing legacy data.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn seed_raw_task(&self, task: Task) -> BoardStoreResult<()> {
        self.write()?.tasks.push(task);
        Ok(())
    }

    /// Makes every subsequent call of `operation` fail until cleared.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn fail(&self, operation: StoreOperation) -> BoardStoreResult<()> {
        self.write()?.failing.insert(operation);
        Ok(())
    }

    /// Clears all injected failures.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn clear_failures(&self) -> BoardStoreResult<()> {
        self.write()?.failing.clear();
        Ok(())
    }

    /// Returns every operation called so far, in call order.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn calls(&self) -> BoardStoreResult<Vec<StoreOperation>> {
        Ok(self.read()?.calls.clone())
    }

    /// Returns the authoritative task set.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn tasks(&self) -> BoardStoreResult<Vec<Task>> {
        Ok(self.read()?.tasks.clone())
    }

    /// Returns the authoritative list sequence.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn lists(&self) -> BoardStoreResult<Vec<BoardList>> {
        Ok(self.read()?.lists.clone())
    }
}

fn insert_task(state: &mut InMemoryBoardState, draft: &TaskDraft) -> BoardStoreResult<Task> {
    if !state.has_list(draft.status()) {
        return Err(BoardStoreError::NotFound(draft.status().to_string()));
    }
    let id = TaskId::new(state.mint("task"))
        .map_err(|err| BoardStoreError::Decode(err.to_string()))?;
    let order = next_order(&state.tasks, draft.status());
    let task = Task::from_draft(id, draft, order);
    state.tasks.push(task.clone());
    Ok(task)
}

#[async_trait]
impl BoardStore for InMemoryBoardStore {
    async fn fetch_tasks(&self) -> BoardStoreResult<Vec<Task>> {
        let mut state = self.write()?;
        state.record(StoreOperation::FetchTasks)?;
        Ok(state.tasks.clone())
    }

    async fn create_task(&self, draft: &TaskDraft) -> BoardStoreResult<Task> {
        let mut state = self.write()?;
        state.record(StoreOperation::CreateTask)?;
        insert_task(&mut state, draft)
    }

    async fn update_task(&self, id: &TaskId, patch: &TaskPatch) -> BoardStoreResult<Task> {
        let mut state = self.write()?;
        state.record(StoreOperation::UpdateTask)?;
        let task = state.task_mut(id)?;
        task.apply_patch(patch);
        Ok(task.clone())
    }

    async fn delete_task(&self, id: &TaskId) -> BoardStoreResult<()> {
        let mut state = self.write()?;
        state.record(StoreOperation::DeleteTask)?;
        let before = state.tasks.len();
        state.tasks.retain(|task| task.id() != id);
        if state.tasks.len() == before {
            return Err(BoardStoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn update_task_status(
        &self,
        id: &TaskId,
        change: &StatusChange,
    ) -> BoardStoreResult<Task> {
        let mut state = self.write()?;
        state.record(StoreOperation::UpdateTaskStatus)?;
        if !state.has_list(&change.status) {
            return Err(BoardStoreError::NotFound(change.status.to_string()));
        }
        let task = state.task_mut(id)?;
        task.place(change.status.clone(), change.order);
        Ok(task.clone())
    }

    async fn reorder_tasks(&self, assignments: &[OrderAssignment]) -> BoardStoreResult<()> {
        let mut state = self.write()?;
        state.record(StoreOperation::ReorderTasks)?;
        for assignment in assignments {
            if let Ok(task) = state.task_mut(&assignment.id) {
                task.place(assignment.status.clone(), assignment.order);
            }
        }
        Ok(())
    }

    async fn add_comment(&self, id: &TaskId, comment: &CommentDraft) -> BoardStoreResult<Task> {
        let mut state = self.write()?;
        state.record(StoreOperation::AddComment)?;
        let task = state.task_mut(id)?;
        task.push_comment(Comment::from_draft(comment, Utc::now()));
        Ok(task.clone())
    }

    async fn fetch_lists(&self) -> BoardStoreResult<Vec<BoardList>> {
        let mut state = self.write()?;
        state.record(StoreOperation::FetchLists)?;
        Ok(state.lists.clone())
    }

    async fn create_list(&self, draft: &ListDraft) -> BoardStoreResult<BoardList> {
        let mut state = self.write()?;
        state.record(StoreOperation::CreateList)?;
        let id = ListId::new(state.mint("list"))
            .map_err(|err| BoardStoreError::Decode(err.to_string()))?;
        let list = BoardList::from_draft(id, draft);
        state.lists.push(list.clone());
        Ok(list)
    }

    async fn update_list(&self, id: &ListId, patch: &ListPatch) -> BoardStoreResult<BoardList> {
        let mut state = self.write()?;
        state.record(StoreOperation::UpdateList)?;
        let list = state
            .lists
            .iter_mut()
            .find(|list| list.id() == id)
            .ok_or_else(|| BoardStoreError::NotFound(id.to_string()))?;
        list.apply_patch(patch);
        Ok(list.clone())
    }

    async fn delete_list(&self, id: &ListId) -> BoardStoreResult<()> {
        let mut state = self.write()?;
        state.record(StoreOperation::DeleteList)?;
        if !state.has_list(id) {
            return Err(BoardStoreError::NotFound(id.to_string()));
        }
        let Some(fallback) = state
            .lists
            .iter()
            .find(|list| list.id() != id)
            .map(|list| list.id().clone())
        else {
            return Err(BoardStoreError::Rejected {
                status: 409,
                message: "cannot delete the last list".to_owned(),
            });
        };
        state.lists.retain(|list| list.id() != id);

        let mut next = next_order(&state.tasks, &fallback);
        for task in state.tasks.iter_mut().filter(|task| task.status() == id) {
            task.place(fallback.clone(), next);
            next = next.saturating_add(1);
        }
        Ok(())
    }
}
