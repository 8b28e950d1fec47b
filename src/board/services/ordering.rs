//! Drag state machine.
//!
//! Turns gesture events into speculative hover moves and, on drop, into a
//! [`CommitPlan`] applied optimistically to the cache. Persisting the plan is
//! the sync coordinator's job.

use tracing::{debug, info, warn};

use super::cache::{BoardCache, BoardSnapshot, CacheError};
use crate::board::{
    domain::{
        CommitPlan, ListId, StatusChange, TaskId, apply_assignments, plan_commit,
        resolve_drop_target,
    },
    ports::{DragEvent, DragEventHandler},
};

/// Where the dragged task sat when the drag started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    task_id: TaskId,
    origin_status: ListId,
    origin_order: u32,
}

impl DragSession {
    /// Returns the dragged task.
    #[must_use]
    pub const fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    /// Returns the list the task occupied at drag start.
    #[must_use]
    pub const fn origin_status(&self) -> &ListId {
        &self.origin_status
    }

    /// Returns the order the task had at drag start.
    #[must_use]
    pub const fn origin_order(&self) -> u32 {
        self.origin_order
    }
}

/// Drag state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    /// No drag in progress.
    #[default]
    Idle,
    /// A task is being dragged.
    Dragging(DragSession),
}

/// Ordering engine driving drag gestures against the board cache.
#[derive(Debug, Clone)]
pub struct OrderingEngine {
    cache: BoardCache,
    state: DragState,
}

impl OrderingEngine {
    /// Creates an idle engine over `cache`.
    #[must_use]
    pub fn new(cache: BoardCache) -> Self {
        Self {
            cache,
            state: DragState::Idle,
        }
    }

    /// Returns the current drag state.
    #[must_use]
    pub const fn state(&self) -> &DragState {
        &self.state
    }

    /// Returns `true` while a task is being dragged.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Starts dragging `task_id`. Unknown tasks leave the engine idle.
    ///
    /// A drag still in progress is aborted first.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the cache lock is poisoned.
    pub fn drag_start(&mut self, task_id: &str) -> Result<(), CacheError> {
        if let DragState::Dragging(stale) = std::mem::take(&mut self.state) {
            warn!(task_id = %stale.task_id, "drag started while another was active; aborting it");
            self.restore(&stale)?;
        }

        let Ok(id) = TaskId::new(task_id) else {
            return Ok(());
        };
        let session = self.cache.with_snapshot(|snapshot| {
            snapshot.task(&id).map(|task| DragSession {
                task_id: task.id().clone(),
                origin_status: task.status().clone(),
                origin_order: task.order(),
            })
        })?;

        match session {
            Some(started) => {
                debug!(task_id = %started.task_id, status = %started.origin_status, "drag started");
                self.state = DragState::Dragging(started);
            }
            None => warn!(task_id, "drag start ignored for unknown task"),
        }
        Ok(())
    }

    /// Speculatively moves the dragged task into the column under the
    /// pointer. Order is left untouched until the drop.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the cache lock is poisoned.
    pub fn drag_over(&mut self, active: &str, over: &str) -> Result<(), CacheError> {
        let DragState::Dragging(session) = &self.state else {
            return Ok(());
        };
        if session.task_id.as_str() != active {
            return Ok(());
        }
        let task_id = session.task_id.clone();

        self.cache.update(|snapshot| {
            let Some(target) = resolve_drop_target(&snapshot.lists, &snapshot.tasks, over) else {
                return;
            };
            let Some(task) = snapshot.task_mut(&task_id) else {
                return;
            };
            if task.status() != target.column() {
                debug!(task_id = %task_id, column = %target.column(), "hovering over another column");
                task.set_status(target.column().clone());
            }
        })
    }

    /// Ends the drag and applies the resulting commit to the cache.
    ///
    /// Returns `None` and restores the drag-start placement when the drop
    /// has no target, cannot be resolved, belongs to another task, or
    /// changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the cache lock is poisoned.
    pub fn drag_end(
        &mut self,
        active: &str,
        over: Option<&str>,
    ) -> Result<Option<CommitPlan>, CacheError> {
        let DragState::Dragging(session) = std::mem::take(&mut self.state) else {
            return Ok(None);
        };
        if session.task_id.as_str() != active {
            warn!(task_id = %session.task_id, active, "drag end for a different task; aborting");
            self.restore(&session)?;
            return Ok(None);
        }
        let Some(target_id) = over else {
            debug!(task_id = %session.task_id, "dropped outside any target");
            self.restore(&session)?;
            return Ok(None);
        };

        let plan = self
            .cache
            .update(|snapshot| commit(snapshot, &session, target_id))?;
        match &plan {
            Some(committed) => info!(
                task_id = %session.task_id,
                placements = committed.assignments().len(),
                "drag committed"
            ),
            None => {
                debug!(task_id = %session.task_id, "drop changed nothing");
                self.restore(&session)?;
            }
        }
        Ok(plan)
    }

    fn restore(&self, session: &DragSession) -> Result<(), CacheError> {
        self.cache.update(|snapshot| {
            if let Some(task) = snapshot.task_mut(&session.task_id) {
                task.place(session.origin_status.clone(), session.origin_order);
            }
        })
    }
}

fn commit(snapshot: &mut BoardSnapshot, session: &DragSession, over: &str) -> Option<CommitPlan> {
    let target = resolve_drop_target(&snapshot.lists, &snapshot.tasks, over)?;
    let plan = plan_commit(
        &snapshot.tasks,
        &session.task_id,
        &StatusChange {
            status: session.origin_status.clone(),
            order: session.origin_order,
        },
        &target,
    )?;
    apply_assignments(&mut snapshot.tasks, &plan.assignments());
    Some(plan)
}

impl DragEventHandler for OrderingEngine {
    type Commit = CommitPlan;
    type Error = CacheError;

    fn on_drag_start(&mut self, event: &DragEvent) -> Result<(), Self::Error> {
        self.drag_start(event.active())
    }

    fn on_drag_over(&mut self, event: &DragEvent) -> Result<(), Self::Error> {
        match event.over_id() {
            Some(over) => self.drag_over(event.active(), over),
            None => Ok(()),
        }
    }

    fn on_drag_end(&mut self, event: &DragEvent) -> Result<Option<Self::Commit>, Self::Error> {
        self.drag_end(event.active(), event.over_id())
    }
}
