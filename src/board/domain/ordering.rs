//! Ordering algorithms for tasks within and across board lists.
//!
//! Everything here is pure: functions read task and list slices and return
//! the placements a commit should apply. Orders inside a list are kept dense
//! (`0..n`) by recomputing them, never by patching single values.

use super::{BoardList, ListId, Task, TaskId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Placement of a single task, as sent in a batch reorder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderAssignment {
    /// Task being placed.
    pub id: TaskId,
    /// Position within the list.
    pub order: u32,
    /// List the task belongs to.
    pub status: ListId,
}

impl OrderAssignment {
    /// Creates a placement.
    #[must_use]
    pub const fn new(id: TaskId, status: ListId, order: u32) -> Self {
        Self { id, order, status }
    }

    /// Returns the single-task status change carried by this placement.
    #[must_use]
    pub fn status_change(&self) -> StatusChange {
        StatusChange {
            status: self.status.clone(),
            order: self.order,
        }
    }

    fn differs_from(&self, task: &Task) -> bool {
        task.status() != &self.status || task.order() != self.order
    }
}

/// Status and order update for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    /// Destination list.
    pub status: ListId,
    /// Position within the destination list.
    pub order: u32,
}

/// What a pointer was released over, once resolved against the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// The list container itself (typically an empty area of the column).
    Column(ListId),
    /// Another task, standing in for the list that task belongs to.
    Task {
        /// The task under the pointer.
        id: TaskId,
        /// The list that task occupies.
        column: ListId,
    },
}

impl DropTarget {
    /// Returns the list the drop resolves to.
    #[must_use]
    pub const fn column(&self) -> &ListId {
        match self {
            Self::Column(column) | Self::Task { column, .. } => column,
        }
    }
}

/// Changes a drag commit should apply and persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitPlan {
    /// Intra-list reorder: every task in the list is renumbered.
    Reorder {
        /// The reordered list.
        status: ListId,
        /// Full dense placement of the list.
        assignments: Vec<OrderAssignment>,
    },
    /// Cross-list move appending the task to its destination.
    Move {
        /// Placement of the moved task.
        moved: OrderAssignment,
        /// Follow-up placements that keep the source and destination lists
        /// dense. Only tasks whose order actually changes are listed.
        normalized: Vec<OrderAssignment>,
    },
}

impl CommitPlan {
    /// Returns every placement in the plan, moved task first.
    #[must_use]
    pub fn assignments(&self) -> Vec<OrderAssignment> {
        match self {
            Self::Reorder { assignments, .. } => assignments.clone(),
            Self::Move { moved, normalized } => std::iter::once(moved.clone())
                .chain(normalized.iter().cloned())
                .collect(),
        }
    }
}

/// Display order of tasks: by `order`, ties broken by identifier.
fn display_order(left: &Task, right: &Task) -> Ordering {
    left.order()
        .cmp(&right.order())
        .then_with(|| left.id().cmp(right.id()))
}

/// Returns the tasks of one list in display order.
#[must_use]
pub fn column_tasks<'a>(tasks: &'a [Task], status: &ListId) -> Vec<&'a Task> {
    let mut column: Vec<&Task> = tasks.iter().filter(|task| task.status() == status).collect();
    column.sort_by(|left, right| display_order(left, right));
    column
}

/// Returns `true` when the orders of a list are exactly `0..n`.
#[must_use]
pub fn is_densely_ordered(tasks: &[Task], status: &ListId) -> bool {
    column_tasks(tasks, status)
        .iter()
        .zip(0_u32..)
        .all(|(task, expected)| task.order() == expected)
}

/// Moves the element at `from` so it ends up at `to`, shifting the elements
/// in between. Out-of-range indices leave the slice untouched.
pub fn move_element<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from >= items.len() || to >= items.len() || from == to {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

/// Resolves a raw hover/drop id to a list, either directly or through the
/// task it names.
///
/// Returns `None` for unknown ids and for tasks whose list no longer exists,
/// so a drop can never produce a dangling status.
#[must_use]
pub fn resolve_drop_target(lists: &[BoardList], tasks: &[Task], over: &str) -> Option<DropTarget> {
    if let Some(list) = lists.iter().find(|list| list.id().as_str() == over) {
        return Some(DropTarget::Column(list.id().clone()));
    }
    let task = tasks.iter().find(|task| task.id().as_str() == over)?;
    let column = task.status();
    lists
        .iter()
        .any(|list| list.id() == column)
        .then(|| DropTarget::Task {
            id: task.id().clone(),
            column: column.clone(),
        })
}

/// Plans the commit for a task dropped on `target`.
///
/// `origin` is the placement the task held when the drag started. The task's
/// current status may differ from it after speculative hover moves, so the
/// no-op check compares the planned placement against `origin` rather than
/// against the hovered state.
///
/// Returns `None` when the task is unknown or when the drop changes nothing.
#[must_use]
pub fn plan_commit(
    tasks: &[Task],
    active: &TaskId,
    origin: &StatusChange,
    target: &DropTarget,
) -> Option<CommitPlan> {
    if !tasks.iter().any(|task| task.id() == active) {
        return None;
    }
    let column = target.column();

    if column != &origin.status {
        return Some(plan_move(tasks, active, &origin.status, column));
    }

    let assignments = plan_reorder(tasks, active, column, target)?;
    let unchanged = assignments.iter().all(|assignment| {
        if &assignment.id == active {
            return assignment.status == origin.status && assignment.order == origin.order;
        }
        tasks
            .iter()
            .find(|task| task.id() == &assignment.id)
            .is_some_and(|task| !assignment.differs_from(task))
    });
    if unchanged {
        return None;
    }
    Some(CommitPlan::Reorder {
        status: column.clone(),
        assignments,
    })
}

/// Dense placement of `column` after moving `active` onto `target`.
fn plan_reorder(
    tasks: &[Task],
    active: &TaskId,
    column: &ListId,
    target: &DropTarget,
) -> Option<Vec<OrderAssignment>> {
    let mut members: Vec<&Task> = tasks
        .iter()
        .filter(|task| task.status() == column || task.id() == active)
        .collect();
    members.sort_by(|left, right| display_order(left, right));
    let mut ids: Vec<&TaskId> = members.iter().map(|task| task.id()).collect();

    let from = ids.iter().position(|id| *id == active)?;
    let to = match target {
        DropTarget::Task { id, .. } => ids.iter().position(|candidate| *candidate == id)?,
        DropTarget::Column(_) => ids.len().saturating_sub(1),
    };
    move_element(&mut ids, from, to);
    Some(renumber(ids, column))
}

/// Appends `active` to `destination` and lists the follow-up renumbering of
/// both lists involved.
fn plan_move(tasks: &[Task], active: &TaskId, origin: &ListId, destination: &ListId) -> CommitPlan {
    let destination_ids = column_ids_except(tasks, destination, active);
    let appended_at = u32::try_from(destination_ids.len()).unwrap_or(u32::MAX);
    let moved = OrderAssignment::new(active.clone(), destination.clone(), appended_at);

    let normalized = renumber(column_ids_except(tasks, origin, active), origin)
        .into_iter()
        .chain(renumber(destination_ids, destination))
        .filter(|assignment| {
            tasks
                .iter()
                .find(|task| task.id() == &assignment.id)
                .is_some_and(|task| assignment.differs_from(task))
        })
        .collect();

    CommitPlan::Move { moved, normalized }
}

fn column_ids_except<'a>(tasks: &'a [Task], status: &ListId, excluded: &TaskId) -> Vec<&'a TaskId> {
    column_tasks(tasks, status)
        .into_iter()
        .map(Task::id)
        .filter(|id| *id != excluded)
        .collect()
}

fn renumber<'a>(ids: impl IntoIterator<Item = &'a TaskId>, status: &ListId) -> Vec<OrderAssignment> {
    ids.into_iter()
        .zip(0_u32..)
        .map(|(id, order)| OrderAssignment::new(id.clone(), status.clone(), order))
        .collect()
}

/// Applies placements to tasks in place. Unknown ids are skipped.
pub(crate) fn apply_assignments(tasks: &mut [Task], assignments: &[OrderAssignment]) {
    for assignment in assignments {
        if let Some(task) = tasks.iter_mut().find(|task| task.id() == &assignment.id) {
            task.place(assignment.status.clone(), assignment.order);
        }
    }
}

/// Position a new task takes when appended to `status`.
#[must_use]
pub fn next_order(tasks: &[Task], status: &ListId) -> u32 {
    let count = tasks.iter().filter(|task| task.status() == status).count();
    u32::try_from(count).unwrap_or(u32::MAX)
}
