//! Domain model for board ordering.
//!
//! Tasks, lists and the pure algorithms that order them. Nothing in this
//! module performs I/O or touches the shared cache.

mod error;
mod filter;
mod ids;
mod list;
mod ordering;
mod task;

pub use error::{BoardDomainError, ParseDueBucketError, ParsePriorityError};
pub use filter::{ColumnView, DueBucket, TaskFilter, group_by_column, visible_tasks};
pub use ids::{ClientId, ListId, MemberId, TaskId};
pub use list::{BoardList, ListDraft, ListPatch};
pub use ordering::{
    CommitPlan, DropTarget, OrderAssignment, StatusChange, column_tasks, is_densely_ordered,
    move_element, next_order, plan_commit, resolve_drop_target,
};
pub use task::{Comment, CommentDraft, PersistedTask, Priority, Task, TaskDraft, TaskPatch};

pub(crate) use ordering::apply_assignments;
