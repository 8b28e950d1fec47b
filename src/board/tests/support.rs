//! Shared builders for board unit tests.

use crate::board::domain::{BoardList, ListDraft, ListId, PersistedTask, Task, TaskId};

pub fn list_id(value: &str) -> ListId {
    ListId::new(value).expect("valid list id")
}

pub fn task_id(value: &str) -> TaskId {
    TaskId::new(value).expect("valid task id")
}

pub fn list(id: &str, name: &str) -> BoardList {
    BoardList::from_draft(list_id(id), &ListDraft::new(name).expect("valid list name"))
}

pub fn task(id: &str, status: &str, order: u32) -> Task {
    Task::from_persisted(PersistedTask::new(
        task_id(id),
        format!("Task {id}"),
        list_id(status),
        order,
    ))
}

/// Orders of `status` in display order, paired with task ids.
pub fn column(tasks: &[Task], status: &str) -> Vec<(String, u32)> {
    crate::board::domain::column_tasks(tasks, &list_id(status))
        .into_iter()
        .map(|task| (task.id().to_string(), task.order()))
        .collect()
}
