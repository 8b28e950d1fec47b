//! Filter view over the cached board.
//!
//! Filters are independent and conjunctive. Deriving the visible subset never
//! mutates the input, so the view can be recomputed whenever the cache or the
//! criteria change.

use super::{BoardList, MemberId, ParseDueBucketError, Priority, Task, column_tasks};
use chrono::{DateTime, Days, NaiveDate, Utc};
use std::fmt;

/// Due-date window a task must fall into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DueBucket {
    /// No due-date constraint.
    #[default]
    Any,
    /// Due before the start of today.
    Overdue,
    /// Due at some point today.
    Today,
    /// Due within the seven days starting today.
    Week,
}

impl DueBucket {
    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Any => "none",
            Self::Overdue => "overdue",
            Self::Today => "today",
            Self::Week => "week",
        }
    }

    /// Returns `true` when `due` falls into this bucket relative to `today`.
    ///
    /// Day boundaries are midnight UTC.
    #[must_use]
    pub fn contains(self, due: Option<DateTime<Utc>>, today: NaiveDate) -> bool {
        let Some(due) = due else {
            return self == Self::Any;
        };
        let start_of = |date: NaiveDate| date.and_hms_opt(0, 0, 0).map(|midnight| midnight.and_utc());
        let Some(start_of_today) = start_of(today) else {
            return false;
        };
        let days_ahead = |days: u64| today.checked_add_days(Days::new(days)).and_then(start_of);

        match self {
            Self::Any => true,
            Self::Overdue => due < start_of_today,
            Self::Today => days_ahead(1).is_some_and(|end| start_of_today <= due && due < end),
            Self::Week => days_ahead(7).is_some_and(|end| start_of_today <= due && due < end),
        }
    }
}

impl TryFrom<&str> for DueBucket {
    type Error = ParseDueBucketError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "" | "none" | "all" => Ok(Self::Any),
            "overdue" => Ok(Self::Overdue),
            "today" => Ok(Self::Today),
            "week" => Ok(Self::Week),
            _ => Err(ParseDueBucketError(value.to_owned())),
        }
    }
}

impl fmt::Display for DueBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Criteria selecting the visible tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    search: String,
    assignee: Option<MemberId>,
    priority: Option<Priority>,
    due: DueBucket,
}

impl TaskFilter {
    /// Creates a filter that matches every task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the free-text search. Surrounding whitespace is ignored.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into().trim().to_lowercase();
        self
    }

    /// Restricts to tasks assigned to `member`.
    #[must_use]
    pub fn with_assignee(mut self, member: MemberId) -> Self {
        self.assignee = Some(member);
        self
    }

    /// Restricts to tasks of the given priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Restricts to tasks due within `bucket`.
    #[must_use]
    pub const fn with_due(mut self, bucket: DueBucket) -> Self {
        self.due = bucket;
        self
    }

    /// Returns `true` when `task` passes every criterion.
    #[must_use]
    pub fn matches(&self, task: &Task, today: NaiveDate) -> bool {
        self.matches_search(task)
            && self
                .assignee
                .as_ref()
                .is_none_or(|member| task.assigned_to().contains(member))
            && self
                .priority
                .is_none_or(|priority| task.priority() == priority)
            && self.due.contains(task.due_date(), today)
    }

    fn matches_search(&self, task: &Task) -> bool {
        if self.search.is_empty() {
            return true;
        }
        task.title().to_lowercase().contains(&self.search)
            || task
                .description()
                .is_some_and(|description| description.to_lowercase().contains(&self.search))
    }
}

/// Returns the tasks passing `filter`, in their original sequence.
#[must_use]
pub fn visible_tasks<'a>(tasks: &'a [Task], filter: &TaskFilter, today: NaiveDate) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|task| filter.matches(task, today))
        .collect()
}

/// A list together with its visible tasks in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnView<'a> {
    /// The list.
    pub list: &'a BoardList,
    /// Visible tasks of the list, ordered by `order` then id.
    pub tasks: Vec<&'a Task>,
}

/// Groups visible tasks under their lists, preserving list order.
#[must_use]
pub fn group_by_column<'a>(
    lists: &'a [BoardList],
    tasks: &'a [Task],
    filter: &TaskFilter,
    today: NaiveDate,
) -> Vec<ColumnView<'a>> {
    lists
        .iter()
        .map(|list| ColumnView {
            list,
            tasks: column_tasks(tasks, list.id())
                .into_iter()
                .filter(|task| filter.matches(task, today))
                .collect(),
        })
        .collect()
}
