//! Task aggregate and the payloads used to create and edit tasks.

use super::{BoardDomainError, ClientId, ListId, MemberId, ParsePriorityError, TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Task priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Low priority.
    #[serde(alias = "Low", alias = "LOW")]
    Low,
    /// Medium priority, the default for tasks that do not carry one.
    #[default]
    #[serde(alias = "Medium", alias = "MEDIUM")]
    Medium,
    /// High priority.
    #[serde(alias = "High", alias = "HIGH")]
    High,
}

impl Priority {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl TryFrom<&str> for Priority {
    type Error = ParsePriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParsePriorityError(value.to_owned())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A comment attached to a task. Comments are append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    author: String,
    text: String,
    #[serde(alias = "createdAt")]
    timestamp: DateTime<Utc>,
}

impl Comment {
    /// Creates a comment from a validated draft at the given instant.
    #[must_use]
    pub fn from_draft(draft: &CommentDraft, timestamp: DateTime<Utc>) -> Self {
        Self {
            author: draft.author.clone(),
            text: draft.text.clone(),
            timestamp,
        }
    }

    /// Returns the comment author.
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Returns the comment text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns when the comment was written.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Validated payload for appending a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentDraft {
    text: String,
    author: String,
}

impl CommentDraft {
    /// Creates a comment draft.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyCommentText`] or
    /// [`BoardDomainError::EmptyCommentAuthor`] when either part is blank.
    pub fn new(
        author: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<Self, BoardDomainError> {
        let author = non_blank(author.into()).ok_or(BoardDomainError::EmptyCommentAuthor)?;
        let text = non_blank(text.into()).ok_or(BoardDomainError::EmptyCommentText)?;
        Ok(Self { text, author })
    }

    /// Returns the comment author.
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Returns the comment text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Task aggregate as mirrored from the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(alias = "_id")]
    id: TaskId,
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    status: ListId,
    #[serde(default, deserialize_with = "null_as_default")]
    order: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    priority: Priority,
    #[serde(default, deserialize_with = "null_as_default")]
    assigned_to: Vec<MemberId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    client: Option<ClientId>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "due_date")]
    due_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    comments: Vec<Comment>,
}

/// Parameter object for reconstructing a task from stored values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTask {
    /// Stored identifier.
    pub id: TaskId,
    /// Stored title.
    pub title: String,
    /// Stored description, if any.
    pub description: Option<String>,
    /// Column the task occupies.
    pub status: ListId,
    /// Position within the column.
    pub order: u32,
    /// Stored priority.
    pub priority: Priority,
    /// Assigned members.
    pub assigned_to: Vec<MemberId>,
    /// Associated client, if any.
    pub client: Option<ClientId>,
    /// Due date, if any.
    pub due_date: Option<DateTime<Utc>>,
    /// Comment history.
    pub comments: Vec<Comment>,
}

impl PersistedTask {
    /// Creates stored values for a bare task with defaults for every optional
    /// field.
    #[must_use]
    pub fn new(id: TaskId, title: impl Into<String>, status: ListId, order: u32) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            status,
            order,
            priority: Priority::default(),
            assigned_to: Vec::new(),
            client: None,
            due_date: None,
            comments: Vec::new(),
        }
    }
}

impl Task {
    /// Creates a task from a draft under the given identifier and position.
    #[must_use]
    pub fn from_draft(id: TaskId, draft: &TaskDraft, order: u32) -> Self {
        Self {
            id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            status: draft.status.clone(),
            order,
            priority: draft.priority,
            assigned_to: draft.assigned_to.clone(),
            client: draft.client.clone(),
            due_date: draft.due_date,
            comments: Vec::new(),
        }
    }

    /// Reconstructs a task from stored values.
    #[must_use]
    pub fn from_persisted(data: PersistedTask) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            status: data.status,
            order: data.order,
            priority: data.priority,
            assigned_to: data.assigned_to,
            client: data.client,
            due_date: data.due_date,
            comments: data.comments,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> &TaskId {
        &self.id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the task description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the list the task currently occupies.
    #[must_use]
    pub const fn status(&self) -> &ListId {
        &self.status
    }

    /// Returns the position of the task within its list.
    #[must_use]
    pub const fn order(&self) -> u32 {
        self.order
    }

    /// Returns the task priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the assigned members.
    #[must_use]
    pub fn assigned_to(&self) -> &[MemberId] {
        &self.assigned_to
    }

    /// Returns the associated client, if any.
    #[must_use]
    pub const fn client(&self) -> Option<&ClientId> {
        self.client.as_ref()
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the comment history, oldest first.
    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Places the task in a list at the given position.
    pub(crate) fn place(&mut self, status: ListId, order: u32) {
        self.status = status;
        self.order = order;
    }

    /// Moves the task to another list without touching its order.
    pub(crate) fn set_status(&mut self, status: ListId) {
        self.status = status;
    }

    /// Applies an edit patch. Status and order are never patched.
    pub(crate) fn apply_patch(&mut self, patch: &TaskPatch) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(assigned_to) = &patch.assigned_to {
            self.assigned_to.clone_from(assigned_to);
        }
        if let Some(client) = &patch.client {
            self.client = Some(client.clone());
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = Some(due_date);
        }
    }

    /// Appends a comment.
    pub(crate) fn push_comment(&mut self, comment: Comment) {
        self.comments.push(comment);
    }
}

/// Validated payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    status: ListId,
    priority: Priority,
    assigned_to: Vec<MemberId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    client: Option<ClientId>,
    #[serde(skip_serializing_if = "Option::is_none", with = "due_date")]
    due_date: Option<DateTime<Utc>>,
}

impl TaskDraft {
    /// Creates a draft with the required fields.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTaskTitle`] when the title is blank.
    pub fn new(title: impl Into<String>, status: ListId) -> Result<Self, BoardDomainError> {
        let title = non_blank(title.into()).ok_or(BoardDomainError::EmptyTaskTitle)?;
        Ok(Self {
            title,
            description: None,
            status,
            priority: Priority::default(),
            assigned_to: Vec::new(),
            client: None,
            due_date: None,
        })
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the assigned members.
    #[must_use]
    pub fn with_assignees(mut self, assignees: impl IntoIterator<Item = MemberId>) -> Self {
        self.assigned_to = assignees.into_iter().collect();
        self
    }

    /// Sets the client.
    #[must_use]
    pub fn with_client(mut self, client: ClientId) -> Self {
        self.client = Some(client);
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Returns the list the task will be created in.
    #[must_use]
    pub const fn status(&self) -> &ListId {
        &self.status
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }
}

/// Partial edit of a task's descriptive fields.
///
/// Only fields that are set are sent and applied. Placement (status and
/// order) is owned by the ordering engine and cannot be patched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    assigned_to: Option<Vec<MemberId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    client: Option<ClientId>,
    #[serde(skip_serializing_if = "Option::is_none", with = "due_date")]
    due_date: Option<DateTime<Utc>>,
}

impl TaskPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a new title.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTaskTitle`] when the title is blank.
    pub fn with_title(mut self, title: impl Into<String>) -> Result<Self, BoardDomainError> {
        self.title = Some(non_blank(title.into()).ok_or(BoardDomainError::EmptyTaskTitle)?);
        Ok(self)
    }

    /// Sets a new description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets a new priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Replaces the assigned members.
    #[must_use]
    pub fn with_assignees(mut self, assignees: impl IntoIterator<Item = MemberId>) -> Self {
        self.assigned_to = Some(assignees.into_iter().collect());
        self
    }

    /// Sets a new client.
    #[must_use]
    pub fn with_client(mut self, client: ClientId) -> Self {
        self.client = Some(client);
        self
    }

    /// Sets a new due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

/// Treats an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Due dates arrive either as RFC 3339 timestamps or as bare `YYYY-MM-DD`
/// dates, which are read as midnight UTC.
mod due_date {
    use chrono::{DateTime, NaiveDate, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(due) => serializer.serialize_some(&due.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(parse)
            .transpose()
            .map_err(D::Error::custom)
    }

    /// Parses a due date in either accepted format.
    pub fn parse(raw: &str) -> Result<DateTime<Utc>, String> {
        if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
            return Ok(timestamp.with_timezone(&Utc));
        }
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|err| format!("invalid due date '{raw}': {err}"))?;
        date.and_hms_opt(0, 0, 0)
            .map(|midnight| midnight.and_utc())
            .ok_or_else(|| format!("invalid due date '{raw}'"))
    }
}
