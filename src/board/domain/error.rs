//! Error types for board domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing board domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// An identifier was empty after trimming.
    #[error("{kind} identifier must not be empty")]
    EmptyIdentifier {
        /// Which identifier kind was rejected.
        kind: &'static str,
    },

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTaskTitle,

    /// The list name is empty after trimming.
    #[error("list name must not be empty")]
    EmptyListName,

    /// The comment text is empty after trimming.
    #[error("comment text must not be empty")]
    EmptyCommentText,

    /// The comment author is empty after trimming.
    #[error("comment author must not be empty")]
    EmptyCommentAuthor,
}

/// Error returned while parsing a task priority.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParsePriorityError(pub String);

/// Error returned while parsing a due-date bucket.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown due-date bucket: {0}")]
pub struct ParseDueBucketError(pub String);
