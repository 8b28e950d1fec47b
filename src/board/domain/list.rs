//! Board lists (columns) and their create/edit payloads.

use super::{BoardDomainError, ListId};
use serde::{Deserialize, Serialize};

/// A named column on the board.
///
/// Lists carry no explicit position: their order is the sequence in which the
/// store returns them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardList {
    #[serde(alias = "_id")]
    id: ListId,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    emoji: Option<String>,
}

impl BoardList {
    /// Creates a list from a draft under the given identifier.
    #[must_use]
    pub fn from_draft(id: ListId, draft: &ListDraft) -> Self {
        Self {
            id,
            name: draft.name.clone(),
            color: draft.color.clone(),
            emoji: draft.emoji.clone(),
        }
    }

    /// Returns the list identifier.
    #[must_use]
    pub const fn id(&self) -> &ListId {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the display color, if any.
    #[must_use]
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// Returns the display emoji, if any.
    #[must_use]
    pub fn emoji(&self) -> Option<&str> {
        self.emoji.as_deref()
    }

    pub(crate) fn apply_patch(&mut self, patch: &ListPatch) {
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        if let Some(color) = &patch.color {
            self.color = Some(color.clone());
        }
        if let Some(emoji) = &patch.emoji {
            self.emoji = Some(emoji.clone());
        }
    }
}

/// Validated payload for creating a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListDraft {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    emoji: Option<String>,
}

impl ListDraft {
    /// Creates a draft for a list with the given name.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyListName`] when the name is empty or
    /// whitespace-only.
    pub fn new(name: impl Into<String>) -> Result<Self, BoardDomainError> {
        Ok(Self {
            name: validated_name(name.into())?,
            color: None,
            emoji: None,
        })
    }

    /// Sets the display color.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Sets the display emoji.
    #[must_use]
    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }

    /// Returns the list name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Partial edit of a list's presentation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    emoji: Option<String>,
}

impl ListPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Renames the list.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyListName`] when the name is empty or
    /// whitespace-only.
    pub fn with_name(mut self, name: impl Into<String>) -> Result<Self, BoardDomainError> {
        self.name = Some(validated_name(name.into())?);
        Ok(self)
    }

    /// Sets the display color.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Sets the display emoji.
    #[must_use]
    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }
}

fn validated_name(raw: String) -> Result<String, BoardDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(BoardDomainError::EmptyListName);
    }
    Ok(trimmed.to_owned())
}
