//! Service layer for creating, editing and deleting board lists.

use mockable::Clock;
use thiserror::Error;
use tracing::warn;

use super::sync::{SyncCoordinator, SyncError};
use crate::board::{
    domain::{BoardDomainError, BoardList, ListDraft, ListId, ListPatch},
    ports::BoardStore,
};

/// Service-level errors for list lifecycle operations.
#[derive(Debug, Error)]
pub enum ListLifecycleError {
    /// The board must always keep at least one list.
    #[error("cannot delete the last remaining list")]
    LastListRemaining,
    /// Input validation failed.
    #[error(transparent)]
    Domain(#[from] BoardDomainError),
    /// Synchronization failed.
    #[error(transparent)]
    Sync(#[from] SyncError),
}

/// Result type for list lifecycle operations.
pub type ListLifecycleResult<T> = Result<T, ListLifecycleError>;

/// List lifecycle orchestration service.
///
/// Enforces the minimum-list rule locally, before any remote call.
#[derive(Clone)]
pub struct ListLifecycleService<S, C>
where
    S: BoardStore,
    C: Clock + Send + Sync,
{
    sync: SyncCoordinator<S, C>,
}

impl<S, C> ListLifecycleService<S, C>
where
    S: BoardStore,
    C: Clock + Send + Sync,
{
    /// Creates a service persisting through `sync`.
    #[must_use]
    pub const fn new(sync: SyncCoordinator<S, C>) -> Self {
        Self { sync }
    }

    /// Creates a list named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ListLifecycleError::Domain`] for a blank name, or
    /// [`ListLifecycleError::Sync`] when the store rejects the list.
    pub async fn create_list(&self, name: &str) -> ListLifecycleResult<BoardList> {
        let draft = ListDraft::new(name)?;
        self.create_list_from_draft(&draft).await
    }

    /// Creates a list from a fully specified draft.
    ///
    /// # Errors
    ///
    /// Returns [`ListLifecycleError::Sync`] when the store rejects the list.
    pub async fn create_list_from_draft(&self, draft: &ListDraft) -> ListLifecycleResult<BoardList> {
        Ok(self.sync.create_list(draft).await?)
    }

    /// Renames or restyles a list.
    ///
    /// # Errors
    ///
    /// Returns [`ListLifecycleError::Sync`] for unknown lists or remote
    /// failures.
    pub async fn update_list(
        &self,
        id: &ListId,
        patch: &ListPatch,
    ) -> ListLifecycleResult<BoardList> {
        Ok(self.sync.update_list(id, patch).await?)
    }

    /// Deletes a list. Its tasks move to the first remaining list.
    ///
    /// # Errors
    ///
    /// Returns [`ListLifecycleError::LastListRemaining`] without contacting
    /// the store when at most one list is cached, and
    /// [`ListLifecycleError::Sync`] for unknown lists or remote failures.
    pub async fn delete_list(&self, id: &ListId) -> ListLifecycleResult<()> {
        let cached = self.sync.cache().list_count().map_err(SyncError::from)?;
        if cached <= 1 {
            warn!(list_id = %id, "refusing to delete the last list");
            return Err(ListLifecycleError::LastListRemaining);
        }
        Ok(self.sync.delete_list(id).await?)
    }
}
