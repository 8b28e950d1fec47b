//! HTTP implementation of the remote board store.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{config::HttpStoreConfig, envelope};
use crate::board::{
    domain::{
        BoardList, CommentDraft, ListDraft, ListId, ListPatch, OrderAssignment, StatusChange, Task,
        TaskDraft, TaskId, TaskPatch,
    },
    ports::{BoardStore, BoardStoreError, BoardStoreResult},
};

#[derive(Debug, Serialize)]
struct ReorderRequest<'a> {
    tasks: &'a [OrderAssignment],
}

/// Board store backed by the task REST API.
///
/// Responses are accepted either bare or wrapped in a `data` envelope.
/// `404` maps to [`BoardStoreError::NotFound`], any other failure status to
/// [`BoardStoreError::Rejected`].
#[derive(Debug, Clone)]
pub struct HttpBoardStore {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl HttpBoardStore {
    /// Creates a store from connection settings.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::Transport`] when the HTTP client cannot be
    /// built.
    pub fn new(config: &HttpStoreConfig) -> BoardStoreResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(BoardStoreError::transport)?;
        Ok(Self::with_client(client, config))
    }

    /// Creates a store that reuses an existing HTTP client.
    #[must_use]
    pub fn with_client(client: Client, config: &HttpStoreConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            auth_token: config.auth_token.clone(),
        }
    }

    /// Returns the API root requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, format!("{}{path}", self.base_url));
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, request: RequestBuilder) -> BoardStoreResult<Vec<u8>> {
        let response = request.send().await.map_err(BoardStoreError::transport)?;
        let status = response.status();
        let url = response.url().path().to_owned();
        debug!(%status, url, "board store responded");

        if status == StatusCode::NOT_FOUND {
            return Err(BoardStoreError::NotFound(url));
        }
        let body = response.bytes().await.map_err(BoardStoreError::transport)?;
        if !status.is_success() {
            return Err(BoardStoreError::Rejected {
                status: status.as_u16(),
                message: String::from_utf8_lossy(&body).trim().to_owned(),
            });
        }
        Ok(body.to_vec())
    }

    async fn fetch<T>(&self, request: RequestBuilder) -> BoardStoreResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let body = self.send(request).await?;
        envelope::decode(&body).map_err(|err| BoardStoreError::Decode(err.to_string()))
    }

    async fn acknowledge(&self, request: RequestBuilder) -> BoardStoreResult<()> {
        self.send(request).await.map(|_| ())
    }
}

#[async_trait]
impl BoardStore for HttpBoardStore {
    async fn fetch_tasks(&self) -> BoardStoreResult<Vec<Task>> {
        self.fetch(self.request(Method::GET, "/tasks")).await
    }

    async fn create_task(&self, draft: &TaskDraft) -> BoardStoreResult<Task> {
        self.fetch(self.request(Method::POST, "/tasks").json(draft))
            .await
    }

    async fn update_task(&self, id: &TaskId, patch: &TaskPatch) -> BoardStoreResult<Task> {
        self.fetch(self.request(Method::PUT, &format!("/tasks/{id}")).json(patch))
            .await
    }

    async fn delete_task(&self, id: &TaskId) -> BoardStoreResult<()> {
        self.acknowledge(self.request(Method::DELETE, &format!("/tasks/{id}")))
            .await
    }

    async fn update_task_status(
        &self,
        id: &TaskId,
        change: &StatusChange,
    ) -> BoardStoreResult<Task> {
        self.fetch(
            self.request(Method::PATCH, &format!("/tasks/{id}/status"))
                .json(change),
        )
        .await
    }

    async fn reorder_tasks(&self, assignments: &[OrderAssignment]) -> BoardStoreResult<()> {
        let payload = ReorderRequest { tasks: assignments };
        self.acknowledge(self.request(Method::PATCH, "/tasks/reorder").json(&payload))
            .await
    }

    async fn add_comment(&self, id: &TaskId, comment: &CommentDraft) -> BoardStoreResult<Task> {
        self.fetch(
            self.request(Method::POST, &format!("/tasks/{id}/comments"))
                .json(comment),
        )
        .await
    }

    async fn fetch_lists(&self) -> BoardStoreResult<Vec<BoardList>> {
        self.fetch(self.request(Method::GET, "/tasks/lists")).await
    }

    async fn create_list(&self, draft: &ListDraft) -> BoardStoreResult<BoardList> {
        self.fetch(self.request(Method::POST, "/tasks/lists").json(draft))
            .await
    }

    async fn update_list(&self, id: &ListId, patch: &ListPatch) -> BoardStoreResult<BoardList> {
        self.fetch(
            self.request(Method::PUT, &format!("/tasks/lists/{id}"))
                .json(patch),
        )
        .await
    }

    async fn delete_list(&self, id: &ListId) -> BoardStoreResult<()> {
        self.acknowledge(self.request(Method::DELETE, &format!("/tasks/lists/{id}")))
            .await
    }
}
