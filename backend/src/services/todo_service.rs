use std::sync::Arc;

use tracing::debug;

use crate::db::TodoStore;
use crate::error::AppError;
use crate::models::{CompletionFilter, NewTodoRequest, Todo, UpdateTodoRequest};

/// Todo operations on top of a [`TodoStore`].
///
/// Existence is checked with a read before every mutation; the read and the
/// write are separate store calls, not a transaction. A row deleted in between
/// makes the write return `None`, which is reported as `NotFound` as well.
#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, req: NewTodoRequest) -> Result<Todo, AppError> {
        req.validate()?;
        let todo = self.store.insert(&req).await?;
        debug!(id = %todo.id, "created todo");
        Ok(todo)
    }

    pub async fn list_all(&self) -> Result<Vec<Todo>, AppError> {
        Ok(self.store.find_all().await?)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Todo, AppError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(id))
    }

    pub async fn update_by_id(&self, id: &str, patch: UpdateTodoRequest) -> Result<Todo, AppError> {
        let current = self.get_by_id(id).await?;
        current.merged(&patch).validate()?;

        let todo = self
            .store
            .update(id, &patch)
            .await?
            .ok_or_else(|| AppError::not_found(id))?;
        debug!(id = %todo.id, "updated todo");
        Ok(todo)
    }

    pub async fn delete_by_id(&self, id: &str) -> Result<Todo, AppError> {
        self.get_by_id(id).await?;

        let todo = self
            .store
            .delete(id)
            .await?
            .ok_or_else(|| AppError::not_found(id))?;
        debug!(id = %todo.id, "deleted todo");
        Ok(todo)
    }

    pub async fn complete_by_id(&self, id: &str) -> Result<Todo, AppError> {
        self.get_by_id(id).await?;

        let todo = self
            .store
            .update(id, &UpdateTodoRequest::complete())
            .await?
            .ok_or_else(|| AppError::not_found(id))?;
        debug!(id = %todo.id, "completed todo");
        Ok(todo)
    }

    /// Case-insensitive substring search over title and description.
    /// An absent or empty query matches every todo.
    pub async fn search(&self, query: Option<&str>) -> Result<Vec<Todo>, AppError> {
        let text = query.unwrap_or_default();
        let todos = self.store.search(text).await?;
        debug!(query = text, hits = todos.len(), "searched todos");
        Ok(todos)
    }

    pub async fn filter_by_completion(&self, status: &str) -> Result<Vec<Todo>, AppError> {
        let filter = CompletionFilter::from_status(status);
        let todos = self.list_all().await?;
        Ok(todos.into_iter().filter(|todo| filter.matches(todo)).collect())
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        Ok(self.store.ping().await?)
    }
}
