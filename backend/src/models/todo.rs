use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::validation::{self, FieldErrors};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub is_complete: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// The entity as it would look after `patch`, without touching timestamps.
    pub fn merged(&self, patch: &UpdateTodoRequest) -> Todo {
        let mut next = self.clone();
        if let Some(title) = &patch.title {
            next.title = title.clone();
        }
        if let Some(description) = &patch.description {
            next.description = description.clone();
        }
        if let Some(is_complete) = patch.is_complete {
            next.is_complete = is_complete;
        }
        next
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        validation::validate_todo(Some(&self.title), Some(&self.description))
    }

    /// Substring match on title or description. `needle` must already be
    /// lowercased.
    pub fn contains_text(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

/// Create payload. Fields are optional so that a missing field surfaces as a
/// validation error instead of a body rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTodoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl NewTodoRequest {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
        }
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        validation::validate_todo(self.title.as_deref(), self.description.as_deref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_complete: Option<bool>,
}

impl UpdateTodoRequest {
    pub fn complete() -> Self {
        Self {
            is_complete: Some(true),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        validation::validate_patch(self.title.as_deref(), self.description.as_deref())
    }
}

/// Completion filter taken from `/completed/{status}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionFilter {
    Complete,
    Pending,
}

impl CompletionFilter {
    /// `"complete"` selects finished todos; any other status selects the rest.
    pub fn from_status(status: &str) -> Self {
        if status == "complete" {
            CompletionFilter::Complete
        } else {
            CompletionFilter::Pending
        }
    }

    pub fn matches(self, todo: &Todo) -> bool {
        todo.is_complete == (self == CompletionFilter::Complete)
    }
}
