use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::{StoreError, TodoStore};
use crate::models::{NewTodoRequest, Todo, UpdateTodoRequest};

const TODO_COLUMNS: &str = "id, title, description, is_complete, created_at, updated_at";

#[derive(Clone)]
pub struct SqliteTodoStore {
    db: SqlitePool,
}

impl SqliteTodoStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TodoStore for SqliteTodoStore {
    async fn insert(&self, req: &NewTodoRequest) -> Result<Todo, StoreError> {
        req.validate().map_err(StoreError::Invalid)?;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let title = req.title.clone().unwrap_or_default();
        let description = req.description.clone().unwrap_or_default();

        sqlx::query(
            r#"
            INSERT INTO todos
                (id, title, description, is_complete, created_at, updated_at)
            VALUES (?1, ?2, ?3, 0, ?4, ?4)
            "#,
        )
        .bind(&id)
        .bind(&title)
        .bind(&description)
        .bind(now)
        .execute(&self.db)
        .await?;

        Ok(Todo {
            id,
            title,
            description,
            is_complete: false,
            created_at: now,
            updated_at: now,
        })
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Todo>, StoreError> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            "SELECT {TODO_COLUMNS} FROM todos WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(todo)
    }

    async fn find_all(&self) -> Result<Vec<Todo>, StoreError> {
        let todos = sqlx::query_as::<_, Todo>(&format!(
            "SELECT {TODO_COLUMNS} FROM todos ORDER BY rowid"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(todos)
    }

    async fn update(
        &self,
        id: &str,
        patch: &UpdateTodoRequest,
    ) -> Result<Option<Todo>, StoreError> {
        patch.validate().map_err(StoreError::Invalid)?;

        let now = Utc::now();
        let todo = sqlx::query_as::<_, Todo>(&format!(
            r#"
            UPDATE todos
            SET title = COALESCE(?1, title),
                description = COALESCE(?2, description),
                is_complete = COALESCE(?3, is_complete),
                updated_at = ?4
            WHERE id = ?5
            RETURNING {TODO_COLUMNS}
            "#
        ))
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(patch.is_complete)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(todo)
    }

    async fn delete(&self, id: &str) -> Result<Option<Todo>, StoreError> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            "DELETE FROM todos WHERE id = ?1 RETURNING {TODO_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(todo)
    }

    async fn search(&self, text: &str) -> Result<Vec<Todo>, StoreError> {
        // SQLite's lower() only folds ASCII, so matching happens here
        let needle = text.to_lowercase();
        let todos = self.find_all().await?;

        Ok(todos
            .into_iter()
            .filter(|todo| todo.contains_text(&needle))
            .collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("select 1").execute(&self.db).await?;
        Ok(())
    }
}
