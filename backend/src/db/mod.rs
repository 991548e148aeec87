pub mod repository;

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::error::ErrorKind;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;
use tracing::info;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::models::{NewTodoRequest, Todo, UpdateTodoRequest};
use crate::validation::{FieldErrors, TODO_RULES};

pub use repository::SqliteTodoStore;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Debug, Error)]
pub enum StoreError {
    /// A write violated a required-field constraint.
    #[error("constraint violation: {0}")]
    Invalid(FieldErrors),

    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match constraint_violations(&err) {
            Some(fields) => StoreError::Invalid(fields),
            None => StoreError::Database(err),
        }
    }
}

/// Maps a NOT NULL / CHECK failure on the todos table back to the fields it names.
fn constraint_violations(err: &sqlx::Error) -> Option<FieldErrors> {
    let db_err = err.as_database_error()?;
    if !matches!(
        db_err.kind(),
        ErrorKind::NotNullViolation | ErrorKind::CheckViolation
    ) {
        return None;
    }

    let message = db_err.message();
    let mut fields = FieldErrors::new();
    for rule in TODO_RULES {
        if message.contains(rule.field) {
            fields.insert(rule.field, rule.message);
        }
    }
    (!fields.is_empty()).then_some(fields)
}

/// Persistence for todo entities. Lookups and writes against a missing id
/// return `None` rather than an error.
#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn insert(&self, req: &NewTodoRequest) -> Result<Todo, StoreError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Todo>, StoreError>;
    async fn find_all(&self) -> Result<Vec<Todo>, StoreError>;
    async fn update(&self, id: &str, patch: &UpdateTodoRequest) -> Result<Option<Todo>, StoreError>;
    async fn delete(&self, id: &str) -> Result<Option<Todo>, StoreError>;
    /// Case-insensitive substring match over title and description.
    async fn search(&self, text: &str) -> Result<Vec<Todo>, StoreError>;
    async fn ping(&self) -> Result<(), StoreError>;
}

pub async fn connect(config: &AppConfig) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;

    MIGRATOR.run(&pool).await?;
    info!("database ready at {}", config.database_url);

    Ok(pool)
}

/// Single-connection in-memory database with the schema applied.
pub async fn connect_in_memory() -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

    // every connection to :memory: is a separate database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    MIGRATOR.run(&pool).await?;
    Ok(pool)
}
