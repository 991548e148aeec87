use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::db::StoreError;
use crate::validation::FieldErrors;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed.")]
    Validation(FieldErrors),

    #[error("Todo with id: {0} not found.")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn not_found(id: &str) -> Self {
        AppError::NotFound(id.to_string())
    }

    pub fn name(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "ValidationError",
            AppError::NotFound(_) => "NotFoundError",
            AppError::BadRequest(_) => "BadRequestError",
            _ => "ServerError",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            AppError::Validation(fields) => Some(fields),
            _ => None,
        }
    }
}

impl From<FieldErrors> for AppError {
    fn from(fields: FieldErrors) -> Self {
        AppError::Validation(fields)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Invalid(fields) => AppError::Validation(fields),
            StoreError::Database(e) => AppError::Database(e),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub name: &'static str,
    pub success: bool,
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<FieldErrors>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let Some(fields) = self.field_errors() {
            debug!(fields = ?fields.fields().collect::<Vec<_>>(), "rejected todo payload");
        }

        let message = match &self {
            AppError::Validation(_) | AppError::NotFound(_) | AppError::BadRequest(_) => {
                self.to_string()
            }
            other => {
                error!("request failed: {}", other);
                "Something went wrong".to_string()
            }
        };

        let body = Json(ErrorResponse {
            name: self.name(),
            success: false,
            status: status.as_u16(),
            message,
            validation_errors: match self {
                AppError::Validation(fields) => Some(fields),
                _ => None,
            },
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        serde_json::from_slice(&bytes).expect("Body is not json")
    }

    #[tokio::test]
    async fn test_validation_error_response_carries_fields() {
        let fields = validation::validate_todo(None, Some("x")).unwrap_err();
        let response = AppError::from(fields).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["name"], "ValidationError");
        assert_eq!(body["success"], false);
        assert_eq!(body["status"], 400);
        assert_eq!(body["message"], "Validation failed.");
        assert_eq!(body["validationErrors"]["title"], "Please enter todo title.");
        assert!(body["validationErrors"].get("description").is_none());
    }

    #[tokio::test]
    async fn test_not_found_response_has_no_field_detail() {
        let response = AppError::not_found("abc").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["name"], "NotFoundError");
        assert_eq!(body["message"], "Todo with id: abc not found.");
        assert!(body.get("validationErrors").is_none());
    }

    #[tokio::test]
    async fn test_database_error_is_masked() {
        let response = AppError::Database(sqlx::Error::PoolClosed).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["name"], "ServerError");
        assert_eq!(body["message"], "Something went wrong");
    }

    #[tokio::test]
    async fn test_bad_request_response_shape() {
        let response = AppError::BadRequest("Failed to parse the request body as JSON".to_string())
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["name"], "BadRequestError");
        assert_eq!(body["success"], false);
        assert_eq!(body["status"], 400);
        assert_eq!(body["message"], "Failed to parse the request body as JSON");
        assert!(body.get("validationErrors").is_none());
    }

    #[test]
    fn test_store_error_mapping() {
        let fields = validation::validate_todo(Some("t"), None).unwrap_err();
        assert!(matches!(
            AppError::from(StoreError::Invalid(fields)),
            AppError::Validation(f) if f.fields().eq(["description"])
        ));
        assert!(matches!(
            AppError::from(StoreError::Database(sqlx::Error::RowNotFound)),
            AppError::Database(_)
        ));
    }
}
