use axum::Json;
use axum::extract::{FromRequest, Path, Query};
use axum::routing::put;
use axum::{Router, extract::State, http::StatusCode, routing::get};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::models::*;
use crate::state::AppState;

/// `Json` whose rejections are reported through `AppError`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
struct AppJson<T>(T);

#[derive(Deserialize)]
struct SearchParams {
    q: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/todos", get(list_todos).post(create_todo))
        .route("/api/todos/search", get(search_todos))
        .route("/api/todos/completed/{status}", get(filter_todos_by_completion))
        .route(
            "/api/todos/{id}",
            get(get_todo)
                .put(update_todo)
                .patch(update_todo)
                .delete(delete_todo),
        )
        .route("/api/todos/{id}/complete", put(complete_todo).patch(complete_todo))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.todos.ping().await?;
    Ok(StatusCode::OK)
}

async fn create_todo(
    State(state): State<AppState>,
    AppJson(req): AppJson<NewTodoRequest>
) -> Result<(StatusCode, Json<Todo>), AppError> {
    let todo = state.todos.create(req).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, AppError> {
    let todos = state.todos.list_all().await?;
    Ok(Json(todos))
}

async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<String>
) -> Result<Json<Todo>, AppError> {
    let todo = state.todos.get_by_id(&id).await?;
    Ok(Json(todo))
}

async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(req): AppJson<UpdateTodoRequest>
) -> Result<Json<Todo>, AppError> {
    let todo = state.todos.update_by_id(&id, req).await?;
    Ok(Json(todo))
}

async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>
) -> Result<Json<Todo>, AppError> {
    let todo = state.todos.delete_by_id(&id).await?;
    Ok(Json(todo))
}

async fn complete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>
) -> Result<Json<Todo>, AppError> {
    let todo = state.todos.complete_by_id(&id).await?;
    Ok(Json(todo))
}

async fn filter_todos_by_completion(
    State(state): State<AppState>,
    Path(status): Path<String>
) -> Result<Json<Vec<Todo>>, AppError> {
    let todos = state.todos.filter_by_completion(&status).await?;
    Ok(Json(todos))
}

async fn search_todos(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>
) -> Result<Json<Vec<Todo>>, AppError> {
    let todos = state.todos.search(params.q.as_deref()).await?;
    Ok(Json(todos))
}
