use axum::{http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::info;

use crate::application::todo_service::TodoService;
use crate::domain::todo::{normalize_title, CreateTodo, Todo, TodoId, UpdateTodo};
use crate::http::routing::{AppState, RouteContext};
use crate::http::types::ApiError;

const TODO_NOT_FOUND: &str = "Todo not found";

pub async fn list_todos<S: TodoService>(state: AppState<S>, _ctx: RouteContext) -> Result<Json<Value>, ApiError> {
    let todos = state.service.list().await.map_err(|e| ApiError::internal("Failed to get todos", e))?;
    Ok(Json(json!({ "status": "ok", "data": todos })))
}

pub async fn get_todo<S: TodoService>(state: AppState<S>, ctx: RouteContext) -> Result<Json<Todo>, ApiError> {
    let id: TodoId = ctx
        .param(0)
        .and_then(|raw| raw.parse().ok())
        .ok_or_else(|| ApiError::bad_request("A valid id is required"))?;
    let todo = state.service.get(id).await.map_err(|e| ApiError::internal("Failed to get todo", e))?;
    todo.map(Json).ok_or_else(|| ApiError::not_found(TODO_NOT_FOUND))
}

/// A body that is not JSON, or whose `title` is not a string, counts as a missing title.
pub async fn create_todo<S: TodoService>(state: AppState<S>, ctx: RouteContext) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let input: CreateTodo = serde_json::from_slice(&ctx.body).unwrap_or_default();
    let title = normalize_title(input.title.as_deref()).ok_or_else(|| ApiError::bad_request("Title is required"))?;

    let todo = state.service.create(title).await.map_err(|e| ApiError::internal("Failed to create todo", e))?;
    info!(id = %todo.id, "todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn update_todo<S: TodoService>(state: AppState<S>, ctx: RouteContext) -> Result<Json<Todo>, ApiError> {
    let id = ctx.todo_id(state.id_source)?;
    let mut changes: UpdateTodo =
        serde_json::from_slice(&ctx.body).map_err(|_| ApiError::bad_request("Invalid JSON body"))?;
    if changes.is_empty() {
        return Err(ApiError::bad_request("No fields to update"));
    }
    if let Some(raw) = changes.title.take() {
        let title = normalize_title(Some(&raw)).ok_or_else(|| ApiError::bad_request("Title must not be empty"))?;
        changes.title = Some(title);
    }

    let todo = state
        .service
        .update(id, changes)
        .await
        .map_err(|e| ApiError::internal("Failed to update todo", e))?;
    todo.map(Json).ok_or_else(|| ApiError::not_found(TODO_NOT_FOUND))
}

pub async fn delete_todo<S: TodoService>(state: AppState<S>, ctx: RouteContext) -> Result<Json<Todo>, ApiError> {
    let id = ctx.todo_id(state.id_source)?;
    let deleted = state.service.delete(id).await.map_err(|e| ApiError::internal("Failed to delete todo", e))?;
    match deleted {
        Some(todo) => {
            info!(%id, "todo deleted");
            Ok(Json(todo))
        }
        None => Err(ApiError::not_found(TODO_NOT_FOUND)),
    }
}
