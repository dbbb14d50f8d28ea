use axum::Json;
use serde_json::{json, Value};

use crate::application::todo_service::TodoService;
use crate::http::routing::{AppState, RouteContext};
use crate::http::types::ApiError;

pub async fn health_check<S: TodoService>(state: AppState<S>, _ctx: RouteContext) -> Result<Json<Value>, ApiError> {
    state
        .service
        .health()
        .await
        .map_err(|e| ApiError::internal("Database connection failed", e))?;
    Ok(Json(json!({ "status": "ok", "database": "connected" })))
}
