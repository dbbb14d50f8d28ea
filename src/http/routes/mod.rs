pub mod health;
pub mod todos;

use axum::http::Method;

use crate::application::todo_service::TodoService;
use crate::http::routing::{AppState, IdSource, RouteTable};

/// The service's bindings, in match order.
pub fn table<S: TodoService + Clone>(id_source: IdSource) -> Result<RouteTable<AppState<S>>, regex::Error> {
    let by_id = match id_source {
        IdSource::Query => "/todos",
        IdSource::Path => r"/todos/(\d+)",
    };
    RouteTable::new()
        .route(Method::GET, "/todos", todos::list_todos::<S>)?
        .route(Method::GET, "/health", health::health_check::<S>)?
        .route(Method::GET, r"/todos/(\d+)", todos::get_todo::<S>)?
        .route(Method::POST, "/todos", todos::create_todo::<S>)?
        .route(Method::PUT, by_id, todos::update_todo::<S>)?
        .route(Method::DELETE, by_id, todos::delete_todo::<S>)
}
