use async_trait::async_trait;
use super::todo::{StatusId, Todo, TodoId, UpdateTodo};

/// Statement-level access to the todo store. Each method is one SQL statement.
#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    async fn init(&self) -> anyhow::Result<()>;
    /// Liveness probe; a healthy store answers `1`.
    async fn ping(&self) -> anyhow::Result<i64>;
    async fn list(&self) -> anyhow::Result<Vec<Todo>>;
    async fn find(&self, id: TodoId) -> anyhow::Result<Option<Todo>>;
    /// Returns the generated identifier.
    async fn insert(&self, title: &str, status_id: StatusId) -> anyhow::Result<TodoId>;
    /// Returns the number of rows affected.
    async fn update(&self, id: TodoId, changes: &UpdateTodo) -> anyhow::Result<u64>;
    /// Returns the number of rows affected.
    async fn delete(&self, id: TodoId) -> anyhow::Result<u64>;
}
