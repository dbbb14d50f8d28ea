use crate::domain::repository::TodoRepository;
use crate::domain::todo::{Todo, TodoId, UpdateTodo, DEFAULT_STATUS_ID};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;

/// The operations the HTTP handlers need. Each runs at most two store
/// statements and none of them are wrapped in a transaction.
#[async_trait]
pub trait TodoService: Send + Sync + 'static {
    /// Fails unless the store answers the liveness probe with `1`.
    async fn health(&self) -> Result<()>;
    async fn list(&self) -> Result<Vec<Todo>>;
    async fn get(&self, id: TodoId) -> Result<Option<Todo>>;
    /// Inserts with the default status and reads the row back.
    async fn create(&self, title: String) -> Result<Todo>;
    /// `None` when no row carries `id`.
    async fn update(&self, id: TodoId, changes: UpdateTodo) -> Result<Option<Todo>>;
    /// Returns the row as it was before removal, `None` when absent.
    async fn delete(&self, id: TodoId) -> Result<Option<Todo>>;
}

#[derive(Clone)]
pub struct TodoServiceImpl<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoServiceImpl<R> {
    pub fn new(repo: R) -> Self { Self { repo } }
}

#[async_trait]
impl<R: TodoRepository> TodoService for TodoServiceImpl<R> {
    async fn health(&self) -> Result<()> {
        let value = self.repo.ping().await?;
        if value != 1 {
            bail!("unexpected liveness result {value}");
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Todo>> { self.repo.list().await }

    async fn get(&self, id: TodoId) -> Result<Option<Todo>> { self.repo.find(id).await }

    async fn create(&self, title: String) -> Result<Todo> {
        let id = self.repo.insert(&title, DEFAULT_STATUS_ID).await?;
        self.repo
            .find(id)
            .await?
            .with_context(|| format!("todo {id} missing right after insert"))
    }

    async fn update(&self, id: TodoId, changes: UpdateTodo) -> Result<Option<Todo>> {
        if self.repo.update(id, &changes).await? == 0 {
            return Ok(None);
        }
        self.repo.find(id).await
    }

    async fn delete(&self, id: TodoId) -> Result<Option<Todo>> {
        let Some(todo) = self.repo.find(id).await? else { return Ok(None) };
        if self.repo.delete(id).await? == 0 {
            return Ok(None);
        }
        Ok(Some(todo))
    }
}
