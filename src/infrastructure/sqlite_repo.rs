use std::{str::FromStr, sync::Arc};

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, QueryBuilder, Sqlite,
};
use tracing::debug;

use crate::domain::{
    repository::TodoRepository,
    todo::{StatusId, Todo, TodoId, UpdateTodo},
};

const SELECT_TODO: &str = "SELECT todos.id AS id, todos.title AS title, todos.status_id AS status_id, statuses.name AS status_name
     FROM todos JOIN statuses ON todos.status_id = statuses.id";

#[derive(Clone)]
pub struct SqliteTodoRepository {
    pool: Arc<Pool<Sqlite>>,
}

impl SqliteTodoRepository {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid database url {database_url}"))?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every connection to `:memory:` opens its own database, so pin it to one.
        let pool = if is_in_memory(database_url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections)
        };
        let pool = pool
            .connect_with(options)
            .await
            .with_context(|| format!("failed to connect to {database_url}"))?;
        Ok(Self { pool: Arc::new(pool) })
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

#[async_trait]
impl TodoRepository for SqliteTodoRepository {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS statuses (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE
            )",
        )
        .execute(&*self.pool)
        .await
        .context("failed to create statuses table")?;
        sqlx::query("INSERT OR IGNORE INTO statuses (id, name) VALUES (1, 'pending'), (2, 'done')")
            .execute(&*self.pool)
            .await
            .context("failed to seed statuses")?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                status_id INTEGER NOT NULL DEFAULT 1 REFERENCES statuses(id)
            )",
        )
        .execute(&*self.pool)
        .await
        .context("failed to create todos table")?;
        Ok(())
    }

    async fn ping(&self) -> Result<i64> {
        let value = sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&*self.pool)
            .await
            .context("liveness query failed")?;
        Ok(value)
    }

    async fn list(&self) -> Result<Vec<Todo>> {
        let todos = sqlx::query_as::<_, Todo>(&format!("{SELECT_TODO} ORDER BY todos.id"))
            .fetch_all(&*self.pool)
            .await
            .context("failed to list todos")?;
        Ok(todos)
    }

    async fn find(&self, id: TodoId) -> Result<Option<Todo>> {
        let todo = sqlx::query_as::<_, Todo>(&format!("{SELECT_TODO} WHERE todos.id = ?1"))
            .bind(id)
            .fetch_optional(&*self.pool)
            .await
            .with_context(|| format!("failed to fetch todo {id}"))?;
        Ok(todo)
    }

    async fn insert(&self, title: &str, status_id: StatusId) -> Result<TodoId> {
        let id = sqlx::query("INSERT INTO todos (title, status_id) VALUES (?1, ?2)")
            .bind(title)
            .bind(status_id)
            .execute(&*self.pool)
            .await
            .context("failed to insert todo")?
            .last_insert_rowid();
        debug!(id, "inserted todo");
        Ok(TodoId(id))
    }

    async fn update(&self, id: TodoId, changes: &UpdateTodo) -> Result<u64> {
        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE todos SET ");
        let mut fields = builder.separated(", ");
        if let Some(title) = &changes.title {
            fields.push("title = ").push_bind_unseparated(title.clone());
        }
        if let Some(status_id) = changes.status_id {
            fields.push("status_id = ").push_bind_unseparated(status_id);
        }
        builder.push(" WHERE id = ").push_bind(id);

        let affected = builder
            .build()
            .execute(&*self.pool)
            .await
            .with_context(|| format!("failed to update todo {id}"))?
            .rows_affected();
        debug!(%id, affected, "updated todo");
        Ok(affected)
    }

    async fn delete(&self, id: TodoId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?1")
            .bind(id)
            .execute(&*self.pool)
            .await
            .with_context(|| format!("failed to delete todo {id}"))?;
        Ok(result.rows_affected())
    }
}
