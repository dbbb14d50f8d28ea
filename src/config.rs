use std::net::SocketAddr;

use anyhow::{Context, Result};

use crate::http::routing::IdSource;

const DEFAULT_DATABASE_URL: &str = "sqlite://todos.db";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Ignored for in-memory databases, which always use one connection.
    pub max_connections: u32,
    pub id_source: IdSource,
}

impl Config {
    /// Reads `DATABASE_URL`, `BIND_ADDR`, `DATABASE_MAX_CONNECTIONS` and `TODO_ID_SOURCE`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let bind_addr = lookup("BIND_ADDR")
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
            .context("BIND_ADDR must be a socket address such as 127.0.0.1:3000")?;
        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw.trim().parse().context("DATABASE_MAX_CONNECTIONS must be a positive integer")?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        if max_connections == 0 {
            anyhow::bail!("DATABASE_MAX_CONNECTIONS must be a positive integer");
        }
        let id_source = match lookup("TODO_ID_SOURCE") {
            Some(raw) => raw.parse().context("invalid TODO_ID_SOURCE")?,
            None => IdSource::default(),
        };
        Ok(Self { database_url, bind_addr, max_connections, id_source })
    }
}
