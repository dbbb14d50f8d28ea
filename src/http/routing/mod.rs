pub mod table;

use std::{str::FromStr, sync::Arc};

use anyhow::bail;
use axum::{
    body::Bytes,
    extract::rejection::BytesRejection,
    http::{Method, Uri},
    response::IntoResponse,
    Router,
};
use tower_http::trace::TraceLayer;

use crate::application::todo_service::TodoService;
use crate::http::routes;
use crate::http::types::ApiError;

pub use table::{RouteContext, RouteTable};

/// Where `PUT` and `DELETE` read the todo identifier from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdSource {
    /// `/todos?id=7`
    #[default]
    Query,
    /// `/todos/7`
    Path,
}

impl FromStr for IdSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "query" => Ok(Self::Query),
            "path" => Ok(Self::Path),
            other => bail!("unknown id source {other:?}, expected \"query\" or \"path\""),
        }
    }
}

#[derive(Clone)]
pub struct AppState<S: TodoService> {
    pub service: S,
    pub id_source: IdSource,
}

/// Mounts the route table as the router's only service.
pub fn app<S: TodoService + Clone>(state: AppState<S>) -> anyhow::Result<Router> {
    let table = Arc::new(routes::table::<S>(state.id_source)?);
    tracing::debug!(routes = table.len(), id_source = ?state.id_source, "route table built");

    let dispatch = move |method: Method, uri: Uri, body: Result<Bytes, BytesRejection>| {
        let table = Arc::clone(&table);
        let state = state.clone();
        async move {
            match body {
                Ok(body) => table.dispatch(state, &method, &uri, body).await,
                Err(rejection) => ApiError::from(rejection).into_response(),
            }
        }
    };
    Ok(Router::new().fallback(dispatch).layer(TraceLayer::new_for_http()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_source_parses_case_insensitively() {
        assert_eq!("query".parse::<IdSource>().unwrap(), IdSource::Query);
        assert_eq!(" PATH ".parse::<IdSource>().unwrap(), IdSource::Path);
        assert!("header".parse::<IdSource>().is_err());
        assert_eq!(IdSource::default(), IdSource::Query);
    }
}
