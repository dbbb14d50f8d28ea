//! Ordered method + regex dispatch.
//!
//! Routes are tried in the order they were registered and the first pattern
//! that matches the whole request path wins. Specificity plays no part, so
//! register narrow patterns before broad ones. Capture groups reach the handler
//! as positional [`RouteContext::params`].

use std::{collections::HashMap, future::Future, pin::Pin, sync::Arc};

use axum::{
    body::Bytes,
    extract::Query,
    http::{Method, Uri},
    response::{IntoResponse, Response},
};
use regex::Regex;
use tracing::debug;

use crate::domain::todo::TodoId;
use crate::http::types::ApiError;

use super::IdSource;

type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send>>;
type BoxedHandler<T> = Arc<dyn Fn(T, RouteContext) -> BoxFuture + Send + Sync>;

/// What a matched route hands to its handler.
#[derive(Debug, Clone, Default)]
pub struct RouteContext {
    /// Capture groups of the matched pattern, in order. Unmatched optional groups are empty.
    pub params: Vec<String>,
    pub query: HashMap<String, String>,
    pub body: Bytes,
}

impl RouteContext {
    pub fn param(&self, index: usize) -> Option<&str> { self.params.get(index).map(String::as_str) }

    pub fn query(&self, key: &str) -> Option<&str> { self.query.get(key).map(String::as_str) }

    /// Identifier of the targeted todo, read from wherever `source` says the
    /// route carries it.
    pub fn todo_id(&self, source: IdSource) -> Result<TodoId, ApiError> {
        let raw = match source {
            IdSource::Query => self.query("id"),
            IdSource::Path => self.param(0),
        };
        raw.and_then(|raw| raw.trim().parse().ok())
            .ok_or_else(|| ApiError::bad_request("A valid id is required"))
    }
}

struct Route<T> {
    method: Method,
    pattern: Regex,
    handler: BoxedHandler<T>,
}

pub struct RouteTable<T> {
    routes: Vec<Route<T>>,
}

impl<T> Default for RouteTable<T> {
    fn default() -> Self { Self { routes: Vec::new() } }
}

impl<T: Clone + Send + Sync + 'static> RouteTable<T> {
    pub fn new() -> Self { Self::default() }

    /// Appends a binding. `pattern` is anchored to the whole path.
    pub fn route<H, Fut, R>(mut self, method: Method, pattern: &str, handler: H) -> Result<Self, regex::Error>
    where
        H: Fn(T, RouteContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse,
    {
        let pattern = Regex::new(&format!("^(?:{pattern})$"))?;
        let handler: BoxedHandler<T> = Arc::new(move |state: T, ctx: RouteContext| -> BoxFuture {
            let fut = handler(state, ctx);
            Box::pin(async move { fut.await.into_response() })
        });
        self.routes.push(Route { method, pattern, handler });
        Ok(self)
    }

    pub fn len(&self) -> usize { self.routes.len() }

    pub fn is_empty(&self) -> bool { self.routes.is_empty() }

    /// Position of the first binding for `method` matching `path`, with its captures.
    pub fn resolve(&self, method: &Method, path: &str) -> Option<(usize, Vec<String>)> {
        self.routes
            .iter()
            .enumerate()
            .filter(|(_, route)| route.method == *method)
            .find_map(|(index, route)| {
                let caps = route.pattern.captures(path)?;
                let params = caps
                    .iter()
                    .skip(1)
                    .map(|m| m.map_or_else(String::new, |m| m.as_str().to_owned()))
                    .collect();
                Some((index, params))
            })
    }

    /// Runs the handler of the first matching binding, or answers 404.
    pub async fn dispatch(&self, state: T, method: &Method, uri: &Uri, body: Bytes) -> Response {
        let path = uri.path();
        let Some((index, params)) = self.resolve(method, path) else {
            debug!(%method, path, "no route matched");
            return ApiError::RouteNotFound.into_response();
        };
        let route = &self.routes[index];
        debug!(%method, path, pattern = %route.pattern, "route matched");

        let query = Query::<HashMap<String, String>>::try_from_uri(uri)
            .map(|Query(query)| query)
            .unwrap_or_default();
        (route.handler)(state, RouteContext { params, query, body }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::to_bytes, http::StatusCode, Json};
    use serde_json::{json, Value};

    async fn echo(tag: &'static str, ctx: RouteContext) -> Json<Value> {
        Json(json!({ "route": tag, "params": ctx.params, "id": ctx.query("id") }))
    }

    fn table() -> RouteTable<()> {
        RouteTable::new()
            .route(Method::GET, "/todos", |_, ctx| echo("list", ctx))
            .unwrap()
            .route(Method::GET, r"/todos/(\d+)", |_, ctx| echo("by-id", ctx))
            .unwrap()
            .route(Method::GET, r"/todos/(.+)", |_, ctx| echo("catch-all", ctx))
            .unwrap()
            .route(Method::DELETE, "/todos", |_, ctx| echo("delete", ctx))
            .unwrap()
    }

    async fn call(table: &RouteTable<()>, method: Method, uri: &str) -> (StatusCode, Value) {
        let uri: Uri = uri.parse().unwrap();
        let res = table.dispatch((), &method, &uri, Bytes::new()).await;
        let status = res.status();
        let bytes = to_bytes(res.into_body(), 64 * 1024).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn first_registered_match_wins() {
        let table = table();
        let (_, body) = call(&table, Method::GET, "/todos/12").await;
        assert_eq!(body["route"], "by-id");
        assert_eq!(body["params"], json!(["12"]));

        let (_, body) = call(&table, Method::GET, "/todos/abc").await;
        assert_eq!(body["route"], "catch-all");
    }

    #[tokio::test]
    async fn patterns_match_the_whole_path() {
        let table = table();
        let (status, body) = call(&table, Method::GET, "/todos/").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Not Found" }));

        let (status, _) = call(&table, Method::GET, "/api/todos").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn query_string_is_ignored_for_matching_but_exposed() {
        let (status, body) = call(&table(), Method::DELETE, "/todos?id=9").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["route"], "delete");
        assert_eq!(body["id"], "9");
    }

    #[tokio::test]
    async fn unknown_method_is_not_found() {
        let (status, body) = call(&table(), Method::PATCH, "/todos").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not Found");
    }

    #[test]
    fn resolve_reports_binding_position() {
        let table = table();
        assert_eq!(table.len(), 4);
        assert!(!table.is_empty());
        assert!(RouteTable::<()>::new().is_empty());
        assert_eq!(table.resolve(&Method::GET, "/todos"), Some((0, vec![])));
        assert_eq!(table.resolve(&Method::DELETE, "/todos"), Some((3, vec![])));
        assert_eq!(table.resolve(&Method::PUT, "/todos"), None);
    }

    #[test]
    fn invalid_pattern_is_rejected_at_registration() {
        let result = RouteTable::<()>::new().route(Method::GET, "/todos/(", |_, ctx| echo("bad", ctx));
        assert!(result.is_err());
    }

    #[test]
    fn todo_id_follows_the_configured_source() {
        let ctx = RouteContext {
            params: vec!["4".into()],
            query: HashMap::from([("id".to_string(), "11".to_string())]),
            body: Bytes::new(),
        };
        assert_eq!(ctx.todo_id(IdSource::Path).unwrap(), TodoId(4));
        assert_eq!(ctx.todo_id(IdSource::Query).unwrap(), TodoId(11));

        let ctx = RouteContext { query: HashMap::from([("id".to_string(), "abc".to_string())]), ..Default::default() };
        assert!(matches!(ctx.todo_id(IdSource::Query), Err(ApiError::BadRequest(_))));
        assert!(matches!(RouteContext::default().todo_id(IdSource::Query), Err(ApiError::BadRequest(_))));
    }
}
