use serde::{Deserialize, Serialize};

/// Status every new todo starts in (`pending` in the seeded table).
pub const DEFAULT_STATUS_ID: StatusId = StatusId(1);

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(transparent)]
pub struct TodoId(pub i64);

impl std::str::FromStr for TodoId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> { s.parse().map(TodoId) }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { self.0.fmt(f) }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(transparent)]
pub struct StatusId(pub i64);

/// A todo row joined with the name of its status.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, sqlx::FromRow)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub status_id: StatusId,
    #[serde(rename = "status")]
    pub status_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTodo {
    pub title: Option<String>,
}

/// Partial update. Only the fields that are `Some` end up in the `SET` clause.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub status_id: Option<StatusId>,
}

impl UpdateTodo {
    pub fn is_empty(&self) -> bool { self.title.is_none() && self.status_id.is_none() }
}

/// Trims a raw title; `None` when nothing is left.
pub fn normalize_title(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim).filter(|t| !t.is_empty()).map(str::to_owned)
}
