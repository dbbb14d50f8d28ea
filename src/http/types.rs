use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Every failure a handler can report. Converted to status + JSON body in one place.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Not Found")]
    RouteNotFound,
    /// The request body could not be read, e.g. it exceeds the body limit.
    #[error("{message}")]
    Body { status: StatusCode, message: String },
    #[error("{context}: {detail}")]
    Internal { context: String, detail: String },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self { Self::BadRequest(message.into()) }

    pub fn not_found(message: impl Into<String>) -> Self { Self::NotFound(message.into()) }

    /// Store errors keep their full chain in `detail`.
    pub fn internal(context: impl Into<String>, err: anyhow::Error) -> Self {
        Self::Internal { context: context.into(), detail: format!("{err:#}") }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) | Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Body { status, .. } => *status,
        }
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        Self::Body { status: rejection.status(), message: rejection.body_text() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Internal { context, detail } => {
                tracing::error!(%context, %detail, "request failed");
                json!({ "status": "error", "error": context, "message": detail })
            }
            other => {
                tracing::warn!(status = status.as_u16(), error = %other, "request rejected");
                json!({ "error": other.to_string() })
            }
        };
        (status, Json(body)).into_response()
    }
}
