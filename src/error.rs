use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::tmdb::TmdbError;

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    source: anyhow::Error,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, source: anyhow::anyhow!(msg.into()) }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.source.fmt(f)
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self { status: StatusCode::INTERNAL_SERVER_ERROR, source: err }
    }
}

impl From<TmdbError> for AppError {
    fn from(err: TmdbError) -> Self {
        Self { status: StatusCode::BAD_GATEWAY, source: anyhow::Error::new(err) }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::warn!(status = self.status.as_u16(), error = %self.source, "request failed");
        }
        (self.status, Json(json!({ "error": self.source.to_string() }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
