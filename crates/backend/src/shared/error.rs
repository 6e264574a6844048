use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use contracts::shared::search::SearchError;
use serde_json::json;
use thiserror::Error;

/// Ошибки REST API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    #[error("Invalid search request: {0}")]
    InvalidSearch(#[from] SearchError),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::UnknownEntity(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidSearch(_) | ApiError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::warn!("{}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
