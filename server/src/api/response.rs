//! Response envelope
//!
//! Success is `{"data": ...}`, failure is `{"error": {"code", "message"}}`
//! with the status code derived from the error code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

use crate::domain::DomainError;

#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    pub code: &'static str,
    pub message: String,
}

impl From<&DomainError> for ApiError {
    fn from(err: &DomainError) -> Self {
        Self {
            code: err.code(),
            message: err.message().to_string(),
        }
    }
}

pub fn status_for(err: &DomainError) -> StatusCode {
    match err {
        DomainError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Upstream(_) => StatusCode::BAD_GATEWAY,
        DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn api_error_response(err: &DomainError) -> Response {
    let status = status_for(err);
    if status.is_server_error() {
        log::error!("{} {}", err.code(), err.message());
    }
    let body = Json(json!({"error": ApiError::from(err)}));
    (status, body).into_response()
}

pub fn api_data_response(data: Value) -> Response {
    (StatusCode::OK, Json(json!({"data": data}))).into_response()
}
