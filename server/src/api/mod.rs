//! HTTP API
//!
//! - `POST /api/rpc/{procedure}`: run a procedure with the JSON body as input
//! - `POST /api/cleanup`: sweep unused images
//! - `GET /healthz`

mod auth;
mod response;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde_json::Value;
use std::sync::Arc;

use crate::commands;
use crate::domain::{DomainError, DomainResult};
use crate::jobs::sweep_unused_images;
use crate::AppState;

pub use auth::bearer_token;
pub use response::{api_data_response, api_error_response, status_for, ApiError};

const MAX_BODY_BYTES: usize = 256 * 1024;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz_handler))
        .route("/api/rpc/{procedure}", post(rpc_handler))
        .route("/api/cleanup", post(cleanup_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

async fn healthz_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    if state.db_state.is_initialized().await {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "database not ready")
    }
}

fn parse_body(body: &Bytes) -> DomainResult<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| DomainError::InvalidInput(format!("Malformed JSON body: {}", e)))
}

async fn rpc_handler(
    State(state): State<Arc<AppState>>,
    Path(procedure): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !commands::is_procedure(&procedure) {
        return api_error_response(&DomainError::NotFound(format!("Unknown procedure: {}", procedure)));
    }

    let result: DomainResult<Value> = async {
        let user = auth::require_session(&state, &headers).await?;
        let input = parse_body(&body)?;
        commands::dispatch(&state, &user, &procedure, input).await
    }
    .await;

    match result {
        Ok(data) => api_data_response(data),
        Err(err) => {
            log::debug!("rpc {} failed: {}", procedure, err);
            api_error_response(&err)
        }
    }
}

async fn cleanup_handler(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Err(err) = auth::check_cleanup_token(&state, &headers) {
        return api_error_response(&err);
    }
    match sweep_unused_images(&state).await {
        Ok(report) => match serde_json::to_value(&report) {
            Ok(data) => api_data_response(data),
            Err(e) => api_error_response(&DomainError::Internal(e.to_string())),
        },
        Err(err) => api_error_response(&err),
    }
}
