//! API error type and its mapping onto HTTP responses.
//!
//! ## Status Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ValidationError            → 400 { "error": ... }                      │
//! │  MalformedBody (bad JSON)   → 400 { "error": ... }                      │
//! │  Unauthorized (bad login)   → 401 { "error": ... }                      │
//! │  DbError::NotFound          → 404 { "error": ... }                      │
//! │  any other DbError          → 500 { "success": false, "error": ...,    │
//! │  (incl. InsufficientStock)          "details": ... }                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failed checkout reports through the 500 shape with the insufficient
//! batch named in `details`; by then the unit of work has already rolled
//! back, so the client can simply retry with a corrected cart.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use lylas_core::ValidationError;
use lylas_db::DbError;

/// Errors a handler can surface to the client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The request body failed to deserialize (missing or mistyped
    /// field, invalid JSON).
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    #[error("invalid credentials")]
    Unauthorized,

    #[error(transparent)]
    Db(#[from] DbError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(err) => {
                warn!(%err, "Request rejected by validation");
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": err.to_string() })),
                )
                    .into_response()
            }

            ApiError::MalformedBody(detail) => {
                warn!(%detail, "Request body rejected");
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": detail })),
                )
                    .into_response()
            }

            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "invalid username or password" })),
            )
                .into_response(),

            ApiError::Db(DbError::NotFound { entity, id }) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": format!("{entity} not found: {id}") })),
            )
                .into_response(),

            ApiError::Db(err) => {
                error!(%err, "Store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "error": "operation failed",
                        "details": err.to_string(),
                    })),
                )
                    .into_response()
            }
        }
    }
}

/// Result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;
