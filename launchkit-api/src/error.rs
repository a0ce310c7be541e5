//! HTTP mapping for the common error taxonomy
//!
//! Handlers return `ApiResult<T>`; the IntoResponse impl converts each
//! error class to its status code and a `{ "error": … }` JSON body.
//! Unexpected errors (database, IO, internal) are logged server-side
//! and surfaced to the caller as a generic 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use launchkit_common::Error;
use serde_json::json;
use tracing::error;

/// Handler result type
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Newtype so the common Error can implement axum's IntoResponse here
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError(Error::Database(err))
    }
}

impl ApiError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        ApiError(Error::Unauthorized(msg.into()))
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        ApiError(Error::Forbidden(msg.into()))
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ApiError(Error::NotFound(msg.into()))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError(Error::Validation(msg.into()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            Error::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            Error::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Error::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            // The review API reports a double-review as 400, not 409
            Error::Conflict(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Error::Database(e) => {
                error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            Error::Io(e) => {
                error!("IO error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            Error::Config(e) | Error::Internal(e) => {
                error!("Internal error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
