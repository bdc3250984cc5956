//! HTTP error type mapping turn failures to status codes and a JSON envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use storebot_core::{BotError, HandlerError};

#[derive(Debug)]
pub enum ApiError {
    /// The request body is not a usable activity.
    BadRequest(String),
    /// The turn failed inside the handler chain.
    Turn(BotError),
    /// Unknown resource on the management API.
    NotFound(String),
}

impl From<BotError> for ApiError {
    fn from(e: BotError) -> Self {
        ApiError::Turn(e)
    }
}

impl From<HandlerError> for ApiError {
    fn from(e: HandlerError) -> Self {
        match e {
            HandlerError::InvalidActivity(msg) => ApiError::BadRequest(msg),
            other => ApiError::Turn(other.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "INVALID_ACTIVITY", msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            ApiError::Turn(BotError::Handler(HandlerError::StateUnavailable(id))) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "STATE_UNAVAILABLE",
                format!("State unavailable for conversation {}", id),
            ),
            ApiError::Turn(BotError::Session(e)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "SESSION_ERROR", e.to_string())
            }
            ApiError::Turn(e) => (StatusCode::INTERNAL_SERVER_ERROR, "TURN_FAILED", e.to_string()),
        };

        let body = json!({
            "error": {
                "code": code,
                "message": message,
            }
        });
        (status, Json(body)).into_response()
    }
}
