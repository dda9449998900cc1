use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::chat_log::ChatLogError;
use crate::resume_store::ResumeError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resume error: {0}")]
    Resume(#[from] ResumeError),

    #[error("Chat log error: {0}")]
    ChatLog(#[from] ChatLogError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Resume(e) => {
                tracing::error!("Resume error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "AGENT_ERROR",
                    "Agent processing failed".to_string(),
                )
            }
            AppError::ChatLog(e) => {
                tracing::error!("Chat log error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CHAT_LOG_ERROR",
                    "Chat log could not be read".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Agent processing failed".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

/// Turns a panic caught at the HTTP boundary into the same opaque 500 as any
/// other internal failure. The payload is logged, never returned.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    AppError::Internal(anyhow::anyhow!("request handler panicked: {detail}")).into_response()
}
