use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::decode::DecodeError;
use crate::llm_client::DispatchError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("Decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("Unexpected AI output shape: {0}")]
    Shape(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Dispatch(DispatchError::Configuration) => {
                tracing::error!("dispatch refused: provider credential missing");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "AI_NOT_CONFIGURED",
                    "The AI provider is not configured".to_string(),
                )
            }
            AppError::Dispatch(e) => {
                tracing::error!("dispatch failed: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "AI_UPSTREAM_ERROR",
                    "The AI provider request failed. Please try again.".to_string(),
                )
            }
            AppError::Decode(e) => {
                // Provider text is logged server-side only, truncated.
                tracing::error!(
                    "decode failed: {}; raw (first 500 chars): {}",
                    e.reason,
                    e.original.chars().take(500).collect::<String>()
                );
                (
                    StatusCode::BAD_GATEWAY,
                    "AI_FORMAT_ERROR",
                    "The AI returned an unexpected format. Please try again.".to_string(),
                )
            }
            AppError::Shape(msg) => {
                tracing::error!("shape validation failed: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "AI_FORMAT_ERROR",
                    "The AI returned an unexpected format. Please try again.".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
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
