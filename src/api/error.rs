use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("No file uploaded")]
    NoFilePresent,

    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("Invalid file identity: {0}")]
    InvalidIdentity(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Payload Too Large: {0}")]
    PayloadTooLarge(String),

    #[error("Image processing failed: {0}")]
    ProcessingFailed(String),

    #[error("Stream failure: {0}")]
    StreamFailure(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),

    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::UnsupportedMediaType(msg) => (StatusCode::UNSUPPORTED_MEDIA_TYPE, msg),
            AppError::NoFilePresent => (StatusCode::BAD_REQUEST, "No file uploaded".to_string()),
            AppError::MissingInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::InvalidIdentity(msg) => {
                // Surfaced as a client error, never corrected to a "safe" path
                tracing::warn!("Rejected file identity: {}", msg);
                (StatusCode::BAD_REQUEST, msg)
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            AppError::ProcessingFailed(msg) => {
                tracing::error!("Processing error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error processing image".to_string(),
                )
            }
            AppError::StreamFailure(msg) => {
                tracing::error!("Stream error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error downloading file".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::Anyhow(e) => {
                tracing::error!("Anyhow error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
