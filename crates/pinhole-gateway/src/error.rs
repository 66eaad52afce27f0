use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pinhole_qrcode::QrCodeError;
use pinhole_redirector::RedirectorError;
use pinhole_shortener::ShortenerError;
use serde::Serialize;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Shortener(#[from] ShortenerError),
    #[error(transparent)]
    Redirector(#[from] RedirectorError),
    #[error(transparent)]
    QrCode(#[from] QrCodeError),
    #[error("{0}")]
    BadRequest(String),
    #[error("URL not found")]
    NotFound,
}

/// JSON error response body.
#[derive(Debug, Clone, Serialize)]
struct ErrorResponse {
    error: String,
}

const INTERNAL_ERROR: &str = "An internal error occurred";

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
            Self::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            Self::Shortener(err) => match err {
                ShortenerError::AliasConflict(_) => (
                    StatusCode::BAD_REQUEST,
                    "Custom ID already taken".to_string(),
                ),
                ShortenerError::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
                ShortenerError::InvalidShortCode(_) => {
                    (StatusCode::BAD_REQUEST, err.to_string())
                }
                ShortenerError::Exhausted { .. } => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "No free short ID available, try again".to_string(),
                ),
                ShortenerError::NotFound(_) => {
                    (StatusCode::NOT_FOUND, AppError::NotFound.to_string())
                }
                ShortenerError::Storage(_) => {
                    tracing::error!(error = %err, "storage error");
                    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR.to_string())
                }
            },
            Self::Redirector(err) => {
                tracing::error!(error = %err, "redirect failed");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR.to_string())
            }
            Self::QrCode(err) => {
                tracing::error!(error = %err, "QR code error");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = self.status_and_message();
        (status, Json(ErrorResponse { error })).into_response()
    }
}
