use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error as ThisError;

use crate::server::envelope::Envelope;

#[derive(Debug, ThisError)]
pub enum QuotidianError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for QuotidianError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            QuotidianError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            QuotidianError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            QuotidianError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
            }
            QuotidianError::Database(err) => {
                // Internal detail stays in the log, never in the response.
                tracing::error!(error = %err, "database failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Envelope::failure(message)).into_response()
    }
}
