use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::models::RequestedId;
use crate::store::StoreError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Product with id {0} does not exist")]
    NotFound(RequestedId),

    #[error("no product id left after {0}")]
    IdsExhausted(i64),

    #[error("failed to persist products: {0}")]
    Persistence(#[from] StoreError),

    #[error("{0}")]
    BadRequest(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Validation(message) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Validation error", "message": message }),
            ),
            Self::NotFound(_) => (
                StatusCode::NOT_FOUND,
                json!({ "error": "Product not found", "message": self.to_string() }),
            ),
            Self::IdsExhausted(_) => {
                error!(error = %self, "Assigning a product id failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Failed to save data" }),
                )
            }
            Self::Persistence(cause) => {
                error!(error = %cause, "Persisting products failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Failed to save data" }),
                )
            }
            Self::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Invalid request body", "message": message }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_echoes_requested_id() {
        let err = AppError::NotFound(RequestedId::Number(99));
        assert_eq!(err.to_string(), "Product with id 99 does not exist");
    }

    #[test]
    fn status_codes_follow_taxonomy() {
        let cases = [
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AppError::NotFound(RequestedId::NaN), StatusCode::NOT_FOUND),
            (
                AppError::Persistence(StoreError::Io {
                    path: "data.json".into(),
                    source: std::io::Error::other("disk full"),
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (AppError::IdsExhausted(i64::MAX), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
