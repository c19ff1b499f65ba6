//! API error types and handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use inkpost_shared::{StoreError, ValidationError};
use serde_json::json;

use crate::auth::{gate::AuthorizationDenied, jwt::JwtError, password::PasswordError};

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // Authentication and authorization. All three render identically.
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Not the owner of this resource")]
    Forbidden,

    // Validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Invalid request: {0}")]
    BadRequest(String),

    // Resource errors
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),

    // Internal errors
    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::InvalidCredentials | ApiError::InvalidToken | ApiError::Forbidden => {
                (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
            }

            ApiError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),

            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),

            ApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::EmailTaken | StoreError::NicknameTaken | StoreError::TitleTaken => {
                ApiError::Conflict(err.to_string())
            }
            StoreError::NotFound("post") => ApiError::NotFound("Post not found"),
            StoreError::NotFound(_) => ApiError::NotFound("User not found"),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        tracing::error!(error = %err, "Password hashing error");
        ApiError::Internal
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Invalid => ApiError::InvalidToken,
            JwtError::Encoding(msg) => {
                tracing::error!(error = %msg, "Token signing failed");
                ApiError::Internal
            }
        }
    }
}

impl From<AuthorizationDenied> for ApiError {
    fn from(_: AuthorizationDenied) -> Self {
        ApiError::Forbidden
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
