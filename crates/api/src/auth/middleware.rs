//! Authentication middleware for Axum

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use inkpost_shared::UserId;

use super::jwt::TokenValidator;
use crate::error::ApiError;

/// Authenticated caller, placed in request extensions by [`require_auth`].
///
/// Handlers read this instead of looking at the token again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: UserId,
}

/// State needed for authentication
#[derive(Clone)]
pub struct AuthState {
    pub validator: TokenValidator,
}

/// Extract the bearer token from the Authorization header.
///
/// The scheme is matched case-insensitively. Anything other than
/// `Bearer <token>` yields `None`.
fn extract_bearer_token(request: &Request) -> Option<&str> {
    let header = request.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Middleware that requires authentication
///
/// Rejected requests never reach the wrapped handler. Every rejection gets the
/// same response regardless of cause.
pub async fn require_auth(
    State(auth_state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    let result = match extract_bearer_token(&request) {
        Some(token) => auth_state
            .validator
            .validate(token)
            .map_err(|_| AuthError::InvalidToken),
        None if request.headers().contains_key(AUTHORIZATION) => Err(AuthError::InvalidAuthFormat),
        None => Err(AuthError::MissingAuth),
    };

    match result {
        Ok(user_id) => {
            tracing::debug!(path = %path, user_id = %user_id, "require_auth: authenticated");
            request.extensions_mut().insert(AuthUser { user_id });
            next.run(request).await
        }
        Err(err) => {
            tracing::info!(path = %path, reason = ?err, "require_auth: rejected");
            err.into_response()
        }
    }
}

/// Why a request was rejected. Only ever logged; the client sees one response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Authentication required")]
    MissingAuth,
    #[error("Invalid authentication format")]
    InvalidAuthFormat,
    #[error("Invalid or expired token")]
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::InvalidToken.into_response()
    }
}
