//! Login route

use axum::{extract::State, Json};
use inkpost_shared::{UserAction, UserInput};
use serde::Serialize;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

/// Exchange email and password for a bearer token.
///
/// Unknown email and wrong password are reported identically, and both run
/// one full password verification.
pub async fn login(
    State(state): State<AppState>,
    Json(mut req): Json<UserInput>,
) -> ApiResult<Json<LoginResponse>> {
    req.prepare();
    req.validate(UserAction::Login)?;

    let user = state.store.find_user_by_email(&req.email).await;
    let stored_hash = match &user {
        Some(user) => user.password_hash.clone(),
        None => state.decoy_hash.to_string(),
    };

    let verifier = state.verifier.clone();
    let password = req.password;
    let matched = tokio::task::spawn_blocking(move || verifier.verify(&password, &stored_hash))
        .await
        .map_err(|e| {
            tracing::error!(error = ?e, "login: verification task failed");
            ApiError::Internal
        })??;

    let user_id = match user {
        Some(user) if matched => user.id,
        _ => {
            tracing::debug!("login: invalid credentials");
            return Err(ApiError::InvalidCredentials);
        }
    };

    let token = state.issuer.issue(user_id)?;
    tracing::info!(user_id = %user_id, "login: success");

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer",
        expires_in: state.issuer.ttl_seconds(),
    }))
}
