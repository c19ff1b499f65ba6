//! User management routes

use axum::{
    extract::{Extension, Path, State},
    http::{header::LOCATION, StatusCode},
    response::IntoResponse,
    Json,
};
use inkpost_shared::{User, UserAction, UserId, UserInput};

use crate::{
    auth::{authorize, AuthUser, CredentialVerifier},
    error::{ApiError, ApiResult},
    state::AppState,
};

/// Hash off the async runtime; Argon2 is deliberately slow.
pub(crate) async fn hash_password(
    verifier: &CredentialVerifier,
    password: String,
) -> ApiResult<String> {
    let verifier = verifier.clone();
    tokio::task::spawn_blocking(move || verifier.hash(&password))
        .await
        .map_err(|e| {
            tracing::error!(error = ?e, "password hashing task failed");
            ApiError::Internal
        })?
        .map_err(ApiError::from)
}

fn parse_user_id(raw: &str) -> ApiResult<UserId> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid user id: {}", raw)))
}

/// Register a new account
pub async fn create_user(
    State(state): State<AppState>,
    Json(mut req): Json<UserInput>,
) -> ApiResult<impl IntoResponse> {
    req.prepare();
    req.validate(UserAction::Create)?;

    let password_hash = hash_password(&state.verifier, req.password).await?;
    let user = state
        .store
        .create_user(&req.nickname, &req.email, password_hash)
        .await?;

    tracing::info!(user_id = %user.id, "User created");
    let location = format!("/users/{}", user.id);
    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(user)))
}

/// List all users
pub async fn list_users(State(state): State<AppState>) -> Json<Vec<User>> {
    Json(state.store.list_users().await)
}

/// Get a single user
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<User>> {
    let id = parse_user_id(&id)?;
    state
        .store
        .find_user(id)
        .await
        .map(Json)
        .ok_or(ApiError::NotFound("User not found"))
}

/// Update a user's profile and password. Only the user themselves may do this.
pub async fn update_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(mut req): Json<UserInput>,
) -> ApiResult<Json<User>> {
    let id = parse_user_id(&id)?;
    authorize(auth_user.user_id, id).require()?;

    req.prepare();
    req.validate(UserAction::Update)?;

    // The credential record is replaced as a whole, never patched.
    let password_hash = hash_password(&state.verifier, req.password).await?;
    let user = state
        .store
        .update_user(id, &req.nickname, &req.email, password_hash)
        .await?;

    tracing::info!(user_id = %user.id, "User updated");
    Ok(Json(user))
}

/// Delete an account and its posts. Only the user themselves may do this.
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_user_id(&id)?;
    authorize(auth_user.user_id, id).require()?;

    state.store.delete_user(id).await?;

    tracing::info!(user_id = %id, "User deleted");
    Ok((StatusCode::NO_CONTENT, [("Entity", id.to_string())]))
}
