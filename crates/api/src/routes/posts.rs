//! Post routes

use axum::{
    extract::{Extension, Path, State},
    http::{header::LOCATION, StatusCode},
    response::IntoResponse,
    Json,
};
use inkpost_shared::{Post, PostId, PostInput};

use crate::{
    auth::{authorize, AuthUser},
    error::{ApiError, ApiResult},
    state::AppState,
};

fn parse_post_id(raw: &str) -> ApiResult<PostId> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid post id: {}", raw)))
}

/// Reject a body that claims an author other than the caller.
fn check_claimed_author(auth_user: &AuthUser, req: &PostInput) -> ApiResult<()> {
    if let Some(claimed) = req.author_id {
        authorize(auth_user.user_id, claimed).require()?;
    }
    Ok(())
}

/// Create a post authored by the caller
pub async fn create_post(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(mut req): Json<PostInput>,
) -> ApiResult<impl IntoResponse> {
    req.prepare();
    req.validate()?;
    check_claimed_author(&auth_user, &req)?;

    let post = state
        .store
        .create_post(&req.title, &req.content, auth_user.user_id)
        .await?;

    tracing::info!(post_id = %post.id, author_id = %post.author_id, "Post created");
    let location = format!("/posts/{}", post.id);
    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(post)))
}

/// List all posts
pub async fn list_posts(State(state): State<AppState>) -> Json<Vec<Post>> {
    Json(state.store.list_posts().await)
}

/// Get a single post
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Post>> {
    let id = parse_post_id(&id)?;
    state
        .store
        .find_post(id)
        .await
        .map(Json)
        .ok_or(ApiError::NotFound("Post not found"))
}

/// Edit a post. Ownership is checked against the stored author.
pub async fn update_post(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(mut req): Json<PostInput>,
) -> ApiResult<Json<Post>> {
    let id = parse_post_id(&id)?;
    let existing = state
        .store
        .find_post(id)
        .await
        .ok_or(ApiError::NotFound("Post not found"))?;

    authorize(auth_user.user_id, existing.author_id).require()?;
    check_claimed_author(&auth_user, &req)?;

    req.prepare();
    req.validate()?;

    let post = state
        .store
        .update_post(id, &req.title, &req.content)
        .await?;

    tracing::info!(post_id = %post.id, "Post updated");
    Ok(Json(post))
}

/// Delete a post. Ownership is checked against the stored author.
pub async fn delete_post(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_post_id(&id)?;
    let existing = state
        .store
        .find_post(id)
        .await
        .ok_or(ApiError::NotFound("Post not found"))?;

    if let Err(denied) = authorize(auth_user.user_id, existing.author_id).require() {
        tracing::warn!(post_id = %id, user_id = %auth_user.user_id, "delete_post: not the author");
        return Err(denied.into());
    }

    state.store.delete_post(id).await?;

    tracing::info!(post_id = %id, "Post deleted");
    Ok((StatusCode::NO_CONTENT, [("Entity", id.to_string())]))
}
