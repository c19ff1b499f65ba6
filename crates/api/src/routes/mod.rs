//! API routes

pub mod auth;
pub mod health;
pub mod posts;
pub mod users;

#[cfg(test)]
mod flow_tests;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{auth::require_auth, security::security_headers_middleware, state::AppState};

/// Create all API routes
pub fn create_router(state: AppState) -> Router {
    let auth_state = state.auth_state();

    // Public routes (no auth required). Reads are never owner-gated.
    let public_routes = Router::new()
        .route("/health", get(health::health))
        .route("/login", post(auth::login))
        .route("/users", post(users::create_user).get(users::list_users))
        .route("/users/:id", get(users::get_user))
        .route("/posts", get(posts::list_posts))
        .route("/posts/:id", get(posts::get_post));

    // Protected routes. The layer runs before any of these handlers.
    let protected_routes = Router::new()
        .route("/users/:id", put(users::update_user).delete(users::delete_user))
        .route("/posts", post(posts::create_post))
        .route("/posts/:id", put(posts::update_post).delete(posts::delete_post))
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth));

    public_routes
        .merge(protected_routes)
        .layer(middleware::from_fn(security_headers_middleware))
        .with_state(state)
}
