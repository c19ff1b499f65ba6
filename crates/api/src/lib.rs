//! Inkpost API Library
//!
//! Password hashing, bearer token issuance and validation, ownership checks,
//! and the axum surface that wires them to the blog's users and posts.

#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod security;
pub mod seed;
pub mod state;

pub use config::{AuthConfig, Config};
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
