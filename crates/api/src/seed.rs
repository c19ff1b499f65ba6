//! Demo data for local development

use inkpost_shared::{MemoryStore, StoreError};

use crate::auth::{CredentialVerifier, PasswordError};

const DEMO_USERS: &[(&str, &str)] = &[
    ("Funskie", "tusty9292@gmail.com"),
    ("Wuskie", "chiii57@gmail.com"),
];

const DEMO_POSTS: &[(&str, &str)] = &[("Title 1", "Hello world 1"), ("Title 2", "Hello world 2")];

/// Password shared by every demo account
pub const DEMO_PASSWORD: &str = "password";

/// Insert two demo users, each with one post.
pub async fn load(store: &MemoryStore, verifier: &CredentialVerifier) -> Result<(), SeedError> {
    for ((nickname, email), (title, content)) in DEMO_USERS.iter().zip(DEMO_POSTS) {
        let user = store
            .create_user(nickname, email, verifier.hash(DEMO_PASSWORD)?)
            .await?;
        store.create_post(title, content, user.id).await?;
        tracing::info!(user_id = %user.id, email = %email, "Seeded demo user");
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("cannot seed: {0}")]
    Store(#[from] StoreError),
    #[error("cannot seed: {0}")]
    Password(#[from] PasswordError),
}
