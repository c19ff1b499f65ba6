//! Application state

use std::sync::Arc;

use inkpost_shared::MemoryStore;

use crate::{
    auth::{AuthState, CredentialVerifier, PasswordError, TokenIssuer, TokenValidator},
    config::{Config, ConfigError},
};

/// Shared application state
///
/// Everything here is immutable after startup apart from the store, which
/// does its own locking.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: MemoryStore,
    pub verifier: CredentialVerifier,
    pub issuer: TokenIssuer,
    pub validator: TokenValidator,
    /// Hash checked when a login names an unknown email
    pub(crate) decoy_hash: Arc<str>,
}

impl AppState {
    pub fn new(config: Config, store: MemoryStore) -> Result<Self, StateError> {
        let verifier = CredentialVerifier::new(&config.auth)?;
        let issuer = TokenIssuer::new(&config.auth);
        let validator = TokenValidator::new(&config.auth);
        let decoy_hash = verifier.impossible_hash()?.into();

        tracing::info!(
            token_ttl_seconds = issuer.ttl_seconds(),
            "Token issuer initialized"
        );

        Ok(Self {
            config: Arc::new(config),
            store,
            verifier,
            issuer,
            validator,
            decoy_hash,
        })
    }

    /// Get auth state for middleware
    pub fn auth_state(&self) -> AuthState {
        AuthState {
            validator: self.validator.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Password(#[from] PasswordError),
}
