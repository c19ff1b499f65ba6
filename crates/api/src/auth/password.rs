//! Password hashing with Argon2

use argon2::{
    password_hash::{
        rand_core::{OsRng, RngCore},
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Version,
};

use crate::config::{AuthConfig, ConfigError};

/// Hashes passwords at enrollment and checks presented passwords against
/// stored hashes.
///
/// Hashes are Argon2id PHC strings with a fresh random salt each time, so two
/// hashes of one password differ but both verify. Verification reads the salt
/// and cost back out of the stored string, which means hashes made under older
/// cost settings keep working after the config changes.
#[derive(Clone)]
pub struct CredentialVerifier {
    argon2: Argon2<'static>,
}

impl CredentialVerifier {
    pub fn new(config: &AuthConfig) -> Result<Self, ConfigError> {
        let params = config.argon2_params()?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a password using Argon2id
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::Hashing(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// A mismatch is `Ok(false)`. Only a stored hash that cannot be parsed is
    /// an error.
    pub fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash =
            PasswordHash::new(stored_hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Generate a valid hash whose password is unknowable.
    ///
    /// Login verifies against one of these when the email is unknown, so a
    /// missing account costs the same as a wrong password.
    pub fn impossible_hash(&self) -> Result<String, PasswordError> {
        let mut random_bytes = [0u8; 64];
        OsRng.fill_bytes(&mut random_bytes);

        self.hash(&hex::encode(random_bytes))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    Hashing(String),
    #[error("Invalid password hash: {0}")]
    InvalidHash(String),
}
