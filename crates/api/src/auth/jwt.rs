//! JWT token generation and validation

use inkpost_shared::UserId;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::config::AuthConfig;

/// Only algorithm this server signs with or accepts.
const ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT claims structure for Inkpost-issued tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID, decimal string as registered claims require)
    pub sub: String,
    /// Issued at
    pub iat: i64,
    /// Expiration
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: UserId, iat: i64, exp: i64) -> Self {
        Self {
            sub: user_id.to_string(),
            iat,
            exp,
        }
    }

    /// Parse the subject back into a user id.
    pub fn user_id(&self) -> Option<UserId> {
        self.sub.parse().ok()
    }
}

/// Builds and signs access tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            ttl: Duration::seconds(config.token_ttl_seconds),
        }
    }

    /// Issue a token for `user_id`, valid from now for the configured TTL.
    pub fn issue(&self, user_id: UserId) -> Result<String, JwtError> {
        self.issue_at(user_id, OffsetDateTime::now_utc())
    }

    /// Issue a token as if the clock read `now`.
    pub fn issue_at(&self, user_id: UserId, now: OffsetDateTime) -> Result<String, JwtError> {
        let exp = now
            .checked_add(self.ttl)
            .ok_or_else(|| JwtError::Encoding("token expiry out of range".to_string()))?;
        let claims = Claims::new(user_id, now.unix_timestamp(), exp.unix_timestamp());

        encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| JwtError::Encoding(e.to_string()))
    }

    /// Token lifetime in seconds
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl.whole_seconds()
    }
}

/// Verifies tokens produced by [`TokenIssuer`] and yields their subject.
#[derive(Clone)]
pub struct TokenValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenValidator {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        // Expiry is checked against our own clock reading in `validate_at`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        }
    }

    /// Validate a token against the current time.
    pub fn validate(&self, token: &str) -> Result<UserId, JwtError> {
        self.validate_at(token, OffsetDateTime::now_utc())
    }

    /// Validate a token as if the clock read `now`.
    ///
    /// Malformed input, a bad signature, a foreign algorithm and expiry all
    /// come back as the same [`JwtError::Invalid`]. The real reason is only
    /// logged at debug level.
    pub fn validate_at(&self, token: &str, now: OffsetDateTime) -> Result<UserId, JwtError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(reason = ?e.kind(), "token rejected");
                JwtError::Invalid
            })?;

        let Some(user_id) = claims.user_id() else {
            tracing::debug!(sub = %claims.sub, "token rejected: subject is not a user id");
            return Err(JwtError::Invalid);
        };

        if now.unix_timestamp() >= claims.exp {
            tracing::debug!(user_id = %user_id, exp = claims.exp, "token rejected: expired");
            return Err(JwtError::Invalid);
        }

        Ok(user_id)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Invalid token")]
    Invalid,
    #[error("Token encoding failed: {0}")]
    Encoding(String),
}
