//! Common types used across Inkpost

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::ValidationError;

// =============================================================================
// ID Wrappers
// =============================================================================

/// User ID wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Post ID wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub u64);

impl From<u64> for PostId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PostId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

// =============================================================================
// Records
// =============================================================================

/// A registered account.
///
/// `password_hash` is the credential record; it is never serialized.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub nickname: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A blog post owned by its author.
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub author_id: UserId,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

// =============================================================================
// Input
// =============================================================================

/// Which checks apply to a [`UserInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    Create,
    Update,
    Login,
}

/// User fields as submitted by a client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserInput {
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl UserInput {
    /// Trim identity fields and normalise the email. The password is left as typed.
    pub fn prepare(&mut self) {
        self.nickname = self.nickname.trim().to_string();
        self.email = self.email.trim().to_lowercase();
    }

    pub fn validate(&self, action: UserAction) -> Result<(), ValidationError> {
        if action != UserAction::Login && self.nickname.is_empty() {
            return Err(ValidationError::RequiredNickname);
        }
        if self.email.is_empty() {
            return Err(ValidationError::RequiredEmail);
        }
        if !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        if self.password.is_empty() {
            return Err(ValidationError::RequiredPassword);
        }
        Ok(())
    }
}

/// Post fields as submitted by a client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Optional claimed author. Never trusted as the owner; only compared.
    #[serde(default)]
    pub author_id: Option<UserId>,
}

impl PostInput {
    pub fn prepare(&mut self) {
        self.title = self.title.trim().to_string();
        self.content = self.content.trim().to_string();
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.is_empty() {
            return Err(ValidationError::RequiredTitle);
        }
        if self.content.is_empty() {
            return Err(ValidationError::RequiredContent);
        }
        Ok(())
    }
}

/// Minimal `local@domain.tld` shape check.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}
