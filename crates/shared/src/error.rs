//! Error types for Inkpost

use thiserror::Error;

/// Field-level problems with user or post input.
///
/// The display strings are what clients see in the `error` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Required Nickname")]
    RequiredNickname,

    #[error("Required Email")]
    RequiredEmail,

    #[error("Invalid Email")]
    InvalidEmail,

    #[error("Required Password")]
    RequiredPassword,

    #[error("Required Title")]
    RequiredTitle,

    #[error("Required Content")]
    RequiredContent,
}

/// Failures reported by the record store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Email Already Taken")]
    EmailTaken,

    #[error("Nickname Already Taken")]
    NicknameTaken,

    #[error("Title Already Taken")]
    TitleTaken,

    #[error("Not found: {0}")]
    NotFound(&'static str),
}
