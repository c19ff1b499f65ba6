//! Ownership checks for mutating operations

use inkpost_shared::UserId;

/// Outcome of an ownership check. Computed per request and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Decision {
    Allow,
    Deny,
}

/// Decide whether `subject` may mutate a resource owned by `owner`.
///
/// `owner` must come from the stored record, never from the request body.
/// There are no roles and no override: only the owner is allowed.
pub fn authorize(subject: UserId, owner: UserId) -> Decision {
    if subject == owner {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        self == Decision::Allow
    }

    /// Turn a denial into an error so handlers can use `?`.
    pub fn require(self) -> Result<(), AuthorizationDenied> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny => Err(AuthorizationDenied),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Authorization denied")]
pub struct AuthorizationDenied;
