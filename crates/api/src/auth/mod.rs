//! Authentication and authorization for Inkpost

pub mod gate;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use gate::{authorize, AuthorizationDenied, Decision};
pub use jwt::{Claims, JwtError, TokenIssuer, TokenValidator};
pub use middleware::{require_auth, AuthError, AuthState, AuthUser};
pub use password::{CredentialVerifier, PasswordError};
