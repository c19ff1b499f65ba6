//! Application configuration

use std::env;
use std::fmt;

/// Smallest accepted signing secret, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Default access token lifetime: one hour.
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 3600;

/// Longest accepted token lifetime: thirty days.
pub const MAX_TOKEN_TTL_SECONDS: i64 = 30 * 24 * 3600;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub bind_address: String,

    // Authentication
    pub auth: AuthConfig,

    // Feature flags
    pub seed_demo_data: bool,
}

/// Everything the credential and token components need, fixed at startup.
#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 signing secret
    pub secret: String,
    /// Lifetime of issued tokens in seconds
    pub token_ttl_seconds: i64,
    /// Argon2 memory cost in KiB
    pub argon2_memory_kib: u32,
    /// Argon2 iteration count
    pub argon2_iterations: u32,
    /// Argon2 lanes
    pub argon2_parallelism: u32,
}

// The secret must never reach a log line.
impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"<redacted>")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .field("argon2_memory_kib", &self.argon2_memory_kib)
            .field("argon2_iterations", &self.argon2_iterations)
            .field("argon2_parallelism", &self.argon2_parallelism)
            .finish()
    }
}

impl AuthConfig {
    /// Build an auth config with the default TTL and Argon2 cost.
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let config = Self {
            secret: secret.into(),
            token_ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
            argon2_memory_kib: argon2::Params::DEFAULT_M_COST,
            argon2_iterations: argon2::Params::DEFAULT_T_COST,
            argon2_parallelism: argon2::Params::DEFAULT_P_COST,
        };
        config.validate()?;
        Ok(config)
    }

    /// Override the token lifetime.
    pub fn with_token_ttl_seconds(mut self, ttl: i64) -> Result<Self, ConfigError> {
        self.token_ttl_seconds = ttl;
        self.validate()?;
        Ok(self)
    }

    /// Override the Argon2 cost parameters.
    pub fn with_argon2_params(
        mut self,
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, ConfigError> {
        self.argon2_memory_kib = memory_kib;
        self.argon2_iterations = iterations;
        self.argon2_parallelism = parallelism;
        self.validate()?;
        Ok(self)
    }

    /// Argon2 parameters derived from this config.
    pub fn argon2_params(&self) -> Result<argon2::Params, ConfigError> {
        argon2::Params::new(
            self.argon2_memory_kib,
            self.argon2_iterations,
            self.argon2_parallelism,
            None,
        )
        .map_err(|e| ConfigError::InvalidArgon2Params(e.to_string()))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::WeakSecret(
                "API_SECRET must be at least 32 characters",
            ));
        }
        if self.token_ttl_seconds <= 0 {
            return Err(ConfigError::Invalid(
                "TOKEN_TTL_SECONDS must be a positive number of seconds",
            ));
        }
        if self.token_ttl_seconds > MAX_TOKEN_TTL_SECONDS {
            return Err(ConfigError::Invalid(
                "TOKEN_TTL_SECONDS must not exceed 30 days",
            ));
        }
        self.argon2_params()?;
        Ok(())
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = env::var("API_SECRET").map_err(|_| ConfigError::Missing("API_SECRET"))?;

        let auth = AuthConfig {
            secret,
            token_ttl_seconds: parse_var("TOKEN_TTL_SECONDS", DEFAULT_TOKEN_TTL_SECONDS)?,
            argon2_memory_kib: parse_var("ARGON2_MEMORY_KIB", argon2::Params::DEFAULT_M_COST)?,
            argon2_iterations: parse_var("ARGON2_ITERATIONS", argon2::Params::DEFAULT_T_COST)?,
            argon2_parallelism: parse_var("ARGON2_PARALLELISM", argon2::Params::DEFAULT_P_COST)?,
        };
        auth.validate()?;

        Ok(Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            auth,
            seed_demo_data: parse_var("SEED_DEMO_DATA", false)?,
        })
    }
}

/// Read an optional variable, falling back to `default` when unset.
///
/// A variable that is set but unparsable is an error rather than a silent default.
fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Unparsable(name)),
        Err(_) => Ok(default),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("Could not parse environment variable: {0}")]
    Unparsable(&'static str),
    #[error("Weak secret: {0}")]
    WeakSecret(&'static str),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
    #[error("Invalid Argon2 parameters: {0}")]
    InvalidArgon2Params(String),
}
