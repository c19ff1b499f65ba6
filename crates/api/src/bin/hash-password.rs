//! Password hashing utility for Inkpost
//!
//! Prints an Argon2id hash for a password, using the same cost parameters as
//! the server (`ARGON2_*` variables, falling back to the library defaults).
//!
//! Usage:
//!   cargo run --bin hash-password
//!   cargo run --bin hash-password "MySecurePassword123!"

use std::env;
use std::io::{self, Write};

use inkpost_api::{auth::CredentialVerifier, AuthConfig};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let password = if let Some(pwd) = env::args().nth(1) {
        pwd
    } else {
        // Read from stdin so the password stays out of the process list
        print!("Enter password to hash: ");
        io::stdout().flush()?;

        let mut password = String::new();
        io::stdin().read_line(&mut password)?;
        password.trim_end_matches(['\r', '\n']).to_string()
    };

    if password.is_empty() {
        anyhow::bail!("password cannot be empty");
    }

    // The signing secret is irrelevant here, only the Argon2 cost matters.
    let mut config = AuthConfig::new("x".repeat(inkpost_api::config::MIN_SECRET_LEN))?;
    if let Ok(raw) = env::var("ARGON2_MEMORY_KIB") {
        config.argon2_memory_kib = raw.trim().parse()?;
    }
    if let Ok(raw) = env::var("ARGON2_ITERATIONS") {
        config.argon2_iterations = raw.trim().parse()?;
    }
    if let Ok(raw) = env::var("ARGON2_PARALLELISM") {
        config.argon2_parallelism = raw.trim().parse()?;
    }

    let verifier = CredentialVerifier::new(&config)?;
    println!("{}", verifier.hash(&password)?);

    Ok(())
}
