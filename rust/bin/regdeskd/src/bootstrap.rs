//! First-start checks.
//!
//! `regdeskd` refuses to start unless the config names an operator password
//! hash, a JWT secret and a data directory.

use argon2::Argon2;
use password_hash::{PasswordHash, PasswordVerifier};

use crate::config::ServerConfig;

/// Verify server configuration is ready for production use.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.operator.username.trim().is_empty() {
        anyhow::bail!("Operator username is empty in configuration.");
    }
    if config.operator.password_hash.is_empty() {
        anyhow::bail!(
            "No operator password hash found in configuration.\n\
             Generate an argon2id hash and set [operator].password_hash."
        );
    }
    if config.jwt.secret.is_empty() {
        anyhow::bail!("JWT secret is empty in configuration.");
    }
    if config.storage.data_dir.is_empty() {
        anyhow::bail!("Storage data_dir is empty in configuration.");
    }
    if config.dashboard.batch_cap == 0 {
        anyhow::bail!("dashboard.batch_cap must be at least 1.");
    }
    if config.dashboard.refresh_secs == 0 {
        anyhow::bail!("dashboard.refresh_secs must be at least 1.");
    }
    if config.store.timeout_ms == 0 {
        anyhow::bail!("store.timeout_ms must be at least 1.");
    }
    Ok(())
}

/// Verify an operator login attempt against the stored argon2id hash.
pub fn verify_operator_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
