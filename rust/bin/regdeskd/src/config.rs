//! Server configuration file.
//!
//! `regdeskd -c <name>` reads `/etc/regdesk/<name>.toml`; anything that
//! looks like a path is read directly.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use registration::service::RegistrationConfig;

const CONFIG_DIR: &str = "/etc/regdesk";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub operator: OperatorConfig,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// The single operator account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorConfig {
    #[serde(default = "default_username")]
    pub username: String,
    /// argon2id PHC string.
    #[serde(default)]
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    #[serde(default)]
    pub secret: String,
    #[serde(default = "default_expire_secs")]
    pub expire_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub data_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Upper bound on one record-store call.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_batch_cap")]
    pub batch_cap: usize,
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            batch_cap: default_batch_cap(),
            refresh_secs: default_refresh_secs(),
        }
    }
}

fn default_username() -> String {
    "operator".to_string()
}

fn default_expire_secs() -> u64 {
    8 * 3600
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_batch_cap() -> usize {
    10
}

fn default_refresh_secs() -> u64 {
    30
}

impl ServerConfig {
    /// Map a context name or path to the config file location.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.contains('.') {
            PathBuf::from(name_or_path)
        } else {
            Path::new(CONFIG_DIR).join(format!("{name_or_path}.toml"))
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e))?;
        let config: ServerConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Tunables handed to the registration service.
    pub fn registration(&self) -> RegistrationConfig {
        RegistrationConfig {
            batch_cap: self.dashboard.batch_cap,
            store_timeout: Duration::from_millis(self.store.timeout_ms),
            refresh_interval: Duration::from_secs(self.dashboard.refresh_secs),
        }
    }
}
