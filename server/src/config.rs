//! Runtime configuration
//!
//! Sources in increasing priority: built-in defaults, an optional
//! `Packlist.toml`, then `PACKLIST_*` environment variables (a `.env` file is
//! loaded into the environment first).

use ::config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

const CONFIG_FILE: &str = "Packlist";
const ENV_PREFIX: &str = "PACKLIST";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub database_path: PathBuf,
    pub log_dir: PathBuf,
    /// Base URL of the file host API
    pub file_host_url: String,
    /// API secret; without it hosted files are never deleted
    pub file_host_secret: Option<String>,
    /// Bearer token required by `POST /api/cleanup` when set
    pub cleanup_token: Option<String>,
    /// Seconds between background sweeps, 0 disables them
    pub cleanup_interval_secs: u64,
    /// Minimum age of an unused image before it is swept
    pub cleanup_grace_secs: u64,
    /// Lifetime of sessions minted by the login flow
    pub session_ttl_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            database_path: PathBuf::from("packlist.db"),
            log_dir: PathBuf::from("logs"),
            file_host_url: "https://api.uploadthing.com".to_string(),
            file_host_secret: None,
            cleanup_token: None,
            cleanup_interval_secs: 3600,
            cleanup_grace_secs: 24 * 3600,
            session_ttl_secs: 30 * 24 * 3600,
        }
    }
}

impl AppConfig {
    pub fn cleanup_interval(&self) -> Option<Duration> {
        (self.cleanup_interval_secs > 0).then(|| Duration::from_secs(self.cleanup_interval_secs))
    }
}

/// Load `.env`, `Packlist.toml` and the environment
pub fn load_config() -> Result<AppConfig, ConfigError> {
    dotenv::dotenv().ok();
    load_from(CONFIG_FILE)
}

/// Load from the named config file (extension optional) and the environment
pub fn load_from(file: &str) -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        .add_source(ConfigFile::with_name(file).required(false))
        .add_source(Environment::with_prefix(ENV_PREFIX))
        .build()?;
    settings.try_deserialize::<AppConfig>()
}
