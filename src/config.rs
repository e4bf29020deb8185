use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::DbpassError;

const CONFIG_DIR: &str = ".dbpass";
const CONFIG_FILE: &str = "config.toml";
const PROJECT_FILE: &str = "project.json";

/// Overrides `access_token` from config.toml when set.
pub const ACCESS_TOKEN_ENV: &str = "DBPASS_ACCESS_TOKEN";

pub const DEFAULT_MIN_STRENGTH: i32 = 3;
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub version: u32,
    pub api_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_ref: Option<String>,
    /// Never written back out; supplied by hand or through the environment.
    #[serde(default, skip_serializing)]
    pub access_token: Option<SecretString>,
    #[serde(default = "default_permissions")]
    pub permissions: Vec<String>,
    #[serde(default = "default_min_strength")]
    pub min_strength: i32,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_permissions() -> Vec<String> {
    vec!["update:projects".into()]
}

fn default_min_strength() -> i32 {
    DEFAULT_MIN_STRENGTH
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Config {
    pub fn default_new(api_url: String, project_ref: Option<String>) -> Self {
        Self {
            version: 1,
            api_url,
            project_ref,
            access_token: None,
            permissions: default_permissions(),
            min_strength: DEFAULT_MIN_STRENGTH,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The bearer token to send, preferring the environment over the file.
    pub fn access_token(&self) -> Option<SecretString> {
        self.token_with_override(std::env::var(ACCESS_TOKEN_ENV).ok())
    }

    fn token_with_override(&self, from_env: Option<String>) -> Option<SecretString> {
        match from_env {
            Some(token) if !token.is_empty() => Some(SecretString::new(token)),
            _ => self.access_token.clone(),
        }
    }
}

/// Returns the `.dbpass` directory for a given project root.
pub fn dbpass_dir(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_DIR)
}

/// Returns the config file path for a given project root.
pub fn config_path(project_root: &Path) -> PathBuf {
    dbpass_dir(project_root).join(CONFIG_FILE)
}

/// Returns the path where the latest project snapshot is published.
pub fn project_path(project_root: &Path) -> PathBuf {
    dbpass_dir(project_root).join(PROJECT_FILE)
}

/// Read and parse config from the given project root. Returns an error if not initialized.
pub fn read(project_root: &Path) -> Result<Config, DbpassError> {
    let path = config_path(project_root);
    if !path.exists() {
        return Err(DbpassError::NotInitialized);
    }
    let raw = std::fs::read_to_string(&path)?;
    let config: Config = toml::from_str(&raw).map_err(|e| DbpassError::Config(e.to_string()))?;
    if config.api_url.trim().is_empty() {
        return Err(DbpassError::Config("api_url must not be empty".into()));
    }
    Ok(config)
}

/// Write config to the given project root. Creates the `.dbpass` directory if needed.
pub fn write(project_root: &Path, config: &Config) -> Result<(), DbpassError> {
    let dir = dbpass_dir(project_root);
    std::fs::create_dir_all(&dir)?;
    let path = dir.join(CONFIG_FILE);
    let raw = toml::to_string(config).map_err(|e| DbpassError::Config(e.to_string()))?;
    std::fs::write(path, raw)?;
    Ok(())
}

/// Returns the current project root (cwd).
pub fn project_root() -> Result<PathBuf, DbpassError> {
    std::env::current_dir().map_err(DbpassError::Io)
}
