//! Application configuration, read from a TOML file.
//!
//! Every section is optional; a missing file path means all defaults
//! (built-in catalog, in-memory sessions and records).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::session::DEFAULT_TTL_SECS;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub sessions: SessionSettings,
    #[serde(default)]
    pub records: RecordSettings,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub console: ConsoleSettings,
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Defaults when no path is given.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// JSON catalog file. Absent means the built-in 1040NR catalog.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Sliding expiry, refreshed on every save.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    /// Directory for file-backed sessions. Absent means in-memory.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            dir: None,
        }
    }
}

const fn default_ttl_secs() -> u64 {
    DEFAULT_TTL_SECS
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordBackend {
    #[default]
    Memory,
    Agent,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordSettings {
    #[serde(default)]
    pub backend: RecordBackend,
}

/// Connection to the record agent's completion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_n_predict")]
    pub n_predict: usize,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            n_predict: default_n_predict(),
            temperature: default_temperature(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

const fn default_timeout_ms() -> u64 {
    30_000
}

const fn default_n_predict() -> usize {
    256
}

const fn default_temperature() -> f32 {
    0.1
}

/// Session the console binary speaks as.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleSettings {
    #[serde(default = "default_user_id")]
    pub user_id: String,
    #[serde(default = "default_client_id")]
    pub client_id: i64,
    #[serde(default = "default_reference")]
    pub reference: String,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            user_id: default_user_id(),
            client_id: default_client_id(),
            reference: default_reference(),
        }
    }
}

fn default_user_id() -> String {
    "console".to_string()
}

const fn default_client_id() -> i64 {
    1
}

fn default_reference() -> String {
    "individual".to_string()
}
