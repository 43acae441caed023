//! Configuration Management
//!
//! Persistent settings stored as JSON under the user's config directory.
//! Values resolve as: explicit setting > environment > built-in default.

use crate::api::auth::{Credentials, StaticToken};
use crate::api::http::DEFAULT_BASE_URL;
use crate::error::{Result, ScmError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Environment variable overriding the API base URL
pub const BASE_URL_ENV: &str = "SCM_BASE_URL";

/// Environment variable holding the access token by default
pub const DEFAULT_TOKEN_ENV: &str = "SCM_TOKEN";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// API base URL
    #[serde(default)]
    pub base_url: Option<String>,
    /// Folder used when a command names no container
    #[serde(default)]
    pub default_folder: Option<String>,
    /// Page size for list calls
    #[serde(default)]
    pub max_limit: Option<i64>,
    /// Environment variable to read the access token from
    #[serde(default)]
    pub token_env: Option<String>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("scm").join("config.json"))
    }

    /// Load configuration from the default location
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from a file; missing or unreadable files yield defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config {:?}: {}", path, e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!("Failed to read config {:?}: {}", path, e);
                Self::default()
            },
        }
    }

    /// Save configuration to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ScmError::Config(format!("cannot create {:?}: {}", parent, e)))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .map_err(|e| ScmError::Config(format!("cannot write {:?}: {}", path, e)))?;

        Ok(())
    }

    /// Get effective base URL (config > environment > default)
    pub fn effective_base_url(&self) -> String {
        self.base_url
            .clone()
            .or_else(|| std::env::var(BASE_URL_ENV).ok().filter(|v| !v.is_empty()))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Name of the environment variable holding the token
    pub fn effective_token_env(&self) -> &str {
        self.token_env.as_deref().unwrap_or(DEFAULT_TOKEN_ENV)
    }

    /// Credentials from the configured token variable
    pub fn credentials(&self) -> Result<Credentials> {
        let token = StaticToken::from_env(self.effective_token_env())?;
        Ok(Credentials::new(Arc::new(token)))
    }
}
