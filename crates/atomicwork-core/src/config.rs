//! Configuration for atomicwork-mcp.
//!
//! Settings are resolved once at startup, in increasing order of precedence:
//!
//! 1. Built-in defaults
//! 2. An optional TOML file (`~/.config/atomicwork-mcp/config.toml` by default)
//! 3. `ATOMICWORK_*` environment variables
//!
//! A missing API key is not an error here; tool calls report it instead.
//!
//! # Example
//!
//! ```ignore
//! use atomicwork_core::Config;
//!
//! let config = Config::load(None)?;
//! if !config.has_api_key() {
//!     eprintln!("ATOMICWORK_API_KEY is not set");
//! }
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Config file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Config directory name.
const CONFIG_DIR_NAME: &str = "atomicwork-mcp";

/// Placeholder API root used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "https://your-company.atomicwork.com/api/v1";

pub const ENV_API_KEY: &str = "ATOMICWORK_API_KEY";
pub const ENV_BASE_URL: &str = "ATOMICWORK_BASE_URL";
pub const ENV_USER_ID: &str = "ATOMICWORK_USER_ID";
pub const ENV_WORKSPACE_ID: &str = "ATOMICWORK_WORKSPACE_ID";

/// API path suffix stripped from the base URL to get the web portal root.
const API_PATH_SUFFIX: &str = "/api/v1";

/// Process-wide settings, read-only after startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// API key sent as `x-api-key`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// API root, e.g. `https://acme.atomicwork.com/api/v1`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Numeric id of the current user, kept as text until used
    #[serde(default)]
    pub user_id: String,

    /// Workspace id for workspace-scoped endpoints
    #[serde(default)]
    pub workspace_id: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            user_id: String::new(),
            workspace_id: String::new(),
        }
    }
}

impl Config {
    /// Get the configuration directory path.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(CONFIG_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the default configuration file path.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Resolve the full configuration: file (explicit path or default location),
    /// then the process environment on top.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file_config = match path {
            Some(path) => Self::load_from(path)?,
            None => match Self::config_path() {
                Ok(path) => Self::load_from(&path)?,
                Err(e) => {
                    debug!(error = %e, "No config directory, skipping config file");
                    Self::default()
                }
            },
        };

        Ok(file_config.with_overrides(|name| std::env::var(name).ok()))
    }

    /// Load configuration from a TOML file.
    ///
    /// Returns a default config if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = ?path, "Config file does not exist, using defaults");
            return Ok(Self::default());
        }

        debug!(path = ?path, "Loading config");

        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))?;

        info!(path = ?path, "Config loaded successfully");
        Ok(config)
    }

    /// Build a config from defaults plus an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::default().with_overrides(lookup)
    }

    /// Overlay `ATOMICWORK_*` variables. Empty values count as unset.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(url) = get(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(user_id) = get(ENV_USER_ID) {
            self.user_id = user_id;
        }
        if let Some(workspace_id) = get(ENV_WORKSPACE_ID) {
            self.workspace_id = workspace_id;
        }
        self
    }

    /// Whether a non-empty API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// The user id as an integer, or `None` if unset or not numeric.
    pub fn user_id_numeric(&self) -> Option<i64> {
        self.user_id.trim().parse().ok()
    }

    /// Web portal root: the base URL with the API path removed.
    pub fn portal_url(&self) -> String {
        self.base_url
            .trim_end_matches('/')
            .replacen(API_PATH_SUFFIX, "", 1)
    }

    /// API key rendered for display, keeping only the last four characters.
    pub fn masked_api_key(&self) -> String {
        match self.api_key.as_deref() {
            None | Some("") => "(not set)".to_string(),
            Some(key) => {
                let chars: Vec<char> = key.chars().collect();
                if chars.len() <= 4 {
                    "****".to_string()
                } else {
                    let tail: String = chars[chars.len() - 4..].iter().collect();
                    format!("****{}", tail)
                }
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
