//! Configuration file support.
//!
//! Settings live in a `guild.toml` file. Every section and key is optional;
//! missing values fall back to the defaults below.
//!
//! ```toml
//! [repository]
//! type = "local"
//! seed_sample_data = false
//!
//! [ranking]
//! healer_classes = ["Quedasanta"]
//!
//! [players]
//! default_guild_tag = "INFERNUS"
//!
//! [audit]
//! sample_limit = 50
//!
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::factory::RepositoryType;
use super::repository::RepositoryError;
use crate::models::{RoleClassifier, DEFAULT_GUILD_TAG, DEFAULT_HEALER_CLASSES};
use crate::services::audit::DEFAULT_SAMPLE_LIMIT;

/// Name of the configuration file searched for by [`RepositoryConfig::from_default_location`].
pub const CONFIG_FILE_NAME: &str = "guild.toml";

/// Application configuration from file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    #[serde(default)]
    pub repository: RepositorySettings,
    #[serde(default)]
    pub ranking: RankingSettings,
    #[serde(default)]
    pub players: PlayerSettings,
    #[serde(default)]
    pub audit: AuditSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

/// Repository type settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type", default = "default_repo_type")]
    pub repo_type: String,
    /// Populate an empty store with the built-in sample set on startup.
    #[serde(default)]
    pub seed_sample_data: bool,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            repo_type: default_repo_type(),
            seed_sample_data: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingSettings {
    /// Classes that default to the healer role when created without one.
    #[serde(default = "default_healer_classes")]
    pub healer_classes: Vec<String>,
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self {
            healer_classes: default_healer_classes(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSettings {
    #[serde(default = "default_guild_tag")]
    pub default_guild_tag: String,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            default_guild_tag: default_guild_tag(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditSettings {
    /// Upper bound on offending entities listed by a diagnose run.
    #[serde(default = "default_sample_limit")]
    pub sample_limit: usize,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            sample_limit: default_sample_limit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_repo_type() -> String {
    "local".to_string()
}

fn default_healer_classes() -> Vec<String> {
    DEFAULT_HEALER_CLASSES.iter().map(|c| c.to_string()).collect()
}

fn default_guild_tag() -> String {
    DEFAULT_GUILD_TAG.to_string()
}

fn default_sample_limit() -> usize {
    DEFAULT_SAMPLE_LIMIT
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn find_config_file() -> Option<PathBuf> {
    [
        PathBuf::from(CONFIG_FILE_NAME),
        PathBuf::from("backend").join(CONFIG_FILE_NAME),
        PathBuf::from("..").join(CONFIG_FILE_NAME),
    ]
    .into_iter()
    .find(|path| path.exists())
}

impl RepositoryConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Returns
    /// * `Ok(RepositoryConfig)` if successful
    /// * `Err(RepositoryError)` if file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;

        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, RepositoryError> {
        toml::from_str(content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `guild.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        match find_config_file() {
            Some(path) => Self::from_file(path),
            None => Err(RepositoryError::configuration(format!(
                "No {} found in standard locations",
                CONFIG_FILE_NAME
            ))),
        }
    }

    /// Like [`Self::from_default_location`], but falls back to defaults when
    /// no file exists. A file that exists and fails to parse is still an error.
    pub fn load_or_default() -> Result<Self, RepositoryError> {
        match find_config_file() {
            Some(path) => {
                log::info!("Loading configuration from {}", path.display());
                Self::from_file(path)
            }
            None => {
                log::info!("No {} found, using default configuration", CONFIG_FILE_NAME);
                Ok(Self::default())
            }
        }
    }

    /// Get the repository type from configuration.
    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        RepositoryType::from_str(&self.repository.repo_type)
    }

    /// Role classifier built from `[ranking] healer_classes`.
    pub fn classifier(&self) -> RoleClassifier {
        RoleClassifier::new(self.ranking.healer_classes.iter().cloned())
    }
}
