//! Repository factory for dependency injection.
//!
//! Creates record store instances from runtime configuration.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use super::repo_config::RepositoryConfig;
use super::repositories::LocalRepository;
use super::repository::{FullRepository, RepositoryError, RepositoryResult};

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// In-memory local repository
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse repository type from string ("local" or "memory").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" | "memory" | "in-memory" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// Get repository type from the `REPOSITORY_TYPE` environment variable.
    ///
    /// Unknown or missing values fall back to Local.
    pub fn from_env() -> Self {
        match std::env::var("REPOSITORY_TYPE") {
            Ok(val) => val.parse().unwrap_or_else(|e| {
                log::warn!("{}; falling back to local repository", e);
                Self::Local
            }),
            Err(_) => Self::Local,
        }
    }
}

/// Repository factory for creating repository instances.
///
/// # Example
/// ```
/// use guild_ranks::db::{RepositoryFactory, RepositoryType};
///
/// let repo = RepositoryFactory::create(RepositoryType::Local, false);
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    ///
    /// # Arguments
    /// * `repo_type` - Type of repository to create
    /// * `seed_sample_data` - Populate the new store with the built-in sample set
    pub fn create(repo_type: RepositoryType, seed_sample_data: bool) -> Arc<dyn FullRepository> {
        match repo_type {
            RepositoryType::Local if seed_sample_data => {
                log::info!("Creating local repository with sample data");
                Arc::new(LocalRepository::with_sample_data())
            }
            RepositoryType::Local => Self::create_local(),
        }
    }

    /// Create an empty in-memory local repository.
    pub fn create_local() -> Arc<dyn FullRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create repository from environment configuration (`REPOSITORY_TYPE`).
    pub fn from_env() -> Arc<dyn FullRepository> {
        Self::create(RepositoryType::from_env(), false)
    }

    /// Create repository from a TOML configuration file.
    pub fn from_config_file<P: AsRef<Path>>(
        config_path: P,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        let config = RepositoryConfig::from_file(config_path)?;
        Self::from_repository_config(&config)
    }

    /// Create repository from a loaded configuration.
    pub fn from_repository_config(
        config: &RepositoryConfig,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        let repo_type = config.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;
        Ok(Self::create(repo_type, config.repository.seed_sample_data))
    }
}

/// Builder for configuring repository creation.
///
/// # Example
/// ```
/// use guild_ranks::db::{RepositoryBuilder, RepositoryType};
///
/// let repo = RepositoryBuilder::new()
///     .repository_type(RepositoryType::Local)
///     .seed_sample_data(true)
///     .build();
/// ```
pub struct RepositoryBuilder {
    repo_type: RepositoryType,
    seed_sample_data: bool,
}

impl RepositoryBuilder {
    /// Create a new builder. The type defaults to `REPOSITORY_TYPE` or Local.
    pub fn new() -> Self {
        Self {
            repo_type: RepositoryType::from_env(),
            seed_sample_data: false,
        }
    }

    /// Set the repository type.
    pub fn repository_type(mut self, repo_type: RepositoryType) -> Self {
        self.repo_type = repo_type;
        self
    }

    pub fn seed_sample_data(mut self, seed: bool) -> Self {
        self.seed_sample_data = seed;
        self
    }

    /// Take type and seeding from a loaded configuration.
    pub fn from_config(mut self, config: &RepositoryConfig) -> Result<Self, RepositoryError> {
        self.repo_type = config.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;
        self.seed_sample_data = config.repository.seed_sample_data;
        Ok(self)
    }

    /// Build the repository instance.
    pub fn build(self) -> Arc<dyn FullRepository> {
        RepositoryFactory::create(self.repo_type, self.seed_sample_data)
    }
}

impl Default for RepositoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
