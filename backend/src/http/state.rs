//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repo_config::RepositoryConfig;
use crate::db::repository::FullRepository;
use crate::db::services::SubmissionDefaults;
use crate::services::audit::DEFAULT_SAMPLE_LIMIT;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Record store
    pub repository: Arc<dyn FullRepository>,
    /// Defaults for registrations and submissions
    pub defaults: Arc<SubmissionDefaults>,
    /// Cap on offending entities listed by a diagnose run
    pub sample_limit: usize,
}

impl AppState {
    /// Create a new application state with default settings.
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self {
            repository,
            defaults: Arc::new(SubmissionDefaults::default()),
            sample_limit: DEFAULT_SAMPLE_LIMIT,
        }
    }

    /// Create a state whose defaults come from a loaded configuration.
    pub fn from_config(repository: Arc<dyn FullRepository>, config: &RepositoryConfig) -> Self {
        Self {
            repository,
            defaults: Arc::new(SubmissionDefaults::new(
                config.classifier(),
                config.players.default_guild_tag.clone(),
            )),
            sample_limit: config.audit.sample_limit,
        }
    }
}
