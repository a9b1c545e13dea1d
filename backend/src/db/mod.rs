//! Record store access.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP layer (http/)                                      │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Services: aggregation, ranking, audit (services/)       │
//! │  Store services: registration, submission (services.rs) │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/) - Abstract Interface    │
//! │  - PlayerRepository / RecordRepository (CRUD)            │
//! │  - MaintenanceRepository (health, version, clear)        │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────▼───────────────┐
//!     │ Local Repository (in-memory)  │
//!     └───────────────────────────────┘
//! ```
//!
//! - `services`: store-level business logic (use these in your application)
//! - `repository`: trait definitions and error types
//! - `repositories::local`: in-memory implementation
//! - `factory`: repository construction from type, environment or config
//! - `repo_config`: `guild.toml` loading

#[cfg(not(feature = "local-repo"))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;

pub use services::{
    clear_all, data_version, delete_player, delete_record, get_player, get_record, health_check,
    list_players, list_records, register_player, store_status, submit_record, StoreStatus,
    SubmissionDefaults,
};

pub use factory::{RepositoryBuilder, RepositoryFactory, RepositoryType};
pub use repo_config::RepositoryConfig;
pub use repositories::LocalRepository;
pub use repository::{
    ErrorContext, FullRepository, MaintenanceRepository, PlayerRepository, RecordRepository,
    RepositoryError, RepositoryResult,
};
