//! Record store contract.
//!
//! The store is split into focused traits, one per entity kind plus a small
//! maintenance trait for health, versioning and bulk clearing. Services take
//! a [`FullRepository`] bound when they need everything.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`players`]: CRUD for player summaries
//! - [`records`]: CRUD for match records
//! - [`maintenance`]: Health, data version and clear-all
//!
//! # Convenience Trait Bound
//!
//! ```ignore
//! async fn my_service<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<()> {
//!     let records = repo.list_records().await?;
//!     repo.update_player(&summary).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod maintenance;
pub mod players;
pub mod records;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

pub use maintenance::MaintenanceRepository;
pub use players::PlayerRepository;
pub use records::RecordRepository;

/// Composite trait bound for a complete record store.
///
/// Automatically implemented for any type that implements all three
/// repository traits.
pub trait FullRepository: PlayerRepository + RecordRepository + MaintenanceRepository {}

impl<T> FullRepository for T where T: PlayerRepository + RecordRepository + MaintenanceRepository {}
