//! Store-wide operations that are not tied to one entity kind.

use async_trait::async_trait;

use super::error::RepositoryResult;

#[async_trait]
pub trait MaintenanceRepository: Send + Sync {
    /// Check if the store is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if the store is healthy
    /// - `Ok(false)` if it is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if an error occurred during the check
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Monotonically increasing counter bumped on every mutation.
    ///
    /// Readers can poll this to learn that data changed; it never
    /// invalidates anything on its own.
    async fn data_version(&self) -> RepositoryResult<u64>;

    /// Delete every summary and record.
    async fn clear_all(&self) -> RepositoryResult<()>;
}
