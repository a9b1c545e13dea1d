//! Player summary repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{PlayerId, PlayerSummary};

/// CRUD operations for [`PlayerSummary`] entities.
///
/// Summaries are returned in creation order.
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    /// Store a new summary. Any `id` on the input is ignored.
    ///
    /// # Returns
    /// * `Ok(PlayerSummary)` - The stored summary with its assigned ID
    /// * `Err(RepositoryError)` - If the operation fails
    async fn create_player(&self, summary: PlayerSummary) -> RepositoryResult<PlayerSummary>;

    /// Retrieve a summary by ID.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the summary doesn't exist
    async fn get_player(&self, id: PlayerId) -> RepositoryResult<PlayerSummary>;

    /// All stored summaries.
    async fn list_players(&self) -> RepositoryResult<Vec<PlayerSummary>>;

    /// Replace a stored summary. The input must carry the ID of an existing
    /// summary.
    async fn update_player(&self, summary: &PlayerSummary) -> RepositoryResult<PlayerSummary>;

    /// Delete a summary. Its records are left in place.
    async fn delete_player(&self, id: PlayerId) -> RepositoryResult<()>;

    async fn count_players(&self) -> RepositoryResult<usize>;

    /// The first stored summary, if any.
    async fn first_player(&self) -> RepositoryResult<Option<PlayerSummary>>;
}
