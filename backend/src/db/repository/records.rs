//! Match record repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{MatchRecord, RecordId};

/// CRUD operations for [`MatchRecord`] entities.
///
/// Records are returned in creation order.
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Store a new record. Any `id` on the input is ignored.
    async fn create_record(&self, record: MatchRecord) -> RepositoryResult<MatchRecord>;

    /// Retrieve a record by ID.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the record doesn't exist
    async fn get_record(&self, id: RecordId) -> RepositoryResult<MatchRecord>;

    /// All stored records.
    async fn list_records(&self) -> RepositoryResult<Vec<MatchRecord>>;

    /// Records whose `(playerName, className)` pair matches exactly.
    async fn list_records_for(
        &self,
        player_name: &str,
        class_name: &str,
    ) -> RepositoryResult<Vec<MatchRecord>>;

    /// Replace a stored record. The input must carry the ID of an existing
    /// record.
    async fn update_record(&self, record: &MatchRecord) -> RepositoryResult<MatchRecord>;

    /// Delete a record. Summaries are not recomputed.
    async fn delete_record(&self, id: RecordId) -> RepositoryResult<()>;

    async fn count_records(&self) -> RepositoryResult<usize>;

    /// The first stored record, if any.
    async fn first_record(&self) -> RepositoryResult<Option<MatchRecord>>;
}
