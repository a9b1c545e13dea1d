//! In-memory local repository implementation.
//!
//! Suitable for unit tests, local development and the default server
//! deployment. Entities live in ordered maps keyed by their ID, so iteration
//! order is creation order.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::db::repository::*;
use crate::models::sample::{sample_players, sample_records};
use crate::models::{MatchRecord, PlayerId, PlayerSummary, RecordId};

/// In-memory local repository.
///
/// Cloning is cheap and clones share the same data.
///
/// # Example
/// ```
/// use guild_ranks::db::repositories::LocalRepository;
///
/// let repo = LocalRepository::with_sample_data();
/// assert_eq!(repo.player_count(), 3);
/// assert_eq!(repo.record_count(), 3);
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    players: BTreeMap<i64, PlayerSummary>,
    records: BTreeMap<i64, MatchRecord>,

    // ID counters
    next_player_id: i64,
    next_record_id: i64,

    version: u64,

    // Failure injection
    is_healthy: bool,
    is_writable: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            players: BTreeMap::new(),
            records: BTreeMap::new(),
            next_player_id: 1,
            next_record_id: 1,
            version: 0,
            is_healthy: true,
            is_writable: true,
        }
    }
}

impl LocalData {
    fn touch(&mut self) {
        self.version += 1;
    }

    fn insert_player(&mut self, mut summary: PlayerSummary) -> PlayerSummary {
        let id = self.next_player_id;
        self.next_player_id += 1;
        summary.id = Some(PlayerId::new(id));
        self.players.insert(id, summary.clone());
        summary
    }

    fn insert_record(&mut self, mut record: MatchRecord) -> MatchRecord {
        let id = self.next_record_id;
        self.next_record_id += 1;
        record.id = Some(RecordId::new(id));
        self.records.insert(id, record.clone());
        record
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Create a repository pre-populated with the built-in sample set.
    pub fn with_sample_data() -> Self {
        let repo = Self::new();
        repo.seed(sample_players(), sample_records());
        repo
    }

    /// Bulk-insert summaries and records, assigning fresh IDs.
    ///
    /// Bypasses health and write checks; intended for setup.
    pub fn seed(&self, players: Vec<PlayerSummary>, records: Vec<MatchRecord>) {
        let mut data = self.data.write();
        for summary in players {
            data.insert_player(summary);
        }
        for record in records {
            data.insert_record(record);
        }
        data.touch();
    }

    /// Set the health status for testing connection failures.
    ///
    /// While unhealthy every trait operation except `health_check` fails
    /// with a connection error.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Toggle write failures while reads keep working.
    pub fn set_writable(&self, writable: bool) {
        self.data.write().is_writable = writable;
    }

    /// Clear all data, keeping the failure-injection flags and the version.
    pub fn clear(&self) {
        let mut data = self.data.write();
        data.players.clear();
        data.records.clear();
        data.next_player_id = 1;
        data.next_record_id = 1;
        data.touch();
    }

    pub fn player_count(&self) -> usize {
        self.data.read().players.len()
    }

    pub fn record_count(&self) -> usize {
        self.data.read().records.len()
    }

    pub fn version(&self) -> u64 {
        self.data.read().version
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self, operation: &str) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection_with_context(
                "Record store is not reachable",
                ErrorContext::new(operation),
            ));
        }
        Ok(())
    }

    fn check_writable(&self, operation: &str, entity: &str) -> RepositoryResult<()> {
        self.check_health(operation)?;
        if !self.data.read().is_writable {
            return Err(RepositoryError::connection_with_context(
                "Record store rejected the write",
                ErrorContext::new(operation).with_entity(entity),
            ));
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn player_not_found(operation: &str, id: i64) -> RepositoryError {
    RepositoryError::not_found_with_context(
        format!("Player summary {} not found", id),
        ErrorContext::new(operation)
            .with_entity("player")
            .with_entity_id(id),
    )
}

fn record_not_found(operation: &str, id: i64) -> RepositoryError {
    RepositoryError::not_found_with_context(
        format!("Match record {} not found", id),
        ErrorContext::new(operation)
            .with_entity("record")
            .with_entity_id(id),
    )
}

fn missing_id(operation: &str, entity: &str) -> RepositoryError {
    RepositoryError::validation_with_context(
        format!("Cannot update a {} without an id", entity),
        ErrorContext::new(operation).with_entity(entity),
    )
}

#[async_trait]
impl PlayerRepository for LocalRepository {
    async fn create_player(&self, summary: PlayerSummary) -> RepositoryResult<PlayerSummary> {
        self.check_writable("create_player", "player")?;
        let mut data = self.data.write();
        let stored = data.insert_player(summary);
        data.touch();
        Ok(stored)
    }

    async fn get_player(&self, id: PlayerId) -> RepositoryResult<PlayerSummary> {
        self.check_health("get_player")?;
        self.data
            .read()
            .players
            .get(&id.value())
            .cloned()
            .ok_or_else(|| player_not_found("get_player", id.value()))
    }

    async fn list_players(&self) -> RepositoryResult<Vec<PlayerSummary>> {
        self.check_health("list_players")?;
        Ok(self.data.read().players.values().cloned().collect())
    }

    async fn update_player(&self, summary: &PlayerSummary) -> RepositoryResult<PlayerSummary> {
        self.check_writable("update_player", "player")?;
        let id = summary
            .id
            .ok_or_else(|| missing_id("update_player", "player"))?;
        let mut data = self.data.write();
        match data.players.get_mut(&id.value()) {
            Some(slot) => {
                *slot = summary.clone();
                data.touch();
                Ok(summary.clone())
            }
            None => Err(player_not_found("update_player", id.value())),
        }
    }

    async fn delete_player(&self, id: PlayerId) -> RepositoryResult<()> {
        self.check_writable("delete_player", "player")?;
        let mut data = self.data.write();
        if data.players.remove(&id.value()).is_none() {
            return Err(player_not_found("delete_player", id.value()));
        }
        data.touch();
        Ok(())
    }

    async fn count_players(&self) -> RepositoryResult<usize> {
        self.check_health("count_players")?;
        Ok(self.data.read().players.len())
    }

    async fn first_player(&self) -> RepositoryResult<Option<PlayerSummary>> {
        self.check_health("first_player")?;
        Ok(self.data.read().players.values().next().cloned())
    }
}

#[async_trait]
impl RecordRepository for LocalRepository {
    async fn create_record(&self, record: MatchRecord) -> RepositoryResult<MatchRecord> {
        self.check_writable("create_record", "record")?;
        let mut data = self.data.write();
        let stored = data.insert_record(record);
        data.touch();
        Ok(stored)
    }

    async fn get_record(&self, id: RecordId) -> RepositoryResult<MatchRecord> {
        self.check_health("get_record")?;
        self.data
            .read()
            .records
            .get(&id.value())
            .cloned()
            .ok_or_else(|| record_not_found("get_record", id.value()))
    }

    async fn list_records(&self) -> RepositoryResult<Vec<MatchRecord>> {
        self.check_health("list_records")?;
        Ok(self.data.read().records.values().cloned().collect())
    }

    async fn list_records_for(
        &self,
        player_name: &str,
        class_name: &str,
    ) -> RepositoryResult<Vec<MatchRecord>> {
        self.check_health("list_records_for")?;
        Ok(self
            .data
            .read()
            .records
            .values()
            .filter(|r| r.player_name == player_name && r.class_name == class_name)
            .cloned()
            .collect())
    }

    async fn update_record(&self, record: &MatchRecord) -> RepositoryResult<MatchRecord> {
        self.check_writable("update_record", "record")?;
        let id = record
            .id
            .ok_or_else(|| missing_id("update_record", "record"))?;
        let mut data = self.data.write();
        match data.records.get_mut(&id.value()) {
            Some(slot) => {
                *slot = record.clone();
                data.touch();
                Ok(record.clone())
            }
            None => Err(record_not_found("update_record", id.value())),
        }
    }

    async fn delete_record(&self, id: RecordId) -> RepositoryResult<()> {
        self.check_writable("delete_record", "record")?;
        let mut data = self.data.write();
        if data.records.remove(&id.value()).is_none() {
            return Err(record_not_found("delete_record", id.value()));
        }
        data.touch();
        Ok(())
    }

    async fn count_records(&self) -> RepositoryResult<usize> {
        self.check_health("count_records")?;
        Ok(self.data.read().records.len())
    }

    async fn first_record(&self) -> RepositoryResult<Option<MatchRecord>> {
        self.check_health("first_record")?;
        Ok(self.data.read().records.values().next().cloned())
    }
}

#[async_trait]
impl MaintenanceRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn data_version(&self) -> RepositoryResult<u64> {
        self.check_health("data_version")?;
        Ok(self.data.read().version)
    }

    async fn clear_all(&self) -> RepositoryResult<()> {
        self.check_writable("clear_all", "store")?;
        self.clear();
        Ok(())
    }
}
