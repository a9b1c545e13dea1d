//! High-level store service layer.
//!
//! Repository-agnostic operations used by the HTTP handlers: registration
//! and submission with their defaults and validation, lookups, deletion and
//! store status. Aggregation, ranking and repair live in [`crate::services`].
//!
//! # Usage
//!
//! ```no_run
//! use guild_ranks::db::{services, repositories::LocalRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::with_sample_data();
//!     let records = services::list_records(&repo).await?;
//!     println!("Found {} records", records.len());
//!     Ok(())
//! }
//! ```

use chrono::Utc;
use log::info;
use serde::{Deserialize, Serialize};

use super::repository::{ErrorContext, FullRepository, RepositoryError, RepositoryResult};
use crate::models::{
    MatchRecord, MetricValue, NewPlayer, NewRecord, PlayerId, PlayerSummary, RecordId,
    RoleClassifier, DEFAULT_GUILD_TAG,
};

/// Snapshot of the store for status pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStatus {
    pub connected: bool,
    pub summary_count: usize,
    pub record_count: usize,
    pub first_summary: Option<PlayerSummary>,
    pub first_record: Option<MatchRecord>,
    pub data_version: u64,
}

/// Defaults applied to registrations and submissions.
#[derive(Debug, Clone)]
pub struct SubmissionDefaults {
    pub classifier: RoleClassifier,
    pub guild_tag: String,
}

impl SubmissionDefaults {
    pub fn new(classifier: RoleClassifier, guild_tag: impl Into<String>) -> Self {
        Self {
            classifier,
            guild_tag: guild_tag.into(),
        }
    }
}

impl Default for SubmissionDefaults {
    fn default() -> Self {
        Self::new(RoleClassifier::default(), DEFAULT_GUILD_TAG)
    }
}

// ==================== Health & Status ====================

/// Check if the store is reachable.
pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

pub async fn data_version<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<u64> {
    repo.data_version().await
}

/// Counts, the first stored entity of each kind and the data version.
pub async fn store_status<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<StoreStatus> {
    let connected = repo.health_check().await?;
    Ok(StoreStatus {
        connected,
        summary_count: repo.count_players().await?,
        record_count: repo.count_records().await?,
        first_summary: repo.first_player().await?,
        first_record: repo.first_record().await?,
        data_version: repo.data_version().await?,
    })
}

/// Delete every summary and record.
pub async fn clear_all<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<()> {
    repo.clear_all().await?;
    info!("Cleared all player summaries and match records");
    Ok(())
}

// ==================== Player Summaries ====================

/// Register a new player summary.
///
/// Name and class are required. Missing fields default to: `baseId` = now
/// in epoch milliseconds, the configured guild tag, `"0"` statistics, and the
/// classifier's role for the class.
pub async fn register_player<R: FullRepository + ?Sized>(
    repo: &R,
    payload: NewPlayer,
    defaults: &SubmissionDefaults,
) -> RepositoryResult<PlayerSummary> {
    let name = required(&payload.name, "name", "register_player")?;
    let class_name = required(&payload.class_name, "className", "register_player")?;

    let role = defaults.classifier.resolve(payload.role, &class_name);
    let guild_tag = payload
        .guild_tag
        .filter(|g| !g.is_empty())
        .unwrap_or_else(|| defaults.guild_tag.clone());
    let mut summary = PlayerSummary::new(
        payload.base_id.unwrap_or_else(epoch_millis),
        name,
        guild_tag,
        class_name,
        role,
    );
    if let Some(avg) = non_empty(payload.avg_metric) {
        summary.avg_metric = avg;
    }
    if let Some(max) = non_empty(payload.max_metric) {
        summary.max_metric = max;
    }
    if let Some(rating) = non_empty(payload.avg_rating) {
        summary.avg_rating = rating;
    }

    let stored = repo.create_player(summary).await?;
    info!(
        "Registered player {} ({}) as {}",
        stored.name, stored.class_name, stored.role
    );
    Ok(stored)
}

pub async fn get_player<R: FullRepository + ?Sized>(
    repo: &R,
    id: PlayerId,
) -> RepositoryResult<PlayerSummary> {
    repo.get_player(id).await
}

pub async fn list_players<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Vec<PlayerSummary>> {
    repo.list_players().await
}

/// Delete a summary. Its records stay behind.
pub async fn delete_player<R: FullRepository + ?Sized>(
    repo: &R,
    id: PlayerId,
) -> RepositoryResult<()> {
    repo.delete_player(id).await?;
    info!("Deleted player summary {}", id);
    Ok(())
}

// ==================== Match Records ====================

/// Submit a new match record.
///
/// Player name, class and a metric are required. The metric is stored as
/// given, so an unparseable value is accepted here and later excluded from
/// aggregation. Missing fields default to: rating 0, today's date (UTC),
/// a `Dungeon` encounter, epoch-millisecond player references, and the
/// classifier's role for the class.
pub async fn submit_record<R: FullRepository + ?Sized>(
    repo: &R,
    payload: NewRecord,
    defaults: &SubmissionDefaults,
) -> RepositoryResult<MatchRecord> {
    let player_name = required(&payload.player_name, "playerName", "submit_record")?;
    let class_name = required(&payload.class_name, "className", "submit_record")?;
    let metric_missing = match &payload.metric_value {
        MetricValue::Missing => true,
        MetricValue::Text(s) => s.trim().is_empty(),
        MetricValue::Number(_) => false,
    };
    if metric_missing {
        return Err(missing_field("metricValue", "submit_record"));
    }

    let now = epoch_millis();
    let record = MatchRecord {
        id: None,
        player_ref: payload.player_ref.unwrap_or(now),
        base_id: payload.base_id.unwrap_or(now),
        role: defaults.classifier.resolve(payload.role, &class_name),
        player_name,
        class_name,
        metric_value: payload.metric_value,
        rating_value: payload
            .rating_value
            .filter(|v| !v.is_missing())
            .unwrap_or_default(),
        occurred_on: payload
            .occurred_on
            .unwrap_or_else(|| Utc::now().date_naive()),
        encounter_type: payload.encounter_type.unwrap_or_default(),
    };

    let stored = repo.create_record(record).await?;
    info!(
        "Recorded {} {} for {} ({})",
        stored.role.metric_label(),
        stored.metric_value,
        stored.player_name,
        stored.class_name
    );
    Ok(stored)
}

pub async fn get_record<R: FullRepository + ?Sized>(
    repo: &R,
    id: RecordId,
) -> RepositoryResult<MatchRecord> {
    repo.get_record(id).await
}

pub async fn list_records<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Vec<MatchRecord>> {
    repo.list_records().await
}

/// Delete a record. Summaries are not recomputed.
pub async fn delete_record<R: FullRepository + ?Sized>(
    repo: &R,
    id: RecordId,
) -> RepositoryResult<()> {
    repo.delete_record(id).await?;
    info!("Deleted match record {}", id);
    Ok(())
}

// ==================== Helpers ====================

fn epoch_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn required(value: &str, field: &str, operation: &str) -> RepositoryResult<String> {
    if value.trim().is_empty() {
        return Err(missing_field(field, operation));
    }
    Ok(value.to_string())
}

fn missing_field(field: &str, operation: &str) -> RepositoryError {
    RepositoryError::validation_with_context(
        format!("Field '{}' is required", field),
        ErrorContext::new(operation).with_details(field),
    )
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
