//! Record aggregation.
//!
//! Groups match records by exact `(playerName, className)` and derives the
//! three summary statistics. Values that fail [`parse_metric`] are left out
//! of both the sum and the count; a group with nothing valid reports `"0"`.

use log::{debug, info};
use std::collections::HashMap;

use crate::db::repository::{FullRepository, RepositoryResult};
use crate::db::services::SubmissionDefaults;
use crate::models::{format_fixed, format_plain, group_key, parse_metric, MatchRecord, PlayerSummary};

/// Statistics derived from one record group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStats {
    pub avg_metric: String,
    pub max_metric: String,
    pub avg_rating: String,
    /// Records whose metric parsed.
    pub valid_metrics: usize,
    /// Records whose rating parsed.
    pub valid_ratings: usize,
}

impl GroupStats {
    fn empty() -> Self {
        Self {
            avg_metric: "0".to_string(),
            max_metric: "0".to_string(),
            avg_rating: "0".to_string(),
            valid_metrics: 0,
            valid_ratings: 0,
        }
    }

    /// Copy the statistics onto a summary, leaving identity fields alone.
    pub fn apply_to(&self, summary: &mut PlayerSummary) {
        summary.avg_metric = self.avg_metric.clone();
        summary.max_metric = self.max_metric.clone();
        summary.avg_rating = self.avg_rating.clone();
    }
}

/// Derive average metric (0 decimals), max metric and average rating
/// (1 decimal) for one group of records.
pub fn summarize_group<'a, I>(records: I) -> GroupStats
where
    I: IntoIterator<Item = &'a MatchRecord>,
{
    let mut metric_sum = 0.0;
    let mut metric_max: Option<f64> = None;
    let mut rating_sum = 0.0;
    let mut stats = GroupStats::empty();

    for record in records {
        match parse_metric(&record.metric_value) {
            Some(metric) => {
                metric_sum += metric;
                metric_max = Some(metric_max.map_or(metric, |m| m.max(metric)));
                stats.valid_metrics += 1;
            }
            None => debug!(
                "Skipping unparseable metric {:?} on record {:?} ({})",
                record.metric_value,
                record.id,
                record.group_key()
            ),
        }
        match parse_metric(&record.rating_value) {
            Some(rating) => {
                rating_sum += rating;
                stats.valid_ratings += 1;
            }
            None => debug!(
                "Skipping unparseable rating {:?} on record {:?} ({})",
                record.rating_value,
                record.id,
                record.group_key()
            ),
        }
    }

    if stats.valid_metrics > 0 {
        stats.avg_metric = format_fixed(metric_sum / stats.valid_metrics as f64, 0);
    }
    if let Some(max) = metric_max {
        stats.max_metric = format_plain(max);
    }
    if stats.valid_ratings > 0 {
        stats.avg_rating = format_fixed(rating_sum / stats.valid_ratings as f64, 1);
    }
    stats
}

/// Group records by key, preserving first-appearance order of the keys.
pub fn group_records(records: &[MatchRecord]) -> Vec<(String, Vec<&MatchRecord>)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<&MatchRecord>)> = Vec::new();
    for record in records {
        let key = record.group_key();
        match index.get(&key) {
            Some(&i) => groups[i].1.push(record),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![record]));
            }
        }
    }
    groups
}

/// One summary per `(playerName, className)` pair, in first-appearance order.
///
/// Identity fields come from the group's first record. Records carry no
/// guild tag, so every summary gets `guild_tag`.
pub fn compute_summaries(records: &[MatchRecord], guild_tag: &str) -> Vec<PlayerSummary> {
    group_records(records)
        .into_iter()
        .map(|(_, group)| {
            let first = group[0];
            let mut summary = PlayerSummary::new(
                first.base_id,
                first.player_name.clone(),
                guild_tag,
                first.class_name.clone(),
                first.role,
            );
            summarize_group(group.iter().copied()).apply_to(&mut summary);
            summary
        })
        .collect()
}

/// [`compute_summaries`] keyed by group key.
pub fn summaries_by_key(
    records: &[MatchRecord],
    guild_tag: &str,
) -> HashMap<String, PlayerSummary> {
    compute_summaries(records, guild_tag)
        .into_iter()
        .map(|s| (s.group_key(), s))
        .collect()
}

/// Computed summaries carrying the identity of matching stored summaries.
///
/// When a stored summary shares the group key, its `id`, `baseId`,
/// `guildTag` and `role` replace the record-derived ones; the stored role
/// flag is authoritative. Groups with no stored summary get `guild_tag`.
/// Stored summaries without records do not appear.
pub fn derive_with_identity(
    records: &[MatchRecord],
    stored: &[PlayerSummary],
    guild_tag: &str,
) -> Vec<PlayerSummary> {
    let mut identities: HashMap<String, &PlayerSummary> = HashMap::new();
    for summary in stored {
        identities.entry(summary.group_key()).or_insert(summary);
    }

    compute_summaries(records, guild_tag)
        .into_iter()
        .map(|mut computed| {
            if let Some(known) = identities.get(&computed.group_key()) {
                computed.id = known.id;
                computed.base_id = known.base_id;
                computed.guild_tag = known.guild_tag.clone();
                computed.role = known.role;
            }
            computed
        })
        .collect()
}

/// Load records and summaries from the store and derive current summaries.
pub async fn derived_summaries<R: FullRepository + ?Sized>(
    repo: &R,
    guild_tag: &str,
) -> RepositoryResult<Vec<PlayerSummary>> {
    let records = repo.list_records().await?;
    let stored = repo.list_players().await?;
    Ok(derive_with_identity(&records, &stored, guild_tag))
}

/// Recompute the stored summary for one `(name, class)` pair.
///
/// Updates the first stored summary with that key, or creates one when none
/// exists. A pair without records yields `"0"` statistics.
pub async fn refresh_summary<R: FullRepository + ?Sized>(
    repo: &R,
    player_name: &str,
    class_name: &str,
    defaults: &SubmissionDefaults,
) -> RepositoryResult<PlayerSummary> {
    let records = repo.list_records_for(player_name, class_name).await?;
    let stats = summarize_group(&records);
    let key = group_key(player_name, class_name);

    let existing = repo
        .list_players()
        .await?
        .into_iter()
        .find(|s| s.group_key() == key);

    let refreshed = match existing {
        Some(mut summary) => {
            stats.apply_to(&mut summary);
            repo.update_player(&summary).await?
        }
        None => {
            let first = records.first();
            let mut summary = PlayerSummary::new(
                first.map(|r| r.base_id).unwrap_or_default(),
                player_name,
                defaults.guild_tag.clone(),
                class_name,
                first
                    .map(|r| r.role)
                    .unwrap_or_else(|| defaults.classifier.default_role(class_name)),
            );
            stats.apply_to(&mut summary);
            repo.create_player(summary).await?
        }
    };

    info!(
        "Refreshed summary {} from {} records (avg {}, max {})",
        key,
        records.len(),
        refreshed.avg_metric,
        refreshed.max_metric
    );
    Ok(refreshed)
}
