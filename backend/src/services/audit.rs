//! Data-quality auditing and repair.
//!
//! Four independent modes share one entry point, [`run_audit`]:
//!
//! - `diagnose`: read-only scan for fields that fail the shared metric parser
//! - `fix`: overwrite those fields with zero
//! - `recalculate`: re-derive every stored summary from its records
//! - `reset`: wipe the store and reseed the built-in sample set
//!
//! Reads at the start of a mode propagate store failures. Failures while
//! writing individual entities are collected in the report's `errors` list
//! and the batch carries on.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::aggregation::{group_records, summarize_group};
use crate::db::repository::{ErrorContext, FullRepository, RepositoryError, RepositoryResult};
use crate::models::sample::{sample_players, sample_records};
use crate::models::{
    parse_metric_str, MatchRecord, MetricValue, PlayerId, PlayerSummary, RecordId,
};

/// Default cap on offending entities listed by [`diagnose`].
pub const DEFAULT_SAMPLE_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditMode {
    Diagnose,
    Fix,
    Recalculate,
    Reset,
}

impl AuditMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditMode::Diagnose => "diagnose",
            AuditMode::Fix => "fix",
            AuditMode::Recalculate => "recalculate",
            AuditMode::Reset => "reset",
        }
    }

    /// Whether the mode writes to the store.
    pub fn is_mutating(&self) -> bool {
        !matches!(self, AuditMode::Diagnose)
    }
}

impl fmt::Display for AuditMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditMode {
    type Err = RepositoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "diagnose" => Ok(AuditMode::Diagnose),
            "fix" => Ok(AuditMode::Fix),
            "recalculate" => Ok(AuditMode::Recalculate),
            "reset" => Ok(AuditMode::Reset),
            other => Err(RepositoryError::validation_with_context(
                format!(
                    "Unknown repair mode '{}'; expected diagnose, fix, recalculate or reset",
                    other
                ),
                ErrorContext::new("run_audit").with_details(other),
            )),
        }
    }
}

/// A per-entity failure recorded during a mutating mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditError {
    pub entity: String,
    pub id: Option<i64>,
    pub message: String,
}

impl AuditError {
    fn player(id: Option<PlayerId>, err: &RepositoryError) -> Self {
        Self {
            entity: "player".to_string(),
            id: id.map(|id| id.value()),
            message: err.to_string(),
        }
    }

    fn record(id: Option<RecordId>, err: &RepositoryError) -> Self {
        Self {
            entity: "record".to_string(),
            id: id.map(|id| id.value()),
            message: err.to_string(),
        }
    }
}

/// A summary with at least one unparseable statistic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidSummary {
    pub id: Option<PlayerId>,
    pub name: String,
    pub class_name: String,
    pub avg_metric: String,
    pub max_metric: String,
    pub avg_rating: String,
    pub invalid_fields: Vec<String>,
}

/// A record with an unparseable metric or rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidRecord {
    pub id: Option<RecordId>,
    pub player_name: String,
    pub class_name: String,
    pub metric_value: MetricValue,
    pub rating_value: MetricValue,
    pub invalid_fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnoseReport {
    pub summary_count: usize,
    pub record_count: usize,
    pub invalid_summary_count: usize,
    pub invalid_record_count: usize,
    /// At most `sample_limit` entries.
    pub invalid_summaries: Vec<InvalidSummary>,
    /// At most `sample_limit` entries.
    pub invalid_records: Vec<InvalidRecord>,
    pub first_summary: Option<PlayerSummary>,
    pub first_record: Option<MatchRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixReport {
    pub summaries_fixed: usize,
    pub records_fixed: usize,
    pub errors: Vec<AuditError>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecalculateReport {
    pub summaries_updated: usize,
    /// Summaries left alone because no record backs them.
    pub summaries_skipped: usize,
    pub errors: Vec<AuditError>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetReport {
    pub previous_summary_count: usize,
    pub previous_record_count: usize,
    pub summary_count: usize,
    pub record_count: usize,
    pub errors: Vec<AuditError>,
}

/// Result of any audit mode, tagged with the mode that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum AuditReport {
    Diagnose(DiagnoseReport),
    Fix(FixReport),
    Recalculate(RecalculateReport),
    Reset(ResetReport),
}

impl AuditReport {
    pub fn mode(&self) -> AuditMode {
        match self {
            AuditReport::Diagnose(_) => AuditMode::Diagnose,
            AuditReport::Fix(_) => AuditMode::Fix,
            AuditReport::Recalculate(_) => AuditMode::Recalculate,
            AuditReport::Reset(_) => AuditMode::Reset,
        }
    }

    /// Per-entity failures collected by the run.
    pub fn errors(&self) -> &[AuditError] {
        match self {
            AuditReport::Diagnose(_) => &[],
            AuditReport::Fix(r) => &r.errors,
            AuditReport::Recalculate(r) => &r.errors,
            AuditReport::Reset(r) => &r.errors,
        }
    }
}

/// Names of the summary statistics that fail the parser.
pub fn invalid_summary_fields(summary: &PlayerSummary) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if parse_metric_str(&summary.avg_metric).is_none() {
        fields.push("avgMetric");
    }
    if parse_metric_str(&summary.max_metric).is_none() {
        fields.push("maxMetric");
    }
    if parse_metric_str(&summary.avg_rating).is_none() {
        fields.push("avgRating");
    }
    fields
}

/// Names of the record numbers that fail the parser.
pub fn invalid_record_fields(record: &MatchRecord) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if !record.metric_value.is_valid() {
        fields.push("metricValue");
    }
    if !record.rating_value.is_valid() {
        fields.push("ratingValue");
    }
    fields
}

fn to_strings(fields: Vec<&'static str>) -> Vec<String> {
    fields.into_iter().map(String::from).collect()
}

/// Count entities with unparseable numbers. Never writes.
pub async fn diagnose<R: FullRepository + ?Sized>(
    repo: &R,
    sample_limit: usize,
) -> RepositoryResult<DiagnoseReport> {
    let summaries = repo.list_players().await?;
    let records = repo.list_records().await?;

    let invalid_summaries: Vec<InvalidSummary> = summaries
        .iter()
        .filter_map(|s| {
            let fields = invalid_summary_fields(s);
            (!fields.is_empty()).then(|| InvalidSummary {
                id: s.id,
                name: s.name.clone(),
                class_name: s.class_name.clone(),
                avg_metric: s.avg_metric.clone(),
                max_metric: s.max_metric.clone(),
                avg_rating: s.avg_rating.clone(),
                invalid_fields: to_strings(fields),
            })
        })
        .collect();
    let invalid_records: Vec<InvalidRecord> = records
        .iter()
        .filter_map(|r| {
            let fields = invalid_record_fields(r);
            (!fields.is_empty()).then(|| InvalidRecord {
                id: r.id,
                player_name: r.player_name.clone(),
                class_name: r.class_name.clone(),
                metric_value: r.metric_value.clone(),
                rating_value: r.rating_value.clone(),
                invalid_fields: to_strings(fields),
            })
        })
        .collect();

    let report = DiagnoseReport {
        summary_count: summaries.len(),
        record_count: records.len(),
        invalid_summary_count: invalid_summaries.len(),
        invalid_record_count: invalid_records.len(),
        invalid_summaries: invalid_summaries.into_iter().take(sample_limit).collect(),
        invalid_records: invalid_records.into_iter().take(sample_limit).collect(),
        first_summary: repo.first_player().await?,
        first_record: repo.first_record().await?,
    };
    info!(
        "Diagnose: {} of {} summaries and {} of {} records invalid",
        report.invalid_summary_count,
        report.summary_count,
        report.invalid_record_count,
        report.record_count
    );
    Ok(report)
}

/// Replace unparseable summary statistics with `"0"` and unparseable record
/// numbers with `0`. Running it twice touches nothing the second time.
pub async fn fix<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<FixReport> {
    let summaries = repo.list_players().await?;
    let records = repo.list_records().await?;
    let mut report = FixReport::default();

    for mut summary in summaries {
        let fields = invalid_summary_fields(&summary);
        if fields.is_empty() {
            continue;
        }
        for field in fields {
            match field {
                "avgMetric" => summary.avg_metric = "0".to_string(),
                "maxMetric" => summary.max_metric = "0".to_string(),
                _ => summary.avg_rating = "0".to_string(),
            }
        }
        match repo.update_player(&summary).await {
            Ok(_) => report.summaries_fixed += 1,
            Err(e) => {
                warn!("Failed to fix summary {:?}: {}", summary.id, e);
                report.errors.push(AuditError::player(summary.id, &e));
            }
        }
    }

    for mut record in records {
        if !record.has_invalid_numbers() {
            continue;
        }
        if !record.metric_value.is_valid() {
            record.metric_value = MetricValue::Number(0.0);
        }
        if !record.rating_value.is_valid() {
            record.rating_value = MetricValue::Number(0.0);
        }
        match repo.update_record(&record).await {
            Ok(_) => report.records_fixed += 1,
            Err(e) => {
                warn!("Failed to fix record {:?}: {}", record.id, e);
                report.errors.push(AuditError::record(record.id, &e));
            }
        }
    }

    info!(
        "Fix: {} summaries and {} records zeroed, {} errors",
        report.summaries_fixed,
        report.records_fixed,
        report.errors.len()
    );
    Ok(report)
}

/// Re-derive every stored summary from its current record group.
///
/// Identity fields are kept; only the three statistics are rewritten.
/// Summaries with no records are left as they are.
pub async fn recalculate<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<RecalculateReport> {
    let summaries = repo.list_players().await?;
    let records = repo.list_records().await?;
    let groups: HashMap<String, Vec<&MatchRecord>> =
        group_records(&records).into_iter().collect();
    let mut report = RecalculateReport::default();

    for mut summary in summaries {
        let key = summary.group_key();
        let group = match groups.get(&key) {
            Some(group) => group,
            None => {
                report.summaries_skipped += 1;
                continue;
            }
        };
        summarize_group(group.iter().copied()).apply_to(&mut summary);
        match repo.update_player(&summary).await {
            Ok(_) => report.summaries_updated += 1,
            Err(e) => {
                warn!("Failed to recalculate summary {}: {}", key, e);
                report.errors.push(AuditError::player(summary.id, &e));
            }
        }
    }

    info!(
        "Recalculate: {} summaries updated, {} without records, {} errors",
        report.summaries_updated,
        report.summaries_skipped,
        report.errors.len()
    );
    Ok(report)
}

/// Delete everything and reseed the built-in sample set.
pub async fn reset<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<ResetReport> {
    let mut report = ResetReport {
        previous_summary_count: repo.count_players().await?,
        previous_record_count: repo.count_records().await?,
        ..Default::default()
    };

    repo.clear_all().await?;

    for summary in sample_players() {
        if let Err(e) = repo.create_player(summary).await {
            warn!("Failed to reseed summary: {}", e);
            report.errors.push(AuditError::player(None, &e));
        }
    }
    for record in sample_records() {
        if let Err(e) = repo.create_record(record).await {
            warn!("Failed to reseed record: {}", e);
            report.errors.push(AuditError::record(None, &e));
        }
    }

    report.summary_count = repo.count_players().await?;
    report.record_count = repo.count_records().await?;
    info!(
        "Reset: {} summaries and {} records replaced by {} and {}",
        report.previous_summary_count,
        report.previous_record_count,
        report.summary_count,
        report.record_count
    );
    Ok(report)
}

/// Run the mode named by `mode`.
///
/// # Errors
/// A validation error for an unknown mode; store errors from the mode's
/// initial reads.
pub async fn run_audit<R: FullRepository + ?Sized>(
    repo: &R,
    mode: &str,
    sample_limit: usize,
) -> RepositoryResult<AuditReport> {
    let mode: AuditMode = mode.parse()?;
    run_mode(repo, mode, sample_limit).await
}

pub async fn run_mode<R: FullRepository + ?Sized>(
    repo: &R,
    mode: AuditMode,
    sample_limit: usize,
) -> RepositoryResult<AuditReport> {
    Ok(match mode {
        AuditMode::Diagnose => AuditReport::Diagnose(diagnose(repo, sample_limit).await?),
        AuditMode::Fix => AuditReport::Fix(fix(repo).await?),
        AuditMode::Recalculate => AuditReport::Recalculate(recalculate(repo).await?),
        AuditMode::Reset => AuditReport::Reset(reset(repo).await?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn test_mode_parsing() {
        assert_eq!("fix".parse::<AuditMode>().unwrap(), AuditMode::Fix);
        assert_eq!(" Reset ".parse::<AuditMode>().unwrap(), AuditMode::Reset);
        let err = "purge".parse::<AuditMode>().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_invalid_summary_fields() {
        let mut summary = PlayerSummary::new(1, "A", "G", "Tank", Role::Damage);
        assert!(invalid_summary_fields(&summary).is_empty());
        summary.avg_rating = "abc".to_string();
        summary.max_metric = "".to_string();
        assert_eq!(
            invalid_summary_fields(&summary),
            vec!["maxMetric", "avgRating"]
        );
    }

    #[test]
    fn test_report_serializes_with_mode_tag() {
        let report = AuditReport::Fix(FixReport::default());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["mode"], "fix");
        assert_eq!(json["summariesFixed"], 0);
        assert!(json["errors"].as_array().unwrap().is_empty());
    }
}
