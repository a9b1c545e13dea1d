//! Tests for the data-quality auditor and its repair modes.

mod support;

use guild_ranks::db::repositories::LocalRepository;
use guild_ranks::db::{PlayerRepository, RecordRepository};
use guild_ranks::models::{MetricValue, Role};
use guild_ranks::services::audit::{
    diagnose, fix, recalculate, reset, run_audit, AuditMode, AuditReport, DEFAULT_SAMPLE_LIMIT,
};
use support::{record, summary};

fn dirty_repo() -> LocalRepository {
    let repo = LocalRepository::new();
    repo.seed(
        vec![
            summary("Alice", "Tank", Role::Damage, "NaN", "1500", "80"),
            summary("Bob", "Mage", Role::Damage, "900", "1000", "70"),
        ],
        vec![
            record("Alice", "Tank", Role::Damage, 1000.0, 80.0),
            record("Alice", "Tank", Role::Damage, "abc", 90.0),
            record("Bob", "Mage", Role::Damage, 900.0, MetricValue::Missing),
        ],
    );
    repo
}

#[tokio::test]
async fn test_diagnose_counts_without_writing() {
    let repo = dirty_repo();
    let version = repo.version();

    let report = diagnose(&repo, DEFAULT_SAMPLE_LIMIT).await.unwrap();
    assert_eq!(report.summary_count, 2);
    assert_eq!(report.record_count, 3);
    assert_eq!(report.invalid_summary_count, 1);
    assert_eq!(report.invalid_record_count, 2);
    assert_eq!(report.invalid_summaries[0].invalid_fields, vec!["avgMetric"]);
    assert_eq!(report.invalid_records[1].invalid_fields, vec!["ratingValue"]);
    assert_eq!(report.first_summary.unwrap().name, "Alice");
    assert_eq!(report.first_record.unwrap().metric_value, MetricValue::Number(1000.0));
    assert_eq!(repo.version(), version);
}

#[tokio::test]
async fn test_diagnose_sample_limit_caps_lists_not_counts() {
    let repo = dirty_repo();
    let report = diagnose(&repo, 1).await.unwrap();
    assert_eq!(report.invalid_record_count, 2);
    assert_eq!(report.invalid_records.len(), 1);
}

#[tokio::test]
async fn test_fix_zeroes_invalid_fields_only() {
    let repo = dirty_repo();
    let report = fix(&repo).await.unwrap();
    assert_eq!(report.summaries_fixed, 1);
    assert_eq!(report.records_fixed, 2);
    assert!(report.errors.is_empty());

    let summaries = repo.list_players().await.unwrap();
    assert_eq!(summaries[0].avg_metric, "0");
    assert_eq!(summaries[0].max_metric, "1500");

    let records = repo.list_records().await.unwrap();
    assert_eq!(records[1].metric_value, MetricValue::Number(0.0));
    assert_eq!(records[1].rating_value, MetricValue::Number(90.0));
    assert_eq!(records[2].rating_value, MetricValue::Number(0.0));

    let after = diagnose(&repo, DEFAULT_SAMPLE_LIMIT).await.unwrap();
    assert_eq!(after.invalid_summary_count, 0);
    assert_eq!(after.invalid_record_count, 0);
}

#[tokio::test]
async fn test_bad_rating_found_then_zeroed_once() {
    let repo = LocalRepository::new();
    repo.seed(
        vec![summary("Alice", "Tank", Role::Damage, "1000", "1100", "abc")],
        vec![],
    );

    let report = diagnose(&repo, DEFAULT_SAMPLE_LIMIT).await.unwrap();
    assert_eq!(report.invalid_summary_count, 1);
    assert_eq!(report.invalid_summaries[0].invalid_fields, vec!["avgRating"]);

    let first = fix(&repo).await.unwrap();
    assert_eq!(first.summaries_fixed, 1);
    assert_eq!(repo.list_players().await.unwrap()[0].avg_rating, "0");

    let second = fix(&repo).await.unwrap();
    assert_eq!(second.summaries_fixed, 0);
    assert_eq!(second.records_fixed, 0);
}

#[tokio::test]
async fn test_fix_is_idempotent() {
    let repo = dirty_repo();
    fix(&repo).await.unwrap();
    let version = repo.version();

    let second = fix(&repo).await.unwrap();
    assert_eq!(second.summaries_fixed, 0);
    assert_eq!(second.records_fixed, 0);
    assert_eq!(repo.version(), version);
}

#[tokio::test]
async fn test_fix_then_recalculate_counts_zeroed_metric() {
    let repo = dirty_repo();
    fix(&repo).await.unwrap();
    recalculate(&repo).await.unwrap();

    let alice = &repo.list_players().await.unwrap()[0];
    // "abc" became 0 and now takes part in the mean
    assert_eq!(alice.avg_metric, "500");
    assert_eq!(alice.max_metric, "1000");
}

#[tokio::test]
async fn test_recalculate_rewrites_statistics_and_keeps_identity() {
    let repo = dirty_repo();
    let before = repo.list_players().await.unwrap();

    let report = recalculate(&repo).await.unwrap();
    assert_eq!(report.summaries_updated, 2);
    assert_eq!(report.summaries_skipped, 0);

    let after = repo.list_players().await.unwrap();
    assert_eq!(after[0].id, before[0].id);
    assert_eq!(after[0].base_id, before[0].base_id);
    assert_eq!(after[0].avg_metric, "1000");
    assert_eq!(after[0].max_metric, "1000");
    assert_eq!(after[0].avg_rating, "85.0");
    assert_eq!(after[1].avg_rating, "0");
}

#[tokio::test]
async fn test_recalculate_skips_summaries_without_records() {
    let repo = LocalRepository::new();
    repo.seed(
        vec![summary("Ghost", "Tank", Role::Damage, "1234", "2000", "50")],
        vec![],
    );

    let report = recalculate(&repo).await.unwrap();
    assert_eq!(report.summaries_updated, 0);
    assert_eq!(report.summaries_skipped, 1);
    assert_eq!(repo.list_players().await.unwrap()[0].avg_metric, "1234");
}

#[tokio::test]
async fn test_recalculate_twice_is_stable() {
    let repo = dirty_repo();
    recalculate(&repo).await.unwrap();
    let first = repo.list_players().await.unwrap();
    recalculate(&repo).await.unwrap();
    assert_eq!(repo.list_players().await.unwrap(), first);
}

#[tokio::test]
async fn test_reset_replaces_everything_with_samples() {
    let repo = dirty_repo();
    repo.create_record(record("Extra", "Bard", Role::Damage, 1.0, 1.0))
        .await
        .unwrap();

    let report = reset(&repo).await.unwrap();
    assert_eq!(report.previous_summary_count, 2);
    assert_eq!(report.previous_record_count, 4);
    assert_eq!(report.summary_count, 3);
    assert_eq!(report.record_count, 3);
    assert!(report.errors.is_empty());

    let names: Vec<String> = repo
        .list_players()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["Player 1", "Player 2", "Player 3"]);
}

#[tokio::test]
async fn test_write_failures_are_collected_per_entity() {
    let repo = dirty_repo();
    repo.set_writable(false);

    let report = fix(&repo).await.unwrap();
    assert_eq!(report.summaries_fixed, 0);
    assert_eq!(report.records_fixed, 0);
    assert_eq!(report.errors.len(), 3);
    assert_eq!(report.errors[0].entity, "player");
    assert_eq!(report.errors[1].entity, "record");
    assert!(report.errors[1].id.is_some());

    let recalc = recalculate(&repo).await.unwrap();
    assert_eq!(recalc.errors.len(), 2);
}

#[tokio::test]
async fn test_unreachable_store_fails_the_mode() {
    let repo = dirty_repo();
    repo.set_healthy(false);

    let err = diagnose(&repo, DEFAULT_SAMPLE_LIMIT).await.unwrap_err();
    assert!(err.is_unavailable());
    assert!(fix(&repo).await.is_err());
    assert!(reset(&repo).await.is_err());
}

#[tokio::test]
async fn test_run_audit_dispatches_by_name() {
    let repo = dirty_repo();

    let report = run_audit(&repo, "Diagnose", DEFAULT_SAMPLE_LIMIT).await.unwrap();
    assert_eq!(report.mode(), AuditMode::Diagnose);
    assert!(report.errors().is_empty());

    let report = run_audit(&repo, "fix", DEFAULT_SAMPLE_LIMIT).await.unwrap();
    assert!(matches!(report, AuditReport::Fix(ref r) if r.records_fixed == 2));

    let err = run_audit(&repo, "purge", DEFAULT_SAMPLE_LIMIT).await.unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn test_report_json_is_tagged_with_mode() {
    let report = AuditReport::Recalculate(Default::default());
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["mode"], "recalculate");
    assert_eq!(json["summariesUpdated"], 0);
}
