//! Service layer for the ranking engine.
//!
//! Services sit between the record store and the HTTP layer. Aggregation and
//! ranking are pure functions over loaded data; the audit modes and the
//! single-key refresh orchestrate store reads and writes.

pub mod aggregation;
pub mod audit;
pub mod ranking;
pub mod statistics;

pub use aggregation::{
    compute_summaries, derive_with_identity, derived_summaries, refresh_summary,
    summaries_by_key, summarize_group, GroupStats,
};
pub use audit::{
    diagnose, fix, recalculate, reset, run_audit, run_mode, AuditError, AuditMode, AuditReport,
    DiagnoseReport, FixReport, RecalculateReport, ResetReport,
};
pub use ranking::{filter_entries, percentile, rank, PercentileStanding, RankedEntry};
pub use statistics::{
    class_distribution, guild_overview, player_profile, role_counts, ClassShare, GuildOverview,
    PlayerProfile, RoleCounts,
};
