//! Public API surface.
//!
//! Consolidates the payload types exchanged with clients. All types derive
//! Serialize/Deserialize; field names are camelCase on the wire.

pub use crate::db::services::StoreStatus;
pub use crate::models::{
    EncounterType, MatchRecord, MetricValue, NewPlayer, NewRecord, PlayerId, PlayerSummary,
    RecordId, Role,
};
pub use crate::services::audit::{
    AuditError, AuditMode, AuditReport, DiagnoseReport, FixReport, InvalidRecord, InvalidSummary,
    RecalculateReport, ResetReport,
};
pub use crate::services::ranking::{PercentileStanding, RankedEntry};
pub use crate::services::statistics::{
    ClassProfile, ClassShare, GuildOverview, PlayerProfile, RoleCounts,
};

use serde::{Deserialize, Serialize};

/// Which summaries a read operates on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummarySource {
    /// Computed from the current records, carrying stored identity.
    #[default]
    Derived,
    /// The summaries as stored.
    Stored,
}

/// Leaderboard for one role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leaderboard {
    pub role: Role,
    /// "DPS" or "HPS".
    pub metric_label: String,
    pub source: SummarySource,
    pub entries: Vec<RankedEntry>,
    pub data_version: u64,
}

/// A percentile lookup together with what was asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentileResult {
    pub class_name: String,
    pub player_name: String,
    #[serde(flatten)]
    pub standing: PercentileStanding,
    pub data_version: u64,
}

/// Target of a single-key summary refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub player_name: String,
    pub class_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataVersion {
    pub data_version: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_source_default_and_serde() {
        assert_eq!(SummarySource::default(), SummarySource::Derived);
        let source: SummarySource = serde_json::from_str("\"stored\"").unwrap();
        assert_eq!(source, SummarySource::Stored);
    }

    #[test]
    fn test_percentile_result_flattens_standing() {
        let result = PercentileResult {
            class_name: "Tank".into(),
            player_name: "Alice".into(),
            standing: PercentileStanding {
                rank: 2,
                class_size: 4,
                percentile: Some(75),
            },
            data_version: 3,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["classSize"], 4);
        assert_eq!(json["percentile"], 75);
        assert_eq!(json["dataVersion"], 3);
    }
}
