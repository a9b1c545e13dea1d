//! Per-match records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::metric::MetricValue;
use super::player::Role;
use crate::define_id_type;

define_id_type!(i64, RecordId);

/// Kind of content a match was played in.
///
/// Stored as a plain string; labels outside the known set are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EncounterType {
    Solo,
    Group,
    Dungeon,
    Other(String),
}

impl Default for EncounterType {
    fn default() -> Self {
        EncounterType::Dungeon
    }
}

impl From<String> for EncounterType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Solo" => EncounterType::Solo,
            "Group" => EncounterType::Group,
            "Dungeon" => EncounterType::Dungeon,
            _ => EncounterType::Other(s),
        }
    }
}

impl From<&str> for EncounterType {
    fn from(s: &str) -> Self {
        EncounterType::from(s.to_string())
    }
}

impl From<EncounterType> for String {
    fn from(e: EncounterType) -> Self {
        e.to_string()
    }
}

impl fmt::Display for EncounterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncounterType::Solo => f.write_str("Solo"),
            EncounterType::Group => f.write_str("Group"),
            EncounterType::Dungeon => f.write_str("Dungeon"),
            EncounterType::Other(label) => f.write_str(label),
        }
    }
}

/// One submitted match result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    #[serde(default)]
    pub id: Option<RecordId>,
    pub player_ref: i64,
    pub base_id: i64,
    pub player_name: String,
    pub class_name: String,
    pub role: Role,
    pub metric_value: MetricValue,
    pub rating_value: MetricValue,
    pub occurred_on: NaiveDate,
    pub encounter_type: EncounterType,
}

impl MatchRecord {
    pub fn group_key(&self) -> String {
        super::group_key(&self.player_name, &self.class_name)
    }

    /// True when either numeric field fails the shared parser.
    pub fn has_invalid_numbers(&self) -> bool {
        !self.metric_value.is_valid() || !self.rating_value.is_valid()
    }
}

/// Submission payload for a new match record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecord {
    #[serde(default)]
    pub player_ref: Option<i64>,
    #[serde(default)]
    pub base_id: Option<i64>,
    #[serde(default)]
    pub player_name: String,
    #[serde(default)]
    pub class_name: String,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default = "missing_metric")]
    pub metric_value: MetricValue,
    #[serde(default)]
    pub rating_value: Option<MetricValue>,
    #[serde(default)]
    pub occurred_on: Option<NaiveDate>,
    #[serde(default)]
    pub encounter_type: Option<EncounterType>,
}

fn missing_metric() -> MetricValue {
    MetricValue::Missing
}
