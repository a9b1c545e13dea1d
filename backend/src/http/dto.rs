//! Data Transfer Objects for the HTTP API.
//!
//! Payload types live in [`crate::api`]; this module adds the response
//! envelope and the query-string types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use crate::api::{
    DataVersion, Leaderboard, PercentileResult, RefreshRequest, StoreStatus, SummarySource,
};

/// Envelope for every successful response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResponse<T> {
    /// Always `true`
    pub success: bool,
    pub data: T,
    pub timestamp: DateTime<Utc>,
}

impl<T> OperationResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            timestamp: Utc::now(),
        }
    }
}

/// A list together with the data version it was read at.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub data_version: u64,
}

impl<T> ListResponse<T> {
    pub fn new(items: Vec<T>, data_version: u64) -> Self {
        let total = items.len();
        Self {
            items,
            total,
            data_version,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Record store connection status
    pub database: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub id: i64,
}

/// Query parameters for the leaderboard endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LeaderboardQuery {
    /// `damage` (default) or `healer`; `dps`/`hps` are accepted too
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub source: Option<SummarySource>,
    /// Case-insensitive name/class filter
    #[serde(default)]
    pub q: Option<String>,
}

/// Query parameters for the percentile endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PercentileQuery {
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub player_name: Option<String>,
    #[serde(default)]
    pub source: Option<SummarySource>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SourceQuery {
    #[serde(default)]
    pub source: Option<SummarySource>,
}

/// Query parameters for the repair endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RepairQuery {
    /// diagnose, fix, recalculate or reset
    #[serde(default)]
    pub mode: Option<String>,
}
