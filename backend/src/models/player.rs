//! Player summaries and role classification.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::define_id_type;

define_id_type!(i64, PlayerId);

/// Healer class names used when nothing else says otherwise.
pub const DEFAULT_HEALER_CLASSES: &[&str] = &["Quedasanta"];

/// Guild tag assigned to registrations that do not carry one.
pub const DEFAULT_GUILD_TAG: &str = "INFERNUS";

/// Role attached to a player/class pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Healer,
    Damage,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Healer => "healer",
            Role::Damage => "damage",
        }
    }

    /// Label used for the metric on leaderboards.
    pub fn metric_label(&self) -> &'static str {
        match self {
            Role::Healer => "HPS",
            Role::Damage => "DPS",
        }
    }

    pub fn is_healer(&self) -> bool {
        matches!(self, Role::Healer)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "healer" | "heal" | "hps" => Ok(Role::Healer),
            "damage" | "dps" => Ok(Role::Damage),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Supplies a default role from a class name.
///
/// Only consulted when a summary or record is created without a role; once
/// stored, the entity's own `role` field is what ranking and statistics read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleClassifier {
    healer_classes: Vec<String>,
}

impl RoleClassifier {
    pub fn new<I, S>(healer_classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            healer_classes: healer_classes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn healer_classes(&self) -> &[String] {
        &self.healer_classes
    }

    /// Role for a class the store has no flag for yet.
    pub fn default_role(&self, class_name: &str) -> Role {
        if self.healer_classes.iter().any(|c| c == class_name) {
            Role::Healer
        } else {
            Role::Damage
        }
    }

    /// Explicit role if given, otherwise the class-name default.
    pub fn resolve(&self, explicit: Option<Role>, class_name: &str) -> Role {
        explicit.unwrap_or_else(|| self.default_role(class_name))
    }
}

impl Default for RoleClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_HEALER_CLASSES.iter().copied())
    }
}

/// Aggregated per-(player, class) statistics.
///
/// The three statistics stay decimal-formatted strings because that is how
/// they are stored; they can hold garbage until a repair pass runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    #[serde(default)]
    pub id: Option<PlayerId>,
    pub base_id: i64,
    pub name: String,
    pub guild_tag: String,
    pub class_name: String,
    pub role: Role,
    pub avg_metric: String,
    pub max_metric: String,
    pub avg_rating: String,
}

impl PlayerSummary {
    /// A fresh summary with zeroed statistics.
    pub fn new(
        base_id: i64,
        name: impl Into<String>,
        guild_tag: impl Into<String>,
        class_name: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: None,
            base_id,
            name: name.into(),
            guild_tag: guild_tag.into(),
            class_name: class_name.into(),
            role,
            avg_metric: "0".to_string(),
            max_metric: "0".to_string(),
            avg_rating: "0".to_string(),
        }
    }

    /// Key shared with the records that back this summary.
    pub fn group_key(&self) -> String {
        super::group_key(&self.name, &self.class_name)
    }
}

/// Registration payload for a new player summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlayer {
    #[serde(default)]
    pub base_id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub guild_tag: Option<String>,
    #[serde(default)]
    pub class_name: String,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub avg_metric: Option<String>,
    #[serde(default)]
    pub max_metric: Option<String>,
    #[serde(default)]
    pub avg_rating: Option<String>,
}
