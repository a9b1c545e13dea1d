//! Guild-wide statistics and per-player profiles.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::aggregation::group_records;
use super::ranking::percentile;
use crate::models::{parse_metric, parse_metric_str, round_to, MatchRecord, PlayerSummary, Role};

/// How many summaries play one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassShare {
    pub class_name: String,
    pub count: usize,
    /// Share of all summaries, rounded to a whole percent.
    pub percentage: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCounts {
    pub healers: usize,
    pub damage: usize,
}

/// Headline numbers for the statistics page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuildOverview {
    pub total_players: usize,
    /// Mean of the parseable average metrics, 2 decimals.
    pub average_metric: f64,
    pub roles: RoleCounts,
    pub classes: Vec<ClassShare>,
}

/// One `(name, class)` group of a searched player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassProfile {
    pub player_name: String,
    pub class_name: String,
    pub role: Role,
    pub average_metric: f64,
    pub max_metric: f64,
    pub average_rating: f64,
    /// Records in the group, valid or not.
    pub matches: usize,
    pub rank: usize,
    pub class_size: usize,
    pub percentile: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    pub query: String,
    pub classes: Vec<ClassProfile>,
    pub best_percentile: Option<u32>,
}

/// Count summaries per class, most common first. Ties keep first-appearance
/// order.
pub fn class_distribution(summaries: &[PlayerSummary]) -> Vec<ClassShare> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for summary in summaries {
        match index.get(summary.class_name.as_str()) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(summary.class_name.as_str(), counts.len());
                counts.push((summary.class_name.as_str(), 1));
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let total = summaries.len();
    counts
        .into_iter()
        .map(|(class_name, count)| ClassShare {
            class_name: class_name.to_string(),
            count,
            percentage: ((count as f64 / total as f64) * 100.0).round() as u32,
        })
        .collect()
}

/// Number of summaries per stored role flag.
pub fn role_counts(summaries: &[PlayerSummary]) -> RoleCounts {
    summaries
        .iter()
        .fold(RoleCounts::default(), |mut counts, s| {
            match s.role {
                Role::Healer => counts.healers += 1,
                Role::Damage => counts.damage += 1,
            }
            counts
        })
}

pub fn guild_overview(summaries: &[PlayerSummary]) -> GuildOverview {
    let metrics: Vec<f64> = summaries
        .iter()
        .filter_map(|s| parse_metric_str(&s.avg_metric))
        .collect();
    let average_metric = if metrics.is_empty() {
        0.0
    } else {
        round_to(metrics.iter().sum::<f64>() / metrics.len() as f64, 2)
    };
    GuildOverview {
        total_players: summaries.len(),
        average_metric,
        roles: role_counts(summaries),
        classes: class_distribution(summaries),
    }
}

/// Profile of every `(name, class)` group whose player name equals `query`
/// ignoring case.
///
/// Averages come straight from the matching records; rank and percentile
/// come from `summaries`, which should be the current derived summaries.
pub fn player_profile(
    records: &[MatchRecord],
    summaries: &[PlayerSummary],
    query: &str,
) -> PlayerProfile {
    let wanted = query.trim().to_lowercase();
    let matching: Vec<MatchRecord> = records
        .iter()
        .filter(|r| r.player_name.to_lowercase() == wanted)
        .cloned()
        .collect();

    let classes: Vec<ClassProfile> = group_records(&matching)
        .into_iter()
        .map(|(_, group)| {
            let first = group[0];
            let metrics: Vec<f64> = group
                .iter()
                .filter_map(|r| parse_metric(&r.metric_value))
                .collect();
            let ratings: Vec<f64> = group
                .iter()
                .filter_map(|r| parse_metric(&r.rating_value))
                .collect();
            let standing = percentile(summaries, &first.class_name, &first.player_name);
            ClassProfile {
                player_name: first.player_name.clone(),
                class_name: first.class_name.clone(),
                role: first.role,
                average_metric: round_to(mean(&metrics), 2),
                max_metric: metrics.iter().copied().fold(0.0, f64::max),
                average_rating: round_to(mean(&ratings), 1),
                matches: group.len(),
                rank: standing.rank,
                class_size: standing.class_size,
                percentile: standing.percentile,
            }
        })
        .collect();

    let best_percentile = classes.iter().filter_map(|c| c.percentile).max();
    PlayerProfile {
        query: query.to_string(),
        classes,
        best_percentile,
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
