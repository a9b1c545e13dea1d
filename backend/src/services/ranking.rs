//! Leaderboard ranking and class percentiles.

use serde::{Deserialize, Serialize};

use crate::models::{parse_metric_str, PlayerSummary, Role};

/// A summary with its 1-based leaderboard position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub summary: PlayerSummary,
    pub rank: usize,
}

/// Where a player stands within a class.
///
/// `rank` is 0 and `percentile` is `None` when the player is not in the
/// class or the class is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentileStanding {
    pub rank: usize,
    pub class_size: usize,
    pub percentile: Option<u32>,
}

/// Leaderboard sort key: the average metric truncated to an integer.
/// Unparseable values sort as 0.
pub fn rank_metric(summary: &PlayerSummary) -> i64 {
    parse_metric_str(&summary.avg_metric)
        .map(|v| v.trunc() as i64)
        .unwrap_or(0)
}

fn class_metric(summary: &PlayerSummary) -> f64 {
    parse_metric_str(&summary.avg_metric).unwrap_or(0.0)
}

/// Rank the summaries of one role, best first.
///
/// The stored role flag decides membership. Ties keep their input order.
pub fn rank(summaries: &[PlayerSummary], role: Role) -> Vec<RankedEntry> {
    let mut members: Vec<&PlayerSummary> = summaries.iter().filter(|s| s.role == role).collect();
    // Vec::sort_by is stable
    members.sort_by(|a, b| rank_metric(b).cmp(&rank_metric(a)));
    members
        .into_iter()
        .enumerate()
        .map(|(i, summary)| RankedEntry {
            summary: summary.clone(),
            rank: i + 1,
        })
        .collect()
}

/// Keep entries whose name or class contains `query`, ignoring case.
///
/// Ranks are not renumbered. A blank query keeps everything.
pub fn filter_entries(entries: Vec<RankedEntry>, query: &str) -> Vec<RankedEntry> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return entries;
    }
    entries
        .into_iter()
        .filter(|e| {
            e.summary.name.to_lowercase().contains(&needle)
                || e.summary.class_name.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Class members sorted best first, ties in input order.
fn sorted_class<'a>(summaries: &'a [PlayerSummary], class_name: &str) -> Vec<&'a PlayerSummary> {
    let mut members: Vec<&PlayerSummary> = summaries
        .iter()
        .filter(|s| s.class_name == class_name)
        .collect();
    members.sort_by(|a, b| class_metric(b).total_cmp(&class_metric(a)));
    members
}

/// Standing of `player_name` (exact match) among summaries of `class_name`.
///
/// Independent of role. The top of a class of N scores 100, the bottom
/// `round(100 / N)`.
pub fn percentile(
    summaries: &[PlayerSummary],
    class_name: &str,
    player_name: &str,
) -> PercentileStanding {
    let members = sorted_class(summaries, class_name);
    let class_size = members.len();
    match members.iter().position(|s| s.name == player_name) {
        Some(i) if class_size > 0 => {
            let rank = i + 1;
            let share = (class_size - rank + 1) as f64 / class_size as f64;
            PercentileStanding {
                rank,
                class_size,
                percentile: Some((share * 100.0).round() as u32),
            }
        }
        _ => PercentileStanding {
            rank: 0,
            class_size,
            percentile: None,
        },
    }
}
