//! Built-in sample data used by the emergency reset.

use chrono::NaiveDate;

use super::metric::MetricValue;
use super::player::{PlayerSummary, Role};
use super::record::{EncounterType, MatchRecord};

/// Sample player summaries, without ids.
pub fn sample_players() -> Vec<PlayerSummary> {
    vec![
        summary(1, "Player 1", "Guild A", "Tank", Role::Damage, "1000", "1500", "80"),
        summary(2, "Player 2", "Guild B", "Quedasanta", Role::Healer, "500", "750", "90"),
        summary(3, "Player 3", "Guild A", "Shadowcaller", Role::Damage, "1200", "1800", "75"),
    ]
}

/// Sample match records, without ids.
pub fn sample_records() -> Vec<MatchRecord> {
    vec![
        record(1, "Player 1", "Tank", Role::Damage, 1100.0, 85.0, (2024, 1, 1), EncounterType::Solo),
        record(2, "Player 2", "Quedasanta", Role::Healer, 600.0, 92.0, (2024, 1, 1), EncounterType::Group),
        record(1, "Player 1", "Tank", Role::Damage, 1300.0, 78.0, (2024, 1, 2), EncounterType::Group),
    ]
}

#[allow(clippy::too_many_arguments)]
fn summary(
    base_id: i64,
    name: &str,
    guild: &str,
    class_name: &str,
    role: Role,
    avg: &str,
    max: &str,
    rating: &str,
) -> PlayerSummary {
    PlayerSummary {
        avg_metric: avg.to_string(),
        max_metric: max.to_string(),
        avg_rating: rating.to_string(),
        ..PlayerSummary::new(base_id, name, guild, class_name, role)
    }
}

#[allow(clippy::too_many_arguments)]
fn record(
    player: i64,
    name: &str,
    class_name: &str,
    role: Role,
    metric: f64,
    rating: f64,
    (y, m, d): (i32, u32, u32),
    encounter: EncounterType,
) -> MatchRecord {
    MatchRecord {
        id: None,
        player_ref: player,
        base_id: player,
        player_name: name.to_string(),
        class_name: class_name.to_string(),
        role,
        metric_value: MetricValue::Number(metric),
        rating_value: MetricValue::Number(rating),
        occurred_on: NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN),
        encounter_type: encounter,
    }
}
