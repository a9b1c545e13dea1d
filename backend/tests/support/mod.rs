#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::NaiveDate;
use guild_ranks::models::{EncounterType, MatchRecord, MetricValue, PlayerSummary, Role};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Variables are restored on unwind, and access is serialized because the
/// test harness runs tests in parallel against one process environment.
///
/// `Some(v)` sets a variable, `None` removes it.
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// A record on 2024-03-01 with the given numbers.
pub fn record(
    name: &str,
    class_name: &str,
    role: Role,
    metric: impl Into<MetricValue>,
    rating: impl Into<MetricValue>,
) -> MatchRecord {
    MatchRecord {
        id: None,
        player_ref: 7,
        base_id: 7,
        player_name: name.to_string(),
        class_name: class_name.to_string(),
        role,
        metric_value: metric.into(),
        rating_value: rating.into(),
        occurred_on: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        encounter_type: EncounterType::Group,
    }
}

pub fn summary(name: &str, class_name: &str, role: Role, avg: &str, max: &str, rating: &str) -> PlayerSummary {
    PlayerSummary {
        avg_metric: avg.to_string(),
        max_metric: max.to_string(),
        avg_rating: rating.to_string(),
        ..PlayerSummary::new(7, name, "INFERNUS", class_name, role)
    }
}
