//! Numeric coercion for metric-bearing fields.
//!
//! Match submissions arrive from forms and older imports, so a metric can be
//! a JSON number, a numeric string, garbage text, or missing entirely. Every
//! component that needs a number out of one of those goes through
//! [`parse_metric`] / [`parse_metric_str`]; the aggregator uses the `None`
//! case to exclude an entry and the auditor uses it to decide what to zero.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw numeric field as it was stored.
///
/// Serialized untagged, so `1200`, `"1200"`, `"NaN"` and `null` all
/// round-trip through JSON unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
    Missing,
}

impl MetricValue {
    /// Coerce through the shared parser.
    pub fn parsed(&self) -> Option<f64> {
        parse_metric(self)
    }

    pub fn is_valid(&self) -> bool {
        self.parsed().is_some()
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, MetricValue::Missing)
    }
}

impl Default for MetricValue {
    fn default() -> Self {
        MetricValue::Number(0.0)
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Number(value)
    }
}

impl From<i64> for MetricValue {
    fn from(value: i64) -> Self {
        MetricValue::Number(value as f64)
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        MetricValue::Text(value.to_string())
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Number(n) => write!(f, "{}", n),
            MetricValue::Text(s) => write!(f, "{}", s),
            MetricValue::Missing => write!(f, "null"),
        }
    }
}

/// Parse a stored metric into a usable value.
///
/// Returns `None` for anything that is not a finite, non-negative number:
/// NaN/infinite numbers, text that does not parse as a decimal, empty text,
/// negative values and missing fields.
pub fn parse_metric(value: &MetricValue) -> Option<f64> {
    match value {
        MetricValue::Number(n) => accept(*n),
        MetricValue::Text(s) => parse_metric_str(s),
        MetricValue::Missing => None,
    }
}

/// String-typed counterpart of [`parse_metric`], used for the decimal strings
/// kept on player summaries.
pub fn parse_metric_str(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().and_then(accept)
}

fn accept(n: f64) -> Option<f64> {
    if n.is_finite() && n >= 0.0 {
        Some(n)
    } else {
        None
    }
}

/// Format with a fixed number of decimals, rounding half away from zero.
///
/// `format!("{:.0}", 0.5)` rounds half-to-even; leaderboard values have
/// always been rounded half-up, so round explicitly first.
pub fn format_fixed(value: f64, decimals: usize) -> String {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    format!("{:.*}", decimals, rounded)
}

/// Shortest decimal form of a value: `1100` rather than `1100.0`.
pub fn format_plain(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Round to a number of decimals and keep it numeric.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
