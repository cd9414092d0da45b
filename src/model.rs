//! Risk and location records as supplied by the seed dataset.
//!
//! Enumerations carry an `Unknown` catch-all so a malformed value in the
//! input never fails a load or a render; it shows up with a neutral label
//! and color instead.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

const NEUTRAL_COLOR: &str = "#9E9E9E";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    /// Rank used in score arithmetic. `Unknown` ranks lowest.
    pub fn level(self) -> u8 {
        match self {
            Severity::Low | Severity::Unknown => 1,
            Severity::Medium => 2,
            Severity::High => 3,
            Severity::Critical => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
            Severity::Unknown => "unknown",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
            Severity::Unknown => "Unknown",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Severity::Low => "#4CAF50",
            Severity::Medium => "#FFC107",
            Severity::High => "#FF9800",
            Severity::Critical => "#F44336",
            Severity::Unknown => NEUTRAL_COLOR,
        }
    }

    /// Strict parse for user input; never yields `Unknown`.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Likelihood {
    Low,
    Medium,
    High,
    VeryHigh,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Likelihood {
    pub const ALL: [Likelihood; 4] = [
        Likelihood::Low,
        Likelihood::Medium,
        Likelihood::High,
        Likelihood::VeryHigh,
    ];

    pub fn level(self) -> u8 {
        match self {
            Likelihood::Low | Likelihood::Unknown => 1,
            Likelihood::Medium => 2,
            Likelihood::High => 3,
            Likelihood::VeryHigh => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Likelihood::Low => "low",
            Likelihood::Medium => "medium",
            Likelihood::High => "high",
            Likelihood::VeryHigh => "very-high",
            Likelihood::Unknown => "unknown",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Likelihood::Low => "Low",
            Likelihood::Medium => "Medium",
            Likelihood::High => "High",
            Likelihood::VeryHigh => "Very High",
            Likelihood::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Monitoring,
    Mitigated,
    Resolved,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Status {
    /// Display order for distributions and filter options.
    pub const ALL: [Status; 4] = [
        Status::Active,
        Status::Monitoring,
        Status::Mitigated,
        Status::Resolved,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Monitoring => "monitoring",
            Status::Mitigated => "mitigated",
            Status::Resolved => "resolved",
            Status::Unknown => "unknown",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::Active => "Active",
            Status::Monitoring => "Monitoring",
            Status::Mitigated => "Mitigated",
            Status::Resolved => "Resolved",
            Status::Unknown => "Unknown",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Status::Active => "#F44336",
            Status::Monitoring => "#FF9800",
            Status::Mitigated => "#2196F3",
            Status::Resolved => "#4CAF50",
            Status::Unknown => NEUTRAL_COLOR,
        }
    }

    pub fn is_closed(self) -> bool {
        matches!(self, Status::Mitigated | Status::Resolved)
    }

    pub fn is_open(self) -> bool {
        matches!(self, Status::Active | Status::Monitoring)
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Stable,
    Decreasing,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Trend {
    /// Display order: improving first.
    pub const ALL: [Trend; 3] = [Trend::Decreasing, Trend::Stable, Trend::Increasing];

    pub fn as_str(self) -> &'static str {
        match self {
            Trend::Increasing => "increasing",
            Trend::Stable => "stable",
            Trend::Decreasing => "decreasing",
            Trend::Unknown => "unknown",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Trend::Increasing => "Increasing",
            Trend::Stable => "Stable",
            Trend::Decreasing => "Decreasing",
            Trend::Unknown => "Unknown",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Trend::Increasing => "#F44336",
            Trend::Stable => "#FFC107",
            Trend::Decreasing => "#4CAF50",
            Trend::Unknown => NEUTRAL_COLOR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    Experimentation,
    Research,
    Manufacturing,
    #[default]
    #[serde(other)]
    Unknown,
}

impl LocationType {
    pub fn label(self) -> &'static str {
        match self {
            LocationType::Experimentation => "Experimentation",
            LocationType::Research => "Research",
            LocationType::Manufacturing => "Manufacturing",
            LocationType::Unknown => "Unknown",
        }
    }
}

/// Per-severity counts, ordered critical first as displayed on site cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskCount {
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

impl RiskCount {
    pub fn total(&self) -> u32 {
        self.critical + self.high + self.medium + self.low
    }

    pub fn get(&self, severity: Severity) -> u32 {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
            Severity::Unknown => 0,
        }
    }

    /// Adds one to the bucket for `severity`; returns false for `Unknown`.
    pub fn record(&mut self, severity: Severity) -> bool {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
            Severity::Unknown => return false,
        }
        true
    }
}

/// One tracked hazard.
///
/// Every field except `id` tolerates a null, missing or mistyped value: text
/// falls back to empty, enumerations to `Unknown`, and the optional fields to
/// `None`. `verify` reports each gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Risk {
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient")]
    pub severity: Severity,
    #[serde(default, deserialize_with = "lenient")]
    pub initial_severity: Severity,
    #[serde(default, deserialize_with = "lenient")]
    pub likelihood: Likelihood,
    #[serde(default, deserialize_with = "lenient")]
    pub initial_likelihood: Likelihood,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub impact: Option<u8>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Status,
    #[serde(default, deserialize_with = "lenient")]
    pub trend: Trend,
    #[serde(default, deserialize_with = "lenient")]
    pub location_id: String,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub mitigation_plan: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub address: String,
    #[serde(default, deserialize_with = "lenient")]
    pub description: String,
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub kinds: Vec<LocationType>,
    #[serde(default, deserialize_with = "lenient")]
    pub risk_count: RiskCount,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub overall_risk_score: Option<i64>,
}

/// Reads any JSON value and keeps it only if it has the expected shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().and_then(parse_timestamp))
}

/// RFC 3339, a zone-less `YYYY-MM-DDTHH:MM:SS` (taken as UTC), or a bare
/// date (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

impl Location {
    /// Address split on embedded line-break markers.
    pub fn address_lines(&self) -> impl Iterator<Item = &str> {
        self.address.split('\n').map(str::trim).filter(|l| !l.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_follow_declared_order() {
        let levels: Vec<u8> = Severity::ALL.iter().map(|s| s.level()).collect();
        assert_eq!(levels, vec![1, 2, 3, 4]);
        let levels: Vec<u8> = Likelihood::ALL.iter().map(|l| l.level()).collect();
        assert_eq!(levels, vec![1, 2, 3, 4]);
    }

    #[test]
    fn malformed_enum_values_become_unknown() {
        let s: Severity = serde_json::from_str("\"catastrophic\"").unwrap();
        assert_eq!(s, Severity::Unknown);
        assert_eq!(s.color(), NEUTRAL_COLOR);
        let l: Likelihood = serde_json::from_str("\"very-high\"").unwrap();
        assert_eq!(l, Likelihood::VeryHigh);
        let t: Trend = serde_json::from_str("\"sideways\"").unwrap();
        assert_eq!(t.label(), "Unknown");
    }

    #[test]
    fn strict_parse_rejects_unknown() {
        assert_eq!(Severity::parse("high"), Some(Severity::High));
        assert_eq!(Severity::parse("unknown"), None);
        assert_eq!(Status::parse("resolved"), Some(Status::Resolved));
        assert_eq!(Status::parse("Resolved"), None);
    }

    #[test]
    fn address_lines_split_on_markers() {
        let loc = Location {
            id: "l1".into(),
            name: "Site".into(),
            address: "1 Main St\nBuilding 4\n".into(),
            description: String::new(),
            kinds: vec![LocationType::Research],
            risk_count: RiskCount::default(),
            overall_risk_score: None,
        };
        let lines: Vec<&str> = loc.address_lines().collect();
        assert_eq!(lines, vec!["1 Main St", "Building 4"]);
    }

    #[test]
    fn risk_count_ignores_unknown_severity() {
        let mut c = RiskCount::default();
        assert!(c.record(Severity::High));
        assert!(!c.record(Severity::Unknown));
        assert_eq!(c.total(), 1);
        assert_eq!(c.get(Severity::High), 1);
    }

    #[test]
    fn timestamps_accept_dates_and_reject_noise() {
        let full = parse_timestamp("2024-02-10T09:30:00Z").unwrap();
        assert_eq!(full.to_rfc3339(), "2024-02-10T09:30:00+00:00");
        let date_only = parse_timestamp(" 2024-02-10 ").unwrap();
        assert_eq!(date_only.to_rfc3339(), "2024-02-10T00:00:00+00:00");
        assert!(parse_timestamp("2024-02-10T09:30:00").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn risk_record_tolerates_nulls() {
        let risk: Risk = serde_json::from_str(
            r#"{"id": "r9", "title": null, "impact": "7", "severity": null, "lastUpdated": 0}"#,
        )
        .unwrap();
        assert_eq!(risk.title, "");
        assert_eq!(risk.impact, None);
        assert_eq!(risk.severity, Severity::Unknown);
        assert_eq!(risk.last_updated, None);
        assert!(risk.mitigation_plan.is_none());
    }
}
