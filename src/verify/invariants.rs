use serde::Serialize;
use std::collections::HashSet;

use crate::aggregate::location_risk_counts;
use crate::data::Dataset;
use crate::model::{Likelihood, Location, LocationType, Risk, Severity, Status, Trend};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    DanglingLocation,
    DuplicateId,
    ImpactOutOfRange,
    EmptyLocationType,
    UnknownEnumValue,
    /// A field was absent, null or unreadable and fell back to a blank.
    MissingField,
    /// Initial assessment is lower than the current one.
    Worsened,
    RiskCountDrift,
}

impl ViolationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::DanglingLocation => "dangling_location",
            ViolationKind::DuplicateId => "duplicate_id",
            ViolationKind::ImpactOutOfRange => "impact_out_of_range",
            ViolationKind::EmptyLocationType => "empty_location_type",
            ViolationKind::UnknownEnumValue => "unknown_enum_value",
            ViolationKind::MissingField => "missing_field",
            ViolationKind::Worsened => "worsened",
            ViolationKind::RiskCountDrift => "risk_count_drift",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvariantViolation {
    pub kind: ViolationKind,
    /// Id of the offending record.
    pub subject: String,
    pub msg: String,
}

impl InvariantViolation {
    fn new(kind: ViolationKind, subject: &str, msg: impl Into<String>) -> Self {
        Self {
            kind,
            subject: subject.to_string(),
            msg: msg.into(),
        }
    }
}

pub fn check_risk(risk: &Risk, dataset: &Dataset) -> Vec<InvariantViolation> {
    let mut out = Vec::new();
    if dataset.location(&risk.location_id).is_none() {
        out.push(InvariantViolation::new(
            ViolationKind::DanglingLocation,
            &risk.id,
            format!("locationId {:?} does not match any location", risk.location_id),
        ));
    }
    if let Some(impact) = risk.impact.filter(|i| *i > 10) {
        out.push(InvariantViolation::new(
            ViolationKind::ImpactOutOfRange,
            &risk.id,
            format!("impact {} outside [0,10]", impact),
        ));
    }
    let missing = [
        ("title", risk.title.trim().is_empty()),
        ("description", risk.description.trim().is_empty()),
        ("category", risk.category.trim().is_empty()),
        ("impact", risk.impact.is_none()),
        ("lastUpdated", risk.last_updated.is_none()),
    ];
    out.extend(missing_fields(&risk.id, &missing));
    let unknown = [
        ("severity", risk.severity == Severity::Unknown),
        ("initialSeverity", risk.initial_severity == Severity::Unknown),
        ("likelihood", risk.likelihood == Likelihood::Unknown),
        ("initialLikelihood", risk.initial_likelihood == Likelihood::Unknown),
        ("status", risk.status == Status::Unknown),
        ("trend", risk.trend == Trend::Unknown),
    ];
    for (field, is_unknown) in unknown {
        if is_unknown {
            out.push(InvariantViolation::new(
                ViolationKind::UnknownEnumValue,
                &risk.id,
                format!("unrecognized {} value", field),
            ));
        }
    }
    if risk.initial_severity.level() < risk.severity.level()
        || risk.initial_likelihood.level() < risk.likelihood.level()
    {
        out.push(InvariantViolation::new(
            ViolationKind::Worsened,
            &risk.id,
            "current assessment exceeds initial assessment",
        ));
    }
    out
}

pub fn check_location(location: &Location, dataset: &Dataset) -> Vec<InvariantViolation> {
    let mut out = Vec::new();
    let missing = [
        ("name", location.name.trim().is_empty()),
        ("overallRiskScore", location.overall_risk_score.is_none()),
    ];
    out.extend(missing_fields(&location.id, &missing));
    if location.kinds.is_empty() {
        out.push(InvariantViolation::new(
            ViolationKind::EmptyLocationType,
            &location.id,
            "type set is empty",
        ));
    }
    if location.kinds.contains(&LocationType::Unknown) {
        out.push(InvariantViolation::new(
            ViolationKind::UnknownEnumValue,
            &location.id,
            "unrecognized type value",
        ));
    }
    let live = location_risk_counts(&dataset.risks, &location.id);
    if live != location.risk_count {
        out.push(InvariantViolation::new(
            ViolationKind::RiskCountDrift,
            &location.id,
            format!(
                "recorded {}/{}/{}/{} (c/h/m/l), tracked {}/{}/{}/{}",
                location.risk_count.critical,
                location.risk_count.high,
                location.risk_count.medium,
                location.risk_count.low,
                live.critical,
                live.high,
                live.medium,
                live.low
            ),
        ));
    }
    out
}

fn missing_fields(subject: &str, checks: &[(&str, bool)]) -> Vec<InvariantViolation> {
    checks
        .iter()
        .filter(|(_, missing)| *missing)
        .map(|(field, _)| {
            InvariantViolation::new(
                ViolationKind::MissingField,
                subject,
                format!("{} missing or unreadable", field),
            )
        })
        .collect()
}

fn check_unique<'a>(ids: impl Iterator<Item = &'a str>, what: &str) -> Vec<InvariantViolation> {
    let mut seen = HashSet::new();
    ids.filter(|id| !seen.insert(*id))
        .map(|id| InvariantViolation::new(ViolationKind::DuplicateId, id, format!("duplicate {} id", what)))
        .collect()
}

/// Every data-shape problem in the dataset. None of them is fatal.
pub fn validate_dataset(dataset: &Dataset) -> Vec<InvariantViolation> {
    let mut out = check_unique(dataset.locations.iter().map(|l| l.id.as_str()), "location");
    out.extend(check_unique(dataset.risks.iter().map(|r| r.id.as_str()), "risk"));
    for location in &dataset.locations {
        out.extend(check_location(location, dataset));
    }
    for risk in &dataset.risks {
        out.extend(check_risk(risk, dataset));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data;

    fn kinds(v: &[InvariantViolation]) -> Vec<ViolationKind> {
        v.iter().map(|x| x.kind).collect()
    }

    #[test]
    fn seed_only_reports_the_worsened_risk() {
        let ds = data::seed().unwrap().dataset;
        let issues = validate_dataset(&ds);
        assert_eq!(kinds(&issues), vec![ViolationKind::Worsened]);
        assert_eq!(issues[0].subject, "r12");
    }

    #[test]
    fn dangling_reference_and_drift_are_reported() {
        let mut ds = data::seed().unwrap().dataset;
        ds.risks[0].location_id = "l99".into();
        let issues = validate_dataset(&ds);
        let k = kinds(&issues);
        assert!(k.contains(&ViolationKind::DanglingLocation));
        // l1 lost a risk, so its recorded counts no longer match
        assert!(issues
            .iter()
            .any(|i| i.kind == ViolationKind::RiskCountDrift && i.subject == "l1"));
    }

    #[test]
    fn duplicates_and_bad_values() {
        let mut ds = data::seed().unwrap().dataset;
        let mut dup = ds.risks[1].clone();
        dup.impact = Some(12);
        dup.status = Status::Unknown;
        ds.risks.push(dup);
        ds.locations[3].kinds.clear();
        let k = kinds(&validate_dataset(&ds));
        assert!(k.contains(&ViolationKind::DuplicateId));
        assert!(k.contains(&ViolationKind::ImpactOutOfRange));
        assert!(k.contains(&ViolationKind::UnknownEnumValue));
        assert!(k.contains(&ViolationKind::EmptyLocationType));
    }

    #[test]
    fn blank_fields_are_reported_per_field() {
        let json = r#"{"locations": [{"id": "l1", "name": null, "type": ["research"]}],
            "risks": [{"id": "r1", "title": "Leak", "description": null, "category": "Safety",
                       "severity": "low", "initialSeverity": "low", "likelihood": "low",
                       "initialLikelihood": "low", "impact": "high", "status": "active",
                       "trend": "stable", "locationId": "l1", "lastUpdated": "last week"}]}"#;
        let ds = Dataset::from_json_str(json).unwrap();
        let issues: Vec<(String, String)> = validate_dataset(&ds)
            .into_iter()
            .filter(|i| i.kind == ViolationKind::MissingField)
            .map(|i| (i.subject, i.msg))
            .collect();
        let expect = |subject: &str, field: &str| (subject.to_string(), format!("{} missing or unreadable", field));
        assert_eq!(
            issues,
            vec![
                expect("l1", "name"),
                expect("l1", "overallRiskScore"),
                expect("r1", "description"),
                expect("r1", "impact"),
                expect("r1", "lastUpdated"),
            ]
        );
    }
}
