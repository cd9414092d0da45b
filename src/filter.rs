//! Reduces the risk list to the subset matching the user's criteria.

use serde::{Deserialize, Serialize};

use crate::model::{Risk, Severity, Status};

/// A filter field: either everything, or exact equality on one value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Selection<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Selection<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(v) => v == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    pub fn selected(&self) -> Option<&T> {
        match self {
            Selection::All => None,
            Selection::Only(v) => Some(v),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Criteria {
    pub location: Selection<String>,
    pub severity: Selection<Severity>,
    pub status: Selection<Status>,
    pub search: String,
}

impl Criteria {
    pub fn is_default(&self) -> bool {
        self.location.is_all()
            && self.severity.is_all()
            && self.status.is_all()
            && self.search.is_empty()
    }

    pub fn matches(&self, risk: &Risk) -> bool {
        self.matches_with_needle(risk, &self.search.to_lowercase())
    }

    fn matches_with_needle(&self, risk: &Risk, needle: &str) -> bool {
        self.location.matches(&risk.location_id)
            && self.severity.matches(&risk.severity)
            && self.status.matches(&risk.status)
            && (needle.is_empty() || text_matches(risk, needle))
    }
}

fn text_matches(risk: &Risk, needle: &str) -> bool {
    [&risk.title, &risk.description, &risk.category]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Order-preserving subsequence of `risks` satisfying every active predicate.
pub fn filter<'a, I>(risks: I, criteria: &Criteria) -> Vec<&'a Risk>
where
    I: IntoIterator<Item = &'a Risk>,
{
    let needle = criteria.search.to_lowercase();
    risks
        .into_iter()
        .filter(|r| criteria.matches_with_needle(r, &needle))
        .collect()
}
