//! UI state with deterministic hashing for replay validation.

use serde::{Deserialize, Serialize};

use crate::data::sha256_hex;
use crate::filter::Criteria;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Overview,
    Risks,
    Locations,
    Mitigation,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Overview, Tab::Risks, Tab::Locations, Tab::Mitigation];

    pub fn as_str(self) -> &'static str {
        match self {
            Tab::Overview => "overview",
            Tab::Risks => "risks",
            Tab::Locations => "locations",
            Tab::Mitigation => "mitigation",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Risks => "Risks",
            Tab::Locations => "Locations",
            Tab::Mitigation => "Mitigation",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Complete controller state - hashable for replay validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiState {
    pub criteria: Criteria,
    pub active_tab: Tab,
    /// Risk shown in the detail dialog
    pub selected_risk: Option<String>,
    pub dialog_open: bool,
    pub theme: Theme,
    /// Events applied so far
    pub seq: u64,
}

impl UiState {
    pub fn with_theme(theme: Theme) -> Self {
        Self {
            theme,
            ..Self::default()
        }
    }

    /// SHA-256 over the serialized state, hex encoded.
    pub fn hash(&self) -> String {
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        sha256_hex(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Selection;

    #[test]
    fn defaults_show_everything() {
        let s = UiState::default();
        assert!(s.criteria.is_default());
        assert_eq!(s.active_tab, Tab::Overview);
        assert!(s.selected_risk.is_none());
        assert!(!s.dialog_open);
    }

    #[test]
    fn hash_tracks_content() {
        let a = UiState::default();
        let mut b = UiState::default();
        assert_eq!(a.hash(), b.hash());
        b.criteria.location = Selection::Only("l1".into());
        assert_ne!(a.hash(), b.hash());
    }

    #[test]
    fn theme_toggles_and_parses() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled().toggled(), Theme::Dark);
        assert_eq!(Theme::parse(" dark\n"), Some(Theme::Dark));
        assert_eq!(Theme::parse("sepia"), None);
    }

    #[test]
    fn tab_parse_roundtrips_names() {
        for tab in Tab::ALL {
            assert_eq!(Tab::parse(tab.as_str()), Some(tab));
        }
        assert_eq!(Tab::parse("charts"), None);
    }
}
