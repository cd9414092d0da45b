use serde::{Deserialize, Serialize};

use super::state::Tab;
use crate::filter::Selection;
use crate::model::{Severity, Status};

/// Discrete user inputs. Each one is applied by exactly one reducer step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Event {
    SetLocationFilter(Selection<String>),
    SetSeverityFilter(Selection<Severity>),
    SetStatusFilter(Selection<Status>),
    SetSearch(String),
    SelectTab(Tab),
    /// Open the detail dialog for a risk.
    SelectRisk(String),
    /// Location card click: jump to the risk list scoped to that site.
    SelectLocation(String),
    CloseDialog,
    ClearFilters,
    ToggleTheme,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::SetLocationFilter(_) => "set_location_filter",
            Event::SetSeverityFilter(_) => "set_severity_filter",
            Event::SetStatusFilter(_) => "set_status_filter",
            Event::SetSearch(_) => "set_search",
            Event::SelectTab(_) => "select_tab",
            Event::SelectRisk(_) => "select_risk",
            Event::SelectLocation(_) => "select_location",
            Event::CloseDialog => "close_dialog",
            Event::ClearFilters => "clear_filters",
            Event::ToggleTheme => "toggle_theme",
        }
    }
}
