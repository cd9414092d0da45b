//! Pure reducer: (UiState, Event) -> (UiState, Vec<Effect>)
//!
//! Every transition is a plain assignment and none can fail. Side effects
//! (persisting the theme) are returned to the caller rather than performed.

use super::events::Event;
use super::state::{Tab, Theme, UiState};
use crate::filter::{Criteria, Selection};

/// Work the caller must perform after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    PersistTheme(Theme),
}

/// Result of processing an event
#[derive(Debug)]
pub struct ReducerOutput {
    pub effects: Vec<Effect>,
    pub state_hash: String,
}

pub fn reduce(state: &mut UiState, event: Event) -> ReducerOutput {
    let mut effects = Vec::new();
    state.seq += 1;

    match event {
        Event::SetLocationFilter(sel) => state.criteria.location = sel,
        Event::SetSeverityFilter(sel) => state.criteria.severity = sel,
        Event::SetStatusFilter(sel) => state.criteria.status = sel,
        Event::SetSearch(text) => state.criteria.search = text,
        Event::SelectTab(tab) => state.active_tab = tab,
        Event::SelectRisk(id) => {
            state.selected_risk = Some(id);
            state.dialog_open = true;
        }
        Event::SelectLocation(id) => {
            state.active_tab = Tab::Risks;
            state.criteria.location = Selection::Only(id);
        }
        Event::CloseDialog => {
            state.dialog_open = false;
            state.selected_risk = None;
        }
        Event::ClearFilters => state.criteria = Criteria::default(),
        Event::ToggleTheme => {
            state.theme = state.theme.toggled();
            effects.push(Effect::PersistTheme(state.theme));
        }
    }

    ReducerOutput {
        effects,
        state_hash: state.hash(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Severity, Status};

    fn filtered_state() -> UiState {
        let mut s = UiState::default();
        s.criteria = Criteria {
            location: Selection::Only("l2".into()),
            severity: Selection::Only(Severity::High),
            status: Selection::Only(Status::Active),
            search: "vapor".into(),
        };
        s
    }

    #[test]
    fn select_location_switches_tab_and_filter_in_one_step() {
        let mut s = UiState::default();
        s.active_tab = Tab::Locations;
        let before = s.seq;
        reduce(&mut s, Event::SelectLocation("l3".into()));
        assert_eq!(s.seq, before + 1);
        assert_eq!(s.active_tab, Tab::Risks);
        assert_eq!(s.criteria.location, Selection::Only("l3".to_string()));
    }

    #[test]
    fn clear_filters_resets_every_field() {
        let mut s = filtered_state();
        s.active_tab = Tab::Mitigation;
        reduce(&mut s, Event::ClearFilters);
        assert!(s.criteria.is_default());
        // tab is not a filter
        assert_eq!(s.active_tab, Tab::Mitigation);
    }

    #[test]
    fn close_dialog_drops_selection() {
        let mut s = UiState::default();
        reduce(&mut s, Event::SelectRisk("r1".into()));
        assert!(s.dialog_open);
        assert_eq!(s.selected_risk.as_deref(), Some("r1"));
        reduce(&mut s, Event::CloseDialog);
        assert!(!s.dialog_open);
        assert!(s.selected_risk.is_none());
    }

    #[test]
    fn toggle_theme_requests_persistence() {
        let mut s = UiState::default();
        let out = reduce(&mut s, Event::ToggleTheme);
        assert_eq!(s.theme, Theme::Dark);
        assert_eq!(out.effects, vec![Effect::PersistTheme(Theme::Dark)]);
    }

    #[test]
    fn filter_events_have_no_effects() {
        let mut s = UiState::default();
        let out = reduce(&mut s, Event::SetSearch("fire".into()));
        assert!(out.effects.is_empty());
        assert_eq!(out.state_hash, s.hash());
        assert_eq!(s.criteria.search, "fire");
    }

    #[test]
    fn same_events_same_hash() {
        let events = vec![
            Event::SetSeverityFilter(Selection::Only(Severity::Critical)),
            Event::SelectTab(Tab::Risks),
            Event::SelectRisk("r4".into()),
        ];
        let mut a = UiState::default();
        let mut b = UiState::default();
        let mut last_a = String::new();
        let mut last_b = String::new();
        for e in events.clone() {
            last_a = reduce(&mut a, e).state_hash;
        }
        for e in events {
            last_b = reduce(&mut b, e).state_hash;
        }
        assert_eq!(last_a, last_b);
    }
}
