//! Owns the controller state and runs one full render pass per event.

use super::events::Event;
use super::reducer::{reduce, Effect};
use super::state::{Theme, UiState};
use crate::data::Dataset;
use crate::filter::filter;
use crate::logging::{
    log_error, log_render_pass, log_theme_change, log_transition, v_str, Domain, ProfileScope,
};
use crate::storage::PreferenceStore;
use crate::view::{self, DashboardView, ViewOptions};

/// Output of one derive + render cycle.
#[derive(Debug, Clone)]
pub struct RenderPass {
    /// 0 for the initial render, then one per event.
    pub pass: u64,
    pub view: DashboardView,
    pub html: String,
    pub text: String,
}

pub struct Session {
    dataset: Dataset,
    state: UiState,
    opts: ViewOptions,
    store: Option<PreferenceStore>,
    last: RenderPass,
}

fn render_pass(pass: u64, state: &UiState, dataset: &Dataset, opts: &ViewOptions) -> RenderPass {
    let _scope = ProfileScope::with_context("render_pass", &[("tab", v_str(state.active_tab.as_str()))]);
    let view = view::build(state, dataset, opts);
    let html = view::html::render(&view);
    let text = view::text::render(&view);
    log_render_pass(pass, state.active_tab.as_str(), view.visible_risks, html.len());
    RenderPass { pass, view, html, text }
}

impl Session {
    pub fn new(dataset: Dataset, theme: Theme, opts: ViewOptions) -> Self {
        let state = UiState::with_theme(theme);
        let last = render_pass(0, &state, &dataset, &opts);
        Self {
            dataset,
            state,
            opts,
            store: None,
            last,
        }
    }

    pub fn with_store(mut self, store: PreferenceStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn current(&self) -> &RenderPass {
        &self.last
    }

    pub fn render_count(&self) -> u64 {
        self.last.pass
    }

    /// Ids of the risks matching the current criteria, in dataset order.
    pub fn visible_ids(&self) -> Vec<&str> {
        filter(&self.dataset.risks, &self.state.criteria)
            .into_iter()
            .map(|r| r.id.as_str())
            .collect()
    }

    /// Apply one event and re-render. Never fails: a theme write error is
    /// logged and the in-memory theme still changes.
    pub fn dispatch(&mut self, event: Event) -> &RenderPass {
        let name = event.name();
        let out = reduce(&mut self.state, event);
        log_transition(name, self.state.seq, &out.state_hash);

        for effect in out.effects {
            match effect {
                Effect::PersistTheme(theme) => {
                    let persisted = match self.store.as_mut() {
                        Some(store) => match store.save_theme(theme) {
                            Ok(()) => true,
                            Err(err) => {
                                log_error(Domain::Theme, "theme_persist_failed", &err);
                                false
                            }
                        },
                        None => false,
                    };
                    log_theme_change(theme.as_str(), persisted);
                }
            }
        }

        self.last = render_pass(self.last.pass + 1, &self.state, &self.dataset, &self.opts);
        &self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::state::Tab;
    use crate::data;
    use crate::filter::Selection;

    fn session() -> Session {
        Session::new(data::seed().unwrap().dataset, Theme::Light, ViewOptions::default())
    }

    #[test]
    fn every_event_renders_exactly_once() {
        let mut s = session();
        assert_eq!(s.render_count(), 0);
        s.dispatch(Event::SelectTab(Tab::Risks));
        s.dispatch(Event::SelectTab(Tab::Risks));
        s.dispatch(Event::ClearFilters);
        assert_eq!(s.render_count(), 3);
        assert_eq!(s.state().seq, 3);
    }

    #[test]
    fn render_reflects_latest_state() {
        let mut s = session();
        let pass = s.dispatch(Event::SetLocationFilter(Selection::Only("l3".into())));
        assert_eq!(pass.view.visible_risks, 3);
        let rendered_hash = pass.view.state_hash.clone();
        assert_eq!(rendered_hash, s.state().hash());
        assert_eq!(s.visible_ids(), vec!["r8", "r9", "r10"]);
    }

    #[test]
    fn theme_toggle_persists_through_store() {
        let mut store = PreferenceStore::in_memory().unwrap();
        store.init().unwrap();
        let mut s = session().with_store(store);
        let pass = s.dispatch(Event::ToggleTheme);
        assert_eq!(pass.view.theme, Theme::Dark);
        let stored = s.store.as_ref().unwrap().load_theme(Theme::Light).unwrap();
        assert_eq!(stored, Theme::Dark);
    }

    #[test]
    fn theme_toggle_without_store_still_applies() {
        let mut s = session();
        s.dispatch(Event::ToggleTheme);
        assert_eq!(s.state().theme, Theme::Dark);
        assert!(s.current().html.contains(r#"data-theme="dark""#));
    }
}
