//! Pure view construction: `(UiState, Dataset) -> DashboardView`.
//!
//! The view holds display-ready values only (labels, colors, percentages),
//! so the HTML and text renderers never touch raw records or aggregates.

pub mod html;
pub mod text;

use serde::Serialize;

use crate::aggregate::{self, GlobalStats, ImprovementCounts, MitigationMetrics};
use crate::controller::state::{Tab, Theme, UiState};
use crate::data::Dataset;
use crate::filter::{filter, Criteria, Selection};
use crate::model::{Risk, RiskCount, Severity, Status};

const RECENT_ROWS: usize = 5;

#[derive(Debug, Clone)]
pub struct ViewOptions {
    pub top_n: usize,
    pub fingerprint: Option<String>,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            top_n: 10,
            fingerprint: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: &'static str,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabLink {
    pub tab: Tab,
    pub label: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterBar {
    pub locations: Vec<Choice>,
    pub severities: Vec<Choice>,
    pub statuses: Vec<Choice>,
    pub search: String,
    /// Present only while some filter differs from its default.
    pub show_clear: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bar {
    pub key: &'static str,
    pub label: &'static str,
    pub value: usize,
    pub percent: u32,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskRow {
    pub id: String,
    pub title: String,
    pub category: String,
    pub location: String,
    pub severity: Badge,
    pub likelihood: &'static str,
    pub status: Badge,
    pub trend: Badge,
    pub impact: Option<u8>,
    pub score: u8,
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverviewPanel {
    pub metrics: MitigationMetrics,
    pub status: Vec<Bar>,
    pub trend: Vec<Bar>,
    pub severity: Vec<Bar>,
    pub recent: Vec<RiskRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RisksPanel {
    pub rows: Vec<RiskRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationCard {
    pub id: String,
    pub name: String,
    pub address_lines: Vec<String>,
    pub description: String,
    pub types: Vec<&'static str>,
    pub seed_counts: RiskCount,
    pub live_counts: RiskCount,
    /// Seed `riskCount` disagrees with the live counts.
    pub drift: bool,
    pub overall_risk_score: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationsPanel {
    pub cards: Vec<LocationCard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReductionBar {
    pub risk_id: String,
    pub title: String,
    pub initial_score: u8,
    pub current_score: u8,
    pub reduction: i16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MitigationPanel {
    pub metrics: MitigationMetrics,
    pub improvement: ImprovementCounts,
    pub reductions: Vec<ReductionBar>,
    /// Length of the untruncated ranking.
    pub ranked_total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "tab", rename_all = "lowercase")]
pub enum Panel {
    Overview(OverviewPanel),
    Risks(RisksPanel),
    Locations(LocationsPanel),
    Mitigation(MitigationPanel),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskDetail {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: String,
    pub location: String,
    pub severity: Badge,
    pub initial_severity: Badge,
    pub likelihood: &'static str,
    pub initial_likelihood: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact: Option<u8>,
    pub status: Badge,
    pub trend: Badge,
    pub initial_score: u8,
    pub current_score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mitigation_plan: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    pub theme: Theme,
    pub active_tab: Tab,
    pub tabs: Vec<TabLink>,
    pub header: GlobalStats,
    /// Absent on the locations tab.
    pub filters: Option<FilterBar>,
    pub visible_risks: usize,
    pub panel: Panel,
    pub dialog: Option<RiskDetail>,
    pub fingerprint: Option<String>,
    pub state_hash: String,
}

pub fn build(state: &UiState, dataset: &Dataset, opts: &ViewOptions) -> DashboardView {
    let visible = filter(&dataset.risks, &state.criteria);

    let panel = match state.active_tab {
        Tab::Overview => Panel::Overview(overview_panel(&visible, dataset)),
        Tab::Risks => Panel::Risks(RisksPanel {
            rows: visible.iter().map(|r| risk_row(r, dataset)).collect(),
        }),
        Tab::Locations => Panel::Locations(locations_panel(dataset)),
        Tab::Mitigation => Panel::Mitigation(mitigation_panel(&visible, opts.top_n)),
    };

    let filters = match state.active_tab {
        Tab::Locations => None,
        _ => Some(filter_bar(&state.criteria, dataset)),
    };

    let dialog = if state.dialog_open {
        state
            .selected_risk
            .as_deref()
            .and_then(|id| dataset.risk(id))
            .map(|r| risk_detail(r, dataset))
    } else {
        None
    };

    DashboardView {
        theme: state.theme,
        active_tab: state.active_tab,
        tabs: Tab::ALL
            .into_iter()
            .map(|tab| TabLink {
                tab,
                label: tab.label(),
                active: tab == state.active_tab,
            })
            .collect(),
        header: aggregate::global_stats(&dataset.risks, dataset.locations.len()),
        filters,
        visible_risks: visible.len(),
        panel,
        dialog,
        fingerprint: opts.fingerprint.clone(),
        state_hash: state.hash(),
    }
}

fn severity_badge(s: Severity) -> Badge {
    Badge { label: s.label(), color: s.color() }
}

fn status_badge(s: Status) -> Badge {
    Badge { label: s.label(), color: s.color() }
}

fn choice<T: PartialEq>(sel: &Selection<T>, value: Option<&T>, key: String, label: String) -> Choice {
    Choice {
        value: key,
        label,
        selected: sel.selected() == value,
    }
}

fn filter_bar(criteria: &Criteria, dataset: &Dataset) -> FilterBar {
    let mut locations = vec![choice(&criteria.location, None, "all".into(), "All locations".into())];
    locations.extend(
        dataset
            .locations
            .iter()
            .map(|l| choice(&criteria.location, Some(&l.id), l.id.clone(), l.name.clone())),
    );

    let mut severities = vec![choice(&criteria.severity, None, "all".into(), "All severities".into())];
    severities.extend(
        Severity::ALL
            .iter()
            .rev()
            .map(|s| choice(&criteria.severity, Some(s), s.as_str().into(), s.label().into())),
    );

    let mut statuses = vec![choice(&criteria.status, None, "all".into(), "All statuses".into())];
    statuses.extend(
        Status::ALL
            .iter()
            .map(|s| choice(&criteria.status, Some(s), s.as_str().into(), s.label().into())),
    );

    FilterBar {
        locations,
        severities,
        statuses,
        search: criteria.search.clone(),
        show_clear: !criteria.is_default(),
    }
}

fn risk_row(r: &Risk, dataset: &Dataset) -> RiskRow {
    RiskRow {
        id: r.id.clone(),
        title: r.title.clone(),
        category: r.category.clone(),
        location: dataset.location_name(&r.location_id).to_string(),
        severity: severity_badge(r.severity),
        likelihood: r.likelihood.label(),
        status: status_badge(r.status),
        trend: Badge { label: r.trend.label(), color: r.trend.color() },
        impact: r.impact,
        score: aggregate::risk_score(r, false),
        last_updated: r.last_updated.map(|ts| ts.format("%Y-%m-%d").to_string()),
    }
}

fn overview_panel(visible: &[&Risk], dataset: &Dataset) -> OverviewPanel {
    let total = visible.len();
    let status = aggregate::status_distribution(visible.iter().copied())
        .entries()
        .into_iter()
        .map(|(s, n)| Bar {
            key: s.as_str(),
            label: s.label(),
            value: n,
            percent: aggregate::percent(n, total),
            color: s.color(),
        })
        .collect();
    let trend = aggregate::trend_distribution(visible.iter().copied())
        .entries()
        .into_iter()
        .map(|(t, n)| Bar {
            key: t.as_str(),
            label: t.label(),
            value: n,
            percent: aggregate::percent(n, total),
            color: t.color(),
        })
        .collect();
    let counts = aggregate::severity_distribution(visible.iter().copied());
    let severity = Severity::ALL
        .iter()
        .rev()
        .map(|s| {
            let n = counts.get(*s) as usize;
            Bar {
                key: s.as_str(),
                label: s.label(),
                value: n,
                percent: aggregate::percent(n, total),
                color: s.color(),
            }
        })
        .collect();

    let mut recent: Vec<&Risk> = visible.to_vec();
    recent.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));
    recent.truncate(RECENT_ROWS);

    OverviewPanel {
        metrics: aggregate::mitigation_metrics(visible.iter().copied()),
        status,
        trend,
        severity,
        recent: recent.into_iter().map(|r| risk_row(r, dataset)).collect(),
    }
}

fn locations_panel(dataset: &Dataset) -> LocationsPanel {
    LocationsPanel {
        cards: dataset
            .locations
            .iter()
            .map(|l| {
                let live = aggregate::location_risk_counts(&dataset.risks, &l.id);
                LocationCard {
                    id: l.id.clone(),
                    name: l.name.clone(),
                    address_lines: l.address_lines().map(str::to_string).collect(),
                    description: l.description.clone(),
                    types: l.kinds.iter().map(|k| k.label()).collect(),
                    seed_counts: l.risk_count,
                    live_counts: live,
                    drift: live != l.risk_count,
                    overall_risk_score: l.overall_risk_score,
                }
            })
            .collect(),
    }
}

fn mitigation_panel(visible: &[&Risk], top_n: usize) -> MitigationPanel {
    let ranking = aggregate::reduction_ranking(visible.iter().copied());
    let ranked_total = ranking.len();
    MitigationPanel {
        metrics: aggregate::mitigation_metrics(visible.iter().copied()),
        improvement: aggregate::improvement_counts(visible.iter().copied()),
        reductions: ranking
            .into_iter()
            .take(top_n)
            .map(|s| ReductionBar {
                risk_id: s.risk.id.clone(),
                title: s.risk.title.clone(),
                initial_score: s.initial_score,
                current_score: s.current_score,
                reduction: s.reduction,
            })
            .collect(),
        ranked_total,
    }
}

fn risk_detail(r: &Risk, dataset: &Dataset) -> RiskDetail {
    RiskDetail {
        id: r.id.clone(),
        title: r.title.clone(),
        description: non_blank(&r.description),
        category: r.category.clone(),
        location: dataset.location_name(&r.location_id).to_string(),
        severity: severity_badge(r.severity),
        initial_severity: severity_badge(r.initial_severity),
        likelihood: r.likelihood.label(),
        initial_likelihood: r.initial_likelihood.label(),
        impact: r.impact,
        status: status_badge(r.status),
        trend: Badge { label: r.trend.label(), color: r.trend.color() },
        initial_score: aggregate::risk_score(r, true),
        current_score: aggregate::risk_score(r, false),
        last_updated: r.last_updated.map(|ts| ts.format("%Y-%m-%d %H:%M UTC").to_string()),
        mitigation_plan: r.mitigation_plan.as_deref().and_then(non_blank),
    }
}

fn non_blank(text: &str) -> Option<String> {
    Some(text.trim()).filter(|t| !t.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data;

    fn seed() -> Dataset {
        data::seed().unwrap().dataset
    }

    #[test]
    fn clear_control_only_when_filtered() {
        let ds = seed();
        let mut state = UiState::default();
        let view = build(&state, &ds, &ViewOptions::default());
        assert!(!view.filters.unwrap().show_clear);

        state.criteria.search = "fire".into();
        let view = build(&state, &ds, &ViewOptions::default());
        assert!(view.filters.unwrap().show_clear);
    }

    #[test]
    fn filter_bar_marks_selection() {
        let ds = seed();
        let mut state = UiState::default();
        state.criteria.severity = Selection::Only(Severity::High);
        let bar = build(&state, &ds, &ViewOptions::default()).filters.unwrap();
        let selected: Vec<&str> = bar.severities.iter().filter(|c| c.selected).map(|c| c.value.as_str()).collect();
        assert_eq!(selected, vec!["high"]);
        assert!(bar.locations[0].selected);
        assert_eq!(bar.locations.len(), ds.locations.len() + 1);
    }

    #[test]
    fn dialog_requires_open_flag_and_known_risk() {
        let ds = seed();
        let mut state = UiState::default();
        state.selected_risk = Some("r1".into());
        assert!(build(&state, &ds, &ViewOptions::default()).dialog.is_none());

        state.dialog_open = true;
        let detail = build(&state, &ds, &ViewOptions::default()).dialog.unwrap();
        assert_eq!(detail.initial_score, 12);
        assert_eq!(detail.current_score, 6);
        assert_eq!(detail.location, "Northfield Research Campus");

        state.selected_risk = Some("missing".into());
        assert!(build(&state, &ds, &ViewOptions::default()).dialog.is_none());
    }

    #[test]
    fn detail_without_plan_has_none() {
        let ds = seed();
        let mut state = UiState::default();
        state.selected_risk = Some("r7".into());
        state.dialog_open = true;
        let detail = build(&state, &ds, &ViewOptions::default()).dialog.unwrap();
        assert!(detail.mitigation_plan.is_none());
    }

    #[test]
    fn blank_fields_are_omitted_from_detail() {
        let mut ds = seed();
        let r = &mut ds.risks[0];
        r.description = "  ".into();
        r.impact = None;
        r.last_updated = None;
        let mut state = UiState::default();
        state.selected_risk = Some("r1".into());
        state.dialog_open = true;
        let view = build(&state, &ds, &ViewOptions::default());
        let detail = view.dialog.unwrap();
        assert!(detail.description.is_none());
        assert!(detail.impact.is_none());
        assert!(detail.last_updated.is_none());
        match view.panel {
            // undated risks sort after dated ones
            Panel::Overview(p) => assert!(p.recent.iter().all(|row| row.id != "r1")),
            other => panic!("unexpected panel {:?}", other),
        }
    }

    #[test]
    fn mitigation_panel_truncates_ranking() {
        let ds = seed();
        let mut state = UiState::default();
        state.active_tab = Tab::Mitigation;
        let opts = ViewOptions { top_n: 3, fingerprint: None };
        match build(&state, &ds, &opts).panel {
            Panel::Mitigation(p) => {
                assert_eq!(p.reductions.len(), 3);
                assert_eq!(p.ranked_total, 13);
                assert!(p.reductions[0].reduction >= p.reductions[1].reduction);
            }
            other => panic!("unexpected panel {:?}", other),
        }
    }

    #[test]
    fn locations_tab_has_no_filter_bar_and_no_drift_on_seed() {
        let ds = seed();
        let mut state = UiState::default();
        state.active_tab = Tab::Locations;
        let view = build(&state, &ds, &ViewOptions::default());
        assert!(view.filters.is_none());
        match view.panel {
            Panel::Locations(p) => {
                assert_eq!(p.cards.len(), 4);
                assert!(p.cards.iter().all(|c| !c.drift));
                assert_eq!(p.cards[0].address_lines.len(), 3);
            }
            other => panic!("unexpected panel {:?}", other),
        }
    }

    #[test]
    fn overview_bars_are_zero_filled() {
        let ds = seed();
        let mut state = UiState::default();
        state.criteria.location = Selection::Only("l4".into());
        let view = build(&state, &ds, &ViewOptions::default());
        assert_eq!(view.visible_risks, 3);
        match view.panel {
            Panel::Overview(p) => {
                assert_eq!(p.status.len(), 4);
                assert_eq!(p.trend.len(), 3);
                let resolved = p.status.iter().find(|b| b.key == "resolved").unwrap();
                assert_eq!(resolved.value, 0);
                assert_eq!(p.recent[0].id, "r12");
            }
            other => panic!("unexpected panel {:?}", other),
        }
    }
}
