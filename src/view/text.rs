//! Plain-text summary of a [`DashboardView`] for the terminal.

use std::fmt::Write;

use super::{Bar, DashboardView, Panel, RiskRow};

fn bar_line(out: &mut String, b: &Bar) {
    let width = (b.percent as usize * 20 + 50) / 100;
    let _ = writeln!(
        out,
        "  {:<12} {:<20} {:>3} ({:>3}%)",
        b.label,
        "#".repeat(width),
        b.value,
        b.percent
    );
}

fn row_line(out: &mut String, r: &RiskRow) {
    let _ = writeln!(
        out,
        "  {:<4} {:<9} {:<11} {:<10} score {:>2}  {} [{}]",
        r.id, r.severity.label, r.status.label, r.trend.label, r.score, r.title, r.location
    );
}

pub fn render(view: &DashboardView) -> String {
    let mut out = String::new();
    let h = &view.header;
    let _ = writeln!(
        out,
        "== Risk dashboard [{}] == {} risks, {} critical, {} active, {} locations",
        view.active_tab.label(),
        h.total_risks,
        h.critical,
        h.active,
        h.locations
    );

    if let Some(bar) = &view.filters {
        let active: Vec<String> = [
            ("location", &bar.locations),
            ("severity", &bar.severities),
            ("status", &bar.statuses),
        ]
        .iter()
        .filter_map(|(name, choices)| {
            choices
                .iter()
                .skip(1)
                .find(|c| c.selected)
                .map(|c| format!("{}={}", name, c.value))
        })
        .chain((!bar.search.is_empty()).then(|| format!("search={:?}", bar.search)))
        .collect();
        if bar.show_clear {
            let _ = writeln!(out, "filters: {}  (clear to reset)", active.join(" "));
        }
    }

    match &view.panel {
        Panel::Overview(p) => {
            let m = &p.metrics;
            let _ = writeln!(
                out,
                "mitigation {}% ({}/{}), improving {}%, in progress {}, deteriorating {}",
                m.mitigation_rate, m.mitigated, m.total, m.improvement_rate, m.in_progress, m.deteriorating
            );
            let _ = writeln!(out, "status:");
            p.status.iter().for_each(|b| bar_line(&mut out, b));
            let _ = writeln!(out, "trend:");
            p.trend.iter().for_each(|b| bar_line(&mut out, b));
            let _ = writeln!(out, "severity:");
            p.severity.iter().for_each(|b| bar_line(&mut out, b));
        }
        Panel::Risks(p) => {
            let _ = writeln!(out, "{} matching risks", view.visible_risks);
            p.rows.iter().for_each(|r| row_line(&mut out, r));
        }
        Panel::Locations(p) => {
            for c in &p.cards {
                let _ = writeln!(
                    out,
                    "  {:<4} {:<32} score {:>3}  C{} H{} M{} L{}{}",
                    c.id,
                    c.name,
                    c.overall_risk_score.map(|s| s.to_string()).unwrap_or_else(|| "-".into()),
                    c.seed_counts.critical,
                    c.seed_counts.high,
                    c.seed_counts.medium,
                    c.seed_counts.low,
                    if c.drift { "  (drift)" } else { "" }
                );
            }
        }
        Panel::Mitigation(p) => {
            let i = &p.improvement;
            let _ = writeln!(
                out,
                "mitigation {}%, severity improved {}, likelihood improved {}, both {}, unchanged {}",
                p.metrics.mitigation_rate, i.severity_improved, i.likelihood_improved, i.both_improved, i.no_change
            );
            let _ = writeln!(out, "top reductions ({} of {}):", p.reductions.len(), p.ranked_total);
            for r in &p.reductions {
                let _ = writeln!(
                    out,
                    "  {:<4} {:>2} -> {:>2} ({:+})  {}",
                    r.risk_id, r.initial_score, r.current_score, -r.reduction, r.title
                );
            }
        }
    }

    if let Some(d) = &view.dialog {
        let _ = writeln!(out, "--- {} ({}) ---", d.title, d.id);
        match &d.last_updated {
            Some(updated) => {
                let _ = writeln!(out, "{} at {}, updated {}", d.category, d.location, updated);
            }
            None => {
                let _ = writeln!(out, "{} at {}", d.category, d.location);
            }
        }
        if let Some(description) = &d.description {
            let _ = writeln!(out, "{}", description);
        }
        let _ = writeln!(
            out,
            "severity {} -> {}, likelihood {} -> {}, score {} -> {}",
            d.initial_severity.label, d.severity.label, d.initial_likelihood, d.likelihood, d.initial_score, d.current_score
        );
        if let Some(plan) = &d.mitigation_plan {
            let _ = writeln!(out, "plan: {}", plan);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::state::{Tab, UiState};
    use crate::data;
    use crate::filter::Selection;
    use crate::model::Severity;
    use crate::view::{build, ViewOptions};

    #[test]
    fn summary_lists_active_filters() {
        let ds = data::seed().unwrap().dataset;
        let mut state = UiState::default();
        state.active_tab = Tab::Risks;
        state.criteria.severity = Selection::Only(Severity::Critical);
        let text = render(&build(&state, &ds, &ViewOptions::default()));
        assert!(text.contains("filters: severity=critical"));
        assert!(text.contains("2 matching risks"));
    }

    #[test]
    fn no_filter_line_by_default() {
        let ds = data::seed().unwrap().dataset;
        let text = render(&build(&UiState::default(), &ds, &ViewOptions::default()));
        assert!(!text.contains("filters:"));
        assert!(text.contains("13 risks"));
    }
}
