//! Self-contained HTML page for a [`DashboardView`].
//!
//! Each section is a small `render_*` function returning a fragment; the
//! page is assembled with `format!`. All record text goes through
//! [`escape`].

use super::{
    Badge, Bar, Choice, DashboardView, FilterBar, LocationsPanel, MitigationPanel, OverviewPanel,
    Panel, RiskDetail, RiskRow, RisksPanel,
};
use crate::aggregate::MitigationMetrics;

pub fn render(view: &DashboardView) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en" data-theme="{theme}">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Risk Dashboard - {tab}</title>
  <style>{css}</style>
</head>
<body>
  <main>
    {header}
    {tabs}
    {filters}
    {panel}
    {dialog}
    {footer}
  </main>
</body>
</html>
"#,
        theme = view.theme.as_str(),
        tab = view.active_tab.label(),
        css = CSS,
        header = render_header(view),
        tabs = render_tabs(view),
        filters = view.filters.as_ref().map(render_filters).unwrap_or_default(),
        panel = render_panel(&view.panel, view.visible_risks),
        dialog = view.dialog.as_ref().map(render_dialog).unwrap_or_default(),
        footer = render_footer(view),
    )
}

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_badge(b: &Badge) -> String {
    format!(
        r#"<span class="badge" style="background:{}">{}</span>"#,
        b.color, b.label
    )
}

fn render_header(view: &DashboardView) -> String {
    let h = &view.header;
    format!(
        r#"<header class="hero">
      <h1>Risk Management Dashboard</h1>
      <div class="stats">
        <div class="stat"><span class="stat-value">{}</span><span class="stat-label">Total risks</span></div>
        <div class="stat critical"><span class="stat-value">{}</span><span class="stat-label">Critical</span></div>
        <div class="stat"><span class="stat-value">{}</span><span class="stat-label">Active</span></div>
        <div class="stat"><span class="stat-value">{}</span><span class="stat-label">Locations</span></div>
      </div>
    </header>"#,
        h.total_risks, h.critical, h.active, h.locations
    )
}

fn render_tabs(view: &DashboardView) -> String {
    let links: String = view
        .tabs
        .iter()
        .map(|t| {
            format!(
                r#"<span class="tab{}" data-tab="{}">{}</span>"#,
                if t.active { " active" } else { "" },
                t.tab.as_str(),
                t.label
            )
        })
        .collect();
    format!(r#"<nav class="tabs">{}</nav>"#, links)
}

fn render_select(name: &str, choices: &[Choice]) -> String {
    let options: String = choices
        .iter()
        .map(|c| {
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                escape(&c.value),
                if c.selected { " selected" } else { "" },
                escape(&c.label)
            )
        })
        .collect();
    format!(r#"<select name="{}">{}</select>"#, name, options)
}

fn render_filters(bar: &FilterBar) -> String {
    let clear = if bar.show_clear {
        r#"<button class="clear-filters" type="reset">Clear filters</button>"#
    } else {
        ""
    };
    format!(
        r#"<form class="filters">
      <input type="search" name="search" placeholder="Search risks" value="{}">
      {}{}{}{}
    </form>"#,
        escape(&bar.search),
        render_select("location", &bar.locations),
        render_select("severity", &bar.severities),
        render_select("status", &bar.statuses),
        clear
    )
}

fn render_panel(panel: &Panel, visible: usize) -> String {
    match panel {
        Panel::Overview(p) => render_overview(p),
        Panel::Risks(p) => render_risks(p, visible),
        Panel::Locations(p) => render_locations(p),
        Panel::Mitigation(p) => render_mitigation(p),
    }
}

fn render_bars(title: &str, bars: &[Bar]) -> String {
    let rows: String = bars
        .iter()
        .map(|b| {
            format!(
                r#"<div class="bar-row" data-key="{}"><span class="bar-label">{}</span><div class="bar-track"><div class="bar-fill" style="width:{}%;background:{}"></div></div><span class="bar-value">{} ({}%)</span></div>"#,
                b.key, b.label, b.percent, b.color, b.value, b.percent
            )
        })
        .collect();
    format!(
        r#"<div class="card chart"><h3>{}</h3>{}</div>"#,
        title, rows
    )
}

fn render_metric_cards(m: &MitigationMetrics) -> String {
    format!(
        r#"<div class="metrics">
      <div class="card metric"><span class="stat-value">{}%</span><span class="stat-label">Mitigation rate ({} of {})</span></div>
      <div class="card metric"><span class="stat-value">{}%</span><span class="stat-label">Improving ({} decreasing)</span></div>
      <div class="card metric"><span class="stat-value">{}</span><span class="stat-label">In progress</span></div>
      <div class="card metric"><span class="stat-value">{}</span><span class="stat-label">Deteriorating</span></div>
    </div>"#,
        m.mitigation_rate, m.mitigated, m.total, m.improvement_rate, m.improving, m.in_progress, m.deteriorating
    )
}

fn render_table(rows: &[RiskRow]) -> String {
    let body: String = rows
        .iter()
        .map(|r| {
            format!(
                r#"<tr data-risk="{}"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td class="num">{}</td><td class="num">{}</td><td>{}</td></tr>"#,
                escape(&r.id),
                escape(&r.title),
                escape(&r.category),
                escape(&r.location),
                render_badge(&r.severity),
                r.likelihood,
                render_badge(&r.status),
                r.impact.map(|i| i.to_string()).unwrap_or_default(),
                r.score,
                r.last_updated.as_deref().unwrap_or_default()
            )
        })
        .collect();
    format!(
        r#"<table class="risks"><thead><tr><th>Title</th><th>Category</th><th>Location</th><th>Severity</th><th>Likelihood</th><th>Status</th><th>Impact</th><th>Score</th><th>Updated</th></tr></thead><tbody>{}</tbody></table>"#,
        body
    )
}

fn render_overview(p: &OverviewPanel) -> String {
    let recent = if p.recent.is_empty() {
        r#"<p class="empty">No risks match the current filters.</p>"#.to_string()
    } else {
        render_table(&p.recent)
    };
    format!(
        r#"<section class="panel overview">
      {}
      <div class="charts">{}{}{}</div>
      <div class="card"><h3>Recently updated</h3>{}</div>
    </section>"#,
        render_metric_cards(&p.metrics),
        render_bars("By status", &p.status),
        render_bars("By trend", &p.trend),
        render_bars("By severity", &p.severity),
        recent
    )
}

fn render_risks(p: &RisksPanel, visible: usize) -> String {
    let body = if p.rows.is_empty() {
        r#"<p class="empty">No risks match the current filters.</p>"#.to_string()
    } else {
        render_table(&p.rows)
    };
    format!(
        r#"<section class="panel risks"><h2>{} risk{}</h2>{}</section>"#,
        visible,
        if visible == 1 { "" } else { "s" },
        body
    )
}

fn render_locations(p: &LocationsPanel) -> String {
    let cards: String = p
        .cards
        .iter()
        .map(|c| {
            let address: Vec<String> = c.address_lines.iter().map(|l| escape(l)).collect();
            let types: String = c
                .types
                .iter()
                .map(|t| format!(r#"<span class="chip">{}</span>"#, t))
                .collect();
            let drift = if c.drift {
                format!(
                    r#"<p class="drift">Recorded counts differ from tracked risks ({} tracked)</p>"#,
                    c.live_counts.total()
                )
            } else {
                String::new()
            };
            format!(
                r#"<article class="card location" data-location="{id}">
        <h3>{name}</h3>
        <div class="chips">{types}</div>
        <address>{address}</address>
        <p>{description}</p>
        <div class="counts">
          <span class="count critical">{c} critical</span>
          <span class="count high">{h} high</span>
          <span class="count medium">{m} medium</span>
          <span class="count low">{l} low</span>
        </div>
        {score}
        {drift}
      </article>"#,
                id = escape(&c.id),
                name = escape(&c.name),
                types = types,
                address = address.join("<br>"),
                description = escape(&c.description),
                c = c.seed_counts.critical,
                h = c.seed_counts.high,
                m = c.seed_counts.medium,
                l = c.seed_counts.low,
                score = c
                    .overall_risk_score
                    .map(|s| format!(r#"<div class="score">Overall risk score <strong>{}</strong></div>"#, s))
                    .unwrap_or_default(),
                drift = drift,
            )
        })
        .collect();
    format!(r#"<section class="panel locations"><div class="grid">{}</div></section>"#, cards)
}

fn render_mitigation(p: &MitigationPanel) -> String {
    let max_score = 16.0;
    let bars: String = p
        .reductions
        .iter()
        .map(|r| {
            format!(
                r#"<div class="reduction" data-risk="{}"><span class="bar-label">{}</span><div class="bar-track"><div class="bar-fill initial" style="width:{:.1}%"></div><div class="bar-fill current" style="width:{:.1}%"></div></div><span class="bar-value">{} &rarr; {} ({:+})</span></div>"#,
                escape(&r.risk_id),
                escape(&r.title),
                r.initial_score as f64 / max_score * 100.0,
                r.current_score as f64 / max_score * 100.0,
                r.initial_score,
                r.current_score,
                -r.reduction
            )
        })
        .collect();
    let i = &p.improvement;
    format!(
        r#"<section class="panel mitigation">
      {}
      <div class="card"><h3>Assessment changes</h3>
        <ul class="improvement">
          <li>Severity improved: {}</li>
          <li>Likelihood improved: {}</li>
          <li>Both improved: {}</li>
          <li>No change: {}</li>
        </ul>
      </div>
      <div class="card chart"><h3>Top risk score reductions ({} of {})</h3>{}</div>
    </section>"#,
        render_metric_cards(&p.metrics),
        i.severity_improved,
        i.likelihood_improved,
        i.both_improved,
        i.no_change,
        p.reductions.len(),
        p.ranked_total,
        bars
    )
}

fn render_dialog(d: &RiskDetail) -> String {
    let plan = d
        .mitigation_plan
        .as_ref()
        .map(|p| {
            format!(
                r#"<section class="plan"><h4>Mitigation plan</h4><p>{}</p></section>"#,
                escape(p)
            )
        })
        .unwrap_or_default();
    let updated = d
        .last_updated
        .as_ref()
        .map(|u| format!(" &middot; updated {}", u))
        .unwrap_or_default();
    let description = d
        .description
        .as_ref()
        .map(|text| format!("<p>{}</p>", escape(text)))
        .unwrap_or_default();
    let impact = d
        .impact
        .map(|i| format!(" &middot; Impact {}/10", i))
        .unwrap_or_default();
    format!(
        r#"<dialog open class="detail" data-risk="{id}">
      <h2>{title}</h2>
      <p class="meta">{category} &middot; {location}{updated}</p>
      {description}
      <table class="assessment">
        <tr><th></th><th>Initial</th><th>Current</th></tr>
        <tr><td>Severity</td><td>{sev0}</td><td>{sev1}</td></tr>
        <tr><td>Likelihood</td><td>{lik0}</td><td>{lik1}</td></tr>
        <tr><td>Score</td><td>{score0}</td><td>{score1}</td></tr>
      </table>
      <p>Status {status} &middot; Trend {trend}{impact}</p>
      {plan}
    </dialog>"#,
        id = escape(&d.id),
        title = escape(&d.title),
        category = escape(&d.category),
        location = escape(&d.location),
        updated = updated,
        description = description,
        sev0 = render_badge(&d.initial_severity),
        sev1 = render_badge(&d.severity),
        lik0 = d.initial_likelihood,
        lik1 = d.likelihood,
        score0 = d.initial_score,
        score1 = d.current_score,
        status = render_badge(&d.status),
        trend = render_badge(&d.trend),
        impact = impact,
        plan = plan,
    )
}

fn render_footer(view: &DashboardView) -> String {
    let dataset = view
        .fingerprint
        .as_deref()
        .map(|f| format!("dataset {}", f.chars().take(12).collect::<String>()))
        .unwrap_or_default();
    format!(
        r#"<footer><span>{}</span><span>state {}</span></footer>"#,
        dataset,
        view.state_hash.chars().take(12).collect::<String>()
    )
}

const CSS: &str = r#"
    :root, [data-theme="light"] {
      --bg: #f6f8fa; --bg-raised: #ffffff; --fg: #24292f; --fg-muted: #57606a;
      --border: #d0d7de; --accent: #0969da; --track: #eaeef2;
    }
    [data-theme="dark"] {
      --bg: #0d1117; --bg-raised: #161b22; --fg: #c9d1d9; --fg-muted: #8b949e;
      --border: #30363d; --accent: #58a6ff; --track: #21262d;
    }
    *, *::before, *::after { box-sizing: border-box; margin: 0; padding: 0; }
    body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif; background: var(--bg); color: var(--fg); line-height: 1.5; }
    main { max-width: 1200px; margin: 0 auto; padding: 1.5rem; display: flex; flex-direction: column; gap: 1rem; }
    h1 { font-size: 1.5rem; } h2 { font-size: 1.15rem; margin-bottom: 0.5rem; } h3 { font-size: 0.95rem; margin-bottom: 0.5rem; }
    .stats, .metrics, .charts { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 0.75rem; margin-top: 0.75rem; }
    .stat, .card { background: var(--bg-raised); border: 1px solid var(--border); border-radius: 8px; padding: 0.9rem; }
    .stat { display: flex; flex-direction: column; }
    .stat-value { font-size: 1.6rem; font-weight: 700; }
    .stat-label { color: var(--fg-muted); font-size: 0.8rem; }
    .stat.critical .stat-value { color: #F44336; }
    .tabs { display: flex; gap: 0.25rem; border-bottom: 1px solid var(--border); }
    .tab { padding: 0.4rem 0.9rem; color: var(--fg-muted); border-bottom: 2px solid transparent; }
    .tab.active { color: var(--accent); border-bottom-color: var(--accent); }
    .filters { display: flex; gap: 0.5rem; flex-wrap: wrap; }
    .filters input, .filters select, .filters button { padding: 0.35rem 0.6rem; border: 1px solid var(--border); border-radius: 6px; background: var(--bg-raised); color: var(--fg); }
    .badge { display: inline-block; padding: 0.05rem 0.5rem; border-radius: 10px; color: #fff; font-size: 0.75rem; }
    .chip { display: inline-block; padding: 0.05rem 0.5rem; border: 1px solid var(--border); border-radius: 10px; font-size: 0.72rem; margin-right: 0.25rem; }
    .bar-row, .reduction { display: grid; grid-template-columns: 140px 1fr 90px; align-items: center; gap: 0.5rem; margin: 0.25rem 0; font-size: 0.8rem; }
    .bar-track { background: var(--track); border-radius: 4px; height: 10px; position: relative; overflow: hidden; }
    .bar-fill { height: 100%; border-radius: 4px; }
    .reduction .bar-fill { position: absolute; top: 0; left: 0; }
    .bar-fill.initial { background: #FF9800; opacity: 0.45; }
    .bar-fill.current { background: #2196F3; }
    table { width: 100%; border-collapse: collapse; font-size: 0.82rem; }
    th, td { text-align: left; padding: 0.4rem; border-bottom: 1px solid var(--border); }
    td.num { text-align: right; }
    .grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(280px, 1fr)); gap: 0.75rem; }
    address { font-style: normal; color: var(--fg-muted); font-size: 0.8rem; margin: 0.4rem 0; }
    .counts { display: flex; gap: 0.5rem; font-size: 0.78rem; margin: 0.4rem 0; }
    .count.critical { color: #F44336; } .count.high { color: #FF9800; } .count.medium { color: #FFC107; } .count.low { color: #4CAF50; }
    .drift { color: #FF9800; font-size: 0.75rem; }
    .empty { color: var(--fg-muted); padding: 1rem 0; }
    dialog.detail { position: relative; border: 1px solid var(--border); border-radius: 8px; padding: 1.2rem; background: var(--bg-raised); color: var(--fg); }
    .meta { color: var(--fg-muted); font-size: 0.8rem; }
    .plan { margin-top: 0.75rem; }
    footer { display: flex; justify-content: space-between; color: var(--fg-muted); font-size: 0.72rem; font-family: monospace; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::state::{Tab, Theme, UiState};
    use crate::data;
    use crate::view::{build, ViewOptions};

    fn page(state: &UiState) -> String {
        let ds = data::seed().unwrap().dataset;
        render(&build(state, &ds, &ViewOptions::default()))
    }

    #[test]
    fn escape_handles_markup() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn theme_lands_on_root_element() {
        let html = page(&UiState::with_theme(Theme::Dark));
        assert!(html.contains(r#"<html lang="en" data-theme="dark">"#));
    }

    #[test]
    fn clear_button_only_when_filtered() {
        let mut state = UiState::default();
        assert!(!page(&state).contains("clear-filters"));
        state.criteria.search = "fire".into();
        assert!(page(&state).contains("clear-filters"));
    }

    #[test]
    fn plan_section_omitted_when_absent() {
        let mut state = UiState::default();
        state.dialog_open = true;
        state.selected_risk = Some("r7".into());
        let html = page(&state);
        assert!(html.contains(r#"data-risk="r7""#));
        assert!(!html.contains("Mitigation plan"));

        state.selected_risk = Some("r1".into());
        assert!(page(&state).contains("Mitigation plan"));
    }

    #[test]
    fn address_markers_become_line_breaks() {
        let mut state = UiState::default();
        state.active_tab = Tab::Locations;
        let html = page(&state);
        assert!(html.contains("1200 Innovation Drive<br>Building A<br>Northfield, MN 55057"));
    }

    #[test]
    fn empty_result_shows_message() {
        let mut state = UiState::default();
        state.active_tab = Tab::Risks;
        state.criteria.search = "no such hazard".into();
        let html = page(&state);
        assert!(html.contains("No risks match the current filters."));
        assert!(html.contains("0 risks"));
    }

    #[test]
    fn footer_truncates_non_ascii_fingerprint() {
        let ds = data::seed().unwrap().dataset;
        let opts = ViewOptions {
            fingerprint: Some("ñ".repeat(20)),
            ..ViewOptions::default()
        };
        let html = render(&build(&UiState::default(), &ds, &opts));
        assert!(html.contains(&format!("dataset {}", "ñ".repeat(12))));
    }

    #[test]
    fn dialog_skips_missing_description_impact_and_date() {
        let mut ds = data::seed().unwrap().dataset;
        ds.risks[0].description.clear();
        ds.risks[0].impact = None;
        ds.risks[0].last_updated = None;
        let mut state = UiState::default();
        state.selected_risk = Some("r1".into());
        state.dialog_open = true;
        let html = render(&build(&state, &ds, &ViewOptions::default()));
        let dialog = &html[html.find("<dialog").unwrap()..];
        assert!(!dialog.contains("Impact"));
        assert!(!dialog.contains("updated"));
        assert!(!dialog.contains("<p></p>"));
    }
}
