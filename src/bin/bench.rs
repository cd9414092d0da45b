//! Profiling binary: times filter, aggregate and render passes over a
//! synthetic dataset.
//!
//! Usage: bench [risks] [seed]   (defaults: 10000 risks, seed 7)

use anyhow::Result;
use chrono::{Duration, TimeZone, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::time::Instant;

use riskboard::aggregate;
use riskboard::controller::events::Event;
use riskboard::controller::session::Session;
use riskboard::controller::state::{Tab, Theme};
use riskboard::data::Dataset;
use riskboard::filter::{filter, Criteria, Selection};
use riskboard::model::{Likelihood, Location, LocationType, Risk, RiskCount, Severity, Status, Trend};
use riskboard::view::ViewOptions;

const CATEGORIES: [&str; 6] = ["Safety", "Environmental", "Equipment", "Electrical", "Compliance", "Supply Chain"];
const HAZARDS: [&str; 6] = ["fire", "spill", "pressure", "arc flash", "data loss", "contamination"];

fn pick<T: Copy>(rng: &mut StdRng, items: &[T]) -> T {
    items[rng.gen_range(0..items.len())]
}

fn generate(n: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let kinds = [LocationType::Experimentation, LocationType::Research, LocationType::Manufacturing];
    let locations: Vec<Location> = (0..20)
        .map(|i| Location {
            id: format!("l{}", i),
            name: format!("Site {}", i),
            address: format!("{} Industrial Way\nUnit {}", 100 + i, i),
            description: String::new(),
            kinds: vec![pick(&mut rng, &kinds)],
            risk_count: RiskCount::default(),
            overall_risk_score: Some(rng.gen_range(10..100)),
        })
        .collect();

    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap_or_else(Utc::now);
    let risks = (0..n)
        .map(|i| {
            let hazard = pick(&mut rng, &HAZARDS);
            Risk {
                id: format!("r{}", i),
                title: format!("{} risk #{}", hazard, i),
                description: format!("Synthetic {} scenario", hazard),
                category: pick(&mut rng, &CATEGORIES).to_string(),
                severity: pick(&mut rng, &Severity::ALL),
                initial_severity: pick(&mut rng, &Severity::ALL),
                likelihood: pick(&mut rng, &Likelihood::ALL),
                initial_likelihood: pick(&mut rng, &Likelihood::ALL),
                impact: Some(rng.gen_range(0..=10)),
                status: pick(&mut rng, &Status::ALL),
                trend: pick(&mut rng, &Trend::ALL),
                location_id: format!("l{}", rng.gen_range(0..locations.len())),
                last_updated: Some(base + Duration::minutes(rng.gen_range(0..525_600))),
                mitigation_plan: rng.gen_bool(0.6).then(|| "Synthetic plan".to_string()),
            }
        })
        .collect();

    Dataset { locations, risks }
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let n: usize = args.next().and_then(|v| v.parse().ok()).unwrap_or(10_000);
    let seed: u64 = args.next().and_then(|v| v.parse().ok()).unwrap_or(7);

    println!("=== Risk Dashboard Bench ({} risks, seed {}) ===", n, seed);
    let dataset = generate(n, seed);

    let criteria = Criteria {
        severity: Selection::Only(Severity::High),
        search: "FIRE".into(),
        ..Default::default()
    };
    let started = Instant::now();
    let visible = filter(&dataset.risks, &criteria);
    let filter_ms = started.elapsed().as_secs_f64() * 1000.0;

    let started = Instant::now();
    let metrics = aggregate::mitigation_metrics(&dataset.risks);
    let ranking = aggregate::reduction_ranking(&dataset.risks);
    let improvement = aggregate::improvement_counts(&dataset.risks);
    let aggregate_ms = started.elapsed().as_secs_f64() * 1000.0;

    println!("  filter: {} matches in {:.2} ms", visible.len(), filter_ms);
    println!(
        "  aggregate: mitigation {}%, {} ranked, {} unchanged in {:.2} ms",
        metrics.mitigation_rate,
        ranking.len(),
        improvement.no_change,
        aggregate_ms
    );

    let mut session = Session::new(dataset, Theme::Light, ViewOptions::default());
    let events = vec![
        Event::SelectTab(Tab::Risks),
        Event::SetSeverityFilter(Selection::Only(Severity::Critical)),
        Event::SetSearch("pressure".into()),
        Event::SelectTab(Tab::Mitigation),
        Event::SelectTab(Tab::Locations),
        Event::SelectLocation("l3".into()),
        Event::ClearFilters,
        Event::SelectTab(Tab::Overview),
    ];
    let started = Instant::now();
    let mut html_bytes = 0usize;
    for event in events {
        html_bytes += session.dispatch(event).html.len();
    }
    let elapsed = started.elapsed().as_secs_f64();
    let passes = session.render_count();
    println!(
        "  render: {} passes in {:.2} ms ({:.1} passes/sec, {:.1} KB html)",
        passes,
        elapsed * 1000.0,
        passes as f64 / elapsed.max(1e-9),
        html_bytes as f64 / 1024.0
    );
    Ok(())
}
