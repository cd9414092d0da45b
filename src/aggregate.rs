//! Derived metrics over a (usually filtered) risk list.
//!
//! Every function is pure and accepts anything that yields `&Risk`, so the
//! same code runs over the full dataset (`&Vec<Risk>`) and over a filter
//! result (`filtered.iter().copied()`).

use serde::Serialize;

use crate::model::{Risk, RiskCount, Severity, Status, Trend};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusDistribution {
    pub active: usize,
    pub monitoring: usize,
    pub mitigated: usize,
    pub resolved: usize,
}

impl StatusDistribution {
    /// All four buckets in display order, zero-filled.
    pub fn entries(&self) -> [(Status, usize); 4] {
        [
            (Status::Active, self.active),
            (Status::Monitoring, self.monitoring),
            (Status::Mitigated, self.mitigated),
            (Status::Resolved, self.resolved),
        ]
    }

    pub fn total(&self) -> usize {
        self.active + self.monitoring + self.mitigated + self.resolved
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrendDistribution {
    pub decreasing: usize,
    pub stable: usize,
    pub increasing: usize,
}

impl TrendDistribution {
    pub fn entries(&self) -> [(Trend, usize); 3] {
        [
            (Trend::Decreasing, self.decreasing),
            (Trend::Stable, self.stable),
            (Trend::Increasing, self.increasing),
        ]
    }

    pub fn total(&self) -> usize {
        self.decreasing + self.stable + self.increasing
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MitigationMetrics {
    pub total: usize,
    pub mitigated: usize,
    pub in_progress: usize,
    pub improving: usize,
    pub deteriorating: usize,
    pub mitigation_rate: u32,
    pub improvement_rate: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImprovementCounts {
    pub severity_improved: usize,
    pub likelihood_improved: usize,
    pub both_improved: usize,
    pub no_change: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreReduction<'a> {
    #[serde(skip)]
    pub risk: &'a Risk,
    pub initial_score: u8,
    pub current_score: u8,
    pub reduction: i16,
}

/// Header-level counts, always computed on the unfiltered list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GlobalStats {
    pub total_risks: usize,
    pub critical: usize,
    pub active: usize,
    pub locations: usize,
}

/// `round(100 * part / total)` with half-up rounding; 0 when `total` is 0.
pub fn percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((200 * part + total) / (2 * total)) as u32
}

pub fn status_distribution<'a, I>(risks: I) -> StatusDistribution
where
    I: IntoIterator<Item = &'a Risk>,
{
    let mut d = StatusDistribution::default();
    for r in risks {
        match r.status {
            Status::Active => d.active += 1,
            Status::Monitoring => d.monitoring += 1,
            Status::Mitigated => d.mitigated += 1,
            Status::Resolved => d.resolved += 1,
            Status::Unknown => {}
        }
    }
    d
}

pub fn trend_distribution<'a, I>(risks: I) -> TrendDistribution
where
    I: IntoIterator<Item = &'a Risk>,
{
    let mut d = TrendDistribution::default();
    for r in risks {
        match r.trend {
            Trend::Decreasing => d.decreasing += 1,
            Trend::Stable => d.stable += 1,
            Trend::Increasing => d.increasing += 1,
            Trend::Unknown => {}
        }
    }
    d
}

/// Counts by current severity.
pub fn severity_distribution<'a, I>(risks: I) -> RiskCount
where
    I: IntoIterator<Item = &'a Risk>,
{
    let mut counts = RiskCount::default();
    for r in risks {
        counts.record(r.severity);
    }
    counts
}

/// Live per-site counts by current severity.
pub fn location_risk_counts<'a, I>(risks: I, location_id: &str) -> RiskCount
where
    I: IntoIterator<Item = &'a Risk>,
{
    severity_distribution(risks.into_iter().filter(|r| r.location_id == location_id))
}

pub fn mitigation_metrics<'a, I>(risks: I) -> MitigationMetrics
where
    I: IntoIterator<Item = &'a Risk>,
{
    let mut m = MitigationMetrics::default();
    for r in risks {
        m.total += 1;
        if r.status.is_closed() {
            m.mitigated += 1;
        }
        if r.status.is_open() {
            m.in_progress += 1;
        }
        match r.trend {
            Trend::Decreasing => m.improving += 1,
            Trend::Increasing => m.deteriorating += 1,
            _ => {}
        }
    }
    m.mitigation_rate = percent(m.mitigated, m.total);
    m.improvement_rate = percent(m.improving, m.total);
    m
}

/// Severity level times likelihood level, in `[1, 16]`.
pub fn risk_score(risk: &Risk, use_initial: bool) -> u8 {
    if use_initial {
        risk.initial_severity.level() * risk.initial_likelihood.level()
    } else {
        risk.severity.level() * risk.likelihood.level()
    }
}

/// Full ranking by score reduction, largest first; ties keep input order.
pub fn reduction_ranking<'a, I>(risks: I) -> Vec<ScoreReduction<'a>>
where
    I: IntoIterator<Item = &'a Risk>,
{
    let mut ranking: Vec<ScoreReduction<'a>> = risks
        .into_iter()
        .map(|risk| {
            let initial_score = risk_score(risk, true);
            let current_score = risk_score(risk, false);
            ScoreReduction {
                risk,
                initial_score,
                current_score,
                reduction: initial_score as i16 - current_score as i16,
            }
        })
        .collect();
    // sort_by is stable
    ranking.sort_by(|a, b| b.reduction.cmp(&a.reduction));
    ranking
}

pub fn top_reductions<'a, I>(risks: I, n: usize) -> Vec<ScoreReduction<'a>>
where
    I: IntoIterator<Item = &'a Risk>,
{
    let mut ranking = reduction_ranking(risks);
    ranking.truncate(n);
    ranking
}

pub fn improvement_counts<'a, I>(risks: I) -> ImprovementCounts
where
    I: IntoIterator<Item = &'a Risk>,
{
    let mut c = ImprovementCounts::default();
    for r in risks {
        let sev_initial = r.initial_severity.level();
        let sev_current = r.severity.level();
        let lik_initial = r.initial_likelihood.level();
        let lik_current = r.likelihood.level();

        let severity_improved = sev_initial > sev_current;
        let likelihood_improved = lik_initial > lik_current;
        if severity_improved {
            c.severity_improved += 1;
        }
        if likelihood_improved {
            c.likelihood_improved += 1;
        }
        if severity_improved && likelihood_improved {
            c.both_improved += 1;
        }
        if sev_initial == sev_current && lik_initial == lik_current {
            c.no_change += 1;
        }
    }
    c
}

pub fn global_stats(risks: &[Risk], location_count: usize) -> GlobalStats {
    GlobalStats {
        total_risks: risks.len(),
        critical: risks.iter().filter(|r| r.severity == Severity::Critical).count(),
        active: risks.iter().filter(|r| r.status == Status::Active).count(),
        locations: location_count,
    }
}
