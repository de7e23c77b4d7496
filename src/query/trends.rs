//! Trend analysis over the joined performance data
//!
//! Joins activity to enzymes (inner) and conditions (left), applies the
//! filters, then runs four independent analyses: temperature correlation, pH
//! correlation, per-organism comparison, and the overall distribution. Each
//! section renders only when it has enough data to say something; the
//! minimum-sample floor applies to the matched rows before numeric coercion,
//! and coercion failures are counted and reported rather than silently
//! shrinking the sample.

use std::collections::BTreeMap;

use crate::config::QueryConfig;
use crate::data::{parse_numeric, ReactionDatabase, TableId};
use crate::error::QueryError;
use crate::matching::{contains_ci, enzyme_matches};
use crate::report::Report;

use super::performance::NUMERIC_METRICS;

const ALLOWED: &str = "conversion_rate, product_yield or enantiomeric_excess";

/// Filters for [`analyze_reaction_trends`]. Absent fields match everything.
#[derive(Debug, Default, Clone)]
pub struct TrendQuery {
    pub enzyme_name: Option<String>,
    pub organism: Option<String>,
    /// Numeric metric to analyze; defaults to `conversion_rate`.
    pub metric: Option<String>,
    pub min_data_points: Option<usize>,
}

/// Pearson correlation coefficient. `None` when either side has zero
/// variance.
fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    (denom > 0.0).then(|| cov / denom)
}

fn correlation_section(
    report: &mut Report,
    title: &str,
    pairs: &[(f64, f64)],
    config: &QueryConfig,
) {
    if pairs.len() < config.min_correlation_points {
        return;
    }
    let Some(r) = pearson(pairs) else { return };

    let trend = if r > config.correlation_threshold {
        "increasing"
    } else if r < -config.correlation_threshold {
        "decreasing"
    } else {
        "no clear trend"
    };

    report.heading(title);
    report.field("Trend", Some(trend));
    report.field("Correlation", Some(&format!("{:.3}", r)));
    report.field(
        "Samples",
        Some(&format!("{} paired observations", pairs.len())),
    );
}

pub fn analyze_reaction_trends(
    db: &ReactionDatabase,
    config: &QueryConfig,
    query: &TrendQuery,
) -> Result<String, QueryError> {
    let activity = db.table(TableId::ActivityPerformance)?;
    let enzymes = db.table(TableId::Enzymes)?;
    let conditions = db.table(TableId::ExperimentalConditions).ok();

    let metric = query.metric.as_deref().unwrap_or("conversion_rate").trim();
    if !NUMERIC_METRICS.contains(&metric) {
        return Err(QueryError::UnsupportedMetric {
            metric: metric.to_string(),
            allowed: ALLOWED,
        });
    }

    let mut matched = Vec::new();
    for row in activity.rows() {
        let Some(key) = row.key() else { continue };
        let Some(enzyme) = enzymes.first_for(&key) else { continue };

        let enzyme_ok = query.enzyme_name.as_deref().map_or(true, |q| {
            enzyme_matches(enzyme.get("enzyme_name"), enzyme.get("enzyme_synonyms"), q)
        });
        let organism_ok = query
            .organism
            .as_deref()
            .map_or(true, |q| contains_ci(enzyme.get("organism"), q));
        if !enzyme_ok || !organism_ok {
            continue;
        }

        let cond = conditions.and_then(|t| t.first_for(&key));
        matched.push((row, enzyme, cond));
    }

    let floor = config.effective_min_points(query.min_data_points);
    if matched.len() < floor {
        return Err(QueryError::InsufficientData {
            found: matched.len(),
            required: floor,
        });
    }

    let usable: Vec<_> = matched
        .iter()
        .filter_map(|(row, enzyme, cond)| row.get_f64(metric).map(|v| (v, *enzyme, *cond)))
        .collect();
    let dropped = matched.len() - usable.len();

    let mut report = Report::new("Reaction trend analysis");
    report.filters(&[
        ("enzyme", query.enzyme_name.as_deref()),
        ("organism", query.organism.as_deref()),
        ("metric", Some(metric)),
    ]);
    report.line(&format!("**Reactions analyzed**: {}", matched.len()));
    if dropped > 0 {
        report.line(&format!(
            "**Data quality**: {} row(s) without a usable numeric value were skipped",
            dropped
        ));
    }

    let temp_pairs: Vec<(f64, f64)> = usable
        .iter()
        .filter_map(|(v, _, cond)| {
            let t = cond.and_then(|c| c.get("temperature_celsius")).and_then(parse_numeric)?;
            Some((t, *v))
        })
        .collect();
    correlation_section(&mut report, "Temperature impact", &temp_pairs, config);

    let ph_pairs: Vec<(f64, f64)> = usable
        .iter()
        .filter_map(|(v, _, cond)| {
            let ph = cond.and_then(|c| c.get("ph")).and_then(parse_numeric)?;
            Some((ph, *v))
        })
        .collect();
    correlation_section(&mut report, "pH impact", &ph_pairs, config);

    // Organism comparison is only informative without an organism filter.
    if query.organism.is_none() {
        let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for (v, enzyme, _) in &usable {
            if let Some(org) = enzyme.get("organism") {
                groups.entry(org).or_default().push(*v);
            }
        }
        let mut ranked: Vec<(&str, f64, usize)> = groups
            .iter()
            .filter(|(_, vs)| vs.len() >= 2)
            .map(|(org, vs)| (*org, vs.iter().sum::<f64>() / vs.len() as f64, vs.len()))
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal).then(a.0.cmp(b.0)));

        if ranked.len() >= 2 {
            report.heading("Organism comparison");
            let (best, mean, n) = ranked[0];
            report.field(
                "Best organism",
                Some(&format!("{} (mean {} {:.2} over {} reactions)", best, metric, mean, n)),
            );
            for (org, mean, n) in &ranked {
                report.field(org, Some(&format!("mean {:.2} ({} reactions)", mean, n)));
            }
        }
    }

    if !usable.is_empty() {
        let values: Vec<f64> = usable.iter().map(|(v, _, _)| *v).collect();
        let n = values.len();
        let mean = values.iter().sum::<f64>() / n as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        report.heading("Performance distribution");
        report.field("Samples", Some(&n.to_string()));
        report.field("Mean", Some(&format!("{:.2}", mean)));
        if n >= 2 {
            let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (n - 1) as f64;
            let std = var.sqrt();
            let high = values.iter().filter(|v| **v > mean + std).count();
            report.field("Std dev", Some(&format!("{:.2}", std)));
            report.field("High performers", Some(&high.to_string()));
        }
        report.field("Min", Some(&min.to_string()));
        report.field("Max", Some(&max.to_string()));
    }

    Ok(report.finish())
}
