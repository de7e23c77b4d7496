//! Performance ranking
//!
//! Ranks reactions by one metric from an explicit allow-list. Numeric metrics
//! are coerced cell by cell; rows without a usable number are dropped and the
//! dropped count is stated in the report. Textual selectivity metrics cannot
//! be ranked, so those return the first N populated rows in table order.

use std::cmp::Ordering;

use crate::config::QueryConfig;
use crate::data::{ReactionDatabase, TableId};
use crate::error::QueryError;
use crate::report::Report;

use super::{push_enzyme_identity, push_equation};

pub(crate) const NUMERIC_METRICS: [&str; 3] =
    ["conversion_rate", "product_yield", "enantiomeric_excess"];
const TEXT_METRICS: [&str; 2] = ["regioselectivity", "stereoselectivity"];
const ALLOWED: &str =
    "conversion_rate, product_yield, enantiomeric_excess, regioselectivity, stereoselectivity";

/// Parameters for [`find_top_reactions_by_performance`].
#[derive(Debug, Default, Clone)]
pub struct PerformanceQuery {
    /// Required: one of the allow-listed metric columns.
    pub metric: String,
    pub top_n: Option<usize>,
    /// Minimum usable rows before ranking runs; defaults to the configured
    /// floor.
    pub min_data_points: Option<usize>,
}

pub fn find_top_reactions_by_performance(
    db: &ReactionDatabase,
    config: &QueryConfig,
    query: &PerformanceQuery,
) -> Result<String, QueryError> {
    let activity = db.table(TableId::ActivityPerformance)?;
    let enzymes = db.table(TableId::Enzymes)?;
    let core = db.table(TableId::ReactionsCore)?;

    let metric = query.metric.trim();
    let numeric = NUMERIC_METRICS.contains(&metric);
    if !numeric && !TEXT_METRICS.contains(&metric) {
        return Err(QueryError::UnsupportedMetric {
            metric: query.metric.clone(),
            allowed: ALLOWED,
        });
    }

    let top_n = config.effective_top_n(query.top_n);

    let mut report = Report::new("Top reactions by performance");
    report.filters(&[("metric", Some(metric)), ("top_n", Some(&top_n.to_string()))]);

    let ranked: Vec<usize> = if numeric {
        let mut usable: Vec<(usize, f64)> = Vec::new();
        let mut dropped = 0usize;
        for row in activity.rows() {
            match row.get_f64(metric) {
                Some(value) => usable.push((row.index(), value)),
                None => dropped += 1,
            }
        }

        let min_points = config.effective_min_points(query.min_data_points);
        if usable.len() < min_points {
            return Err(QueryError::InsufficientData {
                found: usable.len(),
                required: min_points,
            });
        }

        // Stable sort: equal values keep their table order.
        usable.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        let total = usable.len();
        usable.truncate(top_n);
        report.counts(usable.len(), total);
        if dropped > 0 {
            report.line(&format!(
                "**Data quality**: {} row(s) without a usable numeric value were skipped",
                dropped
            ));
        }
        usable.into_iter().map(|(idx, _)| idx).collect()
    } else {
        // Textual metrics: first N populated rows, no ranking.
        let populated: Vec<usize> = activity
            .rows()
            .filter(|row| row.get(metric).is_some())
            .map(|row| row.index())
            .collect();
        let total = populated.len();
        if total == 0 {
            return Err(QueryError::NoMatch(format!(
                "no rows with a recorded {} value",
                metric
            )));
        }
        let kept: Vec<usize> = populated.into_iter().take(top_n).collect();
        report.counts(kept.len(), total);
        report.line("**Note**: textual metric, rows listed in table order");
        kept
    };

    let unit_col = format!("{}_unit", metric);
    let error_col = format!("{}_error", metric);

    for (rank, idx) in ranked.iter().enumerate() {
        let row = activity.row(*idx);
        let key = row.key();
        match &key {
            Some(key) => report.heading(&format!("Rank {}: {}", rank + 1, key)),
            None => report.heading(&format!("Rank {}: unkeyed record", rank + 1)),
        }
        if numeric {
            report.measurement(metric, row.get(metric), row.get(&unit_col), row.get(&error_col));
        } else {
            report.field(metric, row.get(metric));
        }
        push_enzyme_identity(&mut report, key.as_ref().and_then(|k| enzymes.first_for(k)));
        push_equation(&mut report, key.as_ref().and_then(|k| core.first_for(k)));
    }

    Ok(report.finish())
}
