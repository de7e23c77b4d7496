//! Temperature and pH range search
//!
//! Range specs are parsed up front so an invalid spec is reported instead of
//! silently matching nothing. A row whose stored value does not parse as a
//! number never matches a range.

use crate::config::QueryConfig;
use crate::data::{ReactionDatabase, RowRef, TableId};
use crate::error::QueryError;
use crate::matching::RangeFilter;
use crate::report::Report;

use super::{cap_hits, push_condition_fields, push_enzyme_identity, push_equation};

/// Filters for [`find_reactions_by_condition`]. Absent fields match everything.
#[derive(Debug, Default, Clone)]
pub struct ConditionQuery {
    /// `"a-b"`, `">x"` or `"<x"`, in degrees Celsius.
    pub temperature_range: Option<String>,
    /// `"a-b"`, `">x"` or `"<x"`, in pH units.
    pub ph_range: Option<String>,
    pub max_results: Option<usize>,
}

pub fn find_reactions_by_condition(
    db: &ReactionDatabase,
    config: &QueryConfig,
    query: &ConditionQuery,
) -> Result<String, QueryError> {
    let conditions = db.table(TableId::ExperimentalConditions)?;
    let enzymes = db.table(TableId::Enzymes)?;
    let core = db.table(TableId::ReactionsCore)?;
    let limit = config.effective_limit(query.max_results);

    let temperature = query
        .temperature_range
        .as_deref()
        .map(|spec| RangeFilter::parse(spec, "temperature"))
        .transpose()?;
    let ph = query
        .ph_range
        .as_deref()
        .map(|spec| RangeFilter::parse(spec, "pH"))
        .transpose()?;

    let in_range = |filter: Option<RangeFilter>, row: &RowRef<'_>, column: &str| match filter {
        Some(filter) => row.get_f64(column).map_or(false, |v| filter.contains(v)),
        None => true,
    };

    let hits: Vec<usize> = conditions
        .rows()
        .filter(|row| {
            in_range(temperature, row, "temperature_celsius") && in_range(ph, row, "ph")
        })
        .map(|row| row.index())
        .collect();

    let (kept, total) = cap_hits(hits, limit);
    if total == 0 {
        return Err(QueryError::NoMatch(format!(
            "no reactions matched temperature={}, pH={}",
            query.temperature_range.as_deref().unwrap_or("all"),
            query.ph_range.as_deref().unwrap_or("all"),
        )));
    }

    let mut report = Report::new("Condition reaction search");
    report.filters(&[
        ("temperature", query.temperature_range.as_deref()),
        ("pH", query.ph_range.as_deref()),
    ]);
    report.counts(kept.len(), total);

    for idx in kept {
        let row = conditions.row(idx);
        let key = row.key();
        match &key {
            Some(key) => report.heading(&key.to_string()),
            None => report.heading("unkeyed record"),
        }
        push_enzyme_identity(&mut report, key.as_ref().and_then(|k| enzymes.first_for(k)));
        push_equation(&mut report, key.as_ref().and_then(|k| core.first_for(k)));
        push_condition_fields(&mut report, Some(row));
    }

    Ok(report.finish())
}
