//! Kinetic parameter lookup
//!
//! Rows are grouped for presentation by reaction and by enzyme variant, so
//! wild-type and mutant measurements of the same reaction never mix in one
//! block. Group order follows the sorted group key and is stable across runs.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;

use crate::config::QueryConfig;
use crate::data::{ReactionDatabase, ReactionKey, TableId};
use crate::error::QueryError;
use crate::matching::enzyme_matches;
use crate::report::Report;

use super::cap_hits;

/// Filters for [`find_kinetic_parameters`]. Absent fields match everything.
#[derive(Debug, Default, Clone)]
pub struct KineticsQuery {
    pub literature_id: Option<String>,
    pub reaction_id: Option<String>,
    /// Exact parameter name, case-insensitive (`kcat`, `Km`, `kcat/Km`, ...).
    pub parameter_type: Option<String>,
    pub enzyme_name: Option<String>,
    pub max_results: Option<usize>,
}

pub fn find_kinetic_parameters(
    db: &ReactionDatabase,
    config: &QueryConfig,
    query: &KineticsQuery,
) -> Result<String, QueryError> {
    let kinetics = db.table(TableId::KineticParameters)?;
    let limit = config.effective_limit(query.max_results);

    // An enzyme filter is resolved to a reaction-key set first; kinetics rows
    // carry no enzyme name of their own.
    let enzyme_keys: Option<FxHashSet<ReactionKey>> = match query.enzyme_name.as_deref() {
        Some(q) => {
            let enzymes = db.table(TableId::Enzymes)?;
            let keys: FxHashSet<ReactionKey> = enzymes
                .rows()
                .filter(|row| {
                    enzyme_matches(row.get("enzyme_name"), row.get("enzyme_synonyms"), q)
                })
                .filter_map(|row| row.key())
                .collect();
            if keys.is_empty() {
                return Err(QueryError::NoMatch(format!("no enzyme matched '{}'", q)));
            }
            Some(keys)
        }
        None => None,
    };

    let hits: Vec<usize> = kinetics
        .rows()
        .filter(|row| {
            query
                .literature_id
                .as_deref()
                .map_or(true, |q| row.get("literature_id") == Some(q.trim()))
                && query
                    .reaction_id
                    .as_deref()
                    .map_or(true, |q| row.get("reaction_id") == Some(q.trim()))
                && query.parameter_type.as_deref().map_or(true, |q| {
                    row.get("parameter_type")
                        .map_or(false, |p| p.eq_ignore_ascii_case(q.trim()))
                })
                && enzyme_keys.as_ref().map_or(true, |keys| {
                    row.key().map_or(false, |key| keys.contains(&key))
                })
        })
        .map(|row| row.index())
        .collect();

    let (kept, total) = cap_hits(hits, limit);
    if total == 0 {
        return Err(QueryError::NoMatch(format!(
            "no kinetic parameters matched literature={}, reaction={}, parameter={}, enzyme={}",
            query.literature_id.as_deref().unwrap_or("all"),
            query.reaction_id.as_deref().unwrap_or("all"),
            query.parameter_type.as_deref().unwrap_or("all"),
            query.enzyme_name.as_deref().unwrap_or("all"),
        )));
    }

    // Group key: reaction plus variant. BTreeMap iteration gives one fixed
    // presentation order for the same inputs.
    let mut groups: BTreeMap<(String, String, String, String), Vec<usize>> = BTreeMap::new();
    for idx in &kept {
        let row = kinetics.row(*idx);
        groups
            .entry((
                row.get("literature_id").unwrap_or("").to_string(),
                row.get("reaction_id").unwrap_or("").to_string(),
                row.get("source_type").unwrap_or("").to_string(),
                row.get("mutation_description").unwrap_or("").to_string(),
            ))
            .or_default()
            .push(*idx);
    }

    let mut report = Report::new("Kinetic parameters");
    report.filters(&[
        ("literature", query.literature_id.as_deref()),
        ("reaction", query.reaction_id.as_deref()),
        ("parameter", query.parameter_type.as_deref()),
        ("enzyme", query.enzyme_name.as_deref()),
    ]);
    report.counts(kept.len(), total);

    for ((lit, rid, source, mutation), rows) in &groups {
        let variant = if source.eq_ignore_ascii_case("mutant") {
            if mutation.is_empty() {
                "mutant".to_string()
            } else {
                format!("mutant {}", mutation)
            }
        } else {
            "wild type".to_string()
        };
        if lit.is_empty() && rid.is_empty() {
            report.heading(&format!("unkeyed record ({})", variant));
        } else {
            report.heading(&format!("{}:{} ({})", lit, rid, variant));
        }

        for (i, idx) in rows.iter().enumerate() {
            if i > 0 {
                report.blank();
            }
            let row = kinetics.row(*idx);
            report.field("Parameter", row.get("parameter_type"));
            report.field("Substrate", row.get("substrate_name"));
            report.measurement(
                "Value",
                row.get("value"),
                row.get("unit"),
                row.get("error_margin"),
            );
            report.field("Details", row.get("details"));
        }
    }

    Ok(report.finish())
}
