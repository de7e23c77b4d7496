//! Enzyme-centred lookups
//!
//! Both operations here resolve enzyme identity through the shared
//! synonym-aware matcher, so a query written against any alternate name finds
//! the canonical record.

use crate::config::QueryConfig;
use crate::data::{ReactionDatabase, TableId};
use crate::error::QueryError;
use crate::matching::{contains_ci, enzyme_matches};
use crate::report::Report;

use super::{cap_hits, push_condition_fields, push_enzyme_identity, push_equation};

/// Filters for [`find_reactions_by_enzyme`]. Absent fields match everything.
#[derive(Debug, Default, Clone)]
pub struct EnzymeQuery {
    pub enzyme_name: Option<String>,
    pub organism: Option<String>,
    pub max_results: Option<usize>,
}

/// Reactions catalysed by a matching enzyme, joined to their core records.
pub fn find_reactions_by_enzyme(
    db: &ReactionDatabase,
    config: &QueryConfig,
    query: &EnzymeQuery,
) -> Result<String, QueryError> {
    let enzymes = db.table(TableId::Enzymes)?;
    let core = db.table(TableId::ReactionsCore)?;
    let limit = config.effective_limit(query.max_results);

    let hits: Vec<usize> = enzymes
        .rows()
        .filter(|row| {
            query.enzyme_name.as_deref().map_or(true, |q| {
                enzyme_matches(row.get("enzyme_name"), row.get("enzyme_synonyms"), q)
            }) && query
                .organism
                .as_deref()
                .map_or(true, |q| contains_ci(row.get("organism"), q))
        })
        .map(|row| row.index())
        .collect();

    let (kept, total) = cap_hits(hits, limit);
    if total == 0 {
        return Err(QueryError::NoMatch(format!(
            "no reactions matched enzyme={}, organism={}",
            query.enzyme_name.as_deref().unwrap_or("all"),
            query.organism.as_deref().unwrap_or("all"),
        )));
    }

    let mut report = Report::new("Enzyme reaction search");
    report.filters(&[
        ("enzyme", query.enzyme_name.as_deref()),
        ("organism", query.organism.as_deref()),
    ]);
    report.counts(kept.len(), total);

    for idx in kept {
        let row = enzymes.row(idx);
        let key = row.key();
        match &key {
            Some(key) => report.heading(&key.to_string()),
            None => report.heading("unkeyed record"),
        }
        push_enzyme_identity(&mut report, Some(row));
        push_equation(&mut report, key.as_ref().and_then(|k| core.first_for(k)));
    }

    Ok(report.finish())
}

/// Filters for [`find_conditions_by_enzyme`].
#[derive(Debug, Default, Clone)]
pub struct ConditionsByEnzymeQuery {
    pub enzyme_name: Option<String>,
    pub max_results: Option<usize>,
}

/// Experimental conditions recorded for reactions of a matching enzyme.
/// Enzyme rows without a conditions record are not reported.
pub fn find_conditions_by_enzyme(
    db: &ReactionDatabase,
    config: &QueryConfig,
    query: &ConditionsByEnzymeQuery,
) -> Result<String, QueryError> {
    let enzymes = db.table(TableId::Enzymes)?;
    let conditions = db.table(TableId::ExperimentalConditions)?;
    let limit = config.effective_limit(query.max_results);

    let hits: Vec<usize> = enzymes
        .rows()
        .filter(|row| {
            query.enzyme_name.as_deref().map_or(true, |q| {
                enzyme_matches(row.get("enzyme_name"), row.get("enzyme_synonyms"), q)
            })
        })
        .filter(|row| {
            row.key()
                .map_or(false, |key| conditions.first_for(&key).is_some())
        })
        .map(|row| row.index())
        .collect();

    let (kept, total) = cap_hits(hits, limit);
    if total == 0 {
        return Err(QueryError::NoMatch(format!(
            "no experimental conditions matched enzyme={}",
            query.enzyme_name.as_deref().unwrap_or("all"),
        )));
    }

    let mut report = Report::new("Experimental conditions by enzyme");
    report.filters(&[("enzyme", query.enzyme_name.as_deref())]);
    report.counts(kept.len(), total);

    for idx in kept {
        let row = enzymes.row(idx);
        let key = row.key();
        match &key {
            Some(key) => report.heading(&key.to_string()),
            None => report.heading("unkeyed record"),
        }
        report.field("Enzyme", row.get("enzyme_name"));
        report.field("Organism", row.get("organism"));
        push_condition_fields(
            &mut report,
            key.as_ref().and_then(|k| conditions.first_for(k)),
        );
    }

    Ok(report.finish())
}
