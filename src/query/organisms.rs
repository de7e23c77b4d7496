//! Organism and EC-number lookup

use crate::config::QueryConfig;
use crate::data::{ReactionDatabase, TableId};
use crate::error::QueryError;
use crate::matching::contains_ci;
use crate::report::Report;

use super::{cap_hits, push_condition_fields, push_enzyme_identity, push_equation};

/// Filters for [`find_reactions_by_organism`]. Absent fields match everything.
#[derive(Debug, Default, Clone)]
pub struct OrganismQuery {
    pub organism: Option<String>,
    pub ec_number: Option<String>,
    pub max_results: Option<usize>,
}

/// Reactions whose enzyme comes from a matching organism and/or EC number,
/// joined to core records and experimental conditions.
pub fn find_reactions_by_organism(
    db: &ReactionDatabase,
    config: &QueryConfig,
    query: &OrganismQuery,
) -> Result<String, QueryError> {
    let enzymes = db.table(TableId::Enzymes)?;
    let core = db.table(TableId::ReactionsCore)?;
    let conditions = db.table(TableId::ExperimentalConditions)?;
    let limit = config.effective_limit(query.max_results);

    let hits: Vec<usize> = enzymes
        .rows()
        .filter(|row| {
            query
                .organism
                .as_deref()
                .map_or(true, |q| contains_ci(row.get("organism"), q))
                && query
                    .ec_number
                    .as_deref()
                    .map_or(true, |q| contains_ci(row.get("ec_number"), q))
        })
        .map(|row| row.index())
        .collect();

    let (kept, total) = cap_hits(hits, limit);
    if total == 0 {
        return Err(QueryError::NoMatch(format!(
            "no reactions matched organism={}, ec_number={}",
            query.organism.as_deref().unwrap_or("all"),
            query.ec_number.as_deref().unwrap_or("all"),
        )));
    }

    let mut report = Report::new("Organism reaction search");
    report.filters(&[
        ("organism", query.organism.as_deref()),
        ("ec_number", query.ec_number.as_deref()),
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
        push_condition_fields(
            &mut report,
            key.as_ref().and_then(|k| conditions.first_for(k)),
        );
    }

    Ok(report.finish())
}
