//! PDB structure lookup

use crate::config::QueryConfig;
use crate::data::{ReactionDatabase, TableId};
use crate::error::QueryError;
use crate::matching::contains_ci;
use crate::report::Report;

use super::{cap_hits, push_enzyme_identity, push_equation};

/// Filters for [`find_reactions_with_pdb_id`]. With no filter, every enzyme
/// that has any PDB structure recorded is returned.
#[derive(Debug, Default, Clone)]
pub struct PdbQuery {
    pub pdb_id: Option<String>,
    pub max_results: Option<usize>,
}

pub fn find_reactions_with_pdb_id(
    db: &ReactionDatabase,
    config: &QueryConfig,
    query: &PdbQuery,
) -> Result<String, QueryError> {
    let enzymes = db.table(TableId::Enzymes)?;
    let core = db.table(TableId::ReactionsCore)?;
    let limit = config.effective_limit(query.max_results);

    let hits: Vec<usize> = enzymes
        .rows()
        .filter(|row| row.get("pdb_id").is_some())
        .filter(|row| {
            query
                .pdb_id
                .as_deref()
                .map_or(true, |q| contains_ci(row.get("pdb_id"), q))
        })
        .map(|row| row.index())
        .collect();

    let (kept, total) = cap_hits(hits, limit);
    if total == 0 {
        return Err(QueryError::NoMatch(format!(
            "no reactions with a PDB structure matched pdb_id={}",
            query.pdb_id.as_deref().unwrap_or("all"),
        )));
    }

    let mut report = Report::new("PDB structure search");
    report.filters(&[("pdb_id", query.pdb_id.as_deref())]);
    report.counts(kept.len(), total);

    for idx in kept {
        let row = enzymes.row(idx);
        let key = row.key();
        match &key {
            Some(key) => report.heading(&key.to_string()),
            None => report.heading("unkeyed record"),
        }
        report.field("PDB id", row.get("pdb_id"));
        report.field("UniProt id", row.get("uniprot_id"));
        push_enzyme_identity(&mut report, Some(row));
        push_equation(&mut report, key.as_ref().and_then(|k| core.first_for(k)));
    }

    Ok(report.finish())
}
