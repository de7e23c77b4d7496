//! Participant (substrate/product) lookup
//!
//! Walks the one-to-many participants table and reports only rows whose
//! reaction also has enzyme, core and condition records, so every block can
//! state the full experimental context.

use crate::config::QueryConfig;
use crate::data::{ReactionDatabase, TableId};
use crate::error::QueryError;
use crate::matching::contains_ci;
use crate::report::Report;

use super::{cap_hits, push_condition_fields, push_enzyme_identity, push_equation};

/// Filters for [`find_enzymes_by_participant`]. Absent fields match everything.
#[derive(Debug, Default, Clone)]
pub struct ParticipantQuery {
    pub participant_name: Option<String>,
    pub max_results: Option<usize>,
}

pub fn find_enzymes_by_participant(
    db: &ReactionDatabase,
    config: &QueryConfig,
    query: &ParticipantQuery,
) -> Result<String, QueryError> {
    let participants = db.table(TableId::ReactionParticipants)?;
    let enzymes = db.table(TableId::Enzymes)?;
    let core = db.table(TableId::ReactionsCore)?;
    let conditions = db.table(TableId::ExperimentalConditions)?;
    let limit = config.effective_limit(query.max_results);

    let hits: Vec<usize> = participants
        .rows()
        .filter(|row| {
            query
                .participant_name
                .as_deref()
                .map_or(true, |q| contains_ci(row.get("participant_name"), q))
        })
        .filter(|row| match row.key() {
            Some(key) => {
                enzymes.first_for(&key).is_some()
                    && core.first_for(&key).is_some()
                    && conditions.first_for(&key).is_some()
            }
            None => false,
        })
        .map(|row| row.index())
        .collect();

    let (kept, total) = cap_hits(hits, limit);
    if total == 0 {
        return Err(QueryError::NoMatch(format!(
            "no reaction participants matched participant={}",
            query.participant_name.as_deref().unwrap_or("all"),
        )));
    }

    let mut report = Report::new("Participant search");
    report.filters(&[("participant", query.participant_name.as_deref())]);
    report.counts(kept.len(), total);

    for idx in kept {
        let row = participants.row(idx);
        let Some(key) = row.key() else { continue };
        report.heading(&key.to_string());
        report.field("Participant", row.get("participant_name"));
        report.field("Role", row.get("role"));
        report.field("SMILES", row.get("smiles"));
        push_enzyme_identity(&mut report, enzymes.first_for(&key));
        push_equation(&mut report, core.first_for(&key));
        push_condition_fields(&mut report, conditions.first_for(&key));
    }

    Ok(report.finish())
}
