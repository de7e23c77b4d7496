//! Single-reaction dossier
//!
//! Pulls everything recorded about one reaction into one report. The core
//! record is required; every other section renders only when its table holds
//! a row for the key, so a sparse reaction gives a short dossier rather than
//! a page of placeholders.

use crate::data::{ReactionDatabase, ReactionKey, TableId};
use crate::error::QueryError;
use crate::report::Report;

use super::push_condition_fields;

/// Parameters for [`get_reaction_summary`].
#[derive(Debug, Default, Clone)]
pub struct SummaryQuery {
    /// Required: `literature_id:reaction_id`.
    pub reaction_ref: String,
}

pub fn get_reaction_summary(
    db: &ReactionDatabase,
    query: &SummaryQuery,
) -> Result<String, QueryError> {
    let core = db.table(TableId::ReactionsCore)?;
    let key = ReactionKey::parse(&query.reaction_ref)?;

    let core_row = core
        .first_for(&key)
        .ok_or_else(|| QueryError::NoMatch(format!("reaction {} not found", key)))?;

    let mut report = Report::new(&format!("Reaction summary: {}", key));

    report.heading("Reaction");
    report.field("Equation", core_row.get("reaction_equation"));
    report.field("Reversible", core_row.get("reaction_type_reversible"));
    report.field("Title", core_row.get("title"));
    report.field("Notes", core_row.get("notes"));

    let enzyme = db
        .table(TableId::Enzymes)
        .ok()
        .and_then(|t| t.first_for(&key));
    if let Some(row) = enzyme {
        report.heading("Enzyme");
        report.field("Enzyme", row.get("enzyme_name"));
        report.field("Synonyms", row.get("enzyme_synonyms"));
        report.field("Gene", row.get("gene_name"));
        report.field("Organism", row.get("organism"));
        report.field("EC number", row.get("ec_number"));
        report.field("PDB id", row.get("pdb_id"));
        report.field("UniProt id", row.get("uniprot_id"));
        report.field("Localization", row.get("localization"));
        report.field("Optimum temperature (°C)", row.get("optimum_temperature"));
        report.field("Optimum pH", row.get("optimum_ph"));
    }

    let activity = db
        .table(TableId::ActivityPerformance)
        .ok()
        .and_then(|t| t.first_for(&key));
    if let Some(row) = activity {
        report.heading("Performance");
        report.measurement(
            "Conversion rate",
            row.get("conversion_rate"),
            row.get("conversion_rate_unit"),
            row.get("conversion_rate_error"),
        );
        report.measurement(
            "Product yield",
            row.get("product_yield"),
            row.get("product_yield_unit"),
            row.get("product_yield_error"),
        );
        report.field("Regioselectivity", row.get("regioselectivity"));
        report.field("Stereoselectivity", row.get("stereoselectivity"));
        report.measurement(
            "Enantiomeric excess",
            row.get("enantiomeric_excess"),
            row.get("enantiomeric_excess_unit"),
            row.get("enantiomeric_excess_error"),
        );
    }

    let conditions = db
        .table(TableId::ExperimentalConditions)
        .ok()
        .and_then(|t| t.first_for(&key));
    if let Some(row) = conditions {
        report.heading("Experimental conditions");
        push_condition_fields(&mut report, Some(row));
    }

    if let Ok(participants) = db.table(TableId::ReactionParticipants) {
        let rows = participants.rows_for(&key);
        if !rows.is_empty() {
            report.heading("Participants");
            for &idx in rows {
                let row = participants.row(idx);
                let name = row.get("participant_name").unwrap_or("unnamed");
                let role = row.get("role").unwrap_or("unspecified role");
                match row.get("smiles") {
                    Some(smiles) => {
                        report.line(&format!("- {} ({}), SMILES: {}", name, role, smiles))
                    }
                    None => report.line(&format!("- {} ({})", name, role)),
                }
            }
        }
    }

    if let Ok(aux) = db.table(TableId::AuxiliaryFactors) {
        let rows = aux.rows_for(&key);
        if !rows.is_empty() {
            report.heading("Auxiliary factors");
            for &idx in rows {
                if let Some(name) = aux.row(idx).get("factor_name") {
                    report.line(&format!("- {}", name));
                }
            }
        }
    }

    Ok(report.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::test_fixtures::{sample_store, store_without};

    #[test]
    fn full_dossier_renders_every_populated_section() {
        let db = sample_store();
        let report = get_reaction_summary(
            &db,
            &SummaryQuery {
                reaction_ref: "PMID32044030:reaction_1".to_string(),
            },
        )
        .unwrap();

        assert!(report.contains("# Reaction summary: PMID32044030:reaction_1"));
        assert!(report.contains("- **Equation**: carbamoyl phosphate + L-ornithine"));
        assert!(report.contains("- **Enzyme**: Ornithine transcarbamoylase"));
        assert!(report.contains("- **Synonyms**: OTC|Ornithine carbamoyltransferase"));
        assert!(report.contains("- **Optimum pH**: 8.5"));
        assert!(report.contains("- **Conversion rate**: 85 % (error: ±3)"));
        assert!(report.contains("- **Temperature (°C)**: 37"));
        assert!(report.contains("- carbamoyl phosphate (substrate), SMILES: C(=O)(N)OP(=O)(O)O"));
        // No auxiliary factor is recorded for this reaction.
        assert!(!report.contains("Auxiliary factors"));
    }

    #[test]
    fn auxiliary_factors_appear_for_their_reaction() {
        let db = sample_store();
        let report = get_reaction_summary(
            &db,
            &SummaryQuery {
                reaction_ref: "PMID32044030:reaction_2".to_string(),
            },
        )
        .unwrap();
        assert!(report.contains("## Auxiliary factors"));
        assert!(report.contains("- Mg2+"));
    }

    #[test]
    fn sparse_reactions_omit_empty_sections() {
        let db = sample_store();
        let report = get_reaction_summary(
            &db,
            &SummaryQuery {
                reaction_ref: "PMID31002277:reaction_2".to_string(),
            },
        )
        .unwrap();

        // No activity row and no participants are recorded for this key.
        assert!(!report.contains("## Performance"));
        assert!(!report.contains("## Participants"));
        assert!(report.contains("- **Enzyme**: Glycine N-methyltransferase"));
    }

    #[test]
    fn missing_secondary_table_degrades_to_a_shorter_dossier() {
        let db = store_without(crate::data::TableId::Enzymes);
        let report = get_reaction_summary(
            &db,
            &SummaryQuery {
                reaction_ref: "PMID32044030:reaction_1".to_string(),
            },
        )
        .unwrap();
        assert!(!report.contains("## Enzyme"));
        assert!(report.contains("- **Equation**"));
    }

    #[test]
    fn unknown_reaction_is_a_no_match() {
        let db = sample_store();
        let err = get_reaction_summary(
            &db,
            &SummaryQuery {
                reaction_ref: "PMID9:reaction_9".to_string(),
            },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "reaction PMID9:reaction_9 not found");
    }

    #[test]
    fn malformed_reference_is_rejected_before_lookup() {
        let db = sample_store();
        let err = get_reaction_summary(
            &db,
            &SummaryQuery {
                reaction_ref: "just-an-id".to_string(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, QueryError::InvalidReactionRef(_)));
    }
}
