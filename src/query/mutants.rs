//! Characterized mutant performance
//!
//! Mutant records join back to the enzymes table for identity, so the enzyme
//! filter works on canonical names and synonyms even though the mutant table
//! itself only stores the mutation.

use crate::data::{ReactionDatabase, TableId};
use crate::error::QueryError;
use crate::matching::{contains_ci, enzyme_matches};
use crate::report::Report;

/// Filters for [`find_mutant_performance`]. Absent fields match everything.
#[derive(Debug, Default, Clone)]
pub struct MutantQuery {
    pub enzyme_name: Option<String>,
    pub literature_id: Option<String>,
    pub reaction_id: Option<String>,
    pub mutation_description: Option<String>,
}

pub fn find_mutant_performance(
    db: &ReactionDatabase,
    query: &MutantQuery,
) -> Result<String, QueryError> {
    let mutants = db.table(TableId::MutantsCharacterized)?;
    let enzymes = match query.enzyme_name {
        Some(_) => Some(db.table(TableId::Enzymes)?),
        None => db.table(TableId::Enzymes).ok(),
    };

    let hits: Vec<usize> = mutants
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
                && query
                    .mutation_description
                    .as_deref()
                    .map_or(true, |q| contains_ci(row.get("mutation_description"), q))
                && query.enzyme_name.as_deref().map_or(true, |q| {
                    let enzyme = enzymes
                        .zip(row.key())
                        .and_then(|(table, key)| table.first_for(&key));
                    enzyme.map_or(false, |e| {
                        enzyme_matches(e.get("enzyme_name"), e.get("enzyme_synonyms"), q)
                    })
                })
        })
        .map(|row| row.index())
        .collect();

    if hits.is_empty() {
        return Err(QueryError::NoMatch(format!(
            "no mutant records matched enzyme={}, literature={}, reaction={}, mutation={}",
            query.enzyme_name.as_deref().unwrap_or("all"),
            query.literature_id.as_deref().unwrap_or("all"),
            query.reaction_id.as_deref().unwrap_or("all"),
            query.mutation_description.as_deref().unwrap_or("all"),
        )));
    }

    let mut report = Report::new("Mutant performance");
    report.filters(&[
        ("enzyme", query.enzyme_name.as_deref()),
        ("literature", query.literature_id.as_deref()),
        ("reaction", query.reaction_id.as_deref()),
        ("mutation", query.mutation_description.as_deref()),
    ]);
    report.counts(hits.len(), hits.len());

    for idx in hits {
        let row = mutants.row(idx);
        let key = row.key();
        let mutation = row.get("mutation_description").unwrap_or("unspecified mutation");
        match &key {
            Some(key) => report.heading(&format!("{} ({})", key, mutation)),
            None => report.heading(&format!("unkeyed record ({})", mutation)),
        }

        let enzyme = enzymes
            .zip(key.as_ref())
            .and_then(|(table, key)| table.first_for(key));
        report.field("Enzyme", enzyme.and_then(|e| e.get("enzyme_name")));
        report.field("Organism", enzyme.and_then(|e| e.get("organism")));
        report.field("Mutation", row.get("mutation_description"));
        report.field("Activity", row.get("activity_qualitative"));
        report.field("Conversion rate", row.get("conversion_rate"));
        report.measurement(
            "Product yield",
            row.get("product_yield"),
            row.get("product_yield_unit"),
            None,
        );
        report.field("Regioselectivity", row.get("selectivity_regio"));
        report.field("Stereoselectivity", row.get("selectivity_stereo"));
        report.field("Enantiomeric excess", row.get("enantiomeric_excess"));
    }

    Ok(report.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::test_fixtures::{sample_store, store_without};

    #[test]
    fn enzyme_filter_resolves_through_the_join() {
        let db = sample_store();
        let report = find_mutant_performance(
            &db,
            &MutantQuery {
                enzyme_name: Some("lipase".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(report.contains("## PMID29885412:reaction_1 (W104F)"));
        assert!(report.contains("- **Activity**: enhanced thermostability"));
        assert!(report.contains("- **Product yield**: 85 %"));
        assert!(report.contains("- **Regioselectivity**: 1,3-specific"));
        assert!(!report.contains("R57G"));
    }

    #[test]
    fn mutation_filter_is_a_case_insensitive_substring() {
        let db = sample_store();
        let report = find_mutant_performance(
            &db,
            &MutantQuery {
                mutation_description: Some("r57".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(report.contains("## PMID32044030:reaction_1 (R57G)"));
        assert!(report.contains("- **Conversion rate**: 32"));
        assert!(report.contains("- **Organism**: Escherichia coli"));
    }

    #[test]
    fn unfiltered_call_lists_every_mutant() {
        let db = sample_store();
        let report = find_mutant_performance(&db, &MutantQuery::default()).unwrap();
        assert!(report.contains("**Records shown**: 2 (of 2 matched)"));
        assert!(report.contains("R57G"));
        assert!(report.contains("W104F"));
    }

    #[test]
    fn display_join_degrades_without_the_enzymes_table() {
        let db = store_without(TableId::Enzymes);
        let report = find_mutant_performance(&db, &MutantQuery::default()).unwrap();
        assert!(report.contains("- **Enzyme**: not available"));
        assert!(report.contains("R57G"));
    }

    #[test]
    fn enzyme_filter_requires_the_enzymes_table() {
        let db = store_without(TableId::Enzymes);
        let err = find_mutant_performance(
            &db,
            &MutantQuery {
                enzyme_name: Some("lipase".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "required table 'enzymes' is not loaded");
    }

    #[test]
    fn unknown_mutation_is_a_no_match() {
        let db = sample_store();
        let err = find_mutant_performance(
            &db,
            &MutantQuery {
                mutation_description: Some("A999Z".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, QueryError::NoMatch(_)));
        assert!(err.to_string().contains("A999Z"));
    }
}
