//! Inhibitor effects and quantitative inhibition parameters
//!
//! The qualitative record (inhibitors_main) is the anchor; quantitative
//! parameters join onto it by reaction key plus inhibitor name, and one
//! qualitative row expands into one block per parameter row. Unfiltered
//! calls are rejected: dumping the whole inhibitor table is never the intent
//! behind an inhibition question.

use crate::data::{ReactionDatabase, TableId};
use crate::error::QueryError;
use crate::matching::{contains_ci, enzyme_matches};
use crate::report::Report;

/// Filters for [`find_inhibition_data`]. At least one must be present.
#[derive(Debug, Default, Clone)]
pub struct InhibitionQuery {
    pub inhibitor_name: Option<String>,
    pub enzyme_name: Option<String>,
}

pub fn find_inhibition_data(
    db: &ReactionDatabase,
    query: &InhibitionQuery,
) -> Result<String, QueryError> {
    if query.inhibitor_name.is_none() && query.enzyme_name.is_none() {
        return Err(QueryError::MissingFilter(
            "provide an inhibitor name or an enzyme name",
        ));
    }

    let main = db.table(TableId::InhibitorsMain)?;
    let enzymes = match query.enzyme_name {
        Some(_) => Some(db.table(TableId::Enzymes)?),
        None => db.table(TableId::Enzymes).ok(),
    };
    let params = db.table(TableId::InhibitionParams).ok();

    let hits: Vec<usize> = main
        .rows()
        .filter(|row| {
            query
                .inhibitor_name
                .as_deref()
                .map_or(true, |q| contains_ci(row.get("inhibitor_name"), q))
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
            "no inhibition records matched inhibitor={}, enzyme={}",
            query.inhibitor_name.as_deref().unwrap_or("all"),
            query.enzyme_name.as_deref().unwrap_or("all"),
        )));
    }

    // One block per (qualitative row, parameter row) pair; a qualitative row
    // without parameters still gets one block.
    let mut blocks: Vec<(usize, Option<usize>)> = Vec::new();
    for idx in &hits {
        let row = main.row(*idx);
        let matched_params: Vec<usize> = match (params, row.key()) {
            (Some(table), Some(key)) => table
                .rows_for(&key)
                .iter()
                .copied()
                .filter(|&pidx| {
                    table.row(pidx).get("inhibitor_name") == row.get("inhibitor_name")
                })
                .collect(),
            _ => Vec::new(),
        };
        if matched_params.is_empty() {
            blocks.push((*idx, None));
        } else {
            blocks.extend(matched_params.into_iter().map(|pidx| (*idx, Some(pidx))));
        }
    }

    let mut report = Report::new("Inhibition data");
    report.filters(&[
        ("inhibitor", query.inhibitor_name.as_deref()),
        ("enzyme", query.enzyme_name.as_deref()),
    ]);
    report.counts(blocks.len(), blocks.len());

    for (idx, pidx) in blocks {
        let row = main.row(idx);
        let key = row.key();
        let inhibitor = row.get("inhibitor_name").unwrap_or("unnamed inhibitor");
        match &key {
            Some(key) => report.heading(&format!("{} ({})", key, inhibitor)),
            None => report.heading(&format!("unkeyed record ({})", inhibitor)),
        }

        let enzyme = enzymes
            .zip(key.as_ref())
            .and_then(|(table, key)| table.first_for(key));
        report.field("Enzyme", enzyme.and_then(|e| e.get("enzyme_name")));
        report.field("Inhibition type", row.get("inhibition_type"));
        report.field("Activity effect", row.get("activity_qualitative"));
        report.field("Inhibition extent", row.get("inhibition_qualitative"));
        report.field("Notes", row.get("notes"));

        match pidx.zip(params) {
            Some((pidx, table)) => {
                let param = table.row(pidx);
                report.field("Quantitative parameter", param.get("parameter_type"));
                report.measurement(
                    "Value",
                    param.get("value"),
                    param.get("unit"),
                    param.get("error_margin"),
                );
                report.field("Thermodynamics", param.get("thermodynamics"));
                report.field("Parameter details", param.get("details"));
            }
            None => report.field("Quantitative parameter", None),
        }
    }

    Ok(report.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::test_fixtures::{sample_store, store_without};

    #[test]
    fn unfiltered_calls_are_rejected() {
        let db = sample_store();
        let err =
            find_inhibition_data(&db, &InhibitionQuery::default())
                .unwrap_err();
        assert_eq!(
            err.to_string(),
            "provide an inhibitor name or an enzyme name"
        );
    }

    #[test]
    fn inhibitor_lookup_joins_quantitative_parameters() {
        let db = sample_store();
        let report = find_inhibition_data(
            &db,
            &InhibitionQuery {
                inhibitor_name: Some("palo".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(report.contains("## PMID32044030:reaction_1 (PALO)"));
        assert!(report.contains("- **Inhibition type**: competitive"));
        assert!(report.contains("- **Quantitative parameter**: Ki"));
        assert!(report.contains("- **Value**: 2.5 uM (error: ±0.4)"));
        assert!(report.contains("- **Thermodynamics**: dG = -32 kJ/mol"));
    }

    #[test]
    fn enzyme_filter_keeps_only_that_enzymes_inhibitors() {
        let db = sample_store();
        let report = find_inhibition_data(
            &db,
            &InhibitionQuery {
                enzyme_name: Some("otc".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(report.contains("(PALO)"));
        assert!(report.contains("(norleucine)"));
        // The adenylate kinase inhibitor shares the literature but not the
        // reaction key.
        assert!(!report.contains("Ap5A"));
        // No parameter row exists for norleucine.
        assert!(report.contains("- **Quantitative parameter**: not available"));
    }

    #[test]
    fn parameters_match_on_inhibitor_name_not_just_key() {
        let db = sample_store();
        let report = find_inhibition_data(
            &db,
            &InhibitionQuery {
                enzyme_name: Some("adenylate kinase".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(report.contains("## PMID32044030:reaction_2 (Ap5A)"));
        assert!(report.contains("- **Value**: 0.2 uM"));
        assert!(report.contains("- **Parameter details**: tight binding"));
    }

    #[test]
    fn unmatched_filters_are_a_no_match() {
        let db = sample_store();
        let err = find_inhibition_data(
            &db,
            &InhibitionQuery {
                inhibitor_name: Some("EDTA".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, QueryError::NoMatch(_)));
        assert!(err.to_string().contains("EDTA"));
    }

    #[test]
    fn missing_main_table_is_reported() {
        let db = store_without(TableId::InhibitorsMain);
        let err = find_inhibition_data(
            &db,
            &InhibitionQuery {
                inhibitor_name: Some("PALO".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "required table 'inhibitors_main' is not loaded"
        );
    }

    #[test]
    fn params_table_is_optional_for_qualitative_answers() {
        let db = store_without(TableId::InhibitionParams);
        let report = find_inhibition_data(
            &db,
            &InhibitionQuery {
                inhibitor_name: Some("PALO".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(report.contains("- **Inhibition type**: competitive"));
        assert!(report.contains("- **Quantitative parameter**: not available"));
    }
}
