//! Categorical frequency patterns
//!
//! Counts one categorical column across the dataset and reports the values
//! that recur. Ties are broken by first appearance in the table, so the
//! ordering never depends on hash-map iteration.

use rustc_hash::FxHashMap;

use crate::config::QueryConfig;
use crate::data::{ReactionDatabase, TableId};
use crate::error::QueryError;
use crate::report::Report;

/// Parameters for [`analyze_reaction_patterns`].
#[derive(Debug, Default, Clone)]
pub struct PatternQuery {
    /// `enzyme_frequency`, `organism_frequency` or `reaction_type_frequency`.
    pub pattern_type: String,
    /// Count threshold; values seen fewer times are not reported.
    pub min_occurrences: Option<usize>,
}

pub fn analyze_reaction_patterns(
    db: &ReactionDatabase,
    config: &QueryConfig,
    query: &PatternQuery,
) -> Result<String, QueryError> {
    let (table_id, column) = match query.pattern_type.trim() {
        "enzyme_frequency" => (TableId::Enzymes, "enzyme_name"),
        "organism_frequency" => (TableId::Enzymes, "organism"),
        "reaction_type_frequency" => (TableId::ReactionsCore, "reaction_type_reversible"),
        _ => return Err(QueryError::UnsupportedPattern(query.pattern_type.clone())),
    };

    let table = db.table(table_id)?;
    let threshold = config.effective_min_occurrences(query.min_occurrences);

    let mut counts: FxHashMap<&str, (usize, usize)> = FxHashMap::default();
    for row in table.rows() {
        if let Some(value) = row.get(column) {
            let first_seen = row.index();
            counts
                .entry(value)
                .and_modify(|(n, _)| *n += 1)
                .or_insert((1, first_seen));
        }
    }

    let distinct = counts.len();
    let mut qualified: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .filter(|(_, (n, _))| *n >= threshold)
        .map(|(value, (n, first_seen))| (value, n, first_seen))
        .collect();
    qualified.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    if qualified.is_empty() {
        return Err(QueryError::NoMatch(format!(
            "no {} value occurs at least {} times",
            column, threshold
        )));
    }

    let mut report = Report::new("Reaction patterns");
    report.filters(&[
        ("pattern", Some(query.pattern_type.trim())),
        ("min_occurrences", Some(&threshold.to_string())),
    ]);
    report.counts(qualified.len(), distinct);
    report.blank();

    for (value, count, _) in qualified {
        report.field(value, Some(&count.to_string()));
    }

    Ok(report.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::test_fixtures::sample_store;

    #[test]
    fn recurring_organism_is_the_only_qualifier_at_default_threshold() {
        let db = sample_store();
        let report = analyze_reaction_patterns(
            &db,
            &QueryConfig::default(),
            &PatternQuery {
                pattern_type: "organism_frequency".to_string(),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(report.contains("- **Escherichia coli**: 2"));
        // Five distinct organisms, one above the threshold.
        assert!(report.contains("**Records shown**: 1 (of 5 matched)"));
        assert!(!report.contains("Pyrococcus"));
    }

    #[test]
    fn reaction_type_counts_cover_the_core_table() {
        let db = sample_store();
        let report = analyze_reaction_patterns(
            &db,
            &QueryConfig::default(),
            &PatternQuery {
                pattern_type: "reaction_type_frequency".to_string(),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(report.contains("- **No**: 5"));
        assert!(!report.contains("- **Yes**: 1"));
    }

    #[test]
    fn count_ties_order_by_first_appearance() {
        let db = sample_store();
        let report = analyze_reaction_patterns(
            &db,
            &QueryConfig::default(),
            &PatternQuery {
                pattern_type: "enzyme_frequency".to_string(),
                min_occurrences: Some(1),
            },
        )
        .unwrap();

        let first = report.find("Ornithine transcarbamoylase").unwrap();
        let second = report.find("Adenylate kinase").unwrap();
        let last = report.find("Glycine N-methyltransferase").unwrap();
        assert!(first < second);
        assert!(second < last);
        assert!(report.contains("**Records shown**: 6 (of 6 matched)"));
    }

    #[test]
    fn nothing_above_threshold_is_a_no_match() {
        let db = sample_store();
        let err = analyze_reaction_patterns(
            &db,
            &QueryConfig::default(),
            &PatternQuery {
                pattern_type: "enzyme_frequency".to_string(),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "no enzyme_name value occurs at least 2 times"
        );
    }

    #[test]
    fn unknown_pattern_type_lists_the_supported_set() {
        let db = sample_store();
        let err = analyze_reaction_patterns(
            &db,
            &QueryConfig::default(),
            &PatternQuery {
                pattern_type: "solvent_frequency".to_string(),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("unsupported pattern type 'solvent_frequency'"));
        assert!(err.to_string().contains("enzyme_frequency"));
    }

    #[test]
    fn identical_inputs_render_identically() {
        let db = sample_store();
        let run = || {
            analyze_reaction_patterns(
                &db,
                &QueryConfig::default(),
                &PatternQuery {
                    pattern_type: "enzyme_frequency".to_string(),
                    min_occurrences: Some(1),
                },
            )
            .unwrap()
        };
        assert_eq!(run(), run());
    }
}
