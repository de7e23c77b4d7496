//! Free-text search across the joined dataset
//!
//! Field selection comes from the caller when given, otherwise from keyword
//! heuristics over the query text. Per-field predicates are ORed: a row
//! matches when the query hits any selected field. Enzyme fields go through
//! the synonym-aware matcher; everything else is a case-insensitive
//! substring test with the raw query, except ec_number which searches with
//! the EC-shaped token extracted from the text when one is present.

use crate::config::QueryConfig;
use crate::data::{ReactionDatabase, RowRef, TableId};
use crate::error::QueryError;
use crate::matching::{contains_ci, enzyme_matches, find_ec_number};
use crate::report::Report;

use super::{cap_hits, push_enzyme_identity, push_equation};

/// Every field the search may touch, in presentation order.
pub const SEARCHABLE_FIELDS: [&str; 10] = [
    "reaction_equation",
    "reaction_type_reversible",
    "notes",
    "enzyme_name",
    "enzyme_synonyms",
    "gene_name",
    "organism",
    "ec_number",
    "participant_name",
    "role",
];

/// Words ending in "ase" that are not enzyme names.
const ASE_STOPLIST: [&str; 8] = [
    "please", "phrase", "increase", "decrease", "release", "database", "purchase", "disease",
];

/// First word that reads like an enzyme name: five letters or more, ends in
/// "ase", not on the stoplist.
pub(crate) fn find_ase_word(text: &str) -> Option<&str> {
    text.split(|c: char| !c.is_alphanumeric()).find(|word| {
        let lowered = word.to_lowercase();
        word.len() >= 5 && lowered.ends_with("ase") && !ASE_STOPLIST.contains(&lowered.as_str())
    })
}

/// Parameters for [`smart_search_reactions`].
#[derive(Debug, Default, Clone)]
pub struct SmartSearchQuery {
    pub search_query: String,
    /// Explicit field list; unknown names are dropped, and an empty remainder
    /// falls back to guessing.
    pub search_fields: Option<Vec<String>>,
    pub max_results: Option<usize>,
}

/// Guess which fields a free-text query is about.
///
/// Checks run in a fixed priority order and the first hit wins; a query
/// matching none of them searches every field.
pub fn guess_search_fields(query: &str) -> Vec<&'static str> {
    let lowered = query.to_lowercase();

    if query.contains("->") || query.contains('→') {
        return vec!["reaction_equation"];
    }
    if find_ec_number(query).is_some() {
        return vec!["ec_number"];
    }
    if find_ase_word(query).is_some() || lowered.contains("enzyme") || lowered.contains("protein") {
        return vec!["enzyme_name", "enzyme_synonyms"];
    }
    if lowered.contains("reversib") {
        return vec!["reaction_type_reversible"];
    }
    if lowered.contains("substrate") || lowered.contains("product") {
        return vec!["participant_name", "role"];
    }
    if lowered.contains("gene") {
        return vec!["gene_name"];
    }
    if lowered.contains("organism") || lowered.contains("species") || lowered.contains("strain") {
        return vec!["organism"];
    }
    if lowered.contains("note") {
        return vec!["notes"];
    }

    SEARCHABLE_FIELDS.to_vec()
}

pub fn smart_search_reactions(
    db: &ReactionDatabase,
    config: &QueryConfig,
    query: &SmartSearchQuery,
) -> Result<String, QueryError> {
    let core = db.table(TableId::ReactionsCore)?;
    let enzymes = db.table(TableId::Enzymes)?;
    let limit = config.effective_limit(query.max_results);

    let q = query.search_query.trim();
    if q.is_empty() {
        return Err(QueryError::BadInput("search query is empty".to_string()));
    }

    let mut fields: Vec<&'static str> = match &query.search_fields {
        Some(requested) => {
            let valid: Vec<&'static str> = requested
                .iter()
                .filter_map(|f| SEARCHABLE_FIELDS.iter().find(|s| **s == f.trim()).copied())
                .collect();
            if valid.is_empty() {
                guess_search_fields(q)
            } else {
                valid
            }
        }
        None => guess_search_fields(q),
    };

    // Participant fields expand the candidate set to one row per participant;
    // without the table those fields cannot be searched at all.
    let participants = db.table(TableId::ReactionParticipants).ok();
    if participants.is_none() {
        fields.retain(|f| *f != "participant_name" && *f != "role");
        if fields.is_empty() {
            return Err(QueryError::BadInput(
                "none of the requested search fields are available".to_string(),
            ));
        }
    }
    let join_participants = fields.iter().any(|f| *f == "participant_name" || *f == "role");

    let ec_needle = find_ec_number(q);

    let field_matches = |field: &str, enzyme: RowRef<'_>, core_row: RowRef<'_>, part: Option<RowRef<'_>>| match field {
        "enzyme_name" => enzyme_matches(enzyme.get("enzyme_name"), None, q),
        "enzyme_synonyms" => enzyme_matches(None, enzyme.get("enzyme_synonyms"), q),
        "ec_number" => contains_ci(enzyme.get("ec_number"), ec_needle.as_deref().unwrap_or(q)),
        "gene_name" | "organism" => contains_ci(enzyme.get(field), q),
        "reaction_equation" | "reaction_type_reversible" | "notes" => {
            contains_ci(core_row.get(field), q)
        }
        "participant_name" | "role" => contains_ci(part.and_then(|p| p.get(field)), q),
        _ => false,
    };

    // Candidates: core joined to enzymes, optionally fanned out over the
    // participant rows of each reaction.
    let mut hits: Vec<(usize, Option<usize>)> = Vec::new();
    for core_row in core.rows() {
        let Some(key) = core_row.key() else { continue };
        let Some(enzyme) = enzymes.first_for(&key) else { continue };

        let part_rows: Vec<Option<usize>> = match (join_participants, participants) {
            (true, Some(table)) => {
                let rows = table.rows_for(&key);
                if rows.is_empty() {
                    vec![None]
                } else {
                    rows.iter().map(|&idx| Some(idx)).collect()
                }
            }
            _ => vec![None],
        };

        for part_idx in part_rows {
            let part = part_idx.zip(participants).map(|(idx, table)| table.row(idx));
            if fields
                .iter()
                .any(|field| field_matches(field, enzyme, core_row, part))
            {
                hits.push((core_row.index(), part_idx));
            }
        }
    }

    let (kept, total) = cap_hits(hits, limit);
    if total == 0 {
        return Err(QueryError::NoMatch(format!(
            "no records matched '{}' in fields [{}]",
            q,
            fields.join(", ")
        )));
    }

    let mut report = Report::new("Smart search");
    report.filters(&[("query", Some(q)), ("fields", Some(&fields.join(", ")))]);
    report.counts(kept.len(), total);

    for (core_idx, part_idx) in kept {
        let core_row = core.row(core_idx);
        let key = core_row.key();
        match &key {
            Some(key) => report.heading(&key.to_string()),
            None => report.heading("unkeyed record"),
        }
        push_enzyme_identity(&mut report, key.as_ref().and_then(|k| enzymes.first_for(k)));
        push_equation(&mut report, Some(core_row));
        if join_participants {
            let part = part_idx.zip(participants).map(|(idx, table)| table.row(idx));
            report.field("Participant", part.and_then(|p| p.get("participant_name")));
            report.field("Role", part.and_then(|p| p.get("role")));
        }
        report.field("Notes", core_row.get("notes"));
    }

    Ok(report.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::test_fixtures::sample_store;

    #[test]
    fn guesses_follow_the_priority_order() {
        assert_eq!(guess_search_fields("A + B -> C"), vec!["reaction_equation"]);
        assert_eq!(guess_search_fields("anything with 1.2.3.4 in it"), vec!["ec_number"]);
        assert_eq!(
            guess_search_fields("thermostable lipase"),
            vec!["enzyme_name", "enzyme_synonyms"]
        );
        assert_eq!(
            guess_search_fields("which protein does this"),
            vec!["enzyme_name", "enzyme_synonyms"]
        );
        assert_eq!(
            guess_search_fields("is the reaction reversible"),
            vec!["reaction_type_reversible"]
        );
        assert_eq!(
            guess_search_fields("substrate of the reaction"),
            vec!["participant_name", "role"]
        );
        assert_eq!(guess_search_fields("argF gene"), vec!["gene_name"]);
        assert_eq!(guess_search_fields("host organism"), vec!["organism"]);
        assert_eq!(guess_search_fields("any notes"), vec!["notes"]);
    }

    #[test]
    fn stoplist_words_do_not_count_as_enzymes() {
        // "database" ends in -ase but falls through to the fallback set.
        assert_eq!(guess_search_fields("search the database"), SEARCHABLE_FIELDS.to_vec());
        assert_eq!(guess_search_fields("xyzzy"), SEARCHABLE_FIELDS.to_vec());

        assert_eq!(find_ase_word("uses a Transaminase here"), Some("Transaminase"));
        assert_eq!(find_ase_word("please show the database"), None);
    }

    #[test]
    fn arrow_query_searches_equations() {
        let db = sample_store();
        let report = smart_search_reactions(
            &db,
            &QueryConfig::default(),
            &SmartSearchQuery {
                search_query: "-> L-citrulline".to_string(),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(report.contains("fields=reaction_equation"));
        assert!(report.contains("## PMID32044030:reaction_1"));
        assert!(report.contains("## PMID31002277:reaction_1"));
        assert!(!report.contains("Lipase"));
    }

    #[test]
    fn synonym_matches_through_the_enzyme_fields() {
        let db = sample_store();
        let report = smart_search_reactions(
            &db,
            &QueryConfig::default(),
            &SmartSearchQuery {
                search_query: "myokinase".to_string(),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(report.contains("fields=enzyme_name, enzyme_synonyms"));
        assert!(report.contains("- **Enzyme**: Adenylate kinase"));
        assert!(report.contains("**Records shown**: 1 (of 1 matched)"));
    }

    #[test]
    fn ec_token_is_extracted_from_surrounding_text() {
        let db = sample_store();
        let report = smart_search_reactions(
            &db,
            &QueryConfig::default(),
            &SmartSearchQuery {
                search_query: "find EC 2.7.4.3 data".to_string(),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(report.contains("fields=ec_number"));
        assert!(report.contains("- **Enzyme**: Adenylate kinase"));
    }

    #[test]
    fn explicit_fields_skip_the_guess_and_drop_unknown_names() {
        let db = sample_store();
        let report = smart_search_reactions(
            &db,
            &QueryConfig::default(),
            &SmartSearchQuery {
                search_query: "coli".to_string(),
                search_fields: Some(vec!["banana".to_string(), "organism".to_string()]),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(report.contains("fields=organism"));
        assert!(report.contains("**Records shown**: 2 (of 2 matched)"));
    }

    #[test]
    fn participant_fields_fan_out_per_participant_row() {
        let db = sample_store();
        let report = smart_search_reactions(
            &db,
            &QueryConfig::default(),
            &SmartSearchQuery {
                search_query: "vinyl acetate".to_string(),
                search_fields: Some(vec!["participant_name".to_string()]),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(report.contains("## PMID29885412:reaction_2"));
        assert!(report.contains("- **Participant**: vinyl acetate"));
        assert!(report.contains("- **Role**: substrate"));
        assert!(report.contains("**Records shown**: 1 (of 1 matched)"));
    }

    #[test]
    fn role_keyword_matches_every_substrate_row() {
        let db = sample_store();
        let report = smart_search_reactions(
            &db,
            &QueryConfig::default(),
            &SmartSearchQuery {
                search_query: "substrate".to_string(),
                ..Default::default()
            },
        )
        .unwrap();

        // Four participant rows carry the substrate role in the fixture.
        assert!(report.contains("**Records shown**: 4 (of 4 matched)"));
    }

    #[test]
    fn empty_query_is_rejected() {
        let db = sample_store();
        let err = smart_search_reactions(
            &db,
            &QueryConfig::default(),
            &SmartSearchQuery {
                search_query: "   ".to_string(),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "search query is empty");
    }

    #[test]
    fn no_match_names_the_fields_searched() {
        let db = sample_store();
        let err = smart_search_reactions(
            &db,
            &QueryConfig::default(),
            &SmartSearchQuery {
                search_query: "unobtainium".to_string(),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, QueryError::NoMatch(_)));
        assert!(err.to_string().contains("unobtainium"));
        assert!(err.to_string().contains("reaction_equation"));
    }
}
