// End-to-end tests over the shipped sample corpus.
//
// Purpose: exercise the CSV loader, the query functions and the intent
// router against data/sample/ exactly as a user of the crate would.
// Run with: cargo test --test sample_database_tests

use std::path::{Path, PathBuf};

use bioreaction_db::query::{
    compare_reactions, find_inhibition_data, find_kinetic_parameters, find_reactions_by_condition,
    find_reactions_by_enzyme, find_related_literature, get_database_statistics,
    get_reaction_summary, CompareQuery, ConditionQuery, EnzymeQuery, InhibitionQuery,
    KineticsQuery, RelatedLiteratureQuery, SummaryQuery,
};
use bioreaction_db::{IntentRouter, QueryConfig, QueryError, ReactionDatabase};

fn data_dir(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data").join(name)
}

fn load_sample() -> ReactionDatabase {
    ReactionDatabase::load(&data_dir("sample"))
}

// =========================================================================
// Section 1: Loading
// =========================================================================

#[test]
fn loader_reads_all_ten_sample_tables() {
    let db = load_sample();
    assert!(db.is_ready());
    assert_eq!(db.loaded().count(), 10);

    let report = get_database_statistics(&db).unwrap();
    assert!(report.contains("**Tables loaded**: 10 (of 10)"));
    assert!(report.contains("## reactions_core"));
    assert!(report.contains("## auxiliary_factors"));
}

#[test]
fn loader_preserves_quoted_and_non_ascii_cells() {
    let db = load_sample();

    // Quoted field with an embedded comma round-trips intact.
    let summary = get_reaction_summary(
        &db,
        &SummaryQuery {
            reaction_ref: "PMID29885412:reaction_2".to_string(),
        },
    )
    .unwrap();
    assert!(summary
        .contains("vinyl acetate + (R,S)-1-phenylethanol -> (R)-1-phenylethyl acetate + acetaldehyde"));

    // Non-ASCII error margins and units survive the read.
    let kinetics = find_kinetic_parameters(
        &db,
        &QueryConfig::default(),
        &KineticsQuery {
            literature_id: Some("PMID29885412".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    assert!(kinetics.contains("±15"));
    assert!(kinetics.contains("measured at 60 °C"));
}

#[test]
fn loader_treats_empty_csv_cells_as_missing() {
    let db = load_sample();

    // PMID31002277:reaction_2 has no expression host recorded; the empty
    // cell reads as missing, not as an empty string.
    let summary = get_reaction_summary(
        &db,
        &SummaryQuery {
            reaction_ref: "PMID31002277:reaction_2".to_string(),
        },
    )
    .unwrap();
    assert!(summary.contains("- **Expression host**: not available"));
    assert!(summary.contains("- **Temperature (°C)**: 25"));
}

// =========================================================================
// Section 2: Structured queries
// =========================================================================

#[test]
fn enzyme_search_spans_names_and_synonyms() {
    let db = load_sample();
    let config = QueryConfig::default();

    let report = find_reactions_by_enzyme(
        &db,
        &config,
        &EnzymeQuery {
            enzyme_name: Some("lipase".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    assert!(report.contains("Lipase A"));
    assert!(report.contains("Lipase B"));
    assert!(report.contains("**Records shown**: 2 (of 2 matched)"));

    // Synonym-only match.
    let report = find_reactions_by_enzyme(
        &db,
        &config,
        &EnzymeQuery {
            enzyme_name: Some("myokinase".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    assert!(report.contains("Adenylate kinase"));
}

#[test]
fn condition_ranges_filter_on_parsed_numbers() {
    let db = load_sample();
    let report = find_reactions_by_condition(
        &db,
        &QueryConfig::default(),
        &ConditionQuery {
            temperature_range: Some("55-90".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    assert!(report.contains("PMID29885412:reaction_1"));
    assert!(report.contains("PMID29885412:reaction_2"));
    assert!(!report.contains("PMID32044030"));
}

#[test]
fn inhibition_data_joins_quantitative_parameters() {
    let db = load_sample();
    let report = find_inhibition_data(
        &db,
        &InhibitionQuery {
            inhibitor_name: Some("PALO".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    assert!(report.contains("- **Quantitative parameter**: Ki"));
    assert!(report.contains("- **Value**: 2.5 uM (error: ±0.4)"));
    assert!(report.contains("transition-state analogue"));
}

#[test]
fn comparison_renders_a_row_per_reaction() {
    let db = load_sample();
    let report = compare_reactions(
        &db,
        &CompareQuery {
            reaction_ids: vec![
                "PMID32044030:reaction_1".to_string(),
                "PMID31002277:reaction_1".to_string(),
            ],
        },
    )
    .unwrap();
    assert!(report.contains("Escherichia coli"));
    assert!(report.contains("Pyrococcus furiosus"));
}

#[test]
fn related_literature_links_shared_enzymes() {
    let db = load_sample();
    let report = find_related_literature(
        &db,
        &QueryConfig::default(),
        &RelatedLiteratureQuery {
            target_literature_id: "PMID32044030".to_string(),
            ..Default::default()
        },
    )
    .unwrap();
    assert!(report.contains("- PMID31002277"));
}

// =========================================================================
// Section 3: Free-text routing
// =========================================================================

#[test]
fn router_answers_free_text_over_the_sample_corpus() {
    let db = load_sample();
    let config = QueryConfig::default();
    let router = IntentRouter::new(&db, &config);

    let answer = router.answer("which reactions use the enzyme called CalB?", None);
    assert!(answer.starts_with("# Enzyme reaction search"));
    assert!(answer.contains("Lipase B"));

    let answer = router.answer("please summarize PMID32044030:reaction_1", None);
    assert!(answer.starts_with("# Reaction summary: PMID32044030:reaction_1"));

    let answer = router.answer("which organisms carry EC 2.1.3.3?", None);
    assert!(answer.contains("PMID32044030:reaction_1"));
    assert!(answer.contains("PMID31002277:reaction_1"));

    // No rule matches; free text falls through to the smart search.
    let answer = router.answer("citrulline", None);
    assert!(answer.starts_with("# Smart search"));
    assert!(answer.contains("L-citrulline"));
}

#[test]
fn router_turns_errors_into_plain_text() {
    let db = load_sample();
    let config = QueryConfig::default();
    let router = IntentRouter::new(&db, &config);

    let answer = router.answer("tell me about the enzyme called qzzyx", None);
    assert!(answer.starts_with("no reactions matched"));
}

// =========================================================================
// Section 4: Partial corpus
// =========================================================================

#[test]
fn partial_corpus_serves_what_it_has() {
    let db = ReactionDatabase::load(&data_dir("sample_minimal"));
    assert!(db.is_ready());
    assert_eq!(db.loaded().count(), 2);

    let report = get_database_statistics(&db).unwrap();
    assert!(report.contains("**Tables loaded**: 2 (of 10)"));

    // Queries over loaded tables work end to end.
    let config = QueryConfig::default();
    let router = IntentRouter::new(&db, &config);
    let answer = router.answer("reactions of hexokinase", None);
    assert!(answer.contains("PMID11111111:reaction_1"));

    // Queries needing an absent table name it.
    let err = find_inhibition_data(
        &db,
        &InhibitionQuery {
            inhibitor_name: Some("PALO".to_string()),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, QueryError::TableMissing("inhibitors_main")));
}

#[test]
fn empty_directory_yields_an_unready_store() {
    let db = ReactionDatabase::load(Path::new("/nonexistent/bioreaction-data"));
    assert!(!db.is_ready());
    assert_eq!(
        get_database_statistics(&db).unwrap_err().to_string(),
        "core tables not loaded"
    );
}
