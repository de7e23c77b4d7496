//! Query functions
//!
//! One module per operation. Every function takes the store, the
//! configuration and a parameter struct whose fields are all optional filters
//! (an absent filter matches everything), and returns a rendered report or a
//! `QueryError` whose message is shown to the caller as-is.

pub mod compare;
pub mod conditions;
pub mod enzymes;
pub mod inhibition;
pub mod kinetics;
pub mod literature_links;
pub mod mutants;
pub mod organisms;
pub mod participants;
pub mod patterns;
pub mod performance;
pub mod search;
pub mod similarity;
pub mod statistics;
pub mod structures;
pub mod summary;
pub mod trends;

pub use compare::{compare_reactions, CompareQuery};
pub use conditions::{find_reactions_by_condition, ConditionQuery};
pub use enzymes::{
    find_conditions_by_enzyme, find_reactions_by_enzyme, ConditionsByEnzymeQuery, EnzymeQuery,
};
pub use inhibition::{find_inhibition_data, InhibitionQuery};
pub use kinetics::{find_kinetic_parameters, KineticsQuery};
pub use literature_links::{find_related_literature, RelatedLiteratureQuery};
pub use mutants::{find_mutant_performance, MutantQuery};
pub use organisms::{find_reactions_by_organism, OrganismQuery};
pub use participants::{find_enzymes_by_participant, ParticipantQuery};
pub use patterns::{analyze_reaction_patterns, PatternQuery};
pub use performance::{find_top_reactions_by_performance, PerformanceQuery};
pub use search::{guess_search_fields, smart_search_reactions, SmartSearchQuery};
pub use similarity::{find_similar_reactions, SimilarityQuery};
pub use statistics::get_database_statistics;
pub use structures::{find_reactions_with_pdb_id, PdbQuery};
pub use summary::{get_reaction_summary, SummaryQuery};
pub use trends::{analyze_reaction_trends, TrendQuery};

use crate::data::RowRef;
use crate::report::Report;

/// Cap a hit list, returning the kept rows and the pre-cap total.
pub(crate) fn cap_hits<T>(mut hits: Vec<T>, limit: usize) -> (Vec<T>, usize) {
    let total = hits.len();
    hits.truncate(limit);
    (hits, total)
}

/// Enzyme identity fields shared by most result blocks.
pub(crate) fn push_enzyme_identity(report: &mut Report, enzyme: Option<RowRef<'_>>) {
    let get = |col: &str| enzyme.and_then(|r| r.get(col));
    report.field("Enzyme", get("enzyme_name"));
    report.field("Organism", get("organism"));
    report.field("EC number", get("ec_number"));
}

/// Core-reaction fields shared by most result blocks.
pub(crate) fn push_equation(report: &mut Report, core: Option<RowRef<'_>>) {
    let get = |col: &str| core.and_then(|r| r.get(col));
    report.field("Reaction equation", get("reaction_equation"));
    report.field("Reversible", get("reaction_type_reversible"));
}

/// The full experimental-conditions block.
pub(crate) fn push_condition_fields(report: &mut Report, cond: Option<RowRef<'_>>) {
    let get = |col: &str| cond.and_then(|r| r.get(col));
    report.field("Temperature (°C)", get("temperature_celsius"));
    report.field("pH", get("ph"));
    report.field("pH details", get("ph_details"));
    report.field("Assay type", get("assay_type"));
    report.field("Assay details", get("assay_details"));
    report.field("Solvent/buffer", get("solvent_buffer"));
    report.field("Expression host", get("expression_host"));
    report.field("Expression vector", get("expression_vector"));
    report.field("Expression induction", get("expression_induction"));
}
