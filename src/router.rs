//! Free-text intent routing
//!
//! Maps a question to one query function using keyword heuristics. The rules
//! live in an ordered dispatch table and the priority order is part of the
//! contract, not an implementation detail.

use crate::config::QueryConfig;
use crate::data::{ReactionDatabase, ReactionKey};
use crate::error::QueryError;
use crate::matching::find_ec_number;
use crate::query::search::find_ase_word;
use crate::query::{
    find_enzymes_by_participant, find_reactions_by_enzyme, find_reactions_by_organism,
    get_reaction_summary, smart_search_reactions, EnzymeQuery, OrganismQuery, ParticipantQuery,
    SmartSearchQuery, SummaryQuery,
};

/// Words that pad the gap between a keyword and its term
/// ("the enzyme called lipase A").
const FILLER_WORDS: [&str; 6] = ["the", "a", "an", "called", "named", "of"];

/// Keyword router from free text to a query function.
///
/// Rules are tried in a fixed priority order:
///
/// 1. an enzyme mention: an "-ase" word, or enzyme/protein wording followed
///    by a term (generic wording defers to rules 3-5 when their keywords or
///    an EC-shaped token are present; a concrete "-ase" name never defers);
/// 2. a reaction arrow (`->` or `→`): the arrow-bearing fragment is searched
///    against stored equations;
/// 3. substrate/product wording followed by a term;
/// 4. an EC-shaped token, or organism/species/strain wording followed by a
///    term;
/// 5. "summary" wording plus a parseable `literature_id:reaction_id` token;
/// 6. everything else goes to the free-text smart search.
///
/// A rule whose term extraction fails falls through to the later rules, so a
/// query function is never called with a missing required argument.
pub struct IntentRouter<'a> {
    db: &'a ReactionDatabase,
    config: &'a QueryConfig,
}

impl<'a> IntentRouter<'a> {
    pub fn new(db: &'a ReactionDatabase, config: &'a QueryConfig) -> Self {
        Self { db, config }
    }

    /// Dispatch `question` to the first applicable rule. `max_results` caps
    /// whichever list-producing query ends up running.
    pub fn route(&self, question: &str, max_results: Option<usize>) -> Result<String, QueryError> {
        let q = question.trim();
        if q.is_empty() {
            return Err(QueryError::BadInput("question is empty".to_string()));
        }

        let rules: [fn(&Self, &str, Option<usize>) -> Option<Result<String, QueryError>>; 5] = [
            Self::try_enzyme,
            Self::try_equation,
            Self::try_participant,
            Self::try_organism,
            Self::try_summary,
        ];

        for rule in rules {
            if let Some(result) = rule(self, q, max_results) {
                return result;
            }
        }

        smart_search_reactions(
            self.db,
            self.config,
            &SmartSearchQuery {
                search_query: q.to_string(),
                search_fields: None,
                max_results,
            },
        )
    }

    /// Like [`route`](Self::route), with every error rendered into its
    /// message so the caller always receives text.
    pub fn answer(&self, question: &str, max_results: Option<usize>) -> String {
        self.route(question, max_results)
            .unwrap_or_else(|err| err.to_string())
    }

    fn try_enzyme(&self, q: &str, cap: Option<usize>) -> Option<Result<String, QueryError>> {
        let term = match find_ase_word(q) {
            Some(word) => word.to_string(),
            None => {
                // Generic enzyme/protein wording yields to the more specific
                // later rules ("which enzymes use the substrate X" is a
                // participant question).
                let lowered = q.to_lowercase();
                let deferred = find_ec_number(q).is_some()
                    || ["substrate", "product", "organism", "species", "strain", "summar"]
                        .iter()
                        .any(|kw| lowered.contains(kw));
                if deferred {
                    return None;
                }
                let keyword = ["enzyme", "protein"]
                    .into_iter()
                    .find(|kw| lowered.contains(kw))?;
                term_after_keyword(q, keyword)?
            }
        };

        Some(find_reactions_by_enzyme(
            self.db,
            self.config,
            &EnzymeQuery {
                enzyme_name: Some(term),
                organism: None,
                max_results: cap,
            },
        ))
    }

    fn try_equation(&self, q: &str, cap: Option<usize>) -> Option<Result<String, QueryError>> {
        let has_arrow = |s: &str| s.contains("->") || s.contains('→');
        if !has_arrow(q) {
            return None;
        }
        // "what reaction is this: A + B -> C" searches only the pasted part.
        let fragment = match q.rsplit_once(':') {
            Some((_, tail)) if has_arrow(tail) => tail.trim(),
            _ => q.trim_matches(|c: char| c == '?' || c.is_whitespace()),
        };

        Some(smart_search_reactions(
            self.db,
            self.config,
            &SmartSearchQuery {
                search_query: fragment.to_string(),
                search_fields: Some(vec!["reaction_equation".to_string()]),
                max_results: cap,
            },
        ))
    }

    fn try_participant(&self, q: &str, cap: Option<usize>) -> Option<Result<String, QueryError>> {
        let lowered = q.to_lowercase();
        let keyword = ["substrate", "product"]
            .into_iter()
            .find(|kw| lowered.contains(kw))?;
        let term = term_after_keyword(q, keyword)?;

        Some(find_enzymes_by_participant(
            self.db,
            self.config,
            &ParticipantQuery {
                participant_name: Some(term),
                max_results: cap,
            },
        ))
    }

    fn try_organism(&self, q: &str, cap: Option<usize>) -> Option<Result<String, QueryError>> {
        if let Some(ec) = find_ec_number(q) {
            return Some(find_reactions_by_organism(
                self.db,
                self.config,
                &OrganismQuery {
                    organism: None,
                    ec_number: Some(ec),
                    max_results: cap,
                },
            ));
        }

        let lowered = q.to_lowercase();
        let keyword = ["organism", "species", "strain"]
            .into_iter()
            .find(|kw| lowered.contains(kw))?;
        let term = term_after_keyword(q, keyword)?;

        Some(find_reactions_by_organism(
            self.db,
            self.config,
            &OrganismQuery {
                organism: Some(term),
                ec_number: None,
                max_results: cap,
            },
        ))
    }

    fn try_summary(&self, q: &str, _cap: Option<usize>) -> Option<Result<String, QueryError>> {
        if !q.to_lowercase().contains("summar") {
            return None;
        }
        let key = q.split_whitespace().find_map(|token| {
            let token = token.trim_matches(|c: char| !c.is_alphanumeric() && c != ':' && c != '_');
            ReactionKey::parse(token).ok()
        })?;

        Some(get_reaction_summary(
            self.db,
            &SummaryQuery {
                reaction_ref: key.to_string(),
            },
        ))
    }
}

/// The words after the first word starting with `keyword`, with leading
/// filler words dropped. `None` when nothing usable follows.
fn term_after_keyword(question: &str, keyword: &str) -> Option<String> {
    let words: Vec<&str> = question
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '.' && c != '-'))
        .filter(|w| !w.is_empty())
        .collect();

    let at = words
        .iter()
        .position(|w| w.to_lowercase().starts_with(keyword))?;
    let mut rest = &words[at + 1..];
    while let Some((first, tail)) = rest.split_first() {
        if FILLER_WORDS.contains(&first.to_lowercase().as_str()) {
            rest = tail;
        } else {
            break;
        }
    }

    (!rest.is_empty()).then(|| rest.join(" "))
}
