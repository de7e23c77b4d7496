//! Related-literature lookup
//!
//! Anchored on one literature id rather than one reaction: finds the other
//! literatures whose enzyme records share the target's leading enzyme-name
//! token, organism genus, or two-component EC family. Each literature id is
//! listed once no matter how many of its rows match.

use rustc_hash::FxHashSet;

use crate::config::QueryConfig;
use crate::data::{ReactionDatabase, TableId};
use crate::error::QueryError;
use crate::matching::{contains_ci, ec_family_match, normalize_name};
use crate::report::Report;

use super::cap_hits;

/// Parameters for [`find_related_literature`].
#[derive(Debug, Default, Clone)]
pub struct RelatedLiteratureQuery {
    /// Required: the literature id to find neighbours for.
    pub target_literature_id: String,
    /// `enzyme` (default), `organism` or `ec_number`.
    pub similarity_criteria: Option<String>,
    pub max_results: Option<usize>,
}

enum Basis {
    NameToken(String),
    Genus(String),
    /// Holds the target's full EC number; rows compare at family depth.
    EcFamily(String),
}

pub fn find_related_literature(
    db: &ReactionDatabase,
    config: &QueryConfig,
    query: &RelatedLiteratureQuery,
) -> Result<String, QueryError> {
    let enzymes = db.table(TableId::Enzymes)?;
    let core = db.table(TableId::ReactionsCore)?;
    let limit = config.effective_limit(query.max_results);

    let target = query.target_literature_id.trim();
    if target.is_empty() {
        return Err(QueryError::BadInput("target literature id is empty".to_string()));
    }

    let target_enzyme = enzymes
        .rows()
        .find(|row| row.get("literature_id") == Some(target));
    let known_in_core = core.rows().any(|row| row.get("literature_id") == Some(target));
    if target_enzyme.is_none() && !known_in_core {
        return Err(QueryError::NoMatch(format!(
            "no records for literature {}",
            target
        )));
    }

    let criterion = query
        .similarity_criteria
        .as_deref()
        .unwrap_or("enzyme")
        .trim()
        .to_ascii_lowercase();

    let field = match criterion.as_str() {
        "enzyme" => "enzyme_name",
        "organism" => "organism",
        "ec_number" => "ec_number",
        _ => {
            return Err(QueryError::UnsupportedCriterion {
                criterion: criterion.clone(),
                allowed: "'enzyme', 'organism' or 'ec_number'",
            })
        }
    };
    let enzyme_row = target_enzyme.ok_or_else(|| {
        QueryError::NoMatch(format!(
            "literature {} has no enzyme records to match on",
            target
        ))
    })?;
    let value = enzyme_row.get(field).ok_or_else(|| {
        QueryError::NoMatch(format!("literature {} has no recorded {}", target, field))
    })?;

    let basis = match criterion.as_str() {
        "enzyme" => {
            let token = value
                .split(|c: char| c.is_whitespace() || c == '_')
                .find(|t| !t.is_empty())
                .map(normalize_name)
                .unwrap_or_default();
            if token.is_empty() {
                return Err(QueryError::NoMatch(format!(
                    "literature {} has no recorded enzyme_name",
                    target
                )));
            }
            Basis::NameToken(token)
        }
        "organism" => {
            let genus = value.split_whitespace().next().unwrap_or(value);
            Basis::Genus(genus.to_string())
        }
        _ => Basis::EcFamily(value.to_string()),
    };

    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut related: Vec<&str> = Vec::new();
    for row in enzymes.rows() {
        let Some(lit) = row.get("literature_id") else { continue };
        if lit == target {
            continue;
        }
        let hit = match &basis {
            Basis::NameToken(token) => row
                .get("enzyme_name")
                .map_or(false, |n| normalize_name(n).contains(token.as_str())),
            Basis::Genus(genus) => contains_ci(row.get("organism"), genus),
            Basis::EcFamily(ec) => row
                .get("ec_number")
                .map_or(false, |e| ec_family_match(e, ec, 2)),
        };
        if hit && seen.insert(lit) {
            related.push(lit);
        }
    }

    let (kept, total) = cap_hits(related, limit);
    if total == 0 {
        return Err(QueryError::NoMatch(format!(
            "no related literature for {} by {}",
            target, criterion
        )));
    }

    let label = match &basis {
        Basis::NameToken(token) => format!("enzyme name token '{}'", token),
        Basis::Genus(genus) => format!("organism genus '{}'", genus),
        Basis::EcFamily(ec) => format!(
            "EC family '{}'",
            ec.split('.').take(2).collect::<Vec<_>>().join(".")
        ),
    };

    let mut report = Report::new("Related literature");
    report.filters(&[
        ("target", Some(target)),
        ("criteria", Some(criterion.as_str())),
    ]);
    report.counts(kept.len(), total);
    report.line(&format!("**Match basis**: {}", label));
    for lit in kept {
        report.line(&format!("- {}", lit));
    }

    Ok(report.finish())
}
