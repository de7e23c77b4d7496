//! Similar-reaction lookup
//!
//! Similarity is anchored on one target reaction given in wire format. The
//! `enzyme` criterion compares the leading token of the enzyme name, so
//! "Lipase A" and "Lipase B" count as similar; the `ec_number` criterion
//! compares EC families componentwise and narrows to the subfamily when the
//! family alone would overflow the result cap.

use crate::config::QueryConfig;
use crate::data::{ReactionDatabase, ReactionKey, TableId};
use crate::error::QueryError;
use crate::matching::{ec_family_match, normalize_name};
use crate::report::Report;

use super::{cap_hits, push_enzyme_identity, push_equation};

/// Parameters for [`find_similar_reactions`].
#[derive(Debug, Default, Clone)]
pub struct SimilarityQuery {
    /// Required: `literature_id:reaction_id` of the reaction to compare
    /// against.
    pub target_reaction_id: String,
    /// `enzyme` (default) or `ec_number`.
    pub similarity_criteria: Option<String>,
    pub max_results: Option<usize>,
}

pub fn find_similar_reactions(
    db: &ReactionDatabase,
    config: &QueryConfig,
    query: &SimilarityQuery,
) -> Result<String, QueryError> {
    let enzymes = db.table(TableId::Enzymes)?;
    let core = db.table(TableId::ReactionsCore)?;
    let conditions = db.table(TableId::ExperimentalConditions).ok();
    let limit = config.effective_limit(query.max_results);

    let target_key = ReactionKey::parse(&query.target_reaction_id)?;
    let target = enzymes.first_for(&target_key).ok_or_else(|| {
        QueryError::NoMatch(format!("target reaction {} not found", target_key))
    })?;

    let criterion = query
        .similarity_criteria
        .as_deref()
        .unwrap_or("enzyme")
        .trim()
        .to_ascii_lowercase();

    let mut note: Option<String> = None;
    let hits: Vec<usize> = match criterion.as_str() {
        "enzyme" => {
            let name = target.get("enzyme_name").ok_or_else(|| {
                QueryError::NoMatch(format!(
                    "target reaction {} has no recorded enzyme name",
                    target_key
                ))
            })?;
            // Leading name token: "Lipase A" groups with every other lipase.
            let token = name
                .split(|c: char| c.is_whitespace() || c == '_')
                .find(|t| !t.is_empty())
                .map(normalize_name)
                .unwrap_or_default();
            if token.is_empty() {
                return Err(QueryError::NoMatch(format!(
                    "target reaction {} has no recorded enzyme name",
                    target_key
                )));
            }

            enzymes
                .rows()
                .filter(|row| row.key().map_or(false, |key| key != target_key))
                .filter(|row| {
                    row.get("enzyme_name")
                        .map_or(false, |n| normalize_name(n).contains(&token))
                })
                .map(|row| row.index())
                .collect()
        }
        "ec_number" => {
            let target_ec = target.get("ec_number").ok_or_else(|| {
                QueryError::NoMatch(format!(
                    "target reaction {} has no recorded ec_number",
                    target_key
                ))
            })?;

            let candidates = |components: usize| -> Vec<usize> {
                enzymes
                    .rows()
                    .filter(|row| row.key().map_or(false, |key| key != target_key))
                    .filter(|row| {
                        row.get("ec_number")
                            .map_or(false, |ec| ec_family_match(ec, target_ec, components))
                    })
                    .map(|row| row.index())
                    .collect()
            };

            let family = candidates(2);
            if family.len() > limit {
                let narrowed = candidates(3);
                if narrowed.is_empty() {
                    family
                } else {
                    let subfamily: Vec<&str> = target_ec.split('.').take(3).collect();
                    note = Some(format!(
                        "**Note**: EC family match exceeded the cap, narrowed to subfamily {}",
                        subfamily.join(".")
                    ));
                    narrowed
                }
            } else {
                family
            }
        }
        _ => {
            return Err(QueryError::UnsupportedCriterion {
                criterion: criterion.clone(),
                allowed: "'enzyme' or 'ec_number'",
            })
        }
    };

    let (kept, total) = cap_hits(hits, limit);
    if total == 0 {
        return Err(QueryError::NoMatch(format!(
            "no reactions similar to {} by {}",
            target_key, criterion
        )));
    }

    let mut report = Report::new("Similar reactions");
    report.filters(&[
        ("target", Some(query.target_reaction_id.trim())),
        ("criteria", Some(criterion.as_str())),
    ]);
    report.counts(kept.len(), total);
    if let Some(note) = &note {
        report.line(note);
    }

    for idx in kept {
        let row = enzymes.row(idx);
        let key = row.key();
        match &key {
            Some(key) => report.heading(&key.to_string()),
            None => report.heading("unkeyed record"),
        }
        push_enzyme_identity(&mut report, Some(row));
        push_equation(&mut report, key.as_ref().and_then(|k| core.first_for(k)));
        let cond = conditions
            .zip(key.as_ref())
            .and_then(|(table, key)| table.first_for(key));
        report.field("Temperature (°C)", cond.and_then(|c| c.get("temperature_celsius")));
        report.field("pH", cond.and_then(|c| c.get("ph")));
    }

    Ok(report.finish())
}
