//! Name and value matching primitives
//!
//! Fuzzy comparisons used by every query function: enzyme-name normalization,
//! synonym-aware enzyme matching, numeric range parsing, and EC-number family
//! comparison. These are deliberately small pure functions so each filter has
//! exactly one implementation.

use smallvec::SmallVec;

use crate::error::QueryError;

/// Strip everything except alphanumerics and lowercase the rest.
///
/// Applied to both sides of every fuzzy enzyme-name comparison, so spacing,
/// punctuation and case differences never cause a false negative
/// ("Ornithine transcarbamoylase" == "ornithine-transcarbamoylase").
pub fn normalize_name(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Split a pipe-delimited synonym cell into trimmed, non-empty tokens.
pub fn split_synonyms(raw: &str) -> SmallVec<[&str; 8]> {
    raw.split('|')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Synonym-aware enzyme-name predicate.
///
/// True when the normalized query is a substring of the normalized canonical
/// name, or of any individual `|`-split synonym token. Synonym tokens are
/// normalized one by one; a null synonym cell contributes no matches. A row
/// with neither a name nor synonyms never matches.
pub fn enzyme_matches(name: Option<&str>, synonyms: Option<&str>, query: &str) -> bool {
    let needle = normalize_name(query);

    if let Some(name) = name {
        if normalize_name(name).contains(&needle) {
            return true;
        }
    }

    if let Some(synonyms) = synonyms {
        for token in split_synonyms(synonyms) {
            if normalize_name(token).contains(&needle) {
                return true;
            }
        }
    }

    false
}

/// Case-insensitive substring test on a nullable cell. Null never matches.
pub fn contains_ci(cell: Option<&str>, needle: &str) -> bool {
    match cell {
        Some(s) => s.to_lowercase().contains(&needle.to_lowercase()),
        None => false,
    }
}

/// A parsed numeric range spec: `"a-b"` inclusive, `">x"` strict, `"<x"` strict.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeFilter {
    Between(f64, f64),
    GreaterThan(f64),
    LessThan(f64),
}

impl RangeFilter {
    /// Parse a range spec, reporting anything unsupported instead of silently
    /// matching nothing. `field` names the quantity for the error message.
    pub fn parse(spec: &str, field: &'static str) -> Result<Self, QueryError> {
        let invalid = || QueryError::InvalidRange {
            field,
            spec: spec.to_string(),
        };

        let s = spec.trim();
        if let Some(rest) = s.strip_prefix('>') {
            let x: f64 = rest.trim().parse().map_err(|_| invalid())?;
            return Ok(RangeFilter::GreaterThan(x));
        }
        if let Some(rest) = s.strip_prefix('<') {
            let x: f64 = rest.trim().parse().map_err(|_| invalid())?;
            return Ok(RangeFilter::LessThan(x));
        }
        if let Some((lo, hi)) = s.split_once('-') {
            let lo: f64 = lo.trim().parse().map_err(|_| invalid())?;
            let hi: f64 = hi.trim().parse().map_err(|_| invalid())?;
            return Ok(RangeFilter::Between(lo, hi));
        }

        Err(invalid())
    }

    pub fn contains(&self, value: f64) -> bool {
        match *self {
            RangeFilter::Between(lo, hi) => value >= lo && value <= hi,
            RangeFilter::GreaterThan(x) => value > x,
            RangeFilter::LessThan(x) => value < x,
        }
    }
}

/// Componentwise EC-number comparison over the first `components` fields.
///
/// `2.1.3.3` and `2.1.1.20` share a 2-component family; `2.1` never matches
/// `2.11.x` because components are compared whole, not as a string prefix.
/// Either number lacking `components` fields is no match.
pub fn ec_family_match(a: &str, b: &str, components: usize) -> bool {
    let a: SmallVec<[&str; 4]> = a.trim().split('.').map(str::trim).collect();
    let b: SmallVec<[&str; 4]> = b.trim().split('.').map(str::trim).collect();

    if a.len() < components || b.len() < components {
        return false;
    }

    a[..components] == b[..components]
}

/// Find the first EC-number-shaped token (`a.b.c.d`, all digits) in free text.
pub fn find_ec_number(text: &str) -> Option<String> {
    for token in text.split_whitespace() {
        let token = token.trim_matches(|c: char| !c.is_alphanumeric() && c != '.');
        let parts: SmallVec<[&str; 4]> = token.split('.').collect();
        if parts.len() == 4 && parts.iter().all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit())) {
            return Some(token.to_string());
        }
    }
    None
}
