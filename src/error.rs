//! Error taxonomy for the query layer
//!
//! Every failure a query function can produce is one of these variants, and
//! every variant renders as a descriptive single-line message. The router and
//! the CLI turn them into plain text for the caller; nothing here is meant to
//! abort a request.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    /// The store holds no tables at all.
    #[error("core tables not loaded")]
    StoreNotLoaded,

    /// The store is ready but a table this query needs was not loaded.
    #[error("required table '{0}' is not loaded")]
    TableMissing(&'static str),

    /// A composite reaction reference without the `lit:rid` shape.
    #[error("invalid reaction reference '{0}': expected 'literature_id:reaction_id'")]
    InvalidReactionRef(String),

    /// A numeric range spec that is not `a-b`, `>x` or `<x`.
    #[error("invalid {field} range '{spec}': expected 'a-b', '>x' or '<x'")]
    InvalidRange { field: &'static str, spec: String },

    #[error("unsupported metric '{metric}': choose one of {allowed}")]
    UnsupportedMetric { metric: String, allowed: &'static str },

    #[error("unsupported similarity criterion '{criterion}': choose {allowed}")]
    UnsupportedCriterion {
        criterion: String,
        allowed: &'static str,
    },

    #[error(
        "unsupported pattern type '{0}': choose 'enzyme_frequency', \
         'organism_frequency' or 'reaction_type_frequency'"
    )]
    UnsupportedPattern(String),

    /// A query that needs at least one filter was called with none.
    #[error("{0}")]
    MissingFilter(&'static str),

    #[error("{0}")]
    BadInput(String),

    /// Well-formed query, zero rows.
    #[error("{0}")]
    NoMatch(String),

    #[error("insufficient data: {found} usable rows, at least {required} required")]
    InsufficientData { found: usize, required: usize },

    #[error("literature analysis timed out after {secs}s")]
    CollaboratorTimeout { secs: u64 },

    #[error("literature analysis failed: {0}")]
    CollaboratorFailed(String),
}
