//! In-memory biocatalysis reaction database with intent-routed queries.
//!
//! Loads a ten-table CSV corpus of curated enzymatic reaction data into an
//! immutable string-typed store and answers structured or free-text questions
//! over it:
//! - `data`: Polars CSV loading, composite-key indexing, typed row access
//! - `matching`: name normalization, synonym and EC-family matching, ranges
//! - `query`: one function per supported question, from enzyme lookup to
//!   trend analysis
//! - `router`: keyword heuristics mapping free text to a query function
//! - `report`: deterministic markdown-like rendering shared by every query
//! - `literature`: full-text summary collaborator behind a backend trait
//!
//! The store is loaded once and never mutated; everything downstream is a
//! pure read, so queries can run concurrently without locking.

pub mod config;
pub mod data;
pub mod error;
pub mod literature;
pub mod matching;
pub mod query;
pub mod report;
pub mod router;

pub use config::QueryConfig;
pub use data::{ReactionDatabase, ReactionKey, TableId};
pub use error::QueryError;
pub use router::IntentRouter;
