//! Query configuration
//!
//! Compiled defaults cover normal operation; a JSON file can override any
//! subset of fields. All caps and floors used by the query layer live here so
//! their values are settable without code changes.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Result cap applied when a caller does not pass `max_results`.
    pub default_max_results: usize,

    /// Hard ceiling on `max_results`; larger requests are clamped down.
    pub max_results_ceiling: usize,

    /// Ranking size when a caller does not pass `top_n`.
    pub default_top_n: usize,

    /// Hard ceiling on `top_n`.
    pub top_n_ceiling: usize,

    /// Usable rows required before ranking or trend analysis will run,
    /// unless the caller passes an explicit floor.
    pub min_data_points: usize,

    /// Count threshold applied when a frequency query passes no
    /// `min_occurrences`.
    pub default_min_occurrences: usize,

    /// Absolute Pearson correlation below which a trend is reported as
    /// "no clear trend".
    pub correlation_threshold: f64,

    /// Paired observations needed before a correlation is computed at all.
    pub min_correlation_points: usize,

    /// Seconds the literature collaborator may run before the call times out.
    pub collaborator_timeout_secs: u64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_max_results: 10,
            max_results_ceiling: 50,
            default_top_n: 5,
            top_n_ceiling: 25,
            min_data_points: 5,
            default_min_occurrences: 2,
            correlation_threshold: 0.3,
            min_correlation_points: 3,
            collaborator_timeout_secs: 30,
        }
    }
}

impl QueryConfig {
    /// Load configuration from a JSON file; missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        serde_json::from_str(&contents).with_context(|| "Failed to parse config JSON")
    }

    /// Result cap for a request: the caller's value or the default, never
    /// above the ceiling.
    pub fn effective_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_max_results)
            .min(self.max_results_ceiling)
    }

    /// Ranking size for a request, clamped to the ceiling.
    pub fn effective_top_n(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.default_top_n).min(self.top_n_ceiling)
    }

    /// Minimum-sample floor: an explicit request overrides the configured
    /// default.
    pub fn effective_min_points(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.min_data_points)
    }

    pub fn effective_min_occurrences(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.default_min_occurrences)
    }

    pub fn collaborator_timeout(&self) -> Duration {
        Duration::from_secs(self.collaborator_timeout_secs)
    }
}
