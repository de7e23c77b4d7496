//! Data loading and table access
//!
//! Loads the ten reaction CSV tables with Polars and holds them in memory as
//! the single source of truth for every query function. Schema inference is
//! disabled on purpose: every column is kept as a string column and numeric
//! coercion happens explicitly at the point of use, so free-form cells like
//! ">99" or "n.d." degrade to missing values instead of poisoning a column.

use anyhow::{Context, Result};
use polars::prelude::*;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::fmt;
use std::path::Path;
use tracing::{info, warn};

use crate::error::QueryError;

/// The ten reaction tables, in canonical presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableId {
    ReactionsCore,
    Enzymes,
    ExperimentalConditions,
    ActivityPerformance,
    ReactionParticipants,
    KineticParameters,
    MutantsCharacterized,
    InhibitorsMain,
    InhibitionParams,
    AuxiliaryFactors,
}

impl TableId {
    pub const ALL: [TableId; 10] = [
        TableId::ReactionsCore,
        TableId::Enzymes,
        TableId::ExperimentalConditions,
        TableId::ActivityPerformance,
        TableId::ReactionParticipants,
        TableId::KineticParameters,
        TableId::MutantsCharacterized,
        TableId::InhibitorsMain,
        TableId::InhibitionParams,
        TableId::AuxiliaryFactors,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TableId::ReactionsCore => "reactions_core",
            TableId::Enzymes => "enzymes",
            TableId::ExperimentalConditions => "experimental_conditions",
            TableId::ActivityPerformance => "activity_performance",
            TableId::ReactionParticipants => "reaction_participants",
            TableId::KineticParameters => "kinetic_parameters",
            TableId::MutantsCharacterized => "mutants_characterized",
            TableId::InhibitorsMain => "inhibitors_main",
            TableId::InhibitionParams => "inhibition_params",
            TableId::AuxiliaryFactors => "auxiliary_factors",
        }
    }

    /// Fixed file-name-to-table mapping inside the database directory.
    pub fn file_name(self) -> &'static str {
        match self {
            TableId::ReactionsCore => "1_reactions_core.csv",
            TableId::Enzymes => "2_enzymes.csv",
            TableId::ExperimentalConditions => "3_experimental_conditions.csv",
            TableId::ActivityPerformance => "4_activity_performance.csv",
            TableId::ReactionParticipants => "5_reaction_participants.csv",
            TableId::KineticParameters => "6_kinetic_parameters.csv",
            TableId::MutantsCharacterized => "7_mutants_characterized.csv",
            TableId::InhibitorsMain => "8_inhibitors_main.csv",
            TableId::InhibitionParams => "9_inhibition_params.csv",
            TableId::AuxiliaryFactors => "10_auxiliary_factors.csv",
        }
    }
}

/// Composite reaction key. `literature_id:reaction_id` is the wire format
/// used to refer to one reaction across tool calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReactionKey {
    pub literature_id: String,
    pub reaction_id: String,
}

impl ReactionKey {
    pub fn new(literature_id: impl Into<String>, reaction_id: impl Into<String>) -> Self {
        Self {
            literature_id: literature_id.into(),
            reaction_id: reaction_id.into(),
        }
    }

    /// Parse the wire format. Anything without a `:` separator, or with an
    /// empty half, is rejected.
    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        match raw.trim().split_once(':') {
            Some((lit, rid)) if !lit.trim().is_empty() && !rid.trim().is_empty() => {
                Ok(ReactionKey::new(lit.trim(), rid.trim()))
            }
            _ => Err(QueryError::InvalidReactionRef(raw.to_string())),
        }
    }
}

impl fmt::Display for ReactionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.literature_id, self.reaction_id)
    }
}

/// Coerce a free-form cell to a number; unparseable values are missing.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

/// Borrowed view of one row of a string-typed table.
#[derive(Clone, Copy)]
pub struct RowRef<'a> {
    df: &'a DataFrame,
    idx: usize,
}

impl<'a> RowRef<'a> {
    /// Cell value, null/blank-normalized: a missing column, a null cell and a
    /// whitespace-only cell all read as `None`.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let cell = self.df.column(column).ok()?.str().ok()?.get(self.idx)?;
        let cell = cell.trim();
        (!cell.is_empty()).then_some(cell)
    }

    pub fn get_f64(&self, column: &str) -> Option<f64> {
        parse_numeric(self.get(column)?)
    }

    /// The composite key of this row, when both key columns are populated.
    pub fn key(&self) -> Option<ReactionKey> {
        Some(ReactionKey::new(
            self.get("literature_id")?,
            self.get("reaction_id")?,
        ))
    }

    pub fn index(&self) -> usize {
        self.idx
    }
}

/// One loaded table plus its prebuilt composite-key row index.
pub struct StoredTable {
    df: DataFrame,
    by_key: FxHashMap<ReactionKey, SmallVec<[usize; 2]>>,
}

impl StoredTable {
    fn new(df: DataFrame) -> Self {
        let by_key = build_key_index(&df);
        StoredTable { df, by_key }
    }

    pub fn df(&self) -> &DataFrame {
        &self.df
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn row(&self, idx: usize) -> RowRef<'_> {
        RowRef { df: &self.df, idx }
    }

    pub fn rows(&self) -> impl Iterator<Item = RowRef<'_>> + '_ {
        (0..self.height()).map(move |idx| self.row(idx))
    }

    /// Row indexes holding this composite key (empty when absent).
    pub fn rows_for(&self, key: &ReactionKey) -> &[usize] {
        self.by_key.get(key).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// First row for a key. Core/enzymes/conditions/activity hold at most one
    /// row per key, so this is the whole join for those tables.
    pub fn first_for(&self, key: &ReactionKey) -> Option<RowRef<'_>> {
        self.rows_for(key).first().map(|&idx| self.row(idx))
    }
}

fn build_key_index(df: &DataFrame) -> FxHashMap<ReactionKey, SmallVec<[usize; 2]>> {
    let mut map: FxHashMap<ReactionKey, SmallVec<[usize; 2]>> = FxHashMap::default();

    let lit = match df.column("literature_id").and_then(|c| c.str()) {
        Ok(col) => col,
        Err(_) => return map,
    };
    let rid = match df.column("reaction_id").and_then(|c| c.str()) {
        Ok(col) => col,
        Err(_) => return map,
    };

    for idx in 0..df.height() {
        if let (Some(l), Some(r)) = (lit.get(idx), rid.get(idx)) {
            let (l, r) = (l.trim(), r.trim());
            if l.is_empty() || r.is_empty() {
                continue;
            }
            map.entry(ReactionKey::new(l, r))
                .or_insert_with(SmallVec::new)
                .push(idx);
        }
    }

    map
}

/// In-memory reaction database: loaded once at startup, immutable afterwards.
pub struct ReactionDatabase {
    tables: FxHashMap<TableId, StoredTable>,
}

impl ReactionDatabase {
    /// Load every table file found under `dir`, in parallel.
    ///
    /// A missing or unreadable file is a warning and the table is omitted;
    /// the store is usable as long as at least one table loads.
    pub fn load(dir: &Path) -> Self {
        let loaded: Vec<(TableId, DataFrame)> = TableId::ALL
            .par_iter()
            .filter_map(|&id| {
                let path = dir.join(id.file_name());
                if !path.exists() {
                    warn!(table = id.name(), path = %path.display(), "table file missing, skipping");
                    return None;
                }
                match read_table_csv(&path) {
                    Ok(df) => Some((id, df)),
                    Err(err) => {
                        warn!(table = id.name(), error = %format!("{err:#}"), "failed to read table, skipping");
                        None
                    }
                }
            })
            .collect();

        let mut tables = FxHashMap::default();
        for (id, df) in loaded {
            info!(table = id.name(), rows = df.height(), "loaded table");
            tables.insert(id, StoredTable::new(df));
        }

        if tables.is_empty() {
            warn!(dir = %dir.display(), "no reaction tables loaded");
        }

        ReactionDatabase { tables }
    }

    /// Build a store from in-memory frames (tests, embedding).
    pub fn from_tables(frames: Vec<(TableId, DataFrame)>) -> Self {
        let mut tables = FxHashMap::default();
        for (id, df) in frames {
            tables.insert(id, StoredTable::new(df));
        }
        ReactionDatabase { tables }
    }

    pub fn empty() -> Self {
        ReactionDatabase {
            tables: FxHashMap::default(),
        }
    }

    pub fn is_ready(&self) -> bool {
        !self.tables.is_empty()
    }

    /// Single access path for query functions. Distinguishes an empty store
    /// from one specific missing table so callers can report each clearly.
    pub fn table(&self, id: TableId) -> Result<&StoredTable, QueryError> {
        if !self.is_ready() {
            return Err(QueryError::StoreNotLoaded);
        }
        self.tables.get(&id).ok_or(QueryError::TableMissing(id.name()))
    }

    /// Loaded tables in canonical order.
    pub fn loaded(&self) -> impl Iterator<Item = (TableId, &StoredTable)> + '_ {
        TableId::ALL
            .iter()
            .filter_map(move |&id| self.tables.get(&id).map(|t| (id, t)))
    }
}

fn read_table_csv(path: &Path) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .with_context(|| format!("Failed to create CSV reader: {}", path.display()))?
        .finish()
        .with_context(|| format!("Failed to parse CSV: {}", path.display()))
}
