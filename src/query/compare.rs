//! Side-by-side reaction comparison
//!
//! Renders aligned markdown tables for a small set of reactions plus a
//! key-differences section. Spread calculations coerce cell by cell and skip
//! anything unparseable, so a ">99" conversion entry shows up in the table
//! but never skews the numeric spread.

use crate::data::{parse_numeric, ReactionDatabase, ReactionKey, RowRef, StoredTable, TableId};
use crate::error::QueryError;
use crate::report::{Report, NOT_AVAILABLE};

/// Parameters for [`compare_reactions`].
#[derive(Debug, Default, Clone)]
pub struct CompareQuery {
    /// Two or more `literature_id:reaction_id` references.
    pub reaction_ids: Vec<String>,
}

fn cell(value: Option<&str>) -> &str {
    value.unwrap_or(NOT_AVAILABLE)
}

fn measurement_cell(row: Option<RowRef<'_>>, value_col: &str, unit_col: &str, error_col: &str) -> String {
    let Some(value) = row.and_then(|r| r.get(value_col)) else {
        return NOT_AVAILABLE.to_string();
    };
    let mut out = value.to_string();
    if let Some(unit) = row.and_then(|r| r.get(unit_col)) {
        out.push_str(&format!(" {}", unit));
    }
    if let Some(error) = row.and_then(|r| r.get(error_col)) {
        out.push_str(&format!(" (error: {})", error));
    }
    out
}

/// Numeric span over the parseable values of one column. Under two parseable
/// values there is nothing to compare.
fn span(values: &[(ReactionKey, Option<f64>)]) -> Option<(f64, f64)> {
    let parsed: Vec<f64> = values.iter().filter_map(|(_, v)| *v).collect();
    if parsed.len() < 2 {
        return None;
    }
    let min = parsed.iter().copied().fold(f64::INFINITY, f64::min);
    let max = parsed.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some((min, max))
}

pub fn compare_reactions(
    db: &ReactionDatabase,
    query: &CompareQuery,
) -> Result<String, QueryError> {
    if query.reaction_ids.len() < 2 {
        return Err(QueryError::BadInput(
            "provide at least two reaction references to compare".to_string(),
        ));
    }

    let core = db.table(TableId::ReactionsCore)?;
    let enzymes = db.table(TableId::Enzymes).ok();
    let activity = db.table(TableId::ActivityPerformance).ok();
    let conditions = db.table(TableId::ExperimentalConditions).ok();

    let mut keys: Vec<ReactionKey> = Vec::with_capacity(query.reaction_ids.len());
    for raw in &query.reaction_ids {
        let key = ReactionKey::parse(raw)?;
        if core.first_for(&key).is_none() {
            return Err(QueryError::NoMatch(format!("reaction {} not found", key)));
        }
        keys.push(key);
    }

    fn lookup<'a>(table: Option<&'a StoredTable>, key: &ReactionKey) -> Option<RowRef<'a>> {
        table.and_then(|t| t.first_for(key))
    }

    let mut report = Report::new("Reaction comparison");
    report.line(&format!("**Reactions compared**: {}", keys.len()));

    report.heading("Basic information");
    report.blank();
    report.line("| Reaction | Enzyme | Organism | Equation |");
    report.line("| --- | --- | --- | --- |");
    for key in &keys {
        let enzyme = lookup(enzymes, key);
        let core_row = core.first_for(key);
        report.line(&format!(
            "| {} | {} | {} | {} |",
            key,
            cell(enzyme.and_then(|r| r.get("enzyme_name"))),
            cell(enzyme.and_then(|r| r.get("organism"))),
            cell(core_row.and_then(|r| r.get("reaction_equation"))),
        ));
    }

    report.heading("Performance");
    report.blank();
    report.line("| Reaction | Conversion rate | Product yield | Enantiomeric excess |");
    report.line("| --- | --- | --- | --- |");
    for key in &keys {
        let row = lookup(activity, key);
        report.line(&format!(
            "| {} | {} | {} | {} |",
            key,
            measurement_cell(row, "conversion_rate", "conversion_rate_unit", "conversion_rate_error"),
            measurement_cell(row, "product_yield", "product_yield_unit", "product_yield_error"),
            measurement_cell(
                row,
                "enantiomeric_excess",
                "enantiomeric_excess_unit",
                "enantiomeric_excess_error"
            ),
        ));
    }

    report.heading("Conditions");
    report.blank();
    report.line("| Reaction | Temperature (°C) | pH | Solvent/buffer |");
    report.line("| --- | --- | --- | --- |");
    for key in &keys {
        let row = lookup(conditions, key);
        report.line(&format!(
            "| {} | {} | {} | {} |",
            key,
            cell(row.and_then(|r| r.get("temperature_celsius"))),
            cell(row.and_then(|r| r.get("ph"))),
            cell(row.and_then(|r| r.get("solvent_buffer"))),
        ));
    }

    report.heading("Key differences");
    report.blank();

    let conversions: Vec<(ReactionKey, Option<f64>)> = keys
        .iter()
        .map(|key| {
            (
                key.clone(),
                lookup(activity, key).and_then(|r| r.get_f64("conversion_rate")),
            )
        })
        .collect();
    if let Some((min, max)) = span(&conversions) {
        report.line(&format!(
            "**Conversion rate spread**: highest {}, lowest {}",
            max, min
        ));
        if let Some((best_key, _)) = conversions
            .iter()
            .filter_map(|(k, v)| v.map(|v| (k, v)))
            .find(|(_, v)| *v == max)
        {
            report.line(&format!("**Best reaction**: {}", best_key));
            let enzyme = lookup(enzymes, best_key);
            report.line(&format!(
                "**Key factors**: enzyme ({}), organism ({})",
                cell(enzyme.and_then(|r| r.get("enzyme_name"))),
                cell(enzyme.and_then(|r| r.get("organism"))),
            ));
        }
    }

    let temperatures: Vec<(ReactionKey, Option<f64>)> = keys
        .iter()
        .map(|key| {
            (
                key.clone(),
                lookup(conditions, key)
                    .and_then(|r| r.get("temperature_celsius"))
                    .and_then(parse_numeric),
            )
        })
        .collect();
    if let Some((min, max)) = span(&temperatures) {
        report.line(&format!(
            "**Temperature span**: {} - {} °C (difference: {})",
            min,
            max,
            max - min
        ));
    }

    let phs: Vec<(ReactionKey, Option<f64>)> = keys
        .iter()
        .map(|key| {
            (
                key.clone(),
                lookup(conditions, key)
                    .and_then(|r| r.get("ph"))
                    .and_then(parse_numeric),
            )
        })
        .collect();
    if let Some((min, max)) = span(&phs) {
        report.line(&format!(
            "**pH span**: {} - {} (difference: {})",
            min,
            max,
            max - min
        ));
    }

    Ok(report.finish())
}
