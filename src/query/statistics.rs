//! Database statistics

use crate::data::ReactionDatabase;
use crate::error::QueryError;
use crate::report::Report;

/// Per-table row and column inventory, in canonical table order.
pub fn get_database_statistics(db: &ReactionDatabase) -> Result<String, QueryError> {
    if !db.is_ready() {
        return Err(QueryError::StoreNotLoaded);
    }

    let mut report = Report::new("Database statistics");
    report.line(&format!(
        "**Tables loaded**: {} (of 10)",
        db.loaded().count()
    ));

    for (id, table) in db.loaded() {
        report.heading(id.name());
        report.field("Rows", Some(&table.height().to_string()));
        let names: Vec<String> = table
            .df()
            .get_column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();
        report.field("Columns", Some(&names.len().to_string()));
        report.field("Column names", Some(&names.join(", ")));
    }

    Ok(report.finish())
}
