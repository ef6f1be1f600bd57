//! Terminal rendering of join results, source datasets, and diagram numbers.

use prettytable::{Cell, Row as TableRow, Table};
use serde::Serialize;

use crate::catalog::{SchemaStore, TableName};
use crate::join::{JoinResult, JoinStats, JoinType};

const EMPTY_RESULT: &str = "No matching results for this join";

fn elided_line(shown: usize, total: usize) -> Option<String> {
    (total > shown).then(|| format!("... {} more rows not shown ({} total)", total - shown, total))
}

/// Result rows as a table, header from the schema-derived column list
pub fn result_table(result: &JoinResult, max_rows: usize) -> String {
    if result.is_empty() {
        return EMPTY_RESULT.to_string();
    }

    let mut table = Table::new();
    table.set_titles(TableRow::new(
        result.columns.iter().map(|c| Cell::new(c)).collect(),
    ));
    for row in result.rows.iter().take(max_rows) {
        table.add_row(TableRow::new(
            row.iter().map(|(_, value)| Cell::new(&value.to_string())).collect(),
        ));
    }

    let mut out = table.to_string();
    if let Some(line) = elided_line(max_rows.min(result.len()), result.len()) {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// One input table as stored, with its declared columns
pub fn source_table<S: SchemaStore + ?Sized>(store: &S, table: TableName, max_rows: usize) -> String {
    let rows = store.rows(table);
    let mut out = format!("{} ({} rows)\n", table.display_name(), rows.len());

    let mut grid = Table::new();
    grid.set_titles(TableRow::new(
        store.column_names(table).into_iter().map(Cell::new).collect(),
    ));
    for row in rows.iter().take(max_rows) {
        grid.add_row(TableRow::new(
            row.values()
                .iter()
                .map(|value| Cell::new(&value.to_string()))
                .collect(),
        ));
    }
    out.push_str(&grid.to_string());
    if let Some(line) = elided_line(max_rows.min(rows.len()), rows.len()) {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Join condition for the pair, or the "no direct relationship" notice
pub fn relationship_summary<S: SchemaStore + ?Sized>(
    store: &S,
    left: TableName,
    right: TableName,
) -> String {
    match store.relationships().resolve(left, right) {
        Some(keys) => format!("ON {}", keys),
        None => format!(
            "No Direct Relationship: {} and {} don't share a foreign key relationship",
            left.display_name(),
            right.display_name()
        ),
    }
}

/// Every declared relationship, once each
pub fn relationships_listing<S: SchemaStore + ?Sized>(store: &S) -> String {
    let edges = store.relationships().edges();
    if edges.is_empty() {
        return "No relationships declared".to_string();
    }
    edges
        .iter()
        .map(|keys| format!("{}\n", keys))
        .collect()
}

/// Diagram numbers with the join label and description
pub fn stats_summary(
    left: TableName,
    right: TableName,
    join_type: JoinType,
    stats: &JoinStats,
) -> String {
    format!(
        "{}: {}\n{} only: {} | Overlap: {} | {} only: {} | Total rows: {}\n",
        join_type.label(),
        join_type.description(),
        left.display_name(),
        stats.left_only,
        stats.overlap,
        right.display_name(),
        stats.right_only,
        stats.total
    )
}

#[derive(Serialize)]
struct JoinReport<'a> {
    relationship: Option<String>,
    stats: &'a JoinStats,
    #[serde(flatten)]
    result: &'a JoinResult,
}

/// Result, stats and join condition as a single JSON document
pub fn render_json<S: SchemaStore + ?Sized>(
    store: &S,
    result: &JoinResult,
    stats: &JoinStats,
) -> Result<String, serde_json::Error> {
    let relationship = if result.join_type == JoinType::Cross {
        None
    } else {
        store
            .relationships()
            .resolve(result.left_table, result.right_table)
            .map(|keys| keys.to_string())
    };
    serde_json::to_string_pretty(&JoinReport {
        relationship,
        stats,
        result,
    })
}
