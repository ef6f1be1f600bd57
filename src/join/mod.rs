//! Join evaluation over the schema store.
//!
//! - `evaluator`: materializes INNER / LEFT / RIGHT / FULL / CROSS results
//! - `stats`: set-overlap counts that size the join diagram, computed
//!   without materializing any rows
//!
//! Both read through [`SchemaStore`](crate::catalog::SchemaStore) and the
//! relationship map only; neither depends on the other.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::catalog::{TableName, Value};

pub mod errors;
pub mod evaluator;
pub mod stats;

pub use errors::{parse_table, JoinError};
pub use evaluator::JoinEvaluator;
pub use stats::{calculate_join_stats, calculate_join_stats_by_name, JoinStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinType {
    /// All join types, in selector order
    pub const ALL: [JoinType; 5] = [
        JoinType::Inner,
        JoinType::Left,
        JoinType::Right,
        JoinType::Full,
        JoinType::Cross,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER",
            JoinType::Left => "LEFT",
            JoinType::Right => "RIGHT",
            JoinType::Full => "FULL",
            JoinType::Cross => "CROSS",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
            JoinType::Full => "FULL OUTER JOIN",
            JoinType::Cross => "CROSS JOIN",
        }
    }

    /// One-line explanation shown next to the diagram
    pub fn description(&self) -> &'static str {
        match self {
            JoinType::Inner => "Only matching rows from both tables",
            JoinType::Left => "All rows from left table, matching rows from right",
            JoinType::Right => "All rows from right table, matching rows from left",
            JoinType::Full => "All rows from both tables",
            JoinType::Cross => "All possible combinations of rows",
        }
    }

    /// Whether the join compares key columns at all
    pub fn uses_keys(&self) -> bool {
        !matches!(self, JoinType::Cross)
    }

    /// Parse a join type, applying `policy` when the text is not recognised.
    pub fn parse_with_policy(text: &str, policy: UnknownJoinPolicy) -> Result<Self, JoinError> {
        match text.parse::<JoinType>() {
            Ok(join_type) => Ok(join_type),
            Err(err) => match policy {
                UnknownJoinPolicy::Reject => Err(err),
                UnknownJoinPolicy::DefaultInner => {
                    log::warn!("Unknown join type `{}`, falling back to INNER", text);
                    Ok(JoinType::Inner)
                }
            },
        }
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JoinType {
    type Err = JoinError;

    /// Accepts `INNER`, `LEFT [OUTER]`, `RIGHT [OUTER]`, `FULL [OUTER]`,
    /// `OUTER` and `CROSS`, case-insensitively, with an optional trailing `JOIN`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase();
        let normalized = normalized
            .strip_suffix(" JOIN")
            .unwrap_or(normalized.as_str());

        match normalized {
            "INNER" => Ok(JoinType::Inner),
            "LEFT" | "LEFT OUTER" => Ok(JoinType::Left),
            "RIGHT" | "RIGHT OUTER" => Ok(JoinType::Right),
            "FULL" | "FULL OUTER" | "OUTER" => Ok(JoinType::Full),
            "CROSS" => Ok(JoinType::Cross),
            _ => Err(JoinError::UnknownJoinType(s.to_string())),
        }
    }
}

/// What to do with a join type that cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownJoinPolicy {
    /// Fail with `JoinError::UnknownJoinType`
    #[default]
    Reject,
    /// Evaluate as INNER and log a warning
    #[serde(rename = "inner")]
    DefaultInner,
}

#[derive(Debug, Error)]
#[error("Unknown join policy `{0}`; expected `reject` or `inner`")]
pub struct ParseJoinPolicyError(String);

impl FromStr for UnknownJoinPolicy {
    type Err = ParseJoinPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(UnknownJoinPolicy::Reject),
            "inner" => Ok(UnknownJoinPolicy::DefaultInner),
            _ => Err(ParseJoinPolicyError(s.to_string())),
        }
    }
}

/// One output row: namespaced column name (`<table>_<column>`) to value,
/// left-table columns first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JoinedRow {
    cells: Vec<(String, Value)>,
}

impl JoinedRow {
    pub fn with_capacity(capacity: usize) -> Self {
        JoinedRow {
            cells: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, column: String, value: Value) {
        self.cells.push((column, value));
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.cells.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Serialize for JoinedRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (name, value) in &self.cells {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Ordered join output plus the column header, which is known from the
/// schemas even when there are no rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinResult {
    pub left_table: TableName,
    pub right_table: TableName,
    pub join_type: JoinType,
    pub columns: Vec<String>,
    pub rows: Vec<JoinedRow>,
}

impl JoinResult {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
