use thiserror::Error;

use crate::catalog::{CatalogError, TableName};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum JoinError {
    #[error("Unknown table `{0}`; expected one of employees, departments, offices")]
    UnknownTable(String),

    #[error("Unknown join type `{0}`; expected one of INNER, LEFT, RIGHT, FULL, CROSS")]
    UnknownJoinType(String),

    #[error("Cannot join table `{0}` with itself: both sides would share the same column names")]
    SelfJoin(TableName),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Parse a table identifier supplied by a caller, failing fast on anything unknown
pub fn parse_table(name: &str) -> Result<TableName, JoinError> {
    name.parse::<TableName>().map_err(|e| match e {
        CatalogError::UnknownTable { table } => JoinError::UnknownTable(table),
        other => JoinError::Catalog(other),
    })
}
