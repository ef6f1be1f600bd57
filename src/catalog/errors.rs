//! # Catalog Error Types
//!
//! Error handling for the schema store: dataset loading, table and column
//! lookup, and consistency validation of declared relationships.
//!
//! ## Error Categories
//!
//! - **Lookup Errors**: Unknown table identifiers or column names
//! - **Dataset Errors**: Rows that do not fit the declared table schema
//! - **Relationship Errors**: Join keys that do not exist on both sides
//! - **Configuration Errors**: File I/O and parsing issues during loading
//!
//! ## Usage Patterns
//!
//! When returning catalog errors, use context helpers to say where the
//! problem was found:
//!
//! ```ignore
//! CatalogError::row_error_with_context(
//!     "employees",
//!     3,
//!     "value for `dept_id` must be an integer"
//! )
//! ```

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("Unknown table `{table}`; expected one of employees, departments, offices")]
    UnknownTable { table: String },
    #[error("Column `{column}` not found in table `{table}`")]
    UnknownColumn { column: String, table: String },
    #[error("Invalid row {row} in table `{table}`: {message}")]
    InvalidRow {
        table: String,
        row: usize,
        message: String,
    },
    #[error("Invalid relationship {left_table} -> {right_table}: {message}")]
    InvalidRelationship {
        left_table: String,
        right_table: String,
        message: String,
    },
    #[error("Failed to read dataset file: {error}")]
    ConfigReadError { error: String },
    #[error("Failed to parse dataset: {error}")]
    ConfigParseError { error: String },
    #[error("Invalid dataset configuration: {message}")]
    InvalidConfig { message: String },
}

impl CatalogError {
    /// Create a row error, numbering rows from 1 as they appear in the file
    pub fn row_error_with_context(
        table: impl Into<String>,
        row_index: usize,
        message: impl Into<String>,
    ) -> Self {
        CatalogError::InvalidRow {
            table: table.into(),
            row: row_index + 1,
            message: message.into(),
        }
    }

    /// Create a relationship error for the declared `left -> right` pair
    pub fn relationship_error_with_context(
        left_table: impl Into<String>,
        right_table: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        CatalogError::InvalidRelationship {
            left_table: left_table.into(),
            right_table: right_table.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error with the file path and what was being loaded
    ///
    /// # Example
    /// ```ignore
    /// CatalogError::config_error_with_context(
    ///     "datasets/custom.yaml",
    ///     "While loading the table definitions at startup"
    /// )
    /// ```
    pub fn config_error_with_context(
        config_path: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        CatalogError::InvalidConfig {
            message: format!(
                "Configuration error in '{}': failed to load\n  Context: {}",
                config_path.into(),
                context.into()
            ),
        }
    }
}
