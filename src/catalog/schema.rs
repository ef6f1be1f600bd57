use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::CatalogError;

static NULL_VALUE: Value = Value::Null;

/// The closed set of tables the visualizer knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableName {
    Employees,
    Departments,
    Offices,
}

impl TableName {
    /// All tables, in selector order
    pub const ALL: [TableName; 3] = [
        TableName::Employees,
        TableName::Departments,
        TableName::Offices,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TableName::Employees => "employees",
            TableName::Departments => "departments",
            TableName::Offices => "offices",
        }
    }

    /// Capitalized name used in diagram labels (e.g. "Employees")
    pub fn display_name(&self) -> &'static str {
        match self {
            TableName::Employees => "Employees",
            TableName::Departments => "Departments",
            TableName::Offices => "Offices",
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableName {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "employees" => Ok(TableName::Employees),
            "departments" => Ok(TableName::Departments),
            "offices" => Ok(TableName::Offices),
            _ => Err(CatalogError::UnknownTable {
                table: s.to_string(),
            }),
        }
    }
}

/// Scalar cell value. `Null` never compares equal in a join predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Text(String),
    Null,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// SQL equality: true only when both sides are non-null and equal.
    pub fn sql_eq(&self, other: &Value) -> bool {
        !self.is_null() && !other.is_null() && self == other
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Text(s) => f.write_str(s),
            Value::Null => f.write_str("NULL"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    Text,
}

impl ColumnType {
    /// Whether a non-null value fits this column type
    pub fn accepts(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (ColumnType::Integer, Value::Integer(_)) | (ColumnType::Text, Value::Text(_))
        )
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Integer => f.write_str("integer"),
            ColumnType::Text => f.write_str("text"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub primary_key: bool,
}

/// Declared column set of one table. Column names come from here, never
/// from sampling row data, so an empty table still knows its columns.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    pub name: TableName,
    pub columns: Vec<ColumnDef>,
}

impl TableSchema {
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Position of `column` in every row of this table
    pub fn column_index(&self, column: &str) -> Result<usize, CatalogError> {
        self.columns
            .iter()
            .position(|c| c.name == column)
            .ok_or_else(|| CatalogError::UnknownColumn {
                column: column.to_string(),
                table: self.name.to_string(),
            })
    }

    pub fn column(&self, column: &str) -> Result<&ColumnDef, CatalogError> {
        self.column_index(column).map(|i| &self.columns[i])
    }

    pub fn primary_key(&self) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.primary_key)
    }

    /// `<table>_<column>` names, in schema order
    pub fn namespaced_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| namespaced_column(self.name, &c.name))
            .collect()
    }
}

pub fn namespaced_column(table: TableName, column: &str) -> String {
    format!("{}_{}", table, column)
}

/// One table row; values are aligned with the owning table's `columns`.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Row { values }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Value of a column looked up by name; unknown names are rejected.
    pub fn get(&self, schema: &TableSchema, column: &str) -> Result<&Value, CatalogError> {
        let index = schema.column_index(column)?;
        Ok(self.value_at(index))
    }

    /// Value at a resolved column position
    pub fn value_at(&self, index: usize) -> &Value {
        self.values.get(index).unwrap_or(&NULL_VALUE)
    }
}
