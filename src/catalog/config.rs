use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;

use super::errors::CatalogError;
use super::relationships::{JoinKeys, RelationshipMap};
use super::schema::{ColumnDef, Row, TableName, TableSchema, Value};
use super::store::Catalog;

/// Dataset configuration: table schemas, their rows, and the declared
/// foreign-key relationships between them.
///
/// Datasets are defined in YAML with the following structure:
///
/// ```yaml
/// name: sql_joins_demo
/// tables:
///   - name: employees
///     columns:
///       - { name: emp_id, type: integer, primary_key: true }
///       - { name: dept_id, type: integer, nullable: true }
///     rows:
///       - { emp_id: 1, dept_id: 10 }
///   - name: departments
///     columns:
///       - { name: dept_id, type: integer, primary_key: true }
///     rows: []
///   - name: offices
///     columns:
///       - { name: office_id, type: integer, primary_key: true }
/// relationships:
///   - left_table: employees
///     left_key: dept_id
///     right_table: departments
///     right_key: dept_id
/// ```
///
/// A pair of tables without a relationship entry is unrelated: joins on it
/// never match, which is a legitimate state rather than an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Optional dataset name, shown in logs
    #[serde(default)]
    pub name: Option<String>,
    pub tables: Vec<TableDefinition>,
    #[serde(default)]
    pub relationships: Vec<RelationshipDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDefinition {
    pub name: TableName,
    pub columns: Vec<ColumnDef>,
    /// Rows keyed by column name; omitted nullable columns are null
    #[serde(default)]
    pub rows: Vec<BTreeMap<String, Value>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipDefinition {
    pub left_table: TableName,
    pub left_key: String,
    pub right_table: TableName,
    pub right_key: String,
}

impl From<&RelationshipDefinition> for JoinKeys {
    fn from(def: &RelationshipDefinition) -> Self {
        JoinKeys {
            left_table: def.left_table,
            left_key: def.left_key.clone(),
            right_table: def.right_table,
            right_key: def.right_key.clone(),
        }
    }
}

impl TableDefinition {
    pub fn schema(&self) -> TableSchema {
        TableSchema {
            name: self.name,
            columns: self.columns.clone(),
        }
    }

    /// Check the column declarations on their own
    fn validate_columns(&self) -> Result<(), CatalogError> {
        if self.columns.is_empty() {
            return Err(CatalogError::InvalidConfig {
                message: format!("Table '{}' must declare at least one column", self.name),
            });
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            if column.name.trim().is_empty() {
                return Err(CatalogError::InvalidConfig {
                    message: format!("Table '{}' has a column with an empty name", self.name),
                });
            }
            if !seen.insert(column.name.as_str()) {
                return Err(CatalogError::InvalidConfig {
                    message: format!(
                        "Duplicate column '{}' in table '{}'",
                        column.name, self.name
                    ),
                });
            }
        }

        let primary_keys: Vec<&ColumnDef> =
            self.columns.iter().filter(|c| c.primary_key).collect();
        if primary_keys.len() > 1 {
            return Err(CatalogError::InvalidConfig {
                message: format!(
                    "Table '{}' declares {} primary key columns; at most one is supported",
                    self.name,
                    primary_keys.len()
                ),
            });
        }
        if let Some(pk) = primary_keys.first() {
            if pk.nullable {
                return Err(CatalogError::InvalidConfig {
                    message: format!(
                        "Primary key column '{}' in table '{}' cannot be nullable",
                        pk.name, self.name
                    ),
                });
            }
        }

        Ok(())
    }

    /// Convert keyed rows to schema-aligned rows, checking each value
    fn build_rows(&self) -> Result<Vec<Row>, CatalogError> {
        let table = self.name.as_str();
        let pk_index = self.columns.iter().position(|c| c.primary_key);
        let mut seen_keys: HashSet<Value> = HashSet::new();
        let mut rows = Vec::with_capacity(self.rows.len());

        for (row_index, raw) in self.rows.iter().enumerate() {
            if let Some(unknown) = raw
                .keys()
                .find(|k| !self.columns.iter().any(|c| &c.name == *k))
            {
                return Err(CatalogError::row_error_with_context(
                    table,
                    row_index,
                    format!("column `{}` is not declared", unknown),
                ));
            }

            let mut values = Vec::with_capacity(self.columns.len());
            for column in &self.columns {
                let value = match raw.get(&column.name) {
                    Some(value) => value.clone(),
                    None if column.nullable => Value::Null,
                    None => {
                        return Err(CatalogError::row_error_with_context(
                            table,
                            row_index,
                            format!("missing value for non-nullable column `{}`", column.name),
                        ))
                    }
                };

                if value.is_null() {
                    if !column.nullable {
                        return Err(CatalogError::row_error_with_context(
                            table,
                            row_index,
                            format!("column `{}` is not nullable", column.name),
                        ));
                    }
                } else if !column.column_type.accepts(&value) {
                    return Err(CatalogError::row_error_with_context(
                        table,
                        row_index,
                        format!(
                            "value `{}` for column `{}` is not of type {}",
                            value, column.name, column.column_type
                        ),
                    ));
                }
                values.push(value);
            }

            if let Some(pk) = pk_index {
                if !seen_keys.insert(values[pk].clone()) {
                    return Err(CatalogError::row_error_with_context(
                        table,
                        row_index,
                        format!(
                            "duplicate primary key `{}` = {}",
                            self.columns[pk].name, values[pk]
                        ),
                    ));
                }
            }

            rows.push(Row::new(values));
        }

        Ok(rows)
    }
}

impl CatalogConfig {
    /// Load a dataset configuration from a YAML file
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path).map_err(|e| CatalogError::ConfigReadError {
            error: e.to_string(),
        })?;

        Self::from_yaml_str(&contents)
    }

    /// Parse a dataset configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        serde_yaml::from_str(yaml).map_err(|e| CatalogError::ConfigParseError {
            error: e.to_string(),
        })
    }

    /// Structural and data validation of the whole dataset
    pub fn validate(&self) -> Result<(), CatalogError> {
        self.validate_tables()?;
        for table in &self.tables {
            table.build_rows()?;
        }
        self.build_relationships()?;
        Ok(())
    }

    /// Every known table must be defined exactly once
    fn validate_tables(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for table in &self.tables {
            if !seen.insert(table.name) {
                return Err(CatalogError::InvalidConfig {
                    message: format!("Duplicate table definition: {}", table.name),
                });
            }
            table.validate_columns()?;
        }

        if let Some(missing) = TableName::ALL.iter().find(|t| !seen.contains(*t)) {
            return Err(CatalogError::InvalidConfig {
                message: format!("Dataset must define table '{}'", missing),
            });
        }

        Ok(())
    }

    /// Relationships must reference columns that exist on both sides with the same type
    fn build_relationships(&self) -> Result<RelationshipMap, CatalogError> {
        let schemas: HashMap<TableName, TableSchema> =
            self.tables.iter().map(|t| (t.name, t.schema())).collect();

        let mut map = RelationshipMap::new();
        for def in &self.relationships {
            let (left, right) = match (schemas.get(&def.left_table), schemas.get(&def.right_table)) {
                (Some(left), Some(right)) => (left, right),
                _ => {
                    return Err(CatalogError::relationship_error_with_context(
                        def.left_table.as_str(),
                        def.right_table.as_str(),
                        "both tables must be defined in the dataset",
                    ))
                }
            };

            let left_column = left.column(&def.left_key).map_err(|e| {
                CatalogError::relationship_error_with_context(
                    def.left_table.as_str(),
                    def.right_table.as_str(),
                    e.to_string(),
                )
            })?;
            let right_column = right.column(&def.right_key).map_err(|e| {
                CatalogError::relationship_error_with_context(
                    def.left_table.as_str(),
                    def.right_table.as_str(),
                    e.to_string(),
                )
            })?;

            if left_column.column_type != right_column.column_type {
                return Err(CatalogError::relationship_error_with_context(
                    def.left_table.as_str(),
                    def.right_table.as_str(),
                    format!(
                        "key types differ: {}.{} is {}, {}.{} is {}",
                        def.left_table,
                        def.left_key,
                        left_column.column_type,
                        def.right_table,
                        def.right_key,
                        right_column.column_type
                    ),
                ));
            }

            map.register(JoinKeys::from(def))?;
        }

        Ok(map)
    }

    /// Convert to an immutable catalog
    pub fn to_catalog(&self) -> Result<Catalog, CatalogError> {
        self.validate_tables()?;
        let relationships = self.build_relationships()?;

        let mut tables = HashMap::new();
        for table in &self.tables {
            let rows = table.build_rows()?;
            tables.insert(table.name, (table.schema(), rows));
        }

        let catalog = Catalog::new(
            self.name.clone().unwrap_or_else(|| "unnamed".to_string()),
            tables,
            relationships,
        )?;
        log::info!(
            "Loaded dataset '{}': {} tables, {} relationships",
            catalog.name(),
            self.tables.len(),
            self.relationships.len()
        );
        Ok(catalog)
    }
}
