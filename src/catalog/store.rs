use lazy_static::lazy_static;
use std::collections::HashMap;

use super::config::CatalogConfig;
use super::errors::CatalogError;
use super::relationships::RelationshipMap;
use super::schema::{Row, TableName, TableSchema};

const BUILTIN_DATASET: &str = include_str!("../../schemas/joins_dataset.yaml");

lazy_static! {
    static ref BUILTIN_CATALOG: Result<Catalog, CatalogError> =
        CatalogConfig::from_yaml_str(BUILTIN_DATASET).and_then(|config| config.to_catalog());
}

/// Read-only access to table schemas, rows, and relationships.
///
/// Join evaluation and statistics only ever read through this trait, so any
/// immutable source of the three tables can back them.
pub trait SchemaStore {
    fn table_schema(&self, table: TableName) -> &TableSchema;

    fn rows(&self, table: TableName) -> &[Row];

    fn relationships(&self) -> &RelationshipMap;

    /// Declared column names; available even when the table has no rows
    fn column_names(&self, table: TableName) -> Vec<&str> {
        self.table_schema(table).column_names()
    }
}

#[derive(Debug, Clone)]
struct TableData {
    schema: TableSchema,
    rows: Vec<Row>,
}

/// Immutable, validated dataset.
#[derive(Debug, Clone)]
pub struct Catalog {
    name: String,
    tables: HashMap<TableName, TableData>,
    relationships: RelationshipMap,
}

impl Catalog {
    pub fn new(
        name: String,
        tables: HashMap<TableName, (TableSchema, Vec<Row>)>,
        relationships: RelationshipMap,
    ) -> Result<Self, CatalogError> {
        if let Some(missing) = TableName::ALL.iter().find(|t| !tables.contains_key(*t)) {
            return Err(CatalogError::InvalidConfig {
                message: format!("Dataset must define table '{}'", missing),
            });
        }

        let tables = tables
            .into_iter()
            .map(|(name, (schema, rows))| (name, TableData { schema, rows }))
            .collect();

        Ok(Catalog {
            name,
            tables,
            relationships,
        })
    }

    /// The bundled employees/departments/offices dataset, parsed once per process
    pub fn builtin() -> Result<&'static Catalog, CatalogError> {
        BUILTIN_CATALOG.as_ref().map_err(Clone::clone)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        CatalogConfig::from_yaml_str(yaml)?.to_catalog()
    }

    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let config = CatalogConfig::from_yaml_file(path).map_err(|e| match e {
            CatalogError::ConfigReadError { .. } => CatalogError::config_error_with_context(
                path.display().to_string(),
                format!("While reading the dataset file: {}", e),
            ),
            other => other,
        })?;
        config.to_catalog()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn table(&self, table: TableName) -> &TableData {
        // Catalog::new guarantees every TableName is present
        &self.tables[&table]
    }
}

impl SchemaStore for Catalog {
    fn table_schema(&self, table: TableName) -> &TableSchema {
        &self.table(table).schema
    }

    fn rows(&self, table: TableName) -> &[Row] {
        &self.table(table).rows
    }

    fn relationships(&self) -> &RelationshipMap {
        &self.relationships
    }
}
