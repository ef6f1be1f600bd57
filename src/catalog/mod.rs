//! Schema store for the joins visualizer: table schemas, rows, and the
//! relationship map that decides which column pairs are joinable.

pub mod config;
pub mod errors;
pub mod relationships;
pub mod schema;
pub mod store;


pub use config::{CatalogConfig, RelationshipDefinition, TableDefinition};
pub use errors::CatalogError;
pub use relationships::{JoinKeys, RelationshipMap};
pub use schema::{namespaced_column, ColumnDef, ColumnType, Row, TableName, TableSchema, Value};
pub use store::{Catalog, SchemaStore};
