use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::errors::CatalogError;
use super::schema::TableName;

/// Join-key columns for an ordered table pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinKeys {
    pub left_table: TableName,
    pub left_key: String,
    pub right_table: TableName,
    pub right_key: String,
}

impl JoinKeys {
    /// The same relationship seen from the other table
    pub fn reversed(&self) -> Self {
        JoinKeys {
            left_table: self.right_table,
            left_key: self.right_key.clone(),
            right_table: self.left_table,
            right_key: self.left_key.clone(),
        }
    }
}

impl fmt::Display for JoinKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} = {}.{}",
            self.left_table, self.left_key, self.right_table, self.right_key
        )
    }
}

/// Single source of truth for which column pairs are joinable.
///
/// Every declared relationship is reachable from both directions, so
/// `resolve(departments, employees)` yields `dept_id`/`dept_id` just like
/// `resolve(employees, departments)`. Pairs that were never declared resolve
/// to `None`, which callers treat as "no rows can match".
#[derive(Debug, Clone, Default)]
pub struct RelationshipMap {
    by_pair: HashMap<(TableName, TableName), JoinKeys>,
    declared: Vec<JoinKeys>,
}

impl RelationshipMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, keys: JoinKeys) -> Result<(), CatalogError> {
        if keys.left_table == keys.right_table {
            return Err(CatalogError::relationship_error_with_context(
                keys.left_table.as_str(),
                keys.right_table.as_str(),
                "a table cannot be related to itself",
            ));
        }
        if self.is_related(keys.left_table, keys.right_table) {
            return Err(CatalogError::relationship_error_with_context(
                keys.left_table.as_str(),
                keys.right_table.as_str(),
                "the table pair already has a relationship",
            ));
        }

        let reversed = keys.reversed();
        self.by_pair
            .insert((reversed.left_table, reversed.right_table), reversed);
        self.by_pair
            .insert((keys.left_table, keys.right_table), keys.clone());
        self.declared.push(keys);
        Ok(())
    }

    pub fn resolve(&self, left: TableName, right: TableName) -> Option<&JoinKeys> {
        self.by_pair.get(&(left, right))
    }

    pub fn is_related(&self, left: TableName, right: TableName) -> bool {
        self.by_pair.contains_key(&(left, right))
    }

    /// Declared relationships, once each, in declaration order
    pub fn edges(&self) -> &[JoinKeys] {
        &self.declared
    }
}
