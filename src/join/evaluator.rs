//! Nested-loop join evaluation.
//!
//! Every join type compares `left[left_key]` with `right[right_key]` using
//! SQL equality: both values must be non-null and equal, so NULL never
//! matches anything (including another NULL). When the pair has no declared
//! relationship every comparison is non-matching. CROSS ignores keys.

use super::errors::{parse_table, JoinError};
use super::{JoinResult, JoinType, JoinedRow};
use crate::catalog::{Row, SchemaStore, TableName, Value};

/// Computes join results from a schema store. Holds no state besides the
/// store reference, so repeated calls with the same inputs are identical.
pub struct JoinEvaluator<'a, S: SchemaStore + ?Sized> {
    store: &'a S,
}

/// Everything one join needs, resolved once up front.
struct JoinInputs<'s> {
    left: TableName,
    right: TableName,
    left_rows: &'s [Row],
    right_rows: &'s [Row],
    /// Column positions of the join keys; `None` for unrelated tables
    key_positions: Option<(usize, usize)>,
    left_columns: Vec<String>,
    right_columns: Vec<String>,
}

impl JoinInputs<'_> {
    fn matches(&self, left_row: &Row, right_row: &Row) -> bool {
        match self.key_positions {
            Some((left_key, right_key)) => left_row
                .value_at(left_key)
                .sql_eq(right_row.value_at(right_key)),
            None => false,
        }
    }

    /// Merge two rows; a missing side contributes NULL for each of its columns
    fn combine(&self, left_row: Option<&Row>, right_row: Option<&Row>) -> JoinedRow {
        let mut joined = JoinedRow::with_capacity(self.left_columns.len() + self.right_columns.len());
        for (index, column) in self.left_columns.iter().enumerate() {
            let value = left_row.map_or(Value::Null, |row| row.value_at(index).clone());
            joined.push(column.clone(), value);
        }
        for (index, column) in self.right_columns.iter().enumerate() {
            let value = right_row.map_or(Value::Null, |row| row.value_at(index).clone());
            joined.push(column.clone(), value);
        }
        joined
    }

    /// Every left row, once per match or once with a NULL right side
    fn left_outer_rows(&self) -> Vec<JoinedRow> {
        let mut rows = Vec::with_capacity(self.left_rows.len());
        for left_row in self.left_rows {
            let mut matched = false;
            for right_row in self.right_rows {
                if self.matches(left_row, right_row) {
                    rows.push(self.combine(Some(left_row), Some(right_row)));
                    matched = true;
                }
            }
            if !matched {
                rows.push(self.combine(Some(left_row), None));
            }
        }
        rows
    }

    /// Right rows that match no left row, with a NULL left side
    fn right_only_rows(&self) -> impl Iterator<Item = JoinedRow> + '_ {
        self.right_rows
            .iter()
            .filter(|right_row| {
                !self
                    .left_rows
                    .iter()
                    .any(|left_row| self.matches(left_row, right_row))
            })
            .map(|right_row| self.combine(None, Some(right_row)))
    }

    fn finish(self, join_type: JoinType, rows: Vec<JoinedRow>) -> JoinResult {
        log::debug!(
            "{} {} {} produced {} rows",
            self.left,
            join_type.label(),
            self.right,
            rows.len()
        );
        let mut columns = self.left_columns;
        columns.extend(self.right_columns);
        JoinResult {
            left_table: self.left,
            right_table: self.right,
            join_type,
            columns,
            rows,
        }
    }
}

impl<'a, S: SchemaStore + ?Sized> JoinEvaluator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        JoinEvaluator { store }
    }

    /// Dispatch to the join named by `join_type`
    pub fn perform_join(
        &self,
        left: TableName,
        right: TableName,
        join_type: JoinType,
    ) -> Result<JoinResult, JoinError> {
        match join_type {
            JoinType::Inner => self.inner_join(left, right),
            JoinType::Left => self.left_join(left, right),
            JoinType::Right => self.right_join(left, right),
            JoinType::Full => self.full_join(left, right),
            JoinType::Cross => self.cross_join(left, right),
        }
    }

    /// String-level entry point: unknown tables or join types are errors,
    /// never an empty result.
    pub fn perform_join_by_name(
        &self,
        left: &str,
        right: &str,
        join_type: &str,
    ) -> Result<JoinResult, JoinError> {
        let left = parse_table(left)?;
        let right = parse_table(right)?;
        let join_type = join_type.parse::<JoinType>()?;
        self.perform_join(left, right, join_type)
    }

    pub fn inner_join(&self, left: TableName, right: TableName) -> Result<JoinResult, JoinError> {
        let inputs = self.inputs(left, right)?;
        let mut rows = Vec::new();
        for left_row in inputs.left_rows {
            for right_row in inputs.right_rows {
                if inputs.matches(left_row, right_row) {
                    rows.push(inputs.combine(Some(left_row), Some(right_row)));
                }
            }
        }
        Ok(inputs.finish(JoinType::Inner, rows))
    }

    pub fn left_join(&self, left: TableName, right: TableName) -> Result<JoinResult, JoinError> {
        let inputs = self.inputs(left, right)?;
        let rows = inputs.left_outer_rows();
        Ok(inputs.finish(JoinType::Left, rows))
    }

    /// Mirror of LEFT: rows follow the right table, columns keep left-then-right order.
    pub fn right_join(&self, left: TableName, right: TableName) -> Result<JoinResult, JoinError> {
        let inputs = self.inputs(left, right)?;
        let mut rows = Vec::with_capacity(inputs.right_rows.len());
        for right_row in inputs.right_rows {
            let mut matched = false;
            for left_row in inputs.left_rows {
                if inputs.matches(left_row, right_row) {
                    rows.push(inputs.combine(Some(left_row), Some(right_row)));
                    matched = true;
                }
            }
            if !matched {
                rows.push(inputs.combine(None, Some(right_row)));
            }
        }
        Ok(inputs.finish(JoinType::Right, rows))
    }

    /// LEFT result followed by the right-only rows of the RIGHT result, so
    /// matched pairs appear exactly once.
    pub fn full_join(&self, left: TableName, right: TableName) -> Result<JoinResult, JoinError> {
        let inputs = self.inputs(left, right)?;
        let mut rows = inputs.left_outer_rows();
        rows.extend(inputs.right_only_rows());
        Ok(inputs.finish(JoinType::Full, rows))
    }

    pub fn cross_join(&self, left: TableName, right: TableName) -> Result<JoinResult, JoinError> {
        let inputs = self.inputs(left, right)?;
        let mut rows = Vec::with_capacity(inputs.left_rows.len() * inputs.right_rows.len());
        for left_row in inputs.left_rows {
            for right_row in inputs.right_rows {
                rows.push(inputs.combine(Some(left_row), Some(right_row)));
            }
        }
        Ok(inputs.finish(JoinType::Cross, rows))
    }

    fn inputs(&self, left: TableName, right: TableName) -> Result<JoinInputs<'a>, JoinError> {
        if left == right {
            return Err(JoinError::SelfJoin(left));
        }

        let left_schema = self.store.table_schema(left);
        let right_schema = self.store.table_schema(right);

        let key_positions = match self.store.relationships().resolve(left, right) {
            Some(keys) => Some((
                left_schema.column_index(&keys.left_key)?,
                right_schema.column_index(&keys.right_key)?,
            )),
            None => {
                log::debug!(
                    "No relationship between {} and {}; keyed comparisons never match",
                    left,
                    right
                );
                None
            }
        };

        Ok(JoinInputs {
            left,
            right,
            left_rows: self.store.rows(left),
            right_rows: self.store.rows(right),
            key_positions,
            left_columns: left_schema.namespaced_columns(),
            right_columns: right_schema.namespaced_columns(),
        })
    }
}
