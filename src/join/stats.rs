//! Set-overlap counts for the join diagram.
//!
//! These are cardinality estimates computed from key frequencies, not from
//! materialized rows. `overlap` counts left rows whose key value occurs on
//! the right, so it equals the INNER JOIN row count only while every key
//! value is unique on each side. With repeated keys the two diverge; the
//! diagram sizing relies on the row-multiplicity definition.

use serde::Serialize;
use std::collections::HashMap;

use super::errors::{parse_table, JoinError};
use super::JoinType;
use crate::catalog::{Row, SchemaStore, TableName, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct JoinStats {
    pub left_only: usize,
    pub right_only: usize,
    pub overlap: usize,
    pub total: usize,
}

impl JoinStats {
    pub fn has_overlap(&self) -> bool {
        self.overlap > 0
    }
}

/// Non-null key value -> number of rows carrying it
fn key_frequencies(rows: &[Row], key_position: usize) -> HashMap<&Value, usize> {
    let mut frequencies = HashMap::new();
    for value in rows.iter().map(|row| row.value_at(key_position)) {
        if !value.is_null() {
            *frequencies.entry(value).or_insert(0) += 1;
        }
    }
    frequencies
}

/// Rows on `side` whose key value also occurs in `other`
fn matching_rows(side: &HashMap<&Value, usize>, other: &HashMap<&Value, usize>) -> usize {
    side.iter()
        .filter(|(value, _)| other.contains_key(*value))
        .map(|(_, count)| count)
        .sum()
}

pub fn calculate_join_stats<S: SchemaStore + ?Sized>(
    store: &S,
    left: TableName,
    right: TableName,
    join_type: JoinType,
) -> Result<JoinStats, JoinError> {
    if left == right {
        return Err(JoinError::SelfJoin(left));
    }

    let left_rows = store.rows(left);
    let right_rows = store.rows(right);

    if join_type == JoinType::Cross {
        let total = left_rows.len() * right_rows.len();
        return Ok(JoinStats {
            left_only: 0,
            right_only: 0,
            overlap: total,
            total,
        });
    }

    let (overlap, right_matches) = match store.relationships().resolve(left, right) {
        Some(keys) => {
            let left_key = store.table_schema(left).column_index(&keys.left_key)?;
            let right_key = store.table_schema(right).column_index(&keys.right_key)?;
            let left_frequencies = key_frequencies(left_rows, left_key);
            let right_frequencies = key_frequencies(right_rows, right_key);
            (
                matching_rows(&left_frequencies, &right_frequencies),
                matching_rows(&right_frequencies, &left_frequencies),
            )
        }
        None => (0, 0),
    };

    let left_only = left_rows.len() - overlap;
    let right_only = right_rows.len() - right_matches;

    let total = match join_type {
        JoinType::Inner => overlap,
        JoinType::Left => left_rows.len(),
        JoinType::Right => right_rows.len(),
        JoinType::Full => left_only + overlap + right_only,
        JoinType::Cross => left_rows.len() * right_rows.len(),
    };

    log::debug!(
        "{} stats for {} / {}: left_only={} right_only={} overlap={} total={}",
        join_type.label(),
        left,
        right,
        left_only,
        right_only,
        overlap,
        total
    );

    Ok(JoinStats {
        left_only,
        right_only,
        overlap,
        total,
    })
}

/// String-level entry point with the same fail-fast parsing as the evaluator
pub fn calculate_join_stats_by_name<S: SchemaStore + ?Sized>(
    store: &S,
    left: &str,
    right: &str,
    join_type: &str,
) -> Result<JoinStats, JoinError> {
    let left = parse_table(left)?;
    let right = parse_table(right)?;
    let join_type = join_type.parse::<JoinType>()?;
    calculate_join_stats(store, left, right, join_type)
}
