//! Diagram statistics checked against materialized join results

use joinviz::catalog::{Catalog, SchemaStore, TableName};
use joinviz::join::{calculate_join_stats, JoinEvaluator, JoinStats, JoinType};
use joinviz::render;
use test_case::test_case;

use TableName::{Departments as D, Employees as E, Offices as O};

fn stats(left: TableName, right: TableName, join_type: JoinType) -> JoinStats {
    calculate_join_stats(Catalog::builtin().unwrap(), left, right, join_type).unwrap()
}

fn row_count(left: TableName, right: TableName, join_type: JoinType) -> usize {
    JoinEvaluator::new(Catalog::builtin().unwrap())
        .perform_join(left, right, join_type)
        .unwrap()
        .len()
}

#[test_case(E, D, 3, 5, 1; "employees and departments")]
#[test_case(D, E, 1, 3, 3; "departments and employees")]
#[test_case(E, O, 2, 6, 1; "employees and offices")]
#[test_case(O, E, 1, 3, 2; "offices and employees")]
#[test_case(D, O, 4, 0, 4; "unrelated pair")]
fn test_overlap_counts(
    left: TableName,
    right: TableName,
    left_only: usize,
    overlap: usize,
    right_only: usize,
) {
    let stats = stats(left, right, JoinType::Inner);
    assert_eq!(stats.left_only, left_only);
    assert_eq!(stats.overlap, overlap);
    assert_eq!(stats.right_only, right_only);
}

#[test]
fn test_partition_adds_up() {
    let catalog = Catalog::builtin().unwrap();
    for left in TableName::ALL {
        for right in TableName::ALL.into_iter().filter(|r| *r != left) {
            let stats = stats(left, right, JoinType::Left);
            assert_eq!(stats.left_only + stats.overlap, catalog.rows(left).len());
            assert!(stats.right_only <= catalog.rows(right).len());
        }
    }
}

/// With unique keys on the right side the estimates equal the real row
/// counts for INNER, LEFT and FULL.
#[test_case(E, D; "departments keys are unique")]
#[test_case(E, O; "office keys are unique")]
#[test_case(D, O; "unrelated")]
#[test_case(O, D; "unrelated reversed")]
fn test_stats_match_rows_when_right_keys_unique(left: TableName, right: TableName) {
    for join_type in [JoinType::Inner, JoinType::Left, JoinType::Full] {
        assert_eq!(
            stats(left, right, join_type).total,
            row_count(left, right, join_type),
            "{}",
            join_type.label()
        );
    }
    assert_eq!(
        stats(left, right, JoinType::Inner).overlap,
        row_count(left, right, JoinType::Inner)
    );
}

#[test]
fn test_right_total_counts_right_rows_not_result_rows() {
    // RIGHT total is the size of the right table; matched right rows with
    // several partners make the real result larger.
    assert_eq!(stats(E, D, JoinType::Right).total, 4);
    assert_eq!(row_count(E, D, JoinType::Right), 6);
}

#[test]
fn test_overlap_diverges_from_inner_rows_on_repeated_keys() {
    // Departments 10 and 20 each have two employees: overlap counts the two
    // department rows once, INNER produces one row per pair.
    let from_departments = stats(D, E, JoinType::Inner);
    assert_eq!(from_departments.overlap, 3);
    assert_eq!(from_departments.total, 3);
    assert_eq!(row_count(D, E, JoinType::Inner), 5);

    let full = stats(D, E, JoinType::Full);
    assert_eq!(full.total, 7);
    assert_eq!(row_count(D, E, JoinType::Full), 9);

    // Seen from the other side the keys are unique again
    assert_eq!(stats(E, D, JoinType::Inner).overlap, 5);
}

#[test_case(E, D; "employees and departments")]
#[test_case(O, D; "unrelated")]
fn test_cross_stats(left: TableName, right: TableName) {
    let catalog = Catalog::builtin().unwrap();
    let product = catalog.rows(left).len() * catalog.rows(right).len();
    assert_eq!(
        stats(left, right, JoinType::Cross),
        JoinStats {
            left_only: 0,
            right_only: 0,
            overlap: product,
            total: product,
        }
    );
    assert_eq!(row_count(left, right, JoinType::Cross), product);
}

#[test]
fn test_stats_summary_for_builtin_join() {
    let out = render::stats_summary(E, O, JoinType::Left, &stats(E, O, JoinType::Left));
    assert!(out.starts_with("LEFT JOIN:"));
    assert!(out.contains("Employees only: 2 | Overlap: 6 | Offices only: 1 | Total rows: 8"));
}
