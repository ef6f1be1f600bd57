//! Properties every join result must satisfy, checked on all table pairs

use std::collections::HashSet;

use joinviz::catalog::{Catalog, SchemaStore, TableName, Value};
use joinviz::join::{JoinError, JoinEvaluator, JoinResult, JoinType};

fn ordered_pairs() -> Vec<(TableName, TableName)> {
    let mut pairs = Vec::new();
    for left in TableName::ALL {
        for right in TableName::ALL {
            if left != right {
                pairs.push((left, right));
            }
        }
    }
    pairs
}

fn join(left: TableName, right: TableName, join_type: JoinType) -> JoinResult {
    let catalog = Catalog::builtin().unwrap();
    JoinEvaluator::new(catalog)
        .perform_join(left, right, join_type)
        .unwrap()
}

/// Rows whose columns from `table` are all NULL
fn null_side_rows(result: &JoinResult, table: TableName) -> usize {
    let prefix = format!("{}_", table);
    result
        .rows
        .iter()
        .filter(|row| {
            row.iter()
                .filter(|(column, _)| column.starts_with(&prefix))
                .all(|(_, value)| value.is_null())
        })
        .count()
}

#[test]
fn test_joins_are_repeatable() {
    for (left, right) in ordered_pairs() {
        for join_type in JoinType::ALL {
            assert_eq!(join(left, right, join_type), join(left, right, join_type));
        }
    }
}

#[test]
fn test_every_row_has_the_full_column_union() {
    let catalog = Catalog::builtin().unwrap();
    for (left, right) in ordered_pairs() {
        let expected: Vec<String> = catalog
            .table_schema(left)
            .namespaced_columns()
            .into_iter()
            .chain(catalog.table_schema(right).namespaced_columns())
            .collect();

        for join_type in JoinType::ALL {
            let result = join(left, right, join_type);
            assert_eq!(result.columns, expected);
            for row in &result.rows {
                assert_eq!(row.column_names().collect::<Vec<_>>(), expected);
            }
        }
    }
}

#[test]
fn test_left_join_keeps_every_left_row() {
    let catalog = Catalog::builtin().unwrap();
    for (left, right) in ordered_pairs() {
        let result = join(left, right, JoinType::Left);
        assert!(result.len() >= catalog.rows(left).len());

        let left_pk = format!("{}_{}", left, catalog.table_schema(left).columns[0].name);
        let seen: HashSet<&Value> = result.rows.iter().filter_map(|r| r.get(&left_pk)).collect();
        assert_eq!(seen.len(), catalog.rows(left).len());
    }
}

#[test]
fn test_right_join_mirrors_left_join() {
    for (left, right) in ordered_pairs() {
        let right_join = join(left, right, JoinType::Right);
        let mirrored = join(right, left, JoinType::Left);
        assert_eq!(right_join.len(), mirrored.len());
        assert_eq!(
            null_side_rows(&right_join, left),
            null_side_rows(&mirrored, left)
        );
    }
}

#[test]
fn test_full_join_is_left_plus_unmatched_right() {
    for (left, right) in ordered_pairs() {
        let full = join(left, right, JoinType::Full);
        let left_join = join(left, right, JoinType::Left);
        let right_join = join(left, right, JoinType::Right);

        let unmatched_right = null_side_rows(&right_join, left);
        assert_eq!(full.len(), left_join.len() + unmatched_right);
        assert_eq!(&full.rows[..left_join.len()], &left_join.rows[..]);
    }
}

#[test]
fn test_inner_join_is_contained_in_outer_joins() {
    for (left, right) in ordered_pairs() {
        let inner = join(left, right, JoinType::Inner);
        let left_join = join(left, right, JoinType::Left);
        let right_join = join(left, right, JoinType::Right);
        for row in &inner.rows {
            assert!(left_join.rows.contains(row));
            assert!(right_join.rows.contains(row));
        }
        assert_eq!(null_side_rows(&inner, left), 0);
        assert_eq!(null_side_rows(&inner, right), 0);
    }
}

#[test]
fn test_cross_join_is_cartesian_product() {
    let catalog = Catalog::builtin().unwrap();
    for (left, right) in ordered_pairs() {
        let cross = join(left, right, JoinType::Cross);
        assert_eq!(
            cross.len(),
            catalog.rows(left).len() * catalog.rows(right).len()
        );
    }
}

#[test]
fn test_null_keys_never_match() {
    let result = join(TableName::Employees, TableName::Departments, JoinType::Left);

    for name in ["David", "Grace"] {
        let row = result
            .rows
            .iter()
            .find(|row| row.get("employees_name") == Some(&Value::from(name)))
            .unwrap();
        assert_eq!(row.get("employees_dept_id"), Some(&Value::Null));
        assert_eq!(row.get("departments_dept_name"), Some(&Value::Null));
    }

    let inner = join(TableName::Employees, TableName::Departments, JoinType::Inner);
    assert!(inner
        .rows
        .iter()
        .all(|row| !row.get("employees_dept_id").unwrap().is_null()));
}

#[test]
fn test_dangling_key_behaves_like_unmatched() {
    // Heidi's dept_id 50 has no department
    let result = join(TableName::Employees, TableName::Departments, JoinType::Full);
    let heidi = result
        .rows
        .iter()
        .find(|row| row.get("employees_name") == Some(&Value::from("Heidi")))
        .unwrap();
    assert_eq!(heidi.get("employees_dept_id"), Some(&Value::Integer(50)));
    assert_eq!(heidi.get("departments_dept_id"), Some(&Value::Null));

    // Human Resources has no employees and closes the FULL result
    let last = result.rows.last().unwrap();
    assert_eq!(last.get("departments_dept_name"), Some(&Value::from("Human Resources")));
    assert_eq!(last.get("employees_emp_id"), Some(&Value::Null));
}

#[test]
fn test_unrelated_pair_never_matches() {
    let inner = join(TableName::Departments, TableName::Offices, JoinType::Inner);
    assert!(inner.is_empty());
    assert_eq!(inner.columns.len(), 4);

    let left = join(TableName::Departments, TableName::Offices, JoinType::Left);
    assert_eq!(null_side_rows(&left, TableName::Offices), 4);

    let full = join(TableName::Offices, TableName::Departments, JoinType::Full);
    assert_eq!(null_side_rows(&full, TableName::Departments), 4);
    assert_eq!(null_side_rows(&full, TableName::Offices), 4);
}

#[test]
fn test_inner_join_pairs() {
    let result = join(TableName::Employees, TableName::Departments, JoinType::Inner);
    let pairs: Vec<(String, String)> = result
        .rows
        .iter()
        .map(|row| {
            (
                row.get("employees_name").unwrap().to_string(),
                row.get("departments_dept_name").unwrap().to_string(),
            )
        })
        .collect();

    assert_eq!(
        pairs,
        vec![
            ("Alice".to_string(), "Engineering".to_string()),
            ("Bob".to_string(), "Marketing".to_string()),
            ("Carol".to_string(), "Engineering".to_string()),
            ("Eve".to_string(), "Sales".to_string()),
            ("Frank".to_string(), "Marketing".to_string()),
        ]
    );
}

#[test]
fn test_right_join_follows_right_table_order() {
    let result = join(TableName::Employees, TableName::Offices, JoinType::Right);
    let locations: Vec<String> = result
        .rows
        .iter()
        .map(|row| row.get("offices_location").unwrap().to_string())
        .collect();

    assert_eq!(
        locations,
        vec!["New York", "New York", "New York", "London", "London", "Tokyo", "Sydney"]
    );
    assert_eq!(result.rows[6].get("employees_emp_id"), Some(&Value::Null));
}

#[test]
fn test_string_entry_point() {
    let catalog = Catalog::builtin().unwrap();
    let evaluator = JoinEvaluator::new(catalog);

    let result = evaluator
        .perform_join_by_name(" Offices ", "employees", "full outer")
        .unwrap();
    assert_eq!(result.join_type, JoinType::Full);
    assert_eq!(result.len(), 9);

    assert_eq!(
        evaluator
            .perform_join_by_name("departments", "departments", "INNER")
            .unwrap_err(),
        JoinError::SelfJoin(TableName::Departments)
    );
    assert!(matches!(
        evaluator.perform_join_by_name("employees", "salaries", "INNER"),
        Err(JoinError::UnknownTable(_))
    ));
    assert!(matches!(
        evaluator.perform_join_by_name("employees", "offices", "NATURAL"),
        Err(JoinError::UnknownJoinType(_))
    ));
}
