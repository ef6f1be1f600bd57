//! joinviz - SQL join semantics for an educational joins visualizer
//!
//! This crate computes what a visual join explainer needs for a fixed
//! employees / departments / offices dataset:
//! - A validated schema store with the declared foreign-key relationships
//! - INNER, LEFT, RIGHT, FULL OUTER and CROSS join results
//! - Set-overlap statistics that size the join diagram
//! - Terminal rendering used by the `joinviz` binary

pub mod catalog;
pub mod config;
pub mod join;
pub mod render;

pub use catalog::{Catalog, SchemaStore, TableName};
pub use join::{
    calculate_join_stats, JoinError, JoinEvaluator, JoinResult, JoinStats, JoinType,
    JoinedRow, UnknownJoinPolicy,
};
