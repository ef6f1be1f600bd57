//! Integration tests - Joins and statistics over the bundled dataset
//!
//! These tests go through the public API only: catalog loading, the join
//! evaluator, statistics, and rendering working together.

mod join_semantics_tests;
mod stats_consistency_tests;
