//! Integration tests for the join-and-reachability pipeline.

mod common;
mod invariant_tests;
mod scenario_tests;
mod store_tests;
