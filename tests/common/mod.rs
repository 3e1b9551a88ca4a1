//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use h2_dispatch::controller::{HydrogenPlanner, PlannerSettings};
use h2_dispatch::domain::OptimisationRequest;

/// Absolute-value tolerance for comparing solver output.
pub const TOLERANCE: f64 = 1e-6;

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(format!("{name}.json"))
}

/// Raw request body of a fixture, as a client would send it.
pub fn fixture_body(name: &str) -> String {
    let path = fixture_path(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
}

pub fn load_request(name: &str) -> OptimisationRequest {
    serde_json::from_str(&fixture_body(name))
        .unwrap_or_else(|e| panic!("fixture {name} is not a valid request: {e}"))
}

/// Planner on the bundled engine with default settings.
pub fn default_planner() -> HydrogenPlanner {
    planner_with(PlannerSettings::default())
}

pub fn planner_with(settings: PlannerSettings) -> HydrogenPlanner {
    HydrogenPlanner::with_default_engine(settings).expect("default settings are valid")
}

pub fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() < TOLERANCE,
        "{what}: expected {expected}, got {actual}"
    );
}

