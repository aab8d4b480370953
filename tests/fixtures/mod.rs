//! Test fixtures shared by the integration tests
//!
//! - Task definitions (`task*.json`)
//! - Manifest templates for the `fake` product (`templates.toml`)
//! - A candidates bucket listing (`candidate_keys.txt`)

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use beetmover::{Environment, ReleaseContext, Task};

/// Path to a file under `tests/fixtures`
pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Load a task definition fixture
pub fn load_task(name: &str) -> Task {
    let contents = std::fs::read_to_string(fixture_path(name)).unwrap();
    Task::from_json(&contents).unwrap()
}

/// Nightly context for a task fixture, as the default pipeline runs it
pub fn nightly_context(name: &str) -> ReleaseContext {
    ReleaseContext::new(load_task(name), "push-to-nightly", "nightly").unwrap()
}

/// Template environment with the `fake_*` templates
pub fn template_env() -> Environment {
    Environment::load(&fixture_path("templates.toml")).unwrap()
}
