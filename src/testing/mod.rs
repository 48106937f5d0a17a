//! Scenario testing system for deterministic toy testing
//!
//! Scenarios are TOML files describing scripted line levels and button
//! clicks over time, plus expectations about events and state. They run
//! headless against [`SessionState`](crate::state::SessionState) on a
//! manual clock.

use std::fs;
use std::path::{Path, PathBuf};

pub mod assertions;
pub mod input;
pub mod parser;
pub mod runner;

pub use assertions::{AssertionError, CapturedEvent, ToySnapshot, check_sequence, check_state};
pub use input::ScriptedInputs;
pub use parser::{
    ExpectedEvent, FrameInput, StateAssertion, TestDefinition, TestExpectations, TestSetup,
};
pub use runner::{Harness, TestResult, run_test};

/// Default path for scenario files
pub const SCENARIOS_DIR: &str = "tests/scenarios";

/// Every `.toml` file under `base`, sorted. With a filter, only paths
/// (relative to `base`) containing it.
pub fn discover_scenarios(base: &Path, filter: Option<&str>) -> Vec<PathBuf> {
    let mut found = Vec::new();
    collect_scenarios(base, &mut found);
    if let Some(filter) = filter {
        found.retain(|path| {
            path.strip_prefix(base)
                .unwrap_or(path)
                .to_string_lossy()
                .contains(filter)
        });
    }
    found.sort();
    found
}

fn collect_scenarios(dir: &Path, found: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for path in entries.flatten().map(|entry| entry.path()) {
        if path.is_dir() {
            collect_scenarios(&path, found);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            found.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_filters_and_sorts() {
        let tmp = tempfile::tempdir().unwrap();
        for rel in ["modes/b.toml", "game/z.toml", "game/a.toml", "game/notes.md"] {
            let path = tmp.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "").unwrap();
        }

        let names = |paths: Vec<PathBuf>| {
            paths
                .iter()
                .map(|p| p.strip_prefix(tmp.path()).unwrap().to_string_lossy().replace('\\', "/"))
                .collect::<Vec<_>>()
        };
        assert_eq!(
            names(discover_scenarios(tmp.path(), None)),
            vec!["game/a.toml", "game/z.toml", "modes/b.toml"]
        );
        assert_eq!(names(discover_scenarios(tmp.path(), Some("modes/"))), vec!["modes/b.toml"]);
        assert!(discover_scenarios(&tmp.path().join("missing"), None).is_empty());
    }
}
