//! Runs every scenario under tests/scenarios

use std::path::Path;

use spincat::testing::{TestResult, discover_scenarios, parser::parse_test_file, run_test};

#[test]
fn all_scenarios_pass() {
    let base = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/scenarios");
    let files = discover_scenarios(&base, None);
    assert!(!files.is_empty(), "no scenarios under {}", base.display());

    let mut failures = Vec::new();
    for path in &files {
        let result = match parse_test_file(path) {
            Ok(def) => run_test(&def),
            Err(message) => TestResult::Error { message },
        };
        match result {
            TestResult::Pass { .. } => {}
            TestResult::Fail { error } => failures.push(format!("{}: {}", path.display(), error)),
            TestResult::Error { message } => failures.push(format!("{}: {}", path.display(), message)),
        }
    }

    assert!(failures.is_empty(), "{}", failures.join("\n"));
}

#[test]
fn round_limit_scenario_reports_exact_totals() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/scenarios/game/round_limit_completes.toml");
    let def = parse_test_file(&path).unwrap();
    let (polls, end) = match run_test(&def) {
        TestResult::Pass { polls, end } => (polls, end),
        other => panic!("{:?}", other),
    };
    assert!(polls > 0);
    assert_eq!((end.rounds, end.total_ms), (3, 1250));
    assert_eq!(end.termination, "completed");
    assert_eq!(end.last_outcome, "hit");
}
