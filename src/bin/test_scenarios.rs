//! Runs the TOML scenarios under tests/scenarios and shows how each one ended
//!
//! Usage:
//!   cargo run --bin test-scenarios                  # every scenario
//!   cargo run --bin test-scenarios -- game/         # one directory
//!   cargo run --bin test-scenarios -- -v wrong_cat  # expected/actual on failure

use std::path::Path;
use std::process::ExitCode;

use spincat::testing::{
    SCENARIOS_DIR, TestResult, ToySnapshot, discover_scenarios, parser::parse_test_file, run_test,
};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let verbose = args.iter().any(|a| a == "-v" || a == "--verbose");
    let filter = args.iter().find(|a| !a.starts_with('-')).cloned();

    let base = Path::new(SCENARIOS_DIR);
    let scenarios = discover_scenarios(base, filter.as_deref());
    if scenarios.is_empty() {
        match &filter {
            Some(f) => eprintln!("No scenarios under {} match '{}'", base.display(), f),
            None => eprintln!("No scenarios under {}", base.display()),
        }
        return ExitCode::FAILURE;
    }

    let mut passed = 0;
    let mut broken = Vec::new();

    for path in &scenarios {
        let name = path
            .strip_prefix(base)
            .unwrap_or(path)
            .with_extension("")
            .display()
            .to_string();

        let result = match parse_test_file(path) {
            Ok(def) => run_test(&def),
            Err(message) => TestResult::Error { message },
        };
        report(&name, &result, verbose);

        if result.is_pass() {
            passed += 1;
        } else {
            broken.push(name);
        }
    }

    println!("\n{} passed, {} broken", passed, broken.len());
    if broken.is_empty() {
        return ExitCode::SUCCESS;
    }
    for name in &broken {
        println!("  {}", name);
    }
    ExitCode::FAILURE
}

fn report(name: &str, result: &TestResult, verbose: bool) {
    match result {
        TestResult::Pass { polls, end } => {
            println!("  PASS  {:<36} {:>5} polls, ends {}", name, polls, ending(end));
        }
        TestResult::Fail { error } if verbose => println!("  FAIL  {}\n    {}", name, error),
        TestResult::Fail { error } => println!("  FAIL  {}\n    {}", name, error.message),
        TestResult::Error { message } => println!("  ERROR {}\n    {}", name, message),
    }
}

/// One-line account of the final toy state
fn ending(end: &ToySnapshot) -> String {
    if end.mode != "game" {
        return format!("in {}", end.mode);
    }
    let mut text = format!(
        "in game after {} rounds ({:.2}s)",
        end.rounds,
        end.total_ms as f64 / 1000.0
    );
    if end.termination != "none" {
        text.push_str(&format!(", {}", end.termination));
    }
    text
}
