//! Assertion checking for scenario expectations

use super::parser::{ExpectedEvent, StateAssertion};
use crate::audio::{AudioCommand, Cue};
use crate::events::ToyEvent;

/// Error when an assertion fails
#[derive(Debug)]
pub struct AssertionError {
    pub message: String,
    pub expected: String,
    pub actual: String,
}

impl std::fmt::Display for AssertionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n    Expected: {}\n    Actual: {}", self.message, self.expected, self.actual)
    }
}

/// Something observable that happened during a run
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedEvent {
    pub time_ms: u64,
    pub event_type: String,
    pub target: Option<usize>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl CapturedEvent {
    fn new(time_ms: u64, event_type: &str) -> Self {
        Self {
            time_ms,
            event_type: event_type.to_string(),
            target: None,
            from: None,
            to: None,
        }
    }

    pub fn from_toy_event(time_ms: u64, event: &ToyEvent) -> Option<Self> {
        let captured = match event {
            ToyEvent::ModeChange { from, to } => Self {
                from: Some(from.to_string()),
                to: Some(to.to_string()),
                ..Self::new(time_ms, "ModeChange")
            },
            ToyEvent::GameStart { .. } => Self::new(time_ms, "GameStart"),
            ToyEvent::RoundStart { target, .. } => Self {
                target: Some(*target),
                ..Self::new(time_ms, "RoundStart")
            },
            ToyEvent::Hit { target, .. } => Self {
                target: Some(*target),
                ..Self::new(time_ms, "Hit")
            },
            ToyEvent::Miss { target, wrong, .. } => Self {
                target: Some(*target),
                to: Some(format!("sensor_{}", wrong)),
                ..Self::new(time_ms, "Miss")
            },
            ToyEvent::GameEnd { reason, .. } => Self {
                to: Some(reason.code().to_string()),
                ..Self::new(time_ms, "GameEnd")
            },
            ToyEvent::InputFault { channel } => Self {
                to: Some(channel.to_string()),
                ..Self::new(time_ms, "InputFault")
            },
            ToyEvent::SessionStart { .. } | ToyEvent::Config(_) => return None,
        };
        Some(captured)
    }

    pub fn from_audio(time_ms: u64, command: &AudioCommand) -> Self {
        let event_type = match command {
            AudioCommand::PlayLoop(Cue::Ambient) => "AmbientStart",
            AudioCommand::Stop(Cue::Ambient) => "AmbientStop",
            AudioCommand::PlayOnce(Cue::Warning) => "Warning",
            AudioCommand::PlayLoop(Cue::Warning) | AudioCommand::PlayOnce(Cue::Ambient) => {
                "UnexpectedCue"
            }
            AudioCommand::Stop(Cue::Warning) => "WarningStop",
        };
        Self::new(time_ms, event_type)
    }

    fn matches(&self, expected: &ExpectedEvent) -> bool {
        self.event_type == expected.event
            && expected.target.is_none_or(|t| self.target == Some(t))
            && expected.from.as_ref().is_none_or(|f| self.from.as_ref() == Some(f))
            && expected.to.as_ref().is_none_or(|t| self.to.as_ref() == Some(t))
    }
}

/// Check that the expected events occur in order (other events may interleave)
pub fn check_sequence(expected: &[ExpectedEvent], captured: &[CapturedEvent]) -> Result<(), AssertionError> {
    let mut captured_idx = 0;

    for (i, exp) in expected.iter().enumerate() {
        let found = captured[captured_idx..]
            .iter()
            .enumerate()
            .find(|(_, cap)| cap.matches(exp));

        match found {
            Some((offset, cap)) => {
                if let Some(min) = exp.time_min
                    && cap.time_ms < min
                {
                    return Err(AssertionError {
                        message: format!("Event #{} '{}' occurred too early", i + 1, exp.event),
                        expected: format!("time >= {} ms", min),
                        actual: format!("{} ms", cap.time_ms),
                    });
                }
                if let Some(max) = exp.time_max
                    && cap.time_ms > max
                {
                    return Err(AssertionError {
                        message: format!("Event #{} '{}' occurred too late", i + 1, exp.event),
                        expected: format!("time <= {} ms", max),
                        actual: format!("{} ms", cap.time_ms),
                    });
                }
                captured_idx += offset + 1;
            }
            None => {
                return Err(AssertionError {
                    message: format!("Event #{} '{}' not found", i + 1, exp.event),
                    expected: format!("{:?}", exp),
                    actual: format!(
                        "events after position {}: {:?}",
                        captured_idx,
                        captured[captured_idx..]
                            .iter()
                            .map(|e| &e.event_type)
                            .collect::<Vec<_>>()
                    ),
                });
            }
        }
    }

    Ok(())
}

/// Everything a state check can look at
#[derive(Debug, Clone, Default)]
pub struct ToySnapshot {
    pub mode: String,
    pub rounds: u32,
    pub total_ms: u64,
    /// "none", "completed" or "wrong_hit"
    pub termination: String,
    /// Active round number, 0 between rounds
    pub round: u32,
    /// Outcome of the last resolved round: "none", "hit" or "miss"
    pub last_outcome: String,
    pub target: Option<usize>,
    pub spinning: Vec<bool>,
    pub single_spinning: bool,
    pub ambient: bool,
    /// "none", "end_of_session" or "warning"
    pub panel: String,
    /// "single", "cats" or "none"
    pub visible: String,
    pub warnings: u32,
    pub ambient_starts: u32,
    pub ambient_stops: u32,
    pub faults: Vec<(String, u32)>,
}

impl ToySnapshot {
    fn value(&self, path: &str) -> Option<Value> {
        let value = match path {
            "mode" => Value::Text(self.mode.clone()),
            "rounds" => Value::Int(self.rounds as i64),
            "total_ms" => Value::Int(self.total_ms as i64),
            "termination" => Value::Text(self.termination.clone()),
            "round" => Value::Int(self.round as i64),
            "last_outcome" => Value::Text(self.last_outcome.clone()),
            "target" => match self.target {
                Some(t) => Value::Int(t as i64),
                None => Value::Text("none".to_string()),
            },
            "spinning" => Value::Int(self.spinning.iter().filter(|s| **s).count() as i64),
            "single.spinning" => Value::Bool(self.single_spinning),
            "ambient" => Value::Bool(self.ambient),
            "panel" => Value::Text(self.panel.clone()),
            "visible" => Value::Text(self.visible.clone()),
            "warnings" => Value::Int(self.warnings as i64),
            "ambient_starts" => Value::Int(self.ambient_starts as i64),
            "ambient_stops" => Value::Int(self.ambient_stops as i64),
            _ => {
                if let Some(rest) = path.strip_prefix("cat_") {
                    let (index, field) = rest.split_once('.')?;
                    let index: usize = index.parse().ok()?;
                    return match field {
                        "spinning" => self.spinning.get(index).map(|s| Value::Bool(*s)),
                        _ => None,
                    };
                }
                if let Some(channel) = path.strip_prefix("faults.") {
                    let count = self
                        .faults
                        .iter()
                        .find(|(name, _)| name == channel)
                        .map(|(_, n)| *n)
                        .unwrap_or(0);
                    return Some(Value::Int(count as i64));
                }
                return None;
            }
        };
        Some(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Int(i64),
    Bool(bool),
    Text(String),
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Text(v) => write!(f, "{}", v),
        }
    }
}

/// Parse a check string into (path, operator, value)
fn parse_check(check: &str) -> Option<(&str, &str, &str)> {
    // Try operators in order of specificity (>= before >, etc.)
    for op in &[">=", "<=", "!=", "=", ">", "<"] {
        if let Some(idx) = check.find(op) {
            let path = check[..idx].trim();
            let value = check[idx + op.len()..].trim();
            return Some((path, op, value));
        }
    }
    None
}

/// Check state assertions against a snapshot
pub fn check_state(assertion: &StateAssertion, state: &ToySnapshot) -> Result<(), AssertionError> {
    for check in &assertion.checks {
        let (path, operator, expected) = parse_check(check).ok_or_else(|| AssertionError {
            message: format!("Invalid check syntax: {}", check),
            expected: "format: 'path = value' or 'path > value'".to_string(),
            actual: check.clone(),
        })?;

        let actual = state.value(path).ok_or_else(|| AssertionError {
            message: format!("Unknown check path '{}'", path),
            expected: "mode, rounds, total_ms, termination, round, target, spinning, cat_N.spinning, ...".to_string(),
            actual: path.to_string(),
        })?;

        let pass = match &actual {
            Value::Int(actual) => {
                let value: i64 = expected.parse().map_err(|_| AssertionError {
                    message: format!("Invalid value for {}", path),
                    expected: "integer".to_string(),
                    actual: expected.to_string(),
                })?;
                match operator {
                    ">=" => *actual >= value,
                    "<=" => *actual <= value,
                    ">" => *actual > value,
                    "<" => *actual < value,
                    "!=" => *actual != value,
                    _ => *actual == value,
                }
            }
            Value::Bool(_) | Value::Text(_) => {
                let equal = actual.to_string() == expected.trim_matches('"');
                match operator {
                    "=" => equal,
                    "!=" => !equal,
                    _ => {
                        return Err(AssertionError {
                            message: format!("Operator '{}' needs a number: {}", operator, check),
                            expected: "= or !=".to_string(),
                            actual: operator.to_string(),
                        });
                    }
                }
            }
        };

        if !pass {
            return Err(AssertionError {
                message: format!("Check failed at {} ms: {}", assertion.after_ms, check),
                expected: format!("{} {} {}", path, operator, expected),
                actual: actual.to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> ToySnapshot {
        ToySnapshot {
            mode: "game".to_string(),
            rounds: 3,
            total_ms: 1250,
            termination: "completed".to_string(),
            spinning: vec![false, true, false],
            panel: "end_of_session".to_string(),
            faults: vec![("sensor_2".to_string(), 4)],
            ..Default::default()
        }
    }

    fn assertion(checks: &[&str]) -> StateAssertion {
        StateAssertion {
            after_ms: 100,
            checks: checks.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn test_passing_checks() {
        let checks = assertion(&[
            "mode = game",
            "rounds >= 3",
            "total_ms = 1250",
            "spinning = 1",
            "cat_1.spinning = true",
            "cat_0.spinning != true",
            "panel = \"end_of_session\"",
            "faults.sensor_2 = 4",
            "faults.button = 0",
        ]);
        assert!(check_state(&checks, &snapshot()).is_ok());
    }

    #[test]
    fn test_failing_check_reports_actual() {
        let err = check_state(&assertion(&["rounds = 4"]), &snapshot()).unwrap_err();
        assert_eq!(err.actual, "3");
    }

    #[test]
    fn test_unknown_path() {
        assert!(check_state(&assertion(&["score = 1"]), &snapshot()).is_err());
        assert!(check_state(&assertion(&["mode > game"]), &snapshot()).is_err());
    }

    #[test]
    fn test_sequence_in_order() {
        let captured = vec![
            CapturedEvent::from_toy_event(0, &ToyEvent::RoundStart { round: 1, target: 2 }).unwrap(),
            CapturedEvent::from_audio(50, &AudioCommand::PlayLoop(Cue::Ambient)),
            CapturedEvent::from_toy_event(
                400,
                &ToyEvent::Hit {
                    round: 1,
                    target: 2,
                    elapsed_ms: 400,
                },
            )
            .unwrap(),
        ];
        let expected = vec![
            ExpectedEvent {
                event: "RoundStart".to_string(),
                target: Some(2),
                from: None,
                to: None,
                time_min: None,
                time_max: Some(0),
            },
            ExpectedEvent {
                event: "Hit".to_string(),
                target: Some(2),
                from: None,
                to: None,
                time_min: Some(400),
                time_max: None,
            },
        ];
        assert!(check_sequence(&expected, &captured).is_ok());

        let reversed: Vec<ExpectedEvent> = expected.into_iter().rev().collect();
        assert!(check_sequence(&reversed, &captured).is_err());
    }
}
