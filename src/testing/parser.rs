//! TOML scenario file parsing

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::input::Channel;

/// Complete scenario definition from a TOML file
#[derive(Debug, Deserialize)]
pub struct TestDefinition {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub setup: TestSetup,
    #[serde(default)]
    pub input: Vec<FrameInput>,
    #[serde(default)]
    pub expect: TestExpectations,
}

/// Session configuration for the scenario
#[derive(Debug, Default, Deserialize)]
pub struct TestSetup {
    /// classic / spins / arcade
    pub profile: Option<String>,
    pub round_limit: Option<u32>,
    pub hit_cooldown_ms: Option<u64>,
    pub poll_interval_ms: Option<u64>,
    pub animation_interval_ms: Option<u64>,
    /// Fixed target sequence; empty means random targets from `seed`
    #[serde(default)]
    pub targets: Vec<usize>,
    pub seed: Option<u64>,
    /// Wiring reads high when triggered
    #[serde(default)]
    pub active_high: bool,
    #[serde(default = "default_frame_count")]
    pub frame_count: usize,
}

fn default_frame_count() -> usize {
    8
}

/// What changes at a given moment. Channel levels persist until changed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrameInput {
    pub time_ms: u64,
    pub button: Option<bool>,
    pub sensor_0: Option<bool>,
    pub sensor_1: Option<bool>,
    pub sensor_2: Option<bool>,
    /// "teasing" or "game"
    pub toggle: Option<String>,
    #[serde(default)]
    pub play_again: bool,
    /// Channels that fail to read from now on (replaces the previous set)
    pub faults: Option<Vec<String>>,
}

impl FrameInput {
    /// Channel levels this frame sets
    pub fn channel_changes(&self) -> Vec<(Channel, bool)> {
        [
            (Channel::Button, self.button),
            (Channel::Sensor(0), self.sensor_0),
            (Channel::Sensor(1), self.sensor_1),
            (Channel::Sensor(2), self.sensor_2),
        ]
        .into_iter()
        .filter_map(|(channel, value)| value.map(|v| (channel, v)))
        .collect()
    }
}

/// Expected scenario outcomes
#[derive(Debug, Default, Deserialize)]
pub struct TestExpectations {
    #[serde(default)]
    pub sequence: Vec<ExpectedEvent>,
    /// Multiple state assertions at different times (uses [[expect.state]] TOML syntax)
    #[serde(default)]
    pub state: Vec<StateAssertion>,
}

/// Expected event in sequence
#[derive(Debug, Deserialize)]
pub struct ExpectedEvent {
    pub event: String,
    pub target: Option<usize>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub time_min: Option<u64>,
    pub time_max: Option<u64>,
}

/// State checks once everything up to `after_ms` has run
#[derive(Debug, Clone, Deserialize)]
pub struct StateAssertion {
    pub after_ms: u64,
    #[serde(default)]
    pub checks: Vec<String>,
}

/// "button" / "sensor_N"
pub fn parse_channel(name: &str) -> Option<Channel> {
    match name {
        "button" => Some(Channel::Button),
        _ => name.strip_prefix("sensor_")?.parse().ok().map(Channel::Sensor),
    }
}

/// Parse a scenario file from path
pub fn parse_test_file(path: &Path) -> Result<TestDefinition, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    toml::from_str(&content).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let toml = r#"
name = "Wrong cat"
[setup]
round_limit = 3
targets = [2]

[[input]]
time_ms = 0
toggle = "game"

[[input]]
time_ms = 200
sensor_0 = true
faults = ["sensor_2"]

[[expect.sequence]]
event = "Miss"
target = 2

[[expect.state]]
after_ms = 300
checks = ["termination = wrong_hit"]
"#;
        let def: TestDefinition = toml::from_str(toml).unwrap();
        assert_eq!(def.name, "Wrong cat");
        assert_eq!(def.setup.round_limit, Some(3));
        assert_eq!(def.setup.targets, vec![2]);
        assert_eq!(def.setup.frame_count, 8);
        assert_eq!(def.input.len(), 2);
        assert_eq!(def.input[0].toggle.as_deref(), Some("game"));
        assert_eq!(def.input[1].channel_changes(), vec![(Channel::Sensor(0), true)]);
        assert_eq!(def.input[1].faults, Some(vec!["sensor_2".to_string()]));
        assert_eq!(def.expect.sequence[0].target, Some(2));
        assert_eq!(def.expect.state[0].after_ms, 300);
    }

    #[test]
    fn test_minimal_file() {
        let def: TestDefinition = toml::from_str("name = \"Empty\"").unwrap();
        assert!(def.input.is_empty());
        assert!(def.expect.sequence.is_empty());
        assert!(!def.setup.active_high);
    }

    #[test]
    fn test_parse_channel() {
        assert_eq!(parse_channel("button"), Some(Channel::Button));
        assert_eq!(parse_channel("sensor_2"), Some(Channel::Sensor(2)));
        assert_eq!(parse_channel("sensor"), None);
    }
}
