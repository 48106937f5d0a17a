//! Input module - channel model, wiring polarity and the InputSource boundary
//!
//! The core never talks to hardware directly. Each poll tick it asks an
//! [`InputSource`] for the raw [`Level`] of every [`Channel`] and folds the
//! readings into an [`InputSample`] with [`sample_inputs`].

mod device;
mod keyboard;
mod sysfs;

use bevy::log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::{ENTITY_COUNT, INPUT_FAULT_LOG_EVERY};
use crate::error::Result;

pub use device::{InputDevice, release_input_on_exit};
pub use keyboard::{KeyboardInput, capture_keyboard};
pub use sysfs::SysfsGpio;

/// One discrete digital input line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    Button,
    Sensor(usize),
}

impl Channel {
    /// Every channel in poll order
    pub const ALL: [Channel; 1 + ENTITY_COUNT] = [
        Channel::Button,
        Channel::Sensor(0),
        Channel::Sensor(1),
        Channel::Sensor(2),
    ];

    pub fn sensor_index(self) -> Option<usize> {
        match self {
            Channel::Button => None,
            Channel::Sensor(i) => Some(i),
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::Button => write!(f, "button"),
            Channel::Sensor(i) => write!(f, "sensor_{}", i),
        }
    }
}

/// Raw electrical level of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

/// Which level counts as "triggered"
///
/// Pull-up wiring reads low when the beam is broken or the button is held,
/// hence the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Polarity {
    #[default]
    ActiveLow,
    ActiveHigh,
}

impl Polarity {
    pub fn is_triggered(self, level: Level) -> bool {
        matches!(
            (self, level),
            (Polarity::ActiveLow, Level::Low) | (Polarity::ActiveHigh, Level::High)
        )
    }

    /// Level a line must read for the given logical state
    pub fn level_for(self, triggered: bool) -> Level {
        match (self, triggered) {
            (Polarity::ActiveLow, true) | (Polarity::ActiveHigh, false) => Level::Low,
            (Polarity::ActiveLow, false) | (Polarity::ActiveHigh, true) => Level::High,
        }
    }
}

/// Logical state of every channel for one poll tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputSample {
    pub button: bool,
    pub sensors: [bool; ENTITY_COUNT],
}

impl InputSample {
    pub fn channel(&self, channel: Channel) -> bool {
        match channel {
            Channel::Button => self.button,
            Channel::Sensor(i) => self.sensors.get(i).copied().unwrap_or(false),
        }
    }

    pub fn set(&mut self, channel: Channel, triggered: bool) {
        match channel {
            Channel::Button => self.button = triggered,
            Channel::Sensor(i) => {
                if let Some(slot) = self.sensors.get_mut(i) {
                    *slot = triggered;
                }
            }
        }
    }

    pub fn with(mut self, channel: Channel, triggered: bool) -> Self {
        self.set(channel, triggered);
        self
    }

    pub fn any_sensor(&self) -> bool {
        self.sensors.iter().any(|s| *s)
    }
}

/// Boundary to whatever provides the digital lines
///
/// Reads must be synchronous and side-effect free. `release` gives the
/// underlying handle back and must tolerate being called more than once.
pub trait InputSource {
    fn read_channel(&mut self, channel: Channel) -> Result<Level>;

    fn release(&mut self) {}

    fn name(&self) -> &'static str;
}

/// Counts consecutive faults per channel so a flapping wire doesn't flood the log
#[derive(Debug, Default)]
pub struct FaultTracker {
    consecutive: HashMap<Channel, u32>,
}

impl FaultTracker {
    /// Record a fault, returning true when it should be logged
    fn record(&mut self, channel: Channel) -> bool {
        let count = self.consecutive.entry(channel).or_insert(0);
        *count += 1;
        *count == 1 || *count % INPUT_FAULT_LOG_EVERY == 0
    }

    fn recover(&mut self, channel: Channel) {
        if let Some(count) = self.consecutive.remove(&channel) {
            info!("{} readable again after {} failed reads", channel, count);
        }
    }

    pub fn consecutive_faults(&self, channel: Channel) -> u32 {
        self.consecutive.get(&channel).copied().unwrap_or(0)
    }
}

/// A channel that could not be read this tick
#[derive(Debug, Clone, PartialEq)]
pub struct InputFault {
    pub channel: Channel,
    pub reason: String,
}

/// Read every channel once. Faulted channels count as not triggered.
pub fn sample_inputs(
    source: &mut dyn InputSource,
    polarity: Polarity,
    faults: &mut FaultTracker,
) -> (InputSample, Vec<InputFault>) {
    let mut sample = InputSample::default();
    let mut failed = Vec::new();

    for channel in Channel::ALL {
        match source.read_channel(channel) {
            Ok(level) => {
                faults.recover(channel);
                sample.set(channel, polarity.is_triggered(level));
            }
            Err(e) => {
                if faults.record(channel) {
                    warn!("{} ({}): {}, treating as not triggered", channel, source.name(), e);
                }
                failed.push(InputFault {
                    channel,
                    reason: e.to_string(),
                });
            }
        }
    }

    (sample, failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToyError;

    struct FlakySource {
        levels: HashMap<Channel, Level>,
        broken: Option<Channel>,
    }

    impl InputSource for FlakySource {
        fn read_channel(&mut self, channel: Channel) -> Result<Level> {
            if self.broken == Some(channel) {
                return Err(ToyError::input_read(channel, "line stuck"));
            }
            Ok(self.levels.get(&channel).copied().unwrap_or(Level::High))
        }

        fn name(&self) -> &'static str {
            "flaky"
        }
    }

    #[test]
    fn test_polarity_mapping() {
        assert!(Polarity::ActiveLow.is_triggered(Level::Low));
        assert!(!Polarity::ActiveLow.is_triggered(Level::High));
        assert!(Polarity::ActiveHigh.is_triggered(Level::High));
        assert_eq!(Polarity::ActiveLow.level_for(true), Level::Low);
        assert_eq!(Polarity::ActiveHigh.level_for(true), Level::High);
    }

    #[test]
    fn test_sample_active_low() {
        let mut source = FlakySource {
            levels: HashMap::from([(Channel::Sensor(1), Level::Low)]),
            broken: None,
        };
        let mut faults = FaultTracker::default();
        let (sample, failed) = sample_inputs(&mut source, Polarity::ActiveLow, &mut faults);
        assert!(failed.is_empty());
        assert!(!sample.button);
        assert_eq!(sample.sensors, [false, true, false]);
    }

    #[test]
    fn test_faulted_channel_reads_not_triggered() {
        let mut source = FlakySource {
            levels: HashMap::from([(Channel::Button, Level::Low)]),
            broken: Some(Channel::Button),
        };
        let mut faults = FaultTracker::default();
        let (sample, failed) = sample_inputs(&mut source, Polarity::ActiveLow, &mut faults);
        assert!(!sample.button);
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].channel, Channel::Button);
        assert_eq!(faults.consecutive_faults(Channel::Button), 1);

        source.broken = None;
        let (sample, failed) = sample_inputs(&mut source, Polarity::ActiveLow, &mut faults);
        assert!(sample.button);
        assert!(failed.is_empty());
        assert_eq!(faults.consecutive_faults(Channel::Button), 0);
    }

    #[test]
    fn test_channel_display() {
        assert_eq!(Channel::Button.to_string(), "button");
        assert_eq!(Channel::Sensor(2).to_string(), "sensor_2");
    }
}
