//! Scripted input injection for scenarios

use std::collections::{HashMap, HashSet};

use crate::error::{Result, ToyError};
use crate::input::{Channel, InputSource, Level, Polarity};

/// An [`InputSource`] whose lines are set by the scenario script
#[derive(Debug, Default)]
pub struct ScriptedInputs {
    triggered: HashMap<Channel, bool>,
    faulty: HashSet<Channel>,
    polarity: Polarity,
    reads: u64,
    released: bool,
}

impl ScriptedInputs {
    pub fn new(polarity: Polarity) -> Self {
        Self {
            polarity,
            ..Default::default()
        }
    }

    /// Hold or release a channel (logical state; wiring polarity applied on read)
    pub fn set(&mut self, channel: Channel, triggered: bool) {
        self.triggered.insert(channel, triggered);
    }

    pub fn set_faults(&mut self, channels: impl IntoIterator<Item = Channel>) {
        self.faulty = channels.into_iter().collect();
    }

    pub fn reads(&self) -> u64 {
        self.reads
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl InputSource for ScriptedInputs {
    fn read_channel(&mut self, channel: Channel) -> Result<Level> {
        self.reads += 1;
        if self.faulty.contains(&channel) {
            return Err(ToyError::input_read(channel, "scripted fault"));
        }
        let triggered = self.triggered.get(&channel).copied().unwrap_or(false);
        Ok(self.polarity.level_for(triggered))
    }

    fn release(&mut self) {
        self.released = true;
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
