//! Keyboard stand-in for the GPIO wiring
//!
//! Space plays the role of the button and 1/2/3 the three laser sensors, so
//! the toy can be exercised on a desktop without a Pi attached.

use bevy::prelude::*;

use super::{Channel, InputDevice, InputSample, InputSource, Level, Polarity};
use crate::constants::{BUTTON_KEY, SENSOR_KEYS};
use crate::error::Result;

/// Snapshot of the mapped keys, refreshed every frame by [`capture_keyboard`]
#[derive(Debug, Clone, Default)]
pub struct KeyboardInput {
    held: InputSample,
    polarity: Polarity,
}

impl KeyboardInput {
    /// Keys are reported at the level the configured wiring would produce,
    /// so polarity handling stays identical to real hardware.
    pub fn new(polarity: Polarity) -> Self {
        Self {
            held: InputSample::default(),
            polarity,
        }
    }

    pub fn update(&mut self, keyboard: &ButtonInput<KeyCode>) {
        self.held.button = keyboard.pressed(BUTTON_KEY);
        for (i, key) in SENSOR_KEYS.iter().enumerate() {
            self.held.sensors[i] = keyboard.pressed(*key);
        }
    }

    pub fn held(&self) -> InputSample {
        self.held
    }
}

impl InputSource for KeyboardInput {
    fn read_channel(&mut self, channel: Channel) -> Result<Level> {
        Ok(self.polarity.level_for(self.held.channel(channel)))
    }

    fn name(&self) -> &'static str {
        "keyboard"
    }
}

/// Runs in Update before the scheduler so polls see this frame's keys
pub fn capture_keyboard(keyboard: Res<ButtonInput<KeyCode>>, mut device: ResMut<InputDevice>) {
    if let InputDevice::Keyboard(kb) = &mut *device {
        kb.update(&keyboard);
    }
}
