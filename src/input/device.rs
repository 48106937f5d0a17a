//! The input handle owned by the running app

use bevy::prelude::*;

use super::{Channel, InputSource, KeyboardInput, Level, SysfsGpio};
use crate::error::Result;
use crate::settings::{InputBackend, ToySettings};

/// Whichever backend the settings selected
#[derive(Resource)]
pub enum InputDevice {
    Keyboard(KeyboardInput),
    Sysfs(SysfsGpio),
}

impl InputDevice {
    /// Claim the configured lines. Fails only for hardware backends.
    pub fn open(settings: &ToySettings) -> Result<Self> {
        match settings.input_backend {
            InputBackend::Keyboard => Ok(InputDevice::Keyboard(KeyboardInput::new(settings.polarity))),
            InputBackend::Sysfs => SysfsGpio::open(
                &settings.gpio_root,
                settings.button_pin,
                &settings.sensor_pins,
            )
            .map(InputDevice::Sysfs),
        }
    }

    fn source(&mut self) -> &mut dyn InputSource {
        match self {
            InputDevice::Keyboard(kb) => kb,
            InputDevice::Sysfs(gpio) => gpio,
        }
    }
}

impl InputSource for InputDevice {
    fn read_channel(&mut self, channel: Channel) -> Result<Level> {
        self.source().read_channel(channel)
    }

    fn release(&mut self) {
        self.source().release();
    }

    fn name(&self) -> &'static str {
        match self {
            InputDevice::Keyboard(kb) => kb.name(),
            InputDevice::Sysfs(gpio) => gpio.name(),
        }
    }
}

/// Give the GPIO lines back as soon as the app is asked to exit
/// (window close or Ctrl-C). Dropping the resource releases them too.
pub fn release_input_on_exit(mut exits: MessageReader<AppExit>, mut device: ResMut<InputDevice>) {
    if exits.read().next().is_some() {
        info!("Releasing {} input", device.name());
        device.release();
    }
}
