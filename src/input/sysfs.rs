//! Linux sysfs GPIO backend (`/sys/class/gpio`)
//!
//! Lines are exported and switched to input on open, read through their
//! `value` file each poll, and unexported again on release. Lines that were
//! already exported by someone else are left exported.

use bevy::log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use super::{Channel, InputSource, Level};
use crate::error::{Result, ToyError};

#[derive(Debug)]
pub struct SysfsGpio {
    root: PathBuf,
    lines: Vec<(Channel, u32)>,
    exported_here: Vec<u32>,
    released: bool,
}

impl SysfsGpio {
    pub fn open(root: impl AsRef<Path>, button_pin: u32, sensor_pins: &[u32]) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let mut lines = vec![(Channel::Button, button_pin)];
        lines.extend(sensor_pins.iter().enumerate().map(|(i, pin)| (Channel::Sensor(i), *pin)));

        let mut gpio = Self {
            root,
            lines: Vec::with_capacity(lines.len()),
            exported_here: Vec::new(),
            released: false,
        };

        for (channel, pin) in lines {
            // On failure, `gpio` drops here and unexports what was claimed so far
            gpio.claim(pin)?;
            gpio.lines.push((channel, pin));
        }

        info!(
            "Claimed GPIO lines {:?} under {}",
            gpio.lines.iter().map(|(_, pin)| *pin).collect::<Vec<_>>(),
            gpio.root.display()
        );
        Ok(gpio)
    }

    fn line_dir(&self, pin: u32) -> PathBuf {
        self.root.join(format!("gpio{}", pin))
    }

    fn claim(&mut self, pin: u32) -> Result<()> {
        let dir = self.line_dir(pin);
        if !dir.exists() {
            fs::write(self.root.join("export"), pin.to_string())
                .map_err(|e| ToyError::gpio(pin, format!("export failed: {}", e)))?;
            self.exported_here.push(pin);
        }
        fs::write(dir.join("direction"), "in")
            .map_err(|e| ToyError::gpio(pin, format!("cannot set direction: {}", e)))
    }

    pub fn pin_for(&self, channel: Channel) -> Option<u32> {
        self.lines.iter().find(|(c, _)| *c == channel).map(|(_, pin)| *pin)
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl InputSource for SysfsGpio {
    fn read_channel(&mut self, channel: Channel) -> Result<Level> {
        if self.released {
            return Err(ToyError::input_read(channel, "GPIO already released"));
        }
        let pin = self
            .pin_for(channel)
            .ok_or_else(|| ToyError::input_read(channel, "no pin assigned"))?;
        let raw = fs::read_to_string(self.line_dir(pin).join("value"))
            .map_err(|e| ToyError::input_read(channel, e.to_string()))?;
        match raw.trim() {
            "0" => Ok(Level::Low),
            "1" => Ok(Level::High),
            other => Err(ToyError::input_read(channel, format!("unexpected value {:?}", other))),
        }
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        for pin in self.exported_here.drain(..) {
            if let Err(e) = fs::write(self.root.join("unexport"), pin.to_string()) {
                warn!("Failed to unexport GPIO {}: {}", pin, e);
            }
        }
    }

    fn name(&self) -> &'static str {
        "sysfs-gpio"
    }
}

impl Drop for SysfsGpio {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Lay out gpioN/{direction,value} the way the kernel would after export
    fn fake_line(root: &Path, pin: u32, value: &str) {
        let dir = root.join(format!("gpio{}", pin));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("direction"), "out").unwrap();
        fs::write(dir.join("value"), value).unwrap();
    }

    #[test]
    fn test_reads_levels_from_value_files() {
        let tmp = tempfile::tempdir().unwrap();
        fake_line(tmp.path(), 18, "1\n");
        fake_line(tmp.path(), 21, "0\n");
        fake_line(tmp.path(), 20, "1\n");
        fake_line(tmp.path(), 2, "1\n");

        let mut gpio = SysfsGpio::open(tmp.path(), 18, &[21, 20, 2]).unwrap();
        assert_eq!(gpio.read_channel(Channel::Button).unwrap(), Level::High);
        assert_eq!(gpio.read_channel(Channel::Sensor(0)).unwrap(), Level::Low);
        assert_eq!(
            fs::read_to_string(tmp.path().join("gpio21/direction")).unwrap(),
            "in"
        );
    }

    #[test]
    fn test_garbage_value_is_a_read_error() {
        let tmp = tempfile::tempdir().unwrap();
        fake_line(tmp.path(), 18, "?");
        let mut gpio = SysfsGpio::open(tmp.path(), 18, &[]).unwrap();
        assert!(matches!(
            gpio.read_channel(Channel::Button),
            Err(ToyError::InputRead { channel: Channel::Button, .. })
        ));
        // Unwired sensor
        assert!(gpio.read_channel(Channel::Sensor(1)).is_err());
    }

    #[test]
    fn test_missing_line_fails_to_open() {
        let tmp = tempfile::tempdir().unwrap();
        let result = SysfsGpio::open(tmp.path(), 18, &[]);
        assert!(matches!(result, Err(ToyError::Gpio { pin: 18, .. })));
    }

    #[test]
    fn test_release_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        fake_line(tmp.path(), 18, "1");
        let mut gpio = SysfsGpio::open(tmp.path(), 18, &[]).unwrap();
        gpio.release();
        gpio.release();
        assert!(gpio.is_released());
        assert!(gpio.read_channel(Channel::Button).is_err());
        // Pre-exported lines are never unexported
        assert!(!tmp.path().join("unexport").exists());
    }
}
