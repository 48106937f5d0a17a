//! Error types for spincat
//!
//! Only [`ToyError::AssetMissing`] is fatal. Input faults are downgraded to
//! "not triggered" by the poll loop, and rejected mode toggles never surface
//! as errors at all.

use thiserror::Error;

use crate::input::Channel;

#[derive(Error, Debug)]
pub enum ToyError {
    /// Still image or animation frames unavailable at startup
    #[error("Missing asset '{path}': {reason}")]
    AssetMissing { path: String, reason: String },

    /// A single channel read faulted
    #[error("Failed to read {channel}: {reason}")]
    InputRead { channel: Channel, reason: String },

    /// GPIO line could not be claimed or released
    #[error("GPIO {pin}: {reason}")]
    Gpio { pin: u32, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ToyError {
    pub fn asset_missing(path: impl Into<String>, reason: impl Into<String>) -> Self {
        ToyError::AssetMissing {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn input_read(channel: Channel, reason: impl Into<String>) -> Self {
        ToyError::InputRead {
            channel,
            reason: reason.into(),
        }
    }

    pub fn gpio(pin: u32, reason: impl Into<String>) -> Self {
        ToyError::Gpio {
            pin,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ToyError>;
