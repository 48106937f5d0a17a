//! Event type definitions for the audit log

use serde::{Deserialize, Serialize};

use crate::game::TerminationReason;
use crate::input::Channel;
use crate::mode::Mode;
use crate::settings::ToySettings;

/// Effective configuration for a run, logged once after the session header
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    pub profile: String,
    pub round_limit: u32,
    pub hit_cooldown_ms: u64,
    pub poll_interval_ms: u64,
    pub animation_interval_ms: u64,
    pub input: String,
    pub polarity: String,
    pub seed: Option<u64>,
}

impl RunConfig {
    pub fn from_settings(settings: &ToySettings) -> Self {
        let rules = settings.game_rules();
        Self {
            profile: format!("{:?}", settings.profile),
            round_limit: rules.round_limit,
            hit_cooldown_ms: rules.hit_cooldown.as_millis() as u64,
            poll_interval_ms: settings.poll_interval_ms,
            animation_interval_ms: settings.animation_interval_ms,
            input: format!("{:?}", settings.input_backend),
            polarity: format!("{:?}", settings.polarity),
            seed: settings.seed,
        }
    }
}

/// Everything worth recording about a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToyEvent {
    /// Log file opened (once per launch)
    SessionStart {
        session_id: String,
        timestamp: String,
    },
    Config(RunConfig),
    ModeChange {
        from: Mode,
        to: Mode,
    },
    /// Fresh game statistics (entering Game or Play Again)
    GameStart {
        round_limit: u32,
    },
    RoundStart {
        round: u32,
        target: usize,
    },
    Hit {
        round: u32,
        target: usize,
        elapsed_ms: u64,
    },
    Miss {
        round: u32,
        target: usize,
        wrong: usize,
    },
    GameEnd {
        reason: TerminationReason,
        rounds: u32,
        total_ms: u64,
    },
    /// First failed read of a channel after it was last readable
    InputFault {
        channel: Channel,
    },
}

impl ToyEvent {
    pub fn type_code(&self) -> &'static str {
        match self {
            ToyEvent::SessionStart { .. } => "SE",
            ToyEvent::Config(_) => "CF",
            ToyEvent::ModeChange { .. } => "MC",
            ToyEvent::GameStart { .. } => "GS",
            ToyEvent::RoundStart { .. } => "RS",
            ToyEvent::Hit { .. } => "H",
            ToyEvent::Miss { .. } => "X",
            ToyEvent::GameEnd { .. } => "GE",
            ToyEvent::InputFault { .. } => "IF",
        }
    }
}
