//! Spincat - a spinning-cat toy driven by a button and three beam sensors
//!
//! The toy logic is a pure core ([`state::SessionState`] and the modules it
//! owns) that talks to the outside world through three boundaries:
//! [`input::InputSource`], [`audio::AudioCue`] and [`display::DisplaySurface`].
//! [`plugin::ToyPlugin`] wires the core into a Bevy app.

// Core modules
pub mod animation;
pub mod constants;
pub mod error;
pub mod events;
pub mod game;
pub mod mode;
pub mod poll;
pub mod scheduler;
pub mod settings;
pub mod state;
pub mod testing;

// Boundaries and app wiring
pub mod audio;
pub mod display;
pub mod input;
pub mod plugin;
pub mod ui;

// Re-export commonly used types for convenience
pub use animation::{AnimationClock, SpinEntity};
pub use audio::{AudioArbiter, AudioCue, AudioQueue, Cue};
pub use constants::*;
pub use display::{DisplayQueue, DisplayState, DisplaySurface, DisplayTarget, FrameRef, SpinFrameFiles};
pub use error::ToyError;
pub use events::{EventBus, EventLogConfig, EventLogger, RunConfig, ToyEvent};
pub use game::{
    EngineState, GameRound, GameRoundEngine, GameRules, GameSession, RandomTargets,
    ScriptedTargets, TargetSource, TerminationReason,
};
pub use input::{Channel, InputDevice, InputSample, InputSource, Level, Polarity};
pub use mode::{Mode, ModeController, ModeStep};
pub use plugin::ToyPlugin;
pub use poll::PollLoop;
pub use scheduler::{Scheduler, Task};
pub use settings::{DeploymentProfile, InputBackend, ToySettings};
pub use state::{SessionConfig, SessionState};
