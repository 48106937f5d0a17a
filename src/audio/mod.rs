//! Audio arbitration - decides when the ambient loop plays
//!
//! The ambient cue is edge-triggered: `play_loop` only when the desired state
//! turns on and `stop` only when it turns off, so holding a sensor never
//! restarts the track. A wrong hit overrides the edges.

mod queue;

use crate::animation::SpinEntity;
use crate::mode::Mode;

pub use queue::{
    AudioCommand, AudioQueue, CueHandles, CueSound, apply_audio_commands, load_cue_handles,
    release_audio_on_exit,
};

/// The two sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Ambient,
    Warning,
}

/// Boundary to whatever makes noise. Implementations must not block.
pub trait AudioCue {
    fn play_loop(&mut self, cue: Cue);

    fn play_once(&mut self, cue: Cue);

    fn stop(&mut self, cue: Cue);
}

/// Whether the ambient loop should be audible for this tick
pub fn should_play(mode: Mode, button: bool, cats: &[SpinEntity]) -> bool {
    match mode {
        Mode::Idle => button,
        Mode::Teasing | Mode::Game => cats.iter().any(|cat| cat.spinning),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AudioArbiter {
    playing: bool,
}

impl AudioArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Apply this tick's desired state, acting only on edges
    pub fn update(&mut self, want: bool, audio: &mut dyn AudioCue) {
        match (self.playing, want) {
            (false, true) => audio.play_loop(Cue::Ambient),
            (true, false) => audio.stop(Cue::Ambient),
            _ => {}
        }
        self.playing = want;
    }

    /// Silence the ambient loop and sound the warning once
    pub fn wrong_hit(&mut self, audio: &mut dyn AudioCue) {
        if self.playing {
            audio.stop(Cue::Ambient);
            self.playing = false;
        }
        audio.play_once(Cue::Warning);
    }
}
