//! Mode controller - owns the current mode and arbitrates transitions
//!
//! Exactly one mode is active. Toggling returns the exit/enter steps the
//! session must carry out, in order; a rejected toggle returns no steps.

use bevy::log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Idle,
    Teasing,
    Game,
}

impl Mode {
    pub fn name(self) -> &'static str {
        match self {
            Mode::Idle => "idle",
            Mode::Teasing => "teasing",
            Mode::Game => "game",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "idle" => Some(Mode::Idle),
            "teasing" | "tease" => Some(Mode::Teasing),
            "game" => Some(Mode::Game),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One side effect of a mode transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeStep {
    Exit(Mode),
    Enter(Mode),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ModeController {
    mode: Mode,
}

impl ModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Toggle `target` (Teasing or Game) on or off.
    ///
    /// - Toggling the active mode leaves it and returns to Idle.
    /// - Teasing cannot interrupt a game; the request is ignored.
    /// - Game preempts Teasing: Teasing is exited before Game is entered.
    pub fn toggle(&mut self, target: Mode) -> Vec<ModeStep> {
        if target == Mode::Idle {
            return Vec::new();
        }

        let steps = match (self.mode, target) {
            (current, target) if current == target => {
                vec![ModeStep::Exit(current)]
            }
            (Mode::Game, Mode::Teasing) => {
                debug!("Teasing toggle ignored during game");
                Vec::new()
            }
            (Mode::Teasing, Mode::Game) => {
                vec![ModeStep::Exit(Mode::Teasing), ModeStep::Enter(Mode::Game)]
            }
            (_, target) => vec![ModeStep::Enter(target)],
        };

        for step in &steps {
            self.mode = match step {
                ModeStep::Exit(_) => Mode::Idle,
                ModeStep::Enter(mode) => *mode,
            };
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_from_idle_enters() {
        let mut modes = ModeController::new();
        assert_eq!(modes.toggle(Mode::Teasing), vec![ModeStep::Enter(Mode::Teasing)]);
        assert_eq!(modes.mode(), Mode::Teasing);
    }

    #[test]
    fn test_toggle_active_mode_returns_to_idle() {
        let mut modes = ModeController::new();
        modes.toggle(Mode::Game);
        assert_eq!(modes.toggle(Mode::Game), vec![ModeStep::Exit(Mode::Game)]);
        assert_eq!(modes.mode(), Mode::Idle);
    }

    #[test]
    fn test_teasing_rejected_during_game() {
        let mut modes = ModeController::new();
        modes.toggle(Mode::Game);
        assert!(modes.toggle(Mode::Teasing).is_empty());
        assert_eq!(modes.mode(), Mode::Game);
    }

    #[test]
    fn test_game_preempts_teasing() {
        let mut modes = ModeController::new();
        modes.toggle(Mode::Teasing);
        assert_eq!(
            modes.toggle(Mode::Game),
            vec![ModeStep::Exit(Mode::Teasing), ModeStep::Enter(Mode::Game)]
        );
        assert_eq!(modes.mode(), Mode::Game);
    }

    #[test]
    fn test_idle_is_not_a_toggle_target() {
        let mut modes = ModeController::new();
        modes.toggle(Mode::Teasing);
        assert!(modes.toggle(Mode::Idle).is_empty());
        assert_eq!(modes.mode(), Mode::Teasing);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!(Mode::from_str("Tease"), Some(Mode::Teasing));
        assert_eq!(Mode::from_str("GAME"), Some(Mode::Game));
        assert_eq!(Mode::from_str("spin"), None);
    }
}
