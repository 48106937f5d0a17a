//! Reaction game - rounds, sessions and target selection

mod engine;
mod round;
mod session;
mod targets;

pub use engine::{EngineState, GameRoundEngine, GameRules, RoundEvent, Verdict, judge};
pub use round::{GameRound, RoundOutcome};
pub use session::{GameSession, TerminationReason};
pub use targets::{RandomTargets, ScriptedTargets, TargetSource};
