//! Per-session statistics
//!
//! Durations are kept as `Duration` so the total is an exact sum of the
//! per-round times, with no float drift.

use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::time::Duration;

use crate::settings::ProfileText;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationReason {
    /// Round limit reached
    Completed,
    /// A non-target sensor fired
    WrongHit,
}

impl TerminationReason {
    pub fn code(self) -> &'static str {
        match self {
            TerminationReason::Completed => "completed",
            TerminationReason::WrongHit => "wrong_hit",
        }
    }

    pub fn from_code(s: &str) -> Option<Self> {
        match s {
            "completed" => Some(TerminationReason::Completed),
            "wrong_hit" => Some(TerminationReason::WrongHit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameSession {
    round_durations: Vec<Duration>,
    total_elapsed: Duration,
    termination: Option<TerminationReason>,
}

impl GameSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rounds_completed(&self) -> u32 {
        self.round_durations.len() as u32
    }

    pub fn round_durations(&self) -> &[Duration] {
        &self.round_durations
    }

    pub fn total_elapsed(&self) -> Duration {
        self.total_elapsed
    }

    pub fn termination(&self) -> Option<TerminationReason> {
        self.termination
    }

    pub fn is_terminated(&self) -> bool {
        self.termination.is_some()
    }

    /// Returns false (and records nothing) once the session has terminated
    pub fn record_hit(&mut self, elapsed: Duration) -> bool {
        if self.is_terminated() {
            return false;
        }
        self.round_durations.push(elapsed);
        self.total_elapsed += elapsed;
        true
    }

    /// The first termination wins
    pub fn terminate(&mut self, reason: TerminationReason) {
        if self.termination.is_none() {
            self.termination = Some(reason);
        }
    }

    /// Text for the end-of-session panel, one line per round plus the total
    pub fn summary_text(&self, text: &ProfileText) -> String {
        let mut summary = String::from(text.summary_header);
        for (i, duration) in self.round_durations.iter().enumerate() {
            let _ = write!(
                summary,
                "\n{} {}: {:.2} sec",
                text.round_label,
                i + 1,
                duration.as_secs_f64()
            );
        }
        let _ = write!(
            summary,
            "\n{}: {:.2} sec",
            text.total_label,
            self.total_elapsed.as_secs_f64()
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::DeploymentProfile;

    #[test]
    fn test_totals_stay_exact() {
        let mut session = GameSession::new();
        for ms in [400, 550, 300] {
            assert!(session.record_hit(Duration::from_millis(ms)));
        }
        assert_eq!(session.rounds_completed(), 3);
        assert_eq!(session.total_elapsed(), Duration::from_millis(1250));
        assert_eq!(
            session.total_elapsed(),
            session.round_durations().iter().sum::<Duration>()
        );
    }

    #[test]
    fn test_terminated_session_is_frozen() {
        let mut session = GameSession::new();
        session.record_hit(Duration::from_millis(100));
        session.terminate(TerminationReason::WrongHit);
        session.terminate(TerminationReason::Completed);

        assert!(!session.record_hit(Duration::from_millis(200)));
        assert_eq!(session.rounds_completed(), 1);
        assert_eq!(session.termination(), Some(TerminationReason::WrongHit));
    }

    #[test]
    fn test_classic_summary() {
        let mut session = GameSession::new();
        session.record_hit(Duration::from_millis(400));
        session.record_hit(Duration::from_millis(1250));
        assert_eq!(
            session.summary_text(DeploymentProfile::Classic.text()),
            "Game Over!\nRound 1: 0.40 sec\nRound 2: 1.25 sec\nTotal time: 1.65 sec"
        );
    }

    #[test]
    fn test_spins_summary() {
        let mut session = GameSession::new();
        session.record_hit(Duration::from_millis(700));
        assert_eq!(
            session.summary_text(DeploymentProfile::Spins.text()),
            "The Cats Are Tired.\nReaction Time 1: 0.70 sec\nTotal reaction time: 0.70 sec"
        );
    }
}
