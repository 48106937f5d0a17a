//! A single round of the reaction game

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundOutcome {
    #[default]
    Pending,
    Hit,
    Miss,
}

/// One target presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameRound {
    /// 1-based round number within the session
    pub number: u32,
    pub target: usize,
    pub start_time: Duration,
    pub outcome: RoundOutcome,
}

impl RoundOutcome {
    pub fn code(self) -> &'static str {
        match self {
            RoundOutcome::Pending => "pending",
            RoundOutcome::Hit => "hit",
            RoundOutcome::Miss => "miss",
        }
    }
}

impl GameRound {
    pub fn new(number: u32, target: usize, start_time: Duration) -> Self {
        Self {
            number,
            target,
            start_time,
            outcome: RoundOutcome::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.outcome == RoundOutcome::Pending
    }

    /// Resolve a pending round. An already resolved round keeps its outcome.
    pub fn resolve(&mut self, outcome: RoundOutcome) {
        if self.is_pending() {
            self.outcome = outcome;
        }
    }

    /// Reaction time at `now`. A clock that went backwards counts as zero.
    pub fn elapsed_at(&self, now: Duration) -> Duration {
        now.saturating_sub(self.start_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_once() {
        let mut round = GameRound::new(1, 2, Duration::from_millis(100));
        assert!(round.is_pending());
        round.resolve(RoundOutcome::Hit);
        round.resolve(RoundOutcome::Miss);
        assert_eq!(round.outcome, RoundOutcome::Hit);
        assert_eq!(round.elapsed_at(Duration::from_millis(40)), Duration::ZERO);
    }
}
