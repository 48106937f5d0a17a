//! Game round engine
//!
//! One round at a time: a random cat spins, the player hits its sensor, the
//! reaction time is recorded and the next round follows after a cooldown.
//! Hitting any other cat ends the session.
//!
//! State machine:
//! `AwaitingRound -> RoundActive -> (hit) AwaitingRound | SessionEnded`
//! `RoundActive -> (miss) SessionEnded`
//!
//! The engine never touches the display or audio; it mutates the cats it is
//! handed and reports what happened as a [`RoundEvent`].

use bevy::log::{debug, info};
use std::time::Duration;

use super::round::{GameRound, RoundOutcome};
use super::session::{GameSession, TerminationReason};
use super::targets::TargetSource;
use crate::animation::SpinEntity;
use crate::input::InputSample;

/// Deployment policy for a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameRules {
    pub round_limit: u32,
    /// Pause between a hit and the next round
    pub hit_cooldown: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Between rounds (session start or cooldown)
    AwaitingRound,
    RoundActive(GameRound),
    SessionEnded(TerminationReason),
}

/// Outcome of judging one input sample against the active round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Hit,
    /// Carries the lowest-indexed wrong sensor
    Miss(usize),
    Nothing,
}

/// Hit/miss decision for one sample. A hit on the spinning target wins over
/// any simultaneous wrong sensor.
pub fn judge(sample: &InputSample, target: usize, target_spinning: bool) -> Verdict {
    if target_spinning && sample.sensors.get(target).copied().unwrap_or(false) {
        return Verdict::Hit;
    }
    match sample
        .sensors
        .iter()
        .enumerate()
        .find(|&(i, &triggered)| i != target && triggered)
    {
        Some((wrong, _)) => Verdict::Miss(wrong),
        None => Verdict::Nothing,
    }
}

/// What `evaluate_input` observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEvent {
    None,
    Hit {
        round: u32,
        target: usize,
        elapsed: Duration,
        /// Round limit reached; the session is over
        completed: bool,
    },
    Miss {
        round: u32,
        target: usize,
        wrong: usize,
    },
}

#[derive(Debug, Clone)]
pub struct GameRoundEngine {
    rules: GameRules,
    state: EngineState,
    session: GameSession,
    /// Most recently resolved round of this session
    last_round: Option<GameRound>,
}

impl GameRoundEngine {
    pub fn new(rules: GameRules) -> Self {
        Self {
            rules,
            state: EngineState::AwaitingRound,
            session: GameSession::new(),
            last_round: None,
        }
    }

    pub fn rules(&self) -> GameRules {
        self.rules
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn active_round(&self) -> Option<GameRound> {
        match self.state {
            EngineState::RoundActive(round) => Some(round),
            _ => None,
        }
    }

    pub fn last_round(&self) -> Option<GameRound> {
        self.last_round
    }

    /// Fresh statistics, ready for round 1
    pub fn begin_session(&mut self) {
        self.session = GameSession::new();
        self.last_round = None;
        self.state = EngineState::AwaitingRound;
    }

    /// "Play Again": prior statistics are discarded
    pub fn reset(&mut self) {
        self.begin_session();
    }

    /// Leaving Game mode discards the round in progress
    pub fn abandon(&mut self, cats: &mut [SpinEntity]) {
        stop_all(cats);
        self.begin_session();
    }

    /// Spin a freshly picked target and stop every other cat.
    /// Only valid between rounds; returns `None` otherwise.
    pub fn start_round(
        &mut self,
        now: Duration,
        cats: &mut [SpinEntity],
        targets: &mut dyn TargetSource,
    ) -> Option<GameRound> {
        if self.state != EngineState::AwaitingRound {
            debug!("start_round ignored in {:?}", self.state);
            return None;
        }

        let target = targets.pick(cats.len());
        for cat in cats.iter_mut() {
            cat.set_spinning(cat.index == target);
        }

        let round = GameRound::new(self.session.rounds_completed() + 1, target, now);
        self.state = EngineState::RoundActive(round);
        info!("Round {} started, target cat {}", round.number, target);
        Some(round)
    }

    /// Judge a sample against the active round. No-op while between rounds
    /// and after the session has ended.
    pub fn evaluate_input(
        &mut self,
        sample: &InputSample,
        now: Duration,
        cats: &mut [SpinEntity],
    ) -> RoundEvent {
        let EngineState::RoundActive(mut round) = self.state else {
            return RoundEvent::None;
        };

        let target_spinning = cats.get(round.target).is_some_and(|cat| cat.spinning);
        match judge(sample, round.target, target_spinning) {
            Verdict::Nothing => RoundEvent::None,
            Verdict::Hit => {
                let elapsed = round.elapsed_at(now);
                round.resolve(RoundOutcome::Hit);
                self.last_round = Some(round);
                self.session.record_hit(elapsed);
                stop_all(cats);

                let completed = self.session.rounds_completed() >= self.rules.round_limit;
                if completed {
                    self.session.terminate(TerminationReason::Completed);
                    self.state = EngineState::SessionEnded(TerminationReason::Completed);
                    info!(
                        "Session complete: {} rounds in {:.2}s",
                        self.session.rounds_completed(),
                        self.session.total_elapsed().as_secs_f64()
                    );
                } else {
                    self.state = EngineState::AwaitingRound;
                }
                info!(
                    "Round {} hit on cat {} after {:.2}s",
                    round.number,
                    round.target,
                    elapsed.as_secs_f64()
                );

                RoundEvent::Hit {
                    round: round.number,
                    target: round.target,
                    elapsed,
                    completed,
                }
            }
            Verdict::Miss(wrong) => {
                round.resolve(RoundOutcome::Miss);
                self.last_round = Some(round);
                stop_all(cats);
                self.session.terminate(TerminationReason::WrongHit);
                self.state = EngineState::SessionEnded(TerminationReason::WrongHit);
                info!(
                    "Round {} missed: cat {} hit instead of cat {}",
                    round.number, wrong, round.target
                );

                RoundEvent::Miss {
                    round: round.number,
                    target: round.target,
                    wrong,
                }
            }
        }
    }
}

fn stop_all(cats: &mut [SpinEntity]) {
    for cat in cats.iter_mut() {
        cat.set_spinning(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::ScriptedTargets;
    use crate::input::Channel;

    fn cats() -> [SpinEntity; 3] {
        [SpinEntity::new(0), SpinEntity::new(1), SpinEntity::new(2)]
    }

    fn rules(round_limit: u32) -> GameRules {
        GameRules {
            round_limit,
            hit_cooldown: Duration::from_millis(1000),
        }
    }

    fn sensor(i: usize) -> InputSample {
        InputSample::default().with(Channel::Sensor(i), true)
    }

    fn ms(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    #[test]
    fn test_judge_hit_precedence() {
        let both = sensor(0).with(Channel::Sensor(2), true);
        assert_eq!(judge(&both, 2, true), Verdict::Hit);
        assert_eq!(judge(&both, 2, false), Verdict::Miss(0));
        assert_eq!(judge(&InputSample::default(), 1, true), Verdict::Nothing);
    }

    #[test]
    fn test_button_is_not_a_sensor() {
        let button = InputSample::default().with(Channel::Button, true);
        assert_eq!(judge(&button, 0, true), Verdict::Nothing);
    }

    #[test]
    fn test_start_round_spins_only_target() {
        let mut engine = GameRoundEngine::new(rules(3));
        let mut cats = cats();
        cats[0].set_spinning(true);
        cats[1].frame = 4;
        let mut targets = ScriptedTargets::new(vec![1]);

        let round = engine.start_round(ms(0), &mut cats, &mut targets).unwrap();
        assert_eq!(round.number, 1);
        assert_eq!(round.target, 1);
        assert_eq!(
            cats.iter().map(|c| c.spinning).collect::<Vec<_>>(),
            vec![false, true, false]
        );
        assert_eq!(cats[1].frame, 0);

        // A second start while a round is active is ignored
        assert!(engine.start_round(ms(5), &mut cats, &mut targets).is_none());
    }

    #[test]
    fn test_hits_until_completed() {
        let mut engine = GameRoundEngine::new(rules(3));
        let mut cats = cats();
        let mut targets = ScriptedTargets::new(vec![1, 2, 0]);

        let mut now = ms(0);
        for (i, (target, reaction)) in [(1, 400), (2, 550), (0, 300)].into_iter().enumerate() {
            let round = engine.start_round(now, &mut cats, &mut targets).unwrap();
            assert_eq!(round.target, target);
            now += ms(reaction);
            let event = engine.evaluate_input(&sensor(target), now, &mut cats);
            assert_eq!(
                event,
                RoundEvent::Hit {
                    round: i as u32 + 1,
                    target,
                    elapsed: ms(reaction),
                    completed: i == 2,
                }
            );
            now += ms(1000);
        }

        let last = engine.last_round().unwrap();
        assert_eq!((last.number, last.outcome), (3, RoundOutcome::Hit));

        let session = engine.session();
        assert_eq!(session.rounds_completed(), 3);
        assert_eq!(session.total_elapsed(), ms(1250));
        assert_eq!(
            engine.state(),
            EngineState::SessionEnded(TerminationReason::Completed)
        );
        assert!(cats.iter().all(|c| !c.spinning));
    }

    #[test]
    fn test_wrong_hit_ends_session() {
        let mut engine = GameRoundEngine::new(rules(10));
        let mut cats = cats();
        let mut targets = ScriptedTargets::new(vec![2]);
        engine.start_round(ms(0), &mut cats, &mut targets);

        let event = engine.evaluate_input(&sensor(0), ms(200), &mut cats);
        assert_eq!(
            event,
            RoundEvent::Miss {
                round: 1,
                target: 2,
                wrong: 0
            }
        );
        assert!(cats.iter().all(|c| !c.spinning));
        assert_eq!(
            engine.session().termination(),
            Some(TerminationReason::WrongHit)
        );
        let last = engine.last_round().unwrap();
        assert_eq!((last.number, last.target), (1, 2));
        assert_eq!(last.outcome, RoundOutcome::Miss);

        // Frozen until reset
        assert_eq!(
            engine.evaluate_input(&sensor(2), ms(300), &mut cats),
            RoundEvent::None
        );
        assert!(engine.start_round(ms(400), &mut cats, &mut targets).is_none());
        assert_eq!(engine.session().rounds_completed(), 0);
    }

    #[test]
    fn test_input_ignored_during_cooldown() {
        let mut engine = GameRoundEngine::new(rules(10));
        let mut cats = cats();
        let mut targets = ScriptedTargets::new(vec![0]);
        engine.start_round(ms(0), &mut cats, &mut targets);
        engine.evaluate_input(&sensor(0), ms(100), &mut cats);
        assert_eq!(engine.state(), EngineState::AwaitingRound);

        assert_eq!(
            engine.evaluate_input(&sensor(1), ms(150), &mut cats),
            RoundEvent::None
        );
        assert!(!engine.session().is_terminated());
    }

    #[test]
    fn test_reset_discards_stats() {
        let mut engine = GameRoundEngine::new(rules(1));
        let mut cats = cats();
        let mut targets = ScriptedTargets::new(vec![0]);
        engine.start_round(ms(0), &mut cats, &mut targets);
        engine.evaluate_input(&sensor(0), ms(100), &mut cats);
        assert!(engine.session().is_terminated());

        engine.reset();
        assert!(engine.last_round().is_none());
        assert_eq!(engine.session().rounds_completed(), 0);
        assert_eq!(engine.state(), EngineState::AwaitingRound);
        let round = engine.start_round(ms(200), &mut cats, &mut targets).unwrap();
        assert_eq!(round.number, 1);
    }

    #[test]
    fn test_abandon_stops_cats() {
        let mut engine = GameRoundEngine::new(rules(5));
        let mut cats = cats();
        let mut targets = ScriptedTargets::new(vec![1]);
        engine.start_round(ms(0), &mut cats, &mut targets);

        engine.abandon(&mut cats);
        assert!(cats.iter().all(|c| !c.spinning));
        assert!(engine.active_round().is_none());
    }
}
