//! Session state - everything the toy knows, in one place
//!
//! Owns the mode controller, the cats, the game engine, the audio arbiter,
//! the animation clock and the scheduler. All mutation goes through
//! `&mut SessionState`, so there is exactly one writer. The Bevy app keeps
//! it in a resource; the scenario runner owns one directly.

use bevy::log::{debug, info};
use bevy::prelude::Resource;
use std::time::Duration;

use crate::animation::{AnimationClock, SpinEntity};
use crate::audio::{AudioArbiter, AudioCue, should_play};
use crate::constants::{ENTITY_COUNT, WARNING_MESSAGE};
use crate::display::{DisplaySurface, DisplayTarget, FrameRef, ModeLabels};
use crate::events::{EventBus, ToyEvent};
use crate::game::{
    EngineState, GameRoundEngine, GameRules, RoundEvent, TargetSource, TerminationReason,
};
use crate::input::{InputSample, InputSource, Polarity};
use crate::mode::{Mode, ModeController, ModeStep};
use crate::poll::PollLoop;
use crate::scheduler::{Scheduler, Task};
use crate::settings::{ProfileText, ToySettings};

/// Timing and policy a session runs with
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    pub rules: GameRules,
    pub poll_interval: Duration,
    pub animation_interval: Duration,
    pub polarity: Polarity,
    pub text: &'static ProfileText,
}

impl SessionConfig {
    pub fn from_settings(settings: &ToySettings) -> Self {
        Self {
            rules: settings.game_rules(),
            poll_interval: settings.poll_interval(),
            animation_interval: settings.animation_interval(),
            polarity: settings.polarity,
            text: settings.text(),
        }
    }
}

#[derive(Resource)]
pub struct SessionState {
    config: SessionConfig,
    modes: ModeController,
    single: SpinEntity,
    cats: [SpinEntity; ENTITY_COUNT],
    engine: GameRoundEngine,
    audio: AudioArbiter,
    clock: AnimationClock,
    scheduler: Scheduler,
    poll: PollLoop,
    targets: Box<dyn TargetSource>,
    pub events: EventBus,
}

impl SessionState {
    pub fn new(
        config: SessionConfig,
        clock: AnimationClock,
        targets: Box<dyn TargetSource>,
        start: Duration,
    ) -> Self {
        Self {
            config,
            modes: ModeController::new(),
            single: SpinEntity::new(0),
            cats: std::array::from_fn(SpinEntity::new),
            engine: GameRoundEngine::new(config.rules),
            audio: AudioArbiter::new(),
            clock,
            scheduler: Scheduler::new(config.poll_interval, config.animation_interval, start),
            poll: PollLoop::new(config.polarity),
            targets,
            events: EventBus::new(),
        }
    }

    /// Put the Idle screen up
    pub fn start(&mut self, display: &mut dyn DisplaySurface) {
        display.hide_panels();
        display.set_visible_entities(&[DisplayTarget::Single]);
        display.set_frame(DisplayTarget::Single, FrameRef::Still);
        display.set_mode_labels(self.labels());
    }

    pub fn mode(&self) -> Mode {
        self.modes.mode()
    }

    pub fn single(&self) -> &SpinEntity {
        &self.single
    }

    pub fn cats(&self) -> &[SpinEntity; ENTITY_COUNT] {
        &self.cats
    }

    pub fn engine(&self) -> &GameRoundEngine {
        &self.engine
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn poll_loop(&self) -> &PollLoop {
        &self.poll
    }

    pub fn ambient_playing(&self) -> bool {
        self.audio.is_playing()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Mode button text for the current mode
    pub fn labels(&self) -> ModeLabels {
        let text = self.config.text;
        match self.modes.mode() {
            Mode::Idle => ModeLabels {
                tease: text.tease_label,
                game: text.game_start_label,
                tease_enabled: true,
            },
            Mode::Teasing => ModeLabels {
                tease: text.tease_back_label,
                game: text.game_start_label,
                tease_enabled: true,
            },
            Mode::Game => ModeLabels {
                tease: text.tease_label,
                game: text.game_stop_label,
                tease_enabled: false,
            },
        }
    }

    /// Toggle Teasing or Game. Rejected toggles change nothing.
    pub fn toggle(
        &mut self,
        target: Mode,
        now: Duration,
        display: &mut dyn DisplaySurface,
    ) {
        self.events.update_time(now);
        let steps = self.modes.toggle(target);
        if steps.is_empty() {
            return;
        }

        let mut from = match steps[0] {
            ModeStep::Exit(mode) => mode,
            ModeStep::Enter(_) => Mode::Idle,
        };
        for step in steps {
            self.apply_step(step, now, display);
            let to = match step {
                ModeStep::Exit(_) => Mode::Idle,
                ModeStep::Enter(mode) => mode,
            };
            info!("Mode {} -> {}", from, to);
            self.events.emit(ToyEvent::ModeChange { from, to });
            from = to;
        }
        display.set_mode_labels(self.labels());
    }

    /// Audio is left to the next poll tick, which re-evaluates it
    fn apply_step(&mut self, step: ModeStep, now: Duration, display: &mut dyn DisplaySurface) {
        match step {
            ModeStep::Enter(Mode::Teasing) => {
                self.single.set_spinning(false);
                display.set_visible_entities(&self.cat_targets());
            }
            ModeStep::Exit(Mode::Teasing) => {
                for cat in &mut self.cats {
                    cat.set_spinning(false);
                }
                display.set_visible_entities(&[DisplayTarget::Single]);
            }
            ModeStep::Enter(Mode::Game) => {
                self.single.set_spinning(false);
                display.hide_panels();
                display.set_visible_entities(&self.cat_targets());
                self.engine.begin_session();
                self.events.emit(ToyEvent::GameStart {
                    round_limit: self.config.rules.round_limit,
                });
                self.start_round(now);
            }
            ModeStep::Exit(Mode::Game) => {
                self.engine.abandon(&mut self.cats);
                self.scheduler.cancel(Task::StartRound);
                display.hide_panels();
                display.set_visible_entities(&[DisplayTarget::Single]);
            }
            ModeStep::Enter(Mode::Idle) | ModeStep::Exit(Mode::Idle) => {}
        }
    }

    /// "Play Again" from the end-of-session or warning panel
    pub fn play_again(&mut self, now: Duration, display: &mut dyn DisplaySurface) {
        if self.modes.mode() != Mode::Game || !matches!(self.engine.state(), EngineState::SessionEnded(_)) {
            debug!("Play again ignored: no finished game");
            return;
        }
        self.events.update_time(now);
        self.engine.reset();
        self.scheduler.cancel(Task::StartRound);
        display.hide_panels();
        display.set_visible_entities(&self.cat_targets());
        info!("Play again");
        self.events.emit(ToyEvent::GameStart {
            round_limit: self.config.rules.round_limit,
        });
        self.start_round(now);
    }

    fn start_round(&mut self, now: Duration) {
        if let Some(round) = self
            .engine
            .start_round(now, &mut self.cats, self.targets.as_mut())
        {
            self.events.emit(ToyEvent::RoundStart {
                round: round.number,
                target: round.target,
            });
        }
    }

    fn cat_targets(&self) -> [DisplayTarget; ENTITY_COUNT] {
        std::array::from_fn(DisplayTarget::Cat)
    }

    /// Route one input sample: mode first, then the game, then audio
    pub fn poll_tick(
        &mut self,
        sample: &InputSample,
        now: Duration,
        display: &mut dyn DisplaySurface,
        audio: &mut dyn AudioCue,
    ) {
        self.events.update_time(now);

        match self.modes.mode() {
            Mode::Idle => self.single.set_spinning(sample.button),
            Mode::Teasing => {
                for (cat, &triggered) in self.cats.iter_mut().zip(sample.sensors.iter()) {
                    cat.set_spinning(triggered);
                }
            }
            Mode::Game => match self.engine.evaluate_input(sample, now, &mut self.cats) {
                RoundEvent::None => {}
                RoundEvent::Hit {
                    round,
                    target,
                    elapsed,
                    completed,
                } => {
                    self.events.emit(ToyEvent::Hit {
                        round,
                        target,
                        elapsed_ms: elapsed.as_millis() as u64,
                    });
                    if completed {
                        let session = self.engine.session();
                        self.events.emit(ToyEvent::GameEnd {
                            reason: TerminationReason::Completed,
                            rounds: session.rounds_completed(),
                            total_ms: session.total_elapsed().as_millis() as u64,
                        });
                        display.set_visible_entities(&[]);
                        display.show_end_of_session_panel(&session.summary_text(self.config.text));
                    } else {
                        self.scheduler
                            .schedule_once(Task::StartRound, now + self.config.rules.hit_cooldown);
                    }
                }
                RoundEvent::Miss {
                    round,
                    target,
                    wrong,
                } => {
                    self.events.emit(ToyEvent::Miss {
                        round,
                        target,
                        wrong,
                    });
                    let session = self.engine.session();
                    self.events.emit(ToyEvent::GameEnd {
                        reason: TerminationReason::WrongHit,
                        rounds: session.rounds_completed(),
                        total_ms: session.total_elapsed().as_millis() as u64,
                    });
                    self.audio.wrong_hit(audio);
                    display.show_warning_panel(WARNING_MESSAGE);
                }
            },
        }

        let want = should_play(self.modes.mode(), sample.button, &self.cats);
        self.audio.update(want, audio);
    }

    /// Advance every visible cat by one animation tick
    pub fn animate_tick(&mut self, display: &mut dyn DisplaySurface) {
        match self.modes.mode() {
            Mode::Idle => self
                .clock
                .tick(&mut self.single, DisplayTarget::Single, display),
            Mode::Teasing | Mode::Game => {
                for cat in &mut self.cats {
                    let target = DisplayTarget::Cat(cat.index);
                    self.clock.tick(cat, target, display);
                }
            }
        }
    }

    /// Run whatever the scheduler says is due at `now`
    pub fn run_due(
        &mut self,
        now: Duration,
        input: &mut dyn InputSource,
        display: &mut dyn DisplaySurface,
        audio: &mut dyn AudioCue,
    ) -> Vec<Task> {
        let due = self.scheduler.advance(now);
        for task in &due {
            match task {
                Task::Poll => {
                    self.events.update_time(now);
                    let sample = self.poll.sample(input, &mut self.events);
                    self.poll_tick(&sample, now, display, audio);
                }
                Task::StartRound => {
                    self.events.update_time(now);
                    if self.modes.mode() == Mode::Game {
                        self.start_round(now);
                    }
                }
                Task::Animate => self.animate_tick(display),
            }
        }
        due
    }
}
