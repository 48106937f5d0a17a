//! Scenario execution engine
//!
//! Runs a scenario against a headless [`SessionState`] on a manual clock.
//! There is no Bevy app and no real time: the clock jumps straight to the
//! next moment anything is due, so runs are exact and repeatable.

use std::time::Duration;

use crate::animation::AnimationClock;
use crate::audio::{AudioCommand, AudioQueue, Cue};
use crate::constants::ENTITY_COUNT;
use crate::display::{DisplayQueue, DisplayState, DisplayTarget, Panel};
use crate::game::{RandomTargets, ScriptedTargets, TargetSource};
use crate::input::{Channel, Polarity};
use crate::mode::Mode;
use crate::settings::{DeploymentProfile, ToySettings};
use crate::state::{SessionConfig, SessionState};

use super::assertions::{AssertionError, CapturedEvent, ToySnapshot, check_sequence, check_state};
use super::input::ScriptedInputs;
use super::parser::{FrameInput, TestDefinition, TestSetup, parse_channel};

/// Result of running a scenario
#[derive(Debug)]
pub enum TestResult {
    Pass { polls: u64, end: ToySnapshot },
    Fail { error: AssertionError },
    Error { message: String },
}

impl TestResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, TestResult::Pass { .. })
    }
}

/// A session plus recording fakes for every boundary
pub struct Harness {
    pub session: SessionState,
    pub inputs: ScriptedInputs,
    pub display: DisplayQueue,
    pub screen: DisplayState,
    pub audio: AudioQueue,
    pub captured: Vec<CapturedEvent>,
    warnings: u32,
    ambient_starts: u32,
    ambient_stops: u32,
    now: Duration,
}

impl Harness {
    pub fn new(setup: &TestSetup) -> Result<Self, String> {
        let mut settings = ToySettings::default();
        if let Some(name) = &setup.profile {
            settings.profile = DeploymentProfile::from_str(name)
                .ok_or_else(|| format!("Unknown profile '{}'", name))?;
        }
        settings.round_limit = setup.round_limit;
        settings.hit_cooldown_ms = setup.hit_cooldown_ms;
        if let Some(ms) = setup.poll_interval_ms {
            settings.poll_interval_ms = ms;
        }
        if let Some(ms) = setup.animation_interval_ms {
            settings.animation_interval_ms = ms;
        }
        if setup.active_high {
            settings.polarity = Polarity::ActiveHigh;
        }
        settings.validate().map_err(|e| e.to_string())?;

        if let Some(bad) = setup.targets.iter().find(|&&t| t >= ENTITY_COUNT) {
            return Err(format!("Target {} out of range", bad));
        }
        let targets: Box<dyn TargetSource> = if setup.targets.is_empty() {
            Box::new(RandomTargets::new(Some(setup.seed.unwrap_or(0))))
        } else {
            Box::new(ScriptedTargets::new(setup.targets.clone()))
        };

        let clock = AnimationClock::new(setup.frame_count).map_err(|e| e.to_string())?;
        let mut session = SessionState::new(
            SessionConfig::from_settings(&settings),
            clock,
            targets,
            Duration::ZERO,
        );

        let mut display = DisplayQueue::new();
        session.start(&mut display);

        let mut harness = Self {
            session,
            inputs: ScriptedInputs::new(settings.polarity),
            display,
            screen: DisplayState::default(),
            audio: AudioQueue::default(),
            captured: Vec::new(),
            warnings: 0,
            ambient_starts: 0,
            ambient_stops: 0,
            now: Duration::ZERO,
        };
        harness.collect();
        Ok(harness)
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Apply one scripted moment: line levels and faults first, then clicks
    pub fn apply_frame(&mut self, frame: &FrameInput) -> Result<(), String> {
        self.now = Duration::from_millis(frame.time_ms);

        for (channel, triggered) in frame.channel_changes() {
            self.inputs.set(channel, triggered);
        }
        if let Some(names) = &frame.faults {
            let channels = names
                .iter()
                .map(|name| parse_channel(name).ok_or_else(|| format!("Unknown channel '{}'", name)))
                .collect::<Result<Vec<_>, _>>()?;
            self.inputs.set_faults(channels);
        }

        if let Some(name) = &frame.toggle {
            let mode = match Mode::from_str(name) {
                Some(mode @ (Mode::Teasing | Mode::Game)) => mode,
                _ => return Err(format!("Cannot toggle '{}'", name)),
            };
            self.session.toggle(mode, self.now, &mut self.display);
        }
        if frame.play_again {
            self.session.play_again(self.now, &mut self.display);
        }

        self.collect();
        Ok(())
    }

    /// Run everything due at `now`
    pub fn step(&mut self, now: Duration) {
        self.now = now;
        self.session
            .run_due(now, &mut self.inputs, &mut self.display, &mut self.audio);
        self.collect();
    }

    fn collect(&mut self) {
        let time_ms = self.now.as_millis() as u64;

        for bus_event in self.session.events.drain() {
            if let Some(captured) = CapturedEvent::from_toy_event(bus_event.time_ms, &bus_event.event) {
                self.captured.push(captured);
            }
        }

        for command in self.audio.drain() {
            match command {
                AudioCommand::PlayLoop(Cue::Ambient) => self.ambient_starts += 1,
                AudioCommand::Stop(Cue::Ambient) => self.ambient_stops += 1,
                AudioCommand::PlayOnce(Cue::Warning) => self.warnings += 1,
                _ => {}
            }
            self.captured.push(CapturedEvent::from_audio(time_ms, &command));
        }

        for command in self.display.drain() {
            self.screen.apply(command);
        }
    }

    pub fn snapshot(&self) -> ToySnapshot {
        let engine = self.session.engine();
        let session = engine.session();
        let round = engine.active_round();

        let panel = match &self.screen.panel {
            None => "none",
            Some(Panel::EndOfSession { .. }) => "end_of_session",
            Some(Panel::Warning { .. }) => "warning",
        };
        let visible = if self.screen.is_visible(DisplayTarget::Single) {
            "single"
        } else if self.screen.visible.is_empty() {
            "none"
        } else {
            "cats"
        };

        ToySnapshot {
            mode: self.session.mode().to_string(),
            rounds: session.rounds_completed(),
            total_ms: session.total_elapsed().as_millis() as u64,
            termination: session
                .termination()
                .map(|reason| reason.code())
                .unwrap_or("none")
                .to_string(),
            round: round.map(|r| r.number).unwrap_or(0),
            last_outcome: engine
                .last_round()
                .map(|r| r.outcome.code())
                .unwrap_or("none")
                .to_string(),
            target: round.map(|r| r.target),
            spinning: self.session.cats().iter().map(|c| c.spinning).collect(),
            single_spinning: self.session.single().spinning,
            ambient: self.session.ambient_playing(),
            panel: panel.to_string(),
            visible: visible.to_string(),
            warnings: self.warnings,
            ambient_starts: self.ambient_starts,
            ambient_stops: self.ambient_stops,
            faults: Channel::ALL
                .iter()
                .map(|&channel| {
                    (
                        channel.to_string(),
                        self.session.poll_loop().faults().consecutive_faults(channel),
                    )
                })
                .collect(),
        }
    }
}

/// Run a single scenario and return the result
pub fn run_test(test: &TestDefinition) -> TestResult {
    let mut harness = match Harness::new(&test.setup) {
        Ok(harness) => harness,
        Err(message) => return TestResult::Error { message },
    };

    let mut frames: Vec<&FrameInput> = test.input.iter().collect();
    frames.sort_by_key(|f| f.time_ms);
    let mut checks: Vec<_> = test.expect.state.iter().collect();
    checks.sort_by_key(|c| c.after_ms);

    let end = Duration::from_millis(
        frames
            .last()
            .map(|f| f.time_ms)
            .unwrap_or(0)
            .max(checks.last().map(|c| c.after_ms).unwrap_or(0)),
    );

    let mut frame_idx = 0;
    let mut check_idx = 0;
    let mut now = Duration::ZERO;

    loop {
        while let Some(frame) = frames.get(frame_idx)
            && Duration::from_millis(frame.time_ms) <= now
        {
            if let Err(message) = harness.apply_frame(frame) {
                return TestResult::Error { message };
            }
            frame_idx += 1;
        }

        harness.step(now);

        let mut next = harness.session.scheduler().next_wake();
        if let Some(frame) = frames.get(frame_idx) {
            next = next.min(Duration::from_millis(frame.time_ms));
        }
        if next <= now {
            next = now + Duration::from_millis(1);
        }

        // Everything up to after_ms has run once time is about to pass it
        while let Some(check) = checks.get(check_idx)
            && Duration::from_millis(check.after_ms) < next
        {
            if let Err(error) = check_state(check, &harness.snapshot()) {
                return TestResult::Fail { error };
            }
            check_idx += 1;
        }

        if next > end {
            break;
        }
        now = next;
    }

    if let Err(error) = check_sequence(&test.expect.sequence, &harness.captured) {
        return TestResult::Fail { error };
    }

    TestResult::Pass {
        polls: harness.session.poll_loop().ticks(),
        end: harness.snapshot(),
    }
}
