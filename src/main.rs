//! Spincat - a spinning-cat toy built with Bevy
//!
//! Main entry point: load settings, check assets, claim inputs, run the app.

use bevy::prelude::*;
use bevy::window::WindowResolution;
use std::path::PathBuf;
use std::time::Duration;

use spincat::constants::*;
use spincat::{
    AnimationClock, EventLogConfig, EventLogger, InputDevice, RandomTargets, RunConfig,
    SessionConfig, SessionState, SpinFrameFiles, ToyPlugin, ToySettings,
};

/// Print and quit before the window opens. Bevy's log subscriber doesn't exist yet.
fn fail(context: &str, error: impl std::fmt::Display) -> ! {
    eprintln!("spincat: {}: {}", context, error);
    std::process::exit(1);
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    // Load persistent settings (uses defaults if file doesn't exist)
    let mut settings = ToySettings::load();
    settings.apply_args(&args);
    if let Err(e) = settings.validate() {
        fail("bad settings", e);
    }

    // Save on first run so the file exists for editing
    if args.iter().any(|a| a == "--save-settings")
        && let Err(e) = settings.save()
    {
        eprintln!("spincat: failed to save settings: {}", e);
    }

    // Missing frames are the one fatal condition
    let frames = SpinFrameFiles::discover(&settings.assets_dir).unwrap_or_else(|e| fail("assets", e));
    let clock = AnimationClock::new(frames.frame_count()).unwrap_or_else(|e| fail("assets", e));

    let device = InputDevice::open(&settings).unwrap_or_else(|e| fail("input", e));

    let session = SessionState::new(
        SessionConfig::from_settings(&settings),
        clock,
        Box::new(RandomTargets::new(settings.seed)),
        Duration::ZERO,
    );

    let mut logger = EventLogger::new(EventLogConfig {
        log_dir: PathBuf::from(&settings.log_dir),
        enabled: settings.event_log,
    });
    logger.start_session(&chrono::Local::now().format("%Y%m%d_%H%M%S").to_string());
    logger.log_config(RunConfig::from_settings(&settings));

    let title = settings.text().window_title;
    let assets_dir = settings.assets_dir.clone();

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        resolution: WindowResolution::new(WINDOW_WIDTH, WINDOW_HEIGHT)
                            .with_scale_factor_override(1.0),
                        title: title.into(),
                        resizable: false,
                        ..default()
                    }),
                    ..default()
                })
                .set(AssetPlugin {
                    file_path: assets_dir,
                    ..default()
                }),
        )
        .insert_resource(ClearColor(BACKGROUND_COLOR))
        .insert_resource(settings)
        .insert_resource(session)
        .insert_resource(device)
        .insert_resource(frames)
        .insert_resource(logger)
        .add_plugins(ToyPlugin)
        .run();
}
