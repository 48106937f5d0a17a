//! Bevy wiring: resources, startup and the per-frame system chain
//!
//! Expects `ToySettings`, `SessionState`, `InputDevice`, `SpinFrameFiles`
//! and `EventLogger` to be inserted before the plugin runs.

use bevy::prelude::*;

use crate::audio::{
    AudioQueue, apply_audio_commands, load_cue_handles, release_audio_on_exit,
};
use crate::display::{
    DisplayQueue, DisplayState, apply_display_commands, load_cat_frames, spawn_cats,
    sync_cat_sprites,
};
use crate::events::EventLogger;
use crate::input::{InputDevice, capture_keyboard, release_input_on_exit};
use crate::state::SessionState;
use crate::ui::{
    ToyRequests, keyboard_shortcuts, mode_button_clicks, play_again_clicks, spawn_mode_buttons,
    spawn_panel, sync_mode_buttons, sync_panel,
};

pub struct ToyPlugin;

impl Plugin for ToyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DisplayQueue>()
            .init_resource::<DisplayState>()
            .init_resource::<AudioQueue>()
            .init_resource::<ToyRequests>()
            .add_systems(
                Startup,
                (
                    setup_camera,
                    load_cat_frames,
                    load_cue_handles,
                    spawn_cats,
                    spawn_mode_buttons,
                    spawn_panel,
                    show_idle_screen,
                )
                    .chain(),
            )
            // Input -> requests -> session -> screen and speakers
            .add_systems(
                Update,
                (
                    capture_keyboard,
                    mode_button_clicks,
                    play_again_clicks,
                    keyboard_shortcuts,
                    drive_session,
                    write_event_log,
                    apply_display_commands,
                    sync_cat_sprites,
                    sync_mode_buttons,
                    sync_panel,
                    apply_audio_commands,
                )
                    .chain(),
            )
            .add_systems(
                Last,
                (release_input_on_exit, release_audio_on_exit, close_event_log),
            );
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

fn show_idle_screen(mut session: ResMut<SessionState>, mut display: ResMut<DisplayQueue>) {
    session.start(&mut *display);
}

/// The only system that mutates the session
pub fn drive_session(
    time: Res<Time>,
    mut session: ResMut<SessionState>,
    mut input: ResMut<InputDevice>,
    mut display: ResMut<DisplayQueue>,
    mut audio: ResMut<AudioQueue>,
    mut requests: ResMut<ToyRequests>,
) {
    let now = time.elapsed();
    let (toggles, play_again) = requests.take();

    for mode in toggles {
        session.toggle(mode, now, &mut *display);
    }
    if play_again {
        session.play_again(now, &mut *display);
    }

    session.run_due(now, &mut *input, &mut *display, &mut *audio);
}

fn write_event_log(mut session: ResMut<SessionState>, mut logger: ResMut<EventLogger>) {
    let events = session.events.drain();
    if events.is_empty() {
        return;
    }
    for event in &events {
        logger.log(event.time_ms, &event.event);
    }
}

fn close_event_log(mut exits: MessageReader<AppExit>, mut logger: ResMut<EventLogger>) {
    if exits.read().next().is_some() {
        logger.end_session();
    }
}
