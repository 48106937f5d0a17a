//! Mode buttons along the bottom edge

use bevy::prelude::*;

use super::ToyRequests;
use crate::constants::*;
use crate::display::DisplayState;
use crate::mode::Mode;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeButton {
    Tease,
    Game,
}

impl ModeButton {
    fn mode(self) -> Mode {
        match self {
            ModeButton::Tease => Mode::Teasing,
            ModeButton::Game => Mode::Game,
        }
    }
}

/// Text inside a mode button
#[derive(Component, Debug, Clone, Copy)]
pub struct ModeButtonText(pub ModeButton);

pub fn spawn_mode_buttons(mut commands: Commands) {
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(24.0),
            width: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            column_gap: Val::Px(24.0),
            ..default()
        })
        .with_children(|row| {
            for button in [ModeButton::Tease, ModeButton::Game] {
                row.spawn((
                    Button,
                    Node {
                        padding: UiRect::axes(Val::Px(18.0), Val::Px(8.0)),
                        justify_content: JustifyContent::Center,
                        ..default()
                    },
                    BackgroundColor(BUTTON_COLOR),
                    button,
                ))
                .with_children(|parent| {
                    parent.spawn((
                        Text::new(""),
                        TextFont {
                            font_size: BUTTON_FONT_SIZE,
                            ..default()
                        },
                        TextColor(TEXT_PRIMARY),
                        ModeButtonText(button),
                    ));
                });
            }
        });
}

pub fn mode_button_clicks(
    buttons: Query<(&Interaction, &ModeButton), Changed<Interaction>>,
    display: Res<DisplayState>,
    mut requests: ResMut<ToyRequests>,
) {
    for (interaction, button) in &buttons {
        if *interaction != Interaction::Pressed {
            continue;
        }
        let enabled = match button {
            ModeButton::Tease => display.labels.is_none_or(|l| l.tease_enabled),
            ModeButton::Game => true,
        };
        if enabled {
            requests.toggle(button.mode());
        }
    }
}

/// T / G / R mirror the buttons for keyboard-only setups
pub fn keyboard_shortcuts(keyboard: Res<ButtonInput<KeyCode>>, mut requests: ResMut<ToyRequests>) {
    if keyboard.just_pressed(TEASE_KEY) {
        requests.toggle(Mode::Teasing);
    }
    if keyboard.just_pressed(GAME_KEY) {
        requests.toggle(Mode::Game);
    }
    if keyboard.just_pressed(PLAY_AGAIN_KEY) {
        requests.play_again = true;
    }
}

pub fn sync_mode_buttons(
    display: Res<DisplayState>,
    mut buttons: Query<(&ModeButton, &mut BackgroundColor)>,
    mut texts: Query<(&ModeButtonText, &mut Text)>,
) {
    if !display.is_changed() {
        return;
    }
    let Some(labels) = display.labels else {
        return;
    };

    for (button, mut background) in &mut buttons {
        let enabled = *button == ModeButton::Game || labels.tease_enabled;
        background.0 = if enabled {
            BUTTON_COLOR
        } else {
            BUTTON_DISABLED_COLOR
        };
    }

    for (marker, mut text) in &mut texts {
        let label = match marker.0 {
            ModeButton::Tease => labels.tease,
            ModeButton::Game => labels.game,
        };
        if text.0 != label {
            text.0 = label.to_string();
        }
    }
}
