//! The overlay panel: end-of-session summary or wrong-hit warning,
//! both with a Play Again button

use bevy::prelude::*;

use super::ToyRequests;
use crate::constants::*;
use crate::display::{DisplayState, Panel};
use crate::settings::ToySettings;

#[derive(Component)]
pub struct PanelRoot;

#[derive(Component)]
pub struct PanelText;

#[derive(Component)]
pub struct PlayAgainButton;

pub fn spawn_panel(mut commands: Commands, settings: Res<ToySettings>) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(20.0),
                ..default()
            },
            Visibility::Hidden,
            PanelRoot,
        ))
        .with_children(|parent| {
            parent
                .spawn((
                    Node {
                        padding: UiRect::all(Val::Px(20.0)),
                        ..default()
                    },
                    BackgroundColor(PANEL_BACKGROUND),
                    PanelText,
                ))
                .with_children(|inner| {
                    inner.spawn((
                        Text::new(""),
                        TextFont {
                            font_size: PANEL_FONT_SIZE,
                            ..default()
                        },
                        TextColor(TEXT_PRIMARY),
                        TextLayout::new_with_justify(Justify::Center),
                    ));
                });

            parent
                .spawn((
                    Button,
                    Node {
                        padding: UiRect::axes(Val::Px(18.0), Val::Px(8.0)),
                        ..default()
                    },
                    BackgroundColor(BUTTON_COLOR),
                    PlayAgainButton,
                ))
                .with_children(|button| {
                    button.spawn((
                        Text::new(settings.text().play_again_label),
                        TextFont {
                            font_size: BUTTON_FONT_SIZE,
                            ..default()
                        },
                        TextColor(TEXT_PRIMARY),
                    ));
                });
        });
}

pub fn play_again_clicks(
    buttons: Query<&Interaction, (Changed<Interaction>, With<PlayAgainButton>)>,
    mut requests: ResMut<ToyRequests>,
) {
    if buttons.iter().any(|i| *i == Interaction::Pressed) {
        requests.play_again = true;
    }
}

/// Show, hide and restyle the panel to match the display state
pub fn sync_panel(
    display: Res<DisplayState>,
    mut root: Query<&mut Visibility, With<PanelRoot>>,
    mut boxes: Query<(&mut BackgroundColor, &Children), With<PanelText>>,
    mut texts: Query<(&mut Text, &mut TextFont, &mut TextColor)>,
) {
    if !display.is_changed() {
        return;
    }

    let Ok(mut visibility) = root.single_mut() else {
        return;
    };

    let Some(panel) = &display.panel else {
        *visibility = Visibility::Hidden;
        return;
    };
    *visibility = Visibility::Visible;

    let (message, font_size, color, background) = match panel {
        Panel::EndOfSession { summary } => (summary, PANEL_FONT_SIZE, TEXT_PRIMARY, PANEL_BACKGROUND),
        Panel::Warning { message } => (
            message,
            WARNING_FONT_SIZE,
            WARNING_TEXT_COLOR,
            WARNING_BACKGROUND,
        ),
    };

    for (mut bg, children) in &mut boxes {
        bg.0 = background;
        for child in children.iter() {
            if let Ok((mut text, mut font, mut text_color)) = texts.get_mut(child) {
                text.0 = message.clone();
                font.font_size = font_size;
                text_color.0 = color;
            }
        }
    }
}
