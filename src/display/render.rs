//! Cat sprites - the Bevy half of the display boundary

use bevy::prelude::*;
use std::fs;
use std::path::Path;

use super::{DisplayQueue, DisplayState, DisplayTarget, FrameRef};
use crate::constants::*;
use crate::error::{Result, ToyError};

/// Image files found on disk at startup, relative to the asset root
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct SpinFrameFiles {
    pub still: String,
    pub frames: Vec<String>,
}

impl SpinFrameFiles {
    /// Find the still image and every `.png` under the spin directory,
    /// sorted by file name. Either missing is fatal.
    pub fn discover(assets_dir: impl AsRef<Path>) -> Result<Self> {
        let assets_dir = assets_dir.as_ref();

        let still_path = assets_dir.join(STILL_IMAGE_PATH);
        if !still_path.is_file() {
            return Err(ToyError::asset_missing(
                still_path.display().to_string(),
                "still image not found",
            ));
        }

        let spin_dir = assets_dir.join(SPIN_FRAMES_DIR);
        let entries = fs::read_dir(&spin_dir)
            .map_err(|e| ToyError::asset_missing(spin_dir.display().to_string(), e.to_string()))?;

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .filter(|name| name.to_lowercase().ends_with(".png"))
            .collect();
        names.sort();

        if names.is_empty() {
            return Err(ToyError::asset_missing(
                spin_dir.display().to_string(),
                "no .png frames",
            ));
        }

        Ok(Self {
            still: STILL_IMAGE_PATH.to_string(),
            frames: names
                .into_iter()
                .map(|name| format!("{}/{}", SPIN_FRAMES_DIR, name))
                .collect(),
        })
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

/// Loaded image handles
#[derive(Resource, Clone)]
pub struct CatFrames {
    pub still: Handle<Image>,
    pub frames: Vec<Handle<Image>>,
}

impl CatFrames {
    pub fn image(&self, frame: FrameRef) -> Handle<Image> {
        match frame {
            FrameRef::Frame(n) if !self.frames.is_empty() => self.frames[n % self.frames.len()].clone(),
            _ => self.still.clone(),
        }
    }
}

/// Which cat a sprite shows
#[derive(Component, Debug, Clone, Copy)]
pub struct CatSprite(pub DisplayTarget);

pub fn load_cat_frames(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    files: Res<SpinFrameFiles>,
) {
    commands.insert_resource(CatFrames {
        still: asset_server.load(files.still.clone()),
        frames: files
            .frames
            .iter()
            .map(|path| asset_server.load(path.clone()))
            .collect(),
    });
    info!("Loading {} spin frames", files.frame_count());
}

/// The lone Idle cat in the middle, three sensor cats in a row (hidden)
pub fn spawn_cats(mut commands: Commands, frames: Res<CatFrames>) {
    commands.spawn((
        Sprite {
            image: frames.still.clone(),
            custom_size: Some(SINGLE_CAT_SIZE),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 0.0),
        Visibility::Visible,
        CatSprite(DisplayTarget::Single),
    ));

    for (i, x) in CAT_POSITIONS_X.iter().enumerate() {
        commands.spawn((
            Sprite {
                image: frames.still.clone(),
                custom_size: Some(CAT_SIZE),
                ..default()
            },
            Transform::from_xyz(*x, 0.0, 0.0),
            Visibility::Hidden,
            CatSprite(DisplayTarget::Cat(i)),
        ));
    }
}

/// Fold this frame's display calls into the screen state
pub fn apply_display_commands(mut queue: ResMut<DisplayQueue>, mut state: ResMut<DisplayState>) {
    if queue.is_empty() {
        return;
    }
    for command in queue.drain() {
        state.apply(command);
    }
}

pub fn sync_cat_sprites(
    state: Res<DisplayState>,
    frames: Res<CatFrames>,
    mut cats: Query<(&CatSprite, &mut Sprite, &mut Visibility)>,
) {
    if !state.is_changed() {
        return;
    }

    for (cat, mut sprite, mut visibility) in &mut cats {
        *visibility = if state.is_visible(cat.0) {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };

        let image = frames.image(state.frame_of(cat.0));
        if sprite.image != image {
            sprite.image = image;
        }
    }
}
