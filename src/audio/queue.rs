//! Bevy side of the audio boundary
//!
//! The core pushes [`AudioCommand`]s into [`AudioQueue`]; a system turns them
//! into `AudioPlayer` entities. Looping cues live until stopped, one-shots
//! despawn themselves when finished.

use bevy::audio::{AudioPlayer, AudioSource, PlaybackSettings};
use bevy::prelude::*;

use super::{AudioCue, Cue};
use crate::constants::{AMBIENT_AUDIO_PATH, WARNING_AUDIO_PATH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCommand {
    PlayLoop(Cue),
    PlayOnce(Cue),
    Stop(Cue),
}

#[derive(Resource, Default, Debug)]
pub struct AudioQueue {
    pending: Vec<AudioCommand>,
}

impl AudioQueue {
    pub fn peek(&self) -> &[AudioCommand] {
        &self.pending
    }

    pub fn drain(&mut self) -> Vec<AudioCommand> {
        std::mem::take(&mut self.pending)
    }
}

impl AudioCue for AudioQueue {
    fn play_loop(&mut self, cue: Cue) {
        self.pending.push(AudioCommand::PlayLoop(cue));
    }

    fn play_once(&mut self, cue: Cue) {
        self.pending.push(AudioCommand::PlayOnce(cue));
    }

    fn stop(&mut self, cue: Cue) {
        self.pending.push(AudioCommand::Stop(cue));
    }
}

/// Loaded sound files for each cue
#[derive(Resource, Clone)]
pub struct CueHandles {
    pub ambient: Handle<AudioSource>,
    pub warning: Handle<AudioSource>,
}

impl CueHandles {
    pub fn get(&self, cue: Cue) -> Handle<AudioSource> {
        match cue {
            Cue::Ambient => self.ambient.clone(),
            Cue::Warning => self.warning.clone(),
        }
    }
}

/// Marks a playing cue so it can be stopped
#[derive(Component, Debug, Clone, Copy)]
pub struct CueSound(pub Cue);

pub fn load_cue_handles(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(CueHandles {
        ambient: asset_server.load(AMBIENT_AUDIO_PATH),
        warning: asset_server.load(WARNING_AUDIO_PATH),
    });
}

/// Turn queued commands into audio entities
pub fn apply_audio_commands(
    mut commands: Commands,
    mut queue: ResMut<AudioQueue>,
    handles: Res<CueHandles>,
    sounds: Query<(Entity, &CueSound)>,
) {
    if queue.peek().is_empty() {
        return;
    }

    // Entities spawned this frame aren't visible to the query yet
    let mut spawned: Vec<(Entity, Cue)> = Vec::new();
    let mut stopped: Vec<Entity> = Vec::new();

    for command in queue.drain() {
        match command {
            AudioCommand::PlayLoop(cue) => {
                let entity = commands
                    .spawn((AudioPlayer::new(handles.get(cue)), PlaybackSettings::LOOP, CueSound(cue)))
                    .id();
                spawned.push((entity, cue));
            }
            AudioCommand::PlayOnce(cue) => {
                let entity = commands
                    .spawn((AudioPlayer::new(handles.get(cue)), PlaybackSettings::DESPAWN, CueSound(cue)))
                    .id();
                spawned.push((entity, cue));
            }
            AudioCommand::Stop(cue) => {
                let existing = sounds
                    .iter()
                    .filter(|(_, sound)| sound.0 == cue)
                    .map(|(entity, _)| entity);
                let fresh = spawned
                    .iter()
                    .filter(|(_, c)| *c == cue)
                    .map(|(entity, _)| *entity);
                for entity in existing.chain(fresh).collect::<Vec<_>>() {
                    if !stopped.contains(&entity) {
                        commands.entity(entity).despawn();
                        stopped.push(entity);
                    }
                }
                spawned.retain(|(_, c)| *c != cue);
            }
        }
    }
}

/// Silence everything when the app is closing
pub fn release_audio_on_exit(
    mut exits: MessageReader<AppExit>,
    mut commands: Commands,
    sounds: Query<Entity, With<CueSound>>,
) {
    if exits.read().next().is_none() {
        return;
    }
    for entity in &sounds {
        commands.entity(entity).despawn();
    }
    info!("Audio released");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_records_in_order() {
        let mut queue = AudioQueue::default();
        queue.play_loop(Cue::Ambient);
        queue.stop(Cue::Ambient);
        queue.play_once(Cue::Warning);
        assert_eq!(queue.peek().len(), 3);
        assert_eq!(queue.drain()[2], AudioCommand::PlayOnce(Cue::Warning));
        assert!(queue.peek().is_empty());
    }
}
