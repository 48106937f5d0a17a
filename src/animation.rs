//! Animation clock - advances spinning cats through the spin frames
//!
//! Runs on its own fixed cadence, independent of input polling. Only the
//! clock moves `frame`; mode logic only flips `spinning`.

use crate::display::{DisplaySurface, DisplayTarget, FrameRef};
use crate::error::{Result, ToyError};

/// One independently animatable cat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpinEntity {
    pub index: usize,
    pub spinning: bool,
    pub frame: usize,
}

impl SpinEntity {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            spinning: false,
            frame: 0,
        }
    }

    /// Starting to spin always restarts the animation from the first frame
    pub fn set_spinning(&mut self, spinning: bool) {
        if spinning && !self.spinning {
            self.frame = 0;
        }
        self.spinning = spinning;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationClock {
    total_frames: usize,
}

impl AnimationClock {
    /// An animation with no frames has nothing to show, so it cannot exist
    pub fn new(total_frames: usize) -> Result<Self> {
        if total_frames == 0 {
            return Err(ToyError::asset_missing(
                "spin animation",
                "animation has no frames",
            ));
        }
        Ok(Self { total_frames })
    }

    pub fn total_frames(&self) -> usize {
        self.total_frames
    }

    /// Advance one cat by a tick and show the result
    pub fn tick(&self, entity: &mut SpinEntity, target: DisplayTarget, display: &mut dyn DisplaySurface) {
        if entity.spinning {
            entity.frame = (entity.frame + 1) % self.total_frames;
            display.set_frame(target, FrameRef::Frame(entity.frame));
        } else {
            display.set_frame(target, FrameRef::Still);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{DisplayCommand, DisplayQueue};

    #[test]
    fn test_empty_animation_is_asset_missing() {
        assert!(matches!(
            AnimationClock::new(0),
            Err(ToyError::AssetMissing { .. })
        ));
    }

    #[test]
    fn test_spinning_entity_wraps() {
        let clock = AnimationClock::new(3).unwrap();
        let mut cat = SpinEntity::new(1);
        cat.set_spinning(true);
        let mut display = DisplayQueue::new();

        let frames: Vec<usize> = (0..7)
            .map(|_| {
                clock.tick(&mut cat, DisplayTarget::Cat(1), &mut display);
                cat.frame
            })
            .collect();
        assert_eq!(frames, vec![1, 2, 0, 1, 2, 0, 1]);
        assert_eq!(
            display.peek().last(),
            Some(&DisplayCommand::SetFrame {
                target: DisplayTarget::Cat(1),
                frame: FrameRef::Frame(1),
            })
        );
    }

    #[test]
    fn test_still_entity_does_not_advance() {
        let clock = AnimationClock::new(8).unwrap();
        let mut cat = SpinEntity::new(0);
        cat.frame = 5;
        let mut display = DisplayQueue::new();
        clock.tick(&mut cat, DisplayTarget::Cat(0), &mut display);
        assert_eq!(cat.frame, 5);
        assert_eq!(
            display.drain(),
            vec![DisplayCommand::SetFrame {
                target: DisplayTarget::Cat(0),
                frame: FrameRef::Still,
            }]
        );
    }

    #[test]
    fn test_restart_resets_frame() {
        let mut cat = SpinEntity::new(2);
        cat.set_spinning(true);
        cat.frame = 6;
        // Already spinning: no restart
        cat.set_spinning(true);
        assert_eq!(cat.frame, 6);
        cat.set_spinning(false);
        cat.set_spinning(true);
        assert_eq!(cat.frame, 0);
    }
}
