//! Display boundary - the declarative calls the core makes on the screen
//!
//! The core never renders. It calls [`DisplaySurface`] methods; the Bevy side
//! implements the trait with [`DisplayQueue`], folds the queued commands into
//! a [`DisplayState`] and syncs sprites and UI nodes from that state.

mod render;

use bevy::prelude::*;

pub use render::{
    CatFrames, CatSprite, SpinFrameFiles, apply_display_commands, load_cat_frames, spawn_cats,
    sync_cat_sprites,
};

/// Something the screen can show a cat for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayTarget {
    /// The lone centred cat of Idle mode
    Single,
    /// One of the sensor cats of Teasing/Game mode
    Cat(usize),
}

/// Which image a cat shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameRef {
    #[default]
    Still,
    Frame(usize),
}

/// Text and enablement of the two mode buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeLabels {
    pub tease: &'static str,
    pub game: &'static str,
    pub tease_enabled: bool,
}

/// Overlay shown on top of the cats. Both carry a Play Again action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Panel {
    EndOfSession { summary: String },
    Warning { message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCommand {
    SetVisibleEntities(Vec<DisplayTarget>),
    SetFrame { target: DisplayTarget, frame: FrameRef },
    ShowPanel(Panel),
    HidePanels,
    SetModeLabels(ModeLabels),
}

pub trait DisplaySurface {
    fn set_visible_entities(&mut self, targets: &[DisplayTarget]);

    fn set_frame(&mut self, target: DisplayTarget, frame: FrameRef);

    /// Summary of a completed session, with a Play Again action
    fn show_end_of_session_panel(&mut self, summary: &str);

    /// Wrong-hit penalty message, with a Play Again action
    fn show_warning_panel(&mut self, message: &str);

    fn hide_panels(&mut self);

    fn set_mode_labels(&mut self, labels: ModeLabels);
}

/// Display calls in the order the core made them
#[derive(Resource, Default, Debug)]
pub struct DisplayQueue {
    pending: Vec<DisplayCommand>,
}

impl DisplayQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn peek(&self) -> &[DisplayCommand] {
        &self.pending
    }

    pub fn drain(&mut self) -> Vec<DisplayCommand> {
        std::mem::take(&mut self.pending)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl DisplaySurface for DisplayQueue {
    fn set_visible_entities(&mut self, targets: &[DisplayTarget]) {
        self.pending
            .push(DisplayCommand::SetVisibleEntities(targets.to_vec()));
    }

    fn set_frame(&mut self, target: DisplayTarget, frame: FrameRef) {
        self.pending.push(DisplayCommand::SetFrame { target, frame });
    }

    fn show_end_of_session_panel(&mut self, summary: &str) {
        self.pending.push(DisplayCommand::ShowPanel(Panel::EndOfSession {
            summary: summary.to_string(),
        }));
    }

    fn show_warning_panel(&mut self, message: &str) {
        self.pending.push(DisplayCommand::ShowPanel(Panel::Warning {
            message: message.to_string(),
        }));
    }

    fn hide_panels(&mut self) {
        self.pending.push(DisplayCommand::HidePanels);
    }

    fn set_mode_labels(&mut self, labels: ModeLabels) {
        self.pending.push(DisplayCommand::SetModeLabels(labels));
    }
}

/// What the screen should currently look like
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct DisplayState {
    pub visible: Vec<DisplayTarget>,
    pub frames: Vec<(DisplayTarget, FrameRef)>,
    pub panel: Option<Panel>,
    pub labels: Option<ModeLabels>,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            visible: vec![DisplayTarget::Single],
            frames: Vec::new(),
            panel: None,
            labels: None,
        }
    }
}

impl DisplayState {
    pub fn apply(&mut self, command: DisplayCommand) {
        match command {
            DisplayCommand::SetVisibleEntities(targets) => self.visible = targets,
            DisplayCommand::SetFrame { target, frame } => {
                match self.frames.iter_mut().find(|(t, _)| *t == target) {
                    Some(slot) => slot.1 = frame,
                    None => self.frames.push((target, frame)),
                }
            }
            DisplayCommand::ShowPanel(panel) => self.panel = Some(panel),
            DisplayCommand::HidePanels => self.panel = None,
            DisplayCommand::SetModeLabels(labels) => self.labels = Some(labels),
        }
    }

    pub fn frame_of(&self, target: DisplayTarget) -> FrameRef {
        self.frames
            .iter()
            .find(|(t, _)| *t == target)
            .map(|(_, f)| *f)
            .unwrap_or_default()
    }

    pub fn is_visible(&self, target: DisplayTarget) -> bool {
        self.visible.contains(&target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_keeps_call_order() {
        let mut queue = DisplayQueue::new();
        queue.hide_panels();
        queue.set_visible_entities(&[DisplayTarget::Cat(0), DisplayTarget::Cat(1)]);
        queue.show_warning_panel("oops");

        let commands = queue.drain();
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[0], DisplayCommand::HidePanels);
        assert!(matches!(
            &commands[2],
            DisplayCommand::ShowPanel(Panel::Warning { message }) if message == "oops"
        ));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_state_folds_commands() {
        let mut state = DisplayState::default();
        assert!(state.is_visible(DisplayTarget::Single));

        state.apply(DisplayCommand::SetVisibleEntities(vec![DisplayTarget::Cat(2)]));
        state.apply(DisplayCommand::SetFrame {
            target: DisplayTarget::Cat(2),
            frame: FrameRef::Frame(4),
        });
        state.apply(DisplayCommand::SetFrame {
            target: DisplayTarget::Cat(2),
            frame: FrameRef::Frame(5),
        });
        state.apply(DisplayCommand::ShowPanel(Panel::EndOfSession {
            summary: "done".to_string(),
        }));

        assert!(!state.is_visible(DisplayTarget::Single));
        assert_eq!(state.frame_of(DisplayTarget::Cat(2)), FrameRef::Frame(5));
        assert_eq!(state.frame_of(DisplayTarget::Cat(0)), FrameRef::Still);
        assert_eq!(state.frames.len(), 1);
        assert!(state.panel.is_some());

        state.apply(DisplayCommand::HidePanels);
        assert!(state.panel.is_none());
    }
}
