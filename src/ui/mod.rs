//! UI module - mode buttons, end-of-session/warning panel and shortcuts
//!
//! UI systems never touch the session directly. Clicks and shortcut keys
//! become [`ToyRequests`], which the session driver consumes next.

mod buttons;
mod panel;

use bevy::prelude::*;

use crate::mode::Mode;

pub use buttons::*;
pub use panel::*;

/// User requests collected this frame
#[derive(Resource, Default, Debug)]
pub struct ToyRequests {
    pub toggles: Vec<Mode>,
    pub play_again: bool,
}

impl ToyRequests {
    pub fn toggle(&mut self, mode: Mode) {
        self.toggles.push(mode);
    }

    pub fn take(&mut self) -> (Vec<Mode>, bool) {
        (
            std::mem::take(&mut self.toggles),
            std::mem::take(&mut self.play_again),
        )
    }
}
