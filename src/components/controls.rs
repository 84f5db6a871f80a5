//! Held-key state of a map object.
//!
//! The player's [`Controls`] mirror the keyboard; enemies get theirs set by
//! their spawn blueprint and flip them on wall contact or screen bounces.

use bevy_ecs::prelude::Component;

use crate::events::input::InputAction;

#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Controls {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub fire: bool,
}

impl Controls {
    pub fn moving_left() -> Self {
        Self {
            left: true,
            ..Self::default()
        }
    }

    pub fn moving_right() -> Self {
        Self {
            right: true,
            ..Self::default()
        }
    }

    /// Set the flag for `action`. Actions without a flag are ignored.
    pub fn set(&mut self, action: InputAction, pressed: bool) {
        match action {
            InputAction::Up => self.up = pressed,
            InputAction::Down => self.down = pressed,
            InputAction::Left => self.left = pressed,
            InputAction::Right => self.right = pressed,
            InputAction::Jump => self.jump = pressed,
            InputAction::Fire => self.fire = pressed,
            InputAction::Quit => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_toggles_matching_flag() {
        let mut c = Controls::default();
        c.set(InputAction::Jump, true);
        assert!(c.jump);
        c.set(InputAction::Jump, false);
        assert!(!c.jump);
        c.set(InputAction::Quit, true);
        assert_eq!(c, Controls::default());
    }
}
