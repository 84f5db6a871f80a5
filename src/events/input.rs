//! Input action messages.
//!
//! The frontend turns raw key transitions into [`InputEvent`]s; levels read
//! them at the start of their update tick. [`InputAction`] lists the logical
//! actions the game recognises.

use bevy_ecs::prelude::*;

/// Enumeration of logical input actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    /// Default: Up arrow. Slow-fall, pick up, open doors, menu up.
    Up,
    /// Default: Down arrow. Menu down.
    Down,
    /// Default: Left arrow.
    Left,
    /// Default: Right arrow.
    Right,
    /// Default: Space or X.
    Jump,
    /// Default: Z or C.
    Fire,
    /// Default: Escape or Q. Leaves the game immediately.
    Quit,
}

impl InputAction {
    pub const ALL: [InputAction; 7] = [
        InputAction::Up,
        InputAction::Down,
        InputAction::Left,
        InputAction::Right,
        InputAction::Jump,
        InputAction::Fire,
        InputAction::Quit,
    ];
}

/// A logical action was pressed (`pressed == true`) or released.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub action: InputAction,
    pub pressed: bool,
}

impl InputEvent {
    pub fn press(action: InputAction) -> Self {
        Self {
            action,
            pressed: true,
        }
    }

    pub fn release(action: InputAction) -> Self {
        Self {
            action,
            pressed: false,
        }
    }
}
