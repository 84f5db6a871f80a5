//! Per-frame keyboard input resource.
//!
//! Raw keys are folded into the logical [`InputAction`]s the game
//! understands. Each action can be bound to several keys; it is active while
//! any of them is held.
use bevy_ecs::prelude::*;
use raylib::prelude::KeyboardKey;
use smallvec::{SmallVec, smallvec};

use crate::events::input::InputAction;

/// Boolean action state with its keyboard bindings.
#[derive(Debug, Clone)]
pub struct BoolState {
    /// Whether the action is held this frame.
    pub active: bool,
    /// Whether the action was just pressed this frame.
    pub just_pressed: bool,
    /// Whether the action was just released this frame.
    pub just_released: bool,

    /// The keys bound to this action.
    pub key_bindings: SmallVec<[KeyboardKey; 2]>,
}

impl BoolState {
    pub fn bound_to(keys: &[KeyboardKey]) -> Self {
        Self {
            active: false,
            just_pressed: false,
            just_released: false,
            key_bindings: SmallVec::from_slice(keys),
        }
    }

    /// Fold this frame's key state in. `held` is true when any binding is down.
    pub fn set_held(&mut self, held: bool) {
        self.just_pressed = held && !self.active;
        self.just_released = !held && self.active;
        self.active = held;
    }
}

impl Default for BoolState {
    fn default() -> Self {
        Self {
            active: false,
            just_pressed: false,
            just_released: false,
            key_bindings: smallvec![KeyboardKey::KEY_NULL],
        }
    }
}

/// Logical input state, one [`BoolState`] per action.
#[derive(Resource, Debug, Clone)]
pub struct InputState {
    pub up: BoolState,
    pub down: BoolState,
    pub left: BoolState,
    pub right: BoolState,
    pub jump: BoolState,
    pub fire: BoolState,
    pub quit: BoolState,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            up: BoolState::bound_to(&[KeyboardKey::KEY_UP]),
            down: BoolState::bound_to(&[KeyboardKey::KEY_DOWN]),
            left: BoolState::bound_to(&[KeyboardKey::KEY_LEFT]),
            right: BoolState::bound_to(&[KeyboardKey::KEY_RIGHT]),
            jump: BoolState::bound_to(&[KeyboardKey::KEY_SPACE, KeyboardKey::KEY_X]),
            fire: BoolState::bound_to(&[KeyboardKey::KEY_Z, KeyboardKey::KEY_C]),
            quit: BoolState::bound_to(&[KeyboardKey::KEY_ESCAPE, KeyboardKey::KEY_Q]),
        }
    }
}

impl InputState {
    pub fn state(&self, action: InputAction) -> &BoolState {
        match action {
            InputAction::Up => &self.up,
            InputAction::Down => &self.down,
            InputAction::Left => &self.left,
            InputAction::Right => &self.right,
            InputAction::Jump => &self.jump,
            InputAction::Fire => &self.fire,
            InputAction::Quit => &self.quit,
        }
    }

    pub fn state_mut(&mut self, action: InputAction) -> &mut BoolState {
        match action {
            InputAction::Up => &mut self.up,
            InputAction::Down => &mut self.down,
            InputAction::Left => &mut self.left,
            InputAction::Right => &mut self.right,
            InputAction::Jump => &mut self.jump,
            InputAction::Fire => &mut self.fire,
            InputAction::Quit => &mut self.quit,
        }
    }
}
