//! Input systems.
//!
//! - [`update_input_state`] polls raylib once per frame, folds the keys into
//!   [`InputState`] and writes an [`InputEvent`] for every action that was
//!   pressed or released this frame.
//! - [`update_bevy_input_events`] advances an [`InputEvent`] queue; every world
//!   that reads input runs it last.
use bevy_ecs::prelude::*;

use crate::events::input::{InputAction, InputEvent};
use crate::resources::input::InputState;

/// Poll raylib for keyboard input and emit edge events.
pub fn update_input_state(
    mut input: ResMut<InputState>,
    rl: NonSend<raylib::RaylibHandle>,
    mut writer: MessageWriter<InputEvent>,
) {
    for action in InputAction::ALL {
        let state = input.state_mut(action);
        let held = state.key_bindings.iter().any(|&key| rl.is_key_down(key));
        state.set_held(held);
        if state.just_pressed {
            writer.write(InputEvent::press(action));
        }
        if state.just_released {
            writer.write(InputEvent::release(action));
        }
    }
}

/// Advance the [`InputEvent`] queue.
pub fn update_bevy_input_events(mut msgs: ResMut<Messages<InputEvent>>) {
    msgs.update();
}
