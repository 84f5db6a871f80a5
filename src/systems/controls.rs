//! Keyboard events to player controls.
//!
//! While the player is in play, presses and releases set the matching
//! [`Controls`] flag; left and right also turn the player unless fire is held,
//! so the player can back off while shooting. Once the player's death
//! sequence is over, a fire press rebuilds the level's entities instead.
//! Releases always reach the player.

use bevy_ecs::prelude::*;
use log::info;

use crate::components::controls::Controls;
use crate::components::physicsbody::PhysicsBody;
use crate::events::audio::AudioCmd;
use crate::events::input::{InputAction, InputEvent};
use crate::resources::blueprint::LevelBlueprint;
use crate::resources::roster::Roster;
use crate::resources::runprogress::RunProgress;

/// Apply this tick's input events to the player.
pub fn apply_player_input(
    mut commands: Commands,
    mut events: MessageReader<InputEvent>,
    mut roster: ResMut<Roster>,
    blueprint: Res<LevelBlueprint>,
    progress: Res<RunProgress>,
    mut players: Query<(&mut Controls, &mut PhysicsBody)>,
    mut audio: MessageWriter<AudioCmd>,
) {
    for event in events.read() {
        let player = roster.player.and_then(|e| players.get_mut(e).ok());
        let Some((mut controls, mut body)) = player else {
            continue;
        };
        if event.pressed && body.is_pending_removal() {
            if event.action == InputAction::Fire {
                info!("Retrying level");
                let sounds = blueprint.rebuild(&mut commands, &mut roster, &progress);
                audio.write_batch(sounds);
                // The new entities only exist after this system; the rest of
                // this tick's events are dropped.
                return;
            }
            continue;
        }
        apply_to_player(&mut controls, &mut body, event);
    }
}

/// Set the control flag for `event` and update facing for left/right.
pub fn apply_to_player(controls: &mut Controls, body: &mut PhysicsBody, event: &InputEvent) {
    controls.set(event.action, event.pressed);
    match event.action {
        InputAction::Left if !controls.fire => body.facing_right = false,
        InputAction::Right if !controls.fire => body.facing_right = true,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::hitbox::HitBox;

    #[test]
    fn left_turns_unless_firing() {
        let mut controls = Controls::default();
        let mut body = PhysicsBody::new(HitBox::square(12));
        apply_to_player(&mut controls, &mut body, &InputEvent::press(InputAction::Left));
        assert!(controls.left);
        assert!(!body.facing_right);

        apply_to_player(&mut controls, &mut body, &InputEvent::press(InputAction::Fire));
        apply_to_player(&mut controls, &mut body, &InputEvent::press(InputAction::Right));
        assert!(controls.right);
        assert!(!body.facing_right);
    }

    #[test]
    fn release_also_sets_facing() {
        let mut controls = Controls::moving_right();
        let mut body = PhysicsBody::new(HitBox::square(12));
        apply_to_player(&mut controls, &mut body, &InputEvent::release(InputAction::Left));
        assert!(!controls.left);
        assert!(!body.facing_right);
    }
}
