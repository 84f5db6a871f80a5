//! Time update.
//!
//! Advances the frontend's [`WorldTime`](crate::resources::worldtime::WorldTime)
//! once per tick. Levels copy `elapsed` into their own clock when they run.
use bevy_ecs::prelude::*;

use crate::resources::worldtime::WorldTime;

/// Add `dt` seconds of wall-clock time and count one frame.
pub fn update_world_time(world: &mut World, dt: f32) {
    let mut wt = world.resource_mut::<WorldTime>();
    wt.elapsed += dt;
    wt.delta = dt;
    wt.frame_count += 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_elapsed() {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        update_world_time(&mut world, 0.5);
        update_world_time(&mut world, 0.25);
        let wt = world.resource::<WorldTime>();
        assert_eq!(wt.elapsed, 0.75);
        assert_eq!(wt.delta, 0.25);
        assert_eq!(wt.frame_count, 2);
    }
}
