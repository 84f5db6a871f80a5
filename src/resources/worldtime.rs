use bevy_ecs::prelude::Resource;

/// Wall-clock time as seen by a level.
///
/// `elapsed` counts seconds since the game started; `frame_count` counts
/// update ticks of the owning level.
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct WorldTime {
    pub elapsed: f32,
    pub delta: f32,
    pub frame_count: u64,
}
