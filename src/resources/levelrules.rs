use bevy_ecs::prelude::Resource;

use crate::events::audio::MusicId;

/// Per-level tweaks of the shared gameplay pipeline.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelRules {
    /// Track stopped when the player walks through a door.
    pub teleport_stops_music: Option<MusicId>,
    /// Enemies whose death sequence is over are no longer drawn.
    pub hide_removed_enemies: bool,
    /// Draw the hit points of the first enemy as a bar.
    pub boss_hp_bar: bool,
}
