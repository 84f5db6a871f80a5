use bevy_ecs::prelude::{Entity, Resource};

/// Ordered entity lists of a level.
///
/// Update, combat and render passes walk these lists so map objects are
/// processed in spawn order, which the ECS storage does not guarantee.
#[derive(Resource, Debug, Clone, Default)]
pub struct Roster {
    pub player: Option<Entity>,
    pub enemies: Vec<Entity>,
    pub projectiles: Vec<Entity>,
    pub interactables: Vec<Entity>,
}

impl Roster {
    /// Every listed entity, player last.
    pub fn all(&self) -> impl Iterator<Item = Entity> + '_ {
        self.interactables
            .iter()
            .chain(self.enemies.iter())
            .chain(self.projectiles.iter())
            .copied()
            .chain(self.player)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
