//! Level entity placement.
//!
//! A [`LevelBlueprint`] is the function that lists a level's map objects. It
//! runs once when the level is built and again whenever the player retries
//! after dying, so both paths produce the same roster.

use bevy_ecs::prelude::*;

use crate::components::mapobject::MapObject;
use crate::events::audio::{AudioCmd, SoundId};
use crate::resources::roster::Roster;
use crate::resources::runprogress::RunProgress;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterSlot {
    Player,
    Enemy,
    Interactable,
}

/// Collects the map objects of a blueprint before they are spawned.
pub struct Spawner<'a> {
    progress: &'a RunProgress,
    objects: Vec<(RosterSlot, MapObject)>,
}

impl<'a> Spawner<'a> {
    pub fn new(progress: &'a RunProgress) -> Self {
        Self {
            progress,
            objects: Vec::new(),
        }
    }

    /// Run progress at the time of spawning, for placements that depend on it.
    pub fn progress(&self) -> &RunProgress {
        self.progress
    }

    pub fn player(&mut self, object: MapObject) {
        self.objects.push((RosterSlot::Player, object));
    }

    pub fn enemy(&mut self, object: MapObject) {
        self.objects.push((RosterSlot::Enemy, object));
    }

    pub fn interactable(&mut self, object: MapObject) {
        self.objects.push((RosterSlot::Interactable, object));
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Spawn everything collected, in order, and list it in `roster`.
    /// Returns the sounds the spawns asked for.
    pub fn finish(self, commands: &mut Commands, roster: &mut Roster) -> Vec<AudioCmd> {
        let mut sounds = Vec::new();
        for (slot, object) in self.objects {
            let entity = object.spawn(commands);
            match slot {
                RosterSlot::Player => {
                    roster.player = Some(entity);
                    sounds.push(AudioCmd::fx(SoundId::Spawn));
                }
                RosterSlot::Enemy => roster.enemies.push(entity),
                RosterSlot::Interactable => roster.interactables.push(entity),
            }
        }
        sounds
    }
}

/// The placement function of the current level.
#[derive(Resource, Clone, Copy)]
pub struct LevelBlueprint(pub fn(&mut Spawner));

impl Default for LevelBlueprint {
    fn default() -> Self {
        Self(|_| {})
    }
}

impl LevelBlueprint {
    /// Spawn the blueprint into an empty roster.
    pub fn spawn(
        &self,
        commands: &mut Commands,
        roster: &mut Roster,
        progress: &RunProgress,
    ) -> Vec<AudioCmd> {
        let mut spawner = Spawner::new(progress);
        (self.0)(&mut spawner);
        spawner.finish(commands, roster)
    }

    /// Despawn every listed entity and spawn the blueprint again.
    pub fn rebuild(
        &self,
        commands: &mut Commands,
        roster: &mut Roster,
        progress: &RunProgress,
    ) -> Vec<AudioCmd> {
        for entity in roster.all() {
            commands.entity(entity).despawn();
        }
        roster.clear();
        self.spawn(commands, roster, progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::physicsbody::PhysicsBody;
    use crate::resources::runprogress::Item;

    fn blueprint(s: &mut Spawner) {
        s.player(MapObject::player(1, 1));
        s.enemy(MapObject::mushroom(4, 4).moving_left());
        if !s.progress().has(Item::SlowFall) {
            s.interactable(MapObject::slow_fall(2, 2));
        }
    }

    fn spawn_into(world: &mut World, progress: &RunProgress, rebuild: bool) -> Vec<AudioCmd> {
        let mut roster = world.remove_resource::<Roster>().unwrap_or_default();
        let sounds = {
            let mut commands = world.commands();
            if rebuild {
                LevelBlueprint(blueprint).rebuild(&mut commands, &mut roster, progress)
            } else {
                LevelBlueprint(blueprint).spawn(&mut commands, &mut roster, progress)
            }
        };
        world.flush();
        world.insert_resource(roster);
        sounds
    }

    #[test]
    fn spawn_fills_roster_in_order() {
        let mut world = World::new();
        let sounds = spawn_into(&mut world, &RunProgress::default(), false);
        let roster = world.resource::<Roster>();
        assert!(roster.player.is_some());
        assert_eq!(roster.enemies.len(), 1);
        assert_eq!(roster.interactables.len(), 1);
        assert_eq!(sounds, vec![AudioCmd::fx(SoundId::Spawn)]);
    }

    #[test]
    fn rebuild_replaces_entities_and_honours_progress() {
        let mut world = World::new();
        spawn_into(&mut world, &RunProgress::default(), false);
        let mut owned = RunProgress::default();
        owned.add(Item::SlowFall);
        spawn_into(&mut world, &owned, true);

        let roster = world.resource::<Roster>().clone();
        assert!(roster.interactables.is_empty());
        let mut bodies = world.query::<&PhysicsBody>();
        assert_eq!(bodies.iter(&world).count(), 2);
    }
}
