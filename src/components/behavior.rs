//! Closed set of map-object behaviors.
//!
//! Every map object shares a [`PhysicsBody`](crate::components::physicsbody::PhysicsBody);
//! its [`Behavior`] decides how the body is stepped, how key events affect it
//! and how it is drawn. Per-variant state lives inside the enum.

use bevy_ecs::prelude::Component;

use crate::events::audio::MusicId;
use crate::resources::levelstate::LevelId;

/// Minimum wall-clock seconds between two player shots.
pub const FIRE_COOLDOWN: f32 = 0.15;

/// Gun state carried by the player.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlayerGun {
    /// Wall-clock second of the last shot.
    pub last_shot: Option<f32>,
    /// Frames of muzzle flash still to draw.
    pub muzzle_flash: u8,
    /// Apply the recoil push on this tick.
    pub recoil: bool,
    /// A projectile should be spawned after this tick's updates.
    pub spawn_projectile: bool,
}

impl PlayerGun {
    pub fn ready(&self, now: f32) -> bool {
        match self.last_shot {
            Some(t) => now - t >= FIRE_COOLDOWN,
            None => true,
        }
    }

    /// Return whether a projectile was requested and clear the request.
    pub fn take_shot(&mut self) -> bool {
        std::mem::take(&mut self.spawn_projectile)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroundEnemyKind {
    Mushroom,
    Tank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractableKind {
    Door,
    Key,
    SlowFall,
}

#[derive(Component, Debug, Clone, PartialEq)]
pub enum Behavior {
    Player(PlayerGun),
    /// Walks, jumps and turns around at walls.
    GroundEnemy(GroundEnemyKind),
    /// Ignores tiles and gravity; drifts on a sine and bounces off the screen edges.
    FlyingBoss { sin_counter: f32 },
    Projectile,
    /// Never moves on its own; only the dying sequence steps it.
    StaticHazard,
    Interactable(InteractableKind),
}

impl Behavior {
    pub fn player() -> Self {
        Behavior::Player(PlayerGun::default())
    }

    pub fn is_player(&self) -> bool {
        matches!(self, Behavior::Player(_))
    }

    /// Pickups vanish when collected instead of taking damage.
    pub fn is_pickup(&self) -> bool {
        matches!(
            self,
            Behavior::Interactable(InteractableKind::Key | InteractableKind::SlowFall)
        )
    }
}

/// What touching an interactable does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractAction {
    /// Go to another level; needs the key and up held.
    Teleport(LevelId),
    /// Add the key to the inventory; needs up held.
    GrantKey,
    /// Add slow-fall to the inventory; needs up held.
    GrantSlowFall,
    /// Hurt the player on contact while up is not held.
    Damage,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interaction {
    pub action: InteractAction,
}

/// An interactable placed by an [`OnDefeat`] reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardSpawn {
    pub kind: InteractableKind,
    pub tile: (i32, i32),
    pub action: InteractAction,
}

/// Reward granted when this enemy receives its killing blow.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct OnDefeat {
    pub stop_music: Option<MusicId>,
    pub spawns: Vec<RewardSpawn>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gun_cooldown() {
        let mut gun = PlayerGun::default();
        assert!(gun.ready(0.0));
        gun.last_shot = Some(1.0);
        assert!(!gun.ready(1.1));
        assert!(gun.ready(1.2));
    }

    #[test]
    fn take_shot_consumes_request() {
        let mut gun = PlayerGun {
            spawn_projectile: true,
            ..PlayerGun::default()
        };
        assert!(gun.take_shot());
        assert!(!gun.take_shot());
    }

    #[test]
    fn pickups() {
        assert!(Behavior::Interactable(InteractableKind::Key).is_pickup());
        assert!(Behavior::Interactable(InteractableKind::SlowFall).is_pickup());
        assert!(!Behavior::Interactable(InteractableKind::Door).is_pickup());
        assert!(!Behavior::StaticHazard.is_pickup());
        assert!(Behavior::player().is_player());
    }
}
