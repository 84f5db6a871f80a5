//! Map-object prefabs.
//!
//! A [`MapObject`] is the full component set of one entity before it is
//! spawned. The constructors below carry the tuning, hit-box and animation
//! frames of every kind the levels place.

use bevy_ecs::prelude::*;
use raylib::prelude::Vector2;

use crate::components::animation::{AnimKey, AnimationClip, AnimationSet};
use crate::components::behavior::{
    Behavior, GroundEnemyKind, InteractAction, Interaction, InteractableKind, OnDefeat,
    RewardSpawn,
};
use crate::components::controls::Controls;
use crate::components::hitbox::HitBox;
use crate::components::physicsbody::{MotionTuning, PhysicsBody};
use crate::resources::tilegrid::TILE_SIZE;

/// Horizontal projectile speed in pixels per tick.
pub const PROJECTILE_SPEED: f32 = 5.0;

/// Sheet frame of the projectile sprite (drawn as its top-left quarter).
pub const PROJECTILE_FRAME: i32 = 9 * 32 + 7;

pub const DOOR_FRAME: i32 = 11 * 32;
pub const KEY_FRAME: i32 = 11 * 32 + 1;
pub const SLOW_FALL_FRAME: i32 = 11 * 32 + 2;
pub const SPIKE_FRAME: i32 = 15 * 32 + 21;

const MUSHROOM_DEATH: [i32; 17] = [
    10 * 32 + 21,
    10 * 32 + 22,
    10 * 32 + 23,
    10 * 32 + 24,
    10 * 32 + 25,
    10 * 32 + 26,
    10 * 32 + 27,
    10 * 32 + 28,
    10 * 32 + 29,
    10 * 32 + 30,
    10 * 32 + 31,
    11 * 32 + 26,
    11 * 32 + 27,
    11 * 32 + 28,
    11 * 32 + 29,
    11 * 32 + 30,
    11 * 32 + 31,
];

const BOSS_ALIVE: [i32; 10] = [
    18 * 32 + 1,
    18 * 32 + 4,
    18 * 32 + 7,
    18 * 32 + 10,
    18 * 32 + 13,
    18 * 32 + 16,
    18 * 32 + 19,
    18 * 32 + 22,
    18 * 32 + 25,
    18 * 32 + 28,
];

// Frame eight repeats column 15, as in the sheet data.
const BOSS_DEATH: [i32; 10] = [
    21 * 32 + 1,
    21 * 32 + 4,
    21 * 32 + 7,
    21 * 32 + 10,
    21 * 32 + 13,
    21 * 32 + 16,
    21 * 32 + 19,
    21 * 32 + 22,
    21 * 32 + 15,
    21 * 32 + 28,
];

/// Everything one map object is made of, ready to spawn.
#[derive(Debug, Clone)]
pub struct MapObject {
    pub body: PhysicsBody,
    pub controls: Controls,
    pub anims: AnimationSet,
    pub behavior: Behavior,
    pub interaction: Option<Interaction>,
    pub on_defeat: Option<OnDefeat>,
}

impl MapObject {
    fn new(body: PhysicsBody, anims: AnimationSet, behavior: Behavior) -> Self {
        Self {
            body,
            controls: Controls::default(),
            anims,
            behavior,
            interaction: None,
            on_defeat: None,
        }
    }

    pub fn with_controls(mut self, controls: Controls) -> Self {
        self.controls = controls;
        self
    }

    /// Hold left and face left.
    pub fn moving_left(mut self) -> Self {
        self.controls = Controls::moving_left();
        self.body.facing_right = false;
        self
    }

    /// Hold right and face right.
    pub fn moving_right(mut self) -> Self {
        self.controls = Controls::moving_right();
        self.body.facing_right = true;
        self
    }

    pub fn with_action(mut self, action: InteractAction) -> Self {
        self.interaction = Some(Interaction { action });
        self
    }

    pub fn with_reward(mut self, reward: OnDefeat) -> Self {
        self.on_defeat = Some(reward);
        self
    }

    pub fn spawn(self, commands: &mut Commands) -> Entity {
        let mut entity = commands.spawn((self.body, self.controls, self.anims, self.behavior));
        if let Some(interaction) = self.interaction {
            entity.insert(interaction);
        }
        if let Some(reward) = self.on_defeat {
            entity.insert(reward);
        }
        entity.id()
    }

    // ==================== PLAYER ====================

    pub fn player(column: i32, row: i32) -> Self {
        let tuning = MotionTuning {
            move_acceleration: 2.0,
            move_speed_max: 2.0,
            move_stop_acceleration: 2.0,
            fall_speed: 0.3,
            fall_speed_max: 5.0,
            fall_slow: 0.9,
            jump_initial_speed: -4.0,
            jump_speed: 2.0,
            jump_stop_speed: 0.4,
            max_jump_height: (TILE_SIZE * 2) as f32,
        };
        let body = PhysicsBody::new(HitBox::square(12))
            .with_tuning(tuning)
            .with_time_after_death(50)
            .at_tile(column, row);
        let anims = AnimationSet::new(
            AnimKey::StandbyRight,
            AnimationClip::from_range(9 * 32 + 12, 4).with_delay(50),
        )
        .with(
            AnimKey::StandbyLeft,
            AnimationClip::from_range(10 * 32 + 12, 4).with_delay(50),
        )
        .with(AnimKey::Left, AnimationClip::from_range(8 * 32 + 12, 4).with_delay(10))
        .with(AnimKey::Right, AnimationClip::from_range(7 * 32 + 12, 4).with_delay(10))
        .with(
            AnimKey::Death,
            AnimationClip::from_range(11 * 32 + 12, 9).with_delay(5).once(),
        );
        Self::new(body, anims, Behavior::player())
    }

    // ==================== ENEMIES ====================

    fn ground_enemy(kind: GroundEnemyKind, column: i32, row: i32) -> Self {
        // (first frame, frames per cycle, hp, score, acceleration, top speed)
        let (first_frame, frames, hp, score, acceleration, max) = match kind {
            GroundEnemyKind::Mushroom => (7 * 32 + 21, 6, 4, 10_000, 0.2, 2.0),
            GroundEnemyKind::Tank => (7 * 32 + 27, 4, 8, 25_000, 0.1, 1.0),
        };
        let tuning = MotionTuning {
            move_acceleration: acceleration,
            move_speed_max: max,
            move_stop_acceleration: acceleration,
            fall_speed: 0.2,
            fall_speed_max: 10.0,
            fall_slow: 0.5,
            jump_initial_speed: -3.0,
            jump_speed: 2.0,
            jump_stop_speed: 0.2,
            max_jump_height: (TILE_SIZE * 3) as f32,
        };
        let body = PhysicsBody::new(HitBox::square(12))
            .with_tuning(tuning)
            .with_stats(hp, score)
            .with_time_after_death(100)
            .at_tile(column, row);
        // Right, standby and left walk cycles sit on consecutive sheet rows.
        let anims = AnimationSet::new(
            AnimKey::Standby,
            AnimationClip::from_range(first_frame + 32, frames).with_delay(50),
        )
        .with(
            AnimKey::Right,
            AnimationClip::from_range(first_frame, frames).with_delay(20),
        )
        .with(
            AnimKey::Left,
            AnimationClip::from_range(first_frame + 64, frames).with_delay(20),
        )
        .with(
            AnimKey::Death,
            AnimationClip::from_frames(&MUSHROOM_DEATH).with_delay(3).once(),
        );
        Self::new(body, anims, Behavior::GroundEnemy(kind))
    }

    /// Standing mushroom; chain [`MapObject::moving_left`] or
    /// [`MapObject::moving_right`] to make it walk.
    pub fn mushroom(column: i32, row: i32) -> Self {
        Self::ground_enemy(GroundEnemyKind::Mushroom, column, row)
    }

    /// Slower, tougher ground enemy.
    pub fn tank(column: i32, row: i32) -> Self {
        Self::ground_enemy(GroundEnemyKind::Tank, column, row)
    }

    /// Sparkly Jr, the flying boss.
    pub fn boss(column: i32, row: i32) -> Self {
        let tuning = MotionTuning {
            move_acceleration: 0.2,
            move_speed_max: 2.0,
            move_stop_acceleration: 0.2,
            ..MotionTuning::default()
        };
        let body = PhysicsBody::new(HitBox::square(TILE_SIZE * 2 - 4))
            .with_tuning(tuning)
            .with_stats(40, 1_000_000)
            .with_time_after_death(200)
            .at_tile(column, row);
        let anims = AnimationSet::new(
            AnimKey::Standby,
            AnimationClip::from_frames(&BOSS_ALIVE).with_delay(50),
        )
        .with(
            AnimKey::Death,
            AnimationClip::from_frames(&BOSS_DEATH).with_delay(10),
        );
        Self::new(body, anims, Behavior::FlyingBoss { sin_counter: 0.0 })
    }

    /// Spike block: stays exactly where it is placed.
    pub fn spike(column: i32, row: i32) -> Self {
        let tuning = MotionTuning {
            fall_speed: 0.2,
            fall_speed_max: 10.0,
            fall_slow: 0.5,
            ..MotionTuning::default()
        };
        let body = PhysicsBody::new(HitBox::square(12))
            .with_tuning(tuning)
            .with_stats(50, 25)
            .with_time_after_death(100)
            .at_tile(column, row);
        let anims = AnimationSet::new(
            AnimKey::Standby,
            AnimationClip::from_frames(&[SPIKE_FRAME]).with_delay(50),
        )
        .with(
            AnimKey::Death,
            AnimationClip::from_frames(&[SPIKE_FRAME]).with_delay(3).once(),
        );
        Self::new(body, anims, Behavior::StaticHazard)
    }

    // ==================== INTERACTABLES ====================

    pub fn interactable(kind: InteractableKind, column: i32, row: i32) -> Self {
        let frame = match kind {
            InteractableKind::Door => DOOR_FRAME,
            InteractableKind::Key => KEY_FRAME,
            InteractableKind::SlowFall => SLOW_FALL_FRAME,
        };
        let body = PhysicsBody::new(HitBox::square(TILE_SIZE)).at_tile(column, row);
        let anims = AnimationSet::new(AnimKey::Standby, AnimationClip::from_frames(&[frame]));
        Self::new(body, anims, Behavior::Interactable(kind))
    }

    pub fn door(column: i32, row: i32) -> Self {
        Self::interactable(InteractableKind::Door, column, row)
    }

    /// A key that can be picked up.
    pub fn key(column: i32, row: i32) -> Self {
        Self::interactable(InteractableKind::Key, column, row).with_action(InteractAction::GrantKey)
    }

    /// A slow-fall power-up that can be picked up.
    pub fn slow_fall(column: i32, row: i32) -> Self {
        Self::interactable(InteractableKind::SlowFall, column, row)
            .with_action(InteractAction::GrantSlowFall)
    }

    pub fn reward(spawn: &RewardSpawn) -> Self {
        let (column, row) = spawn.tile;
        Self::interactable(spawn.kind, column, row).with_action(spawn.action)
    }

    // ==================== PROJECTILE ====================

    /// Player shot leaving `origin`, with a slight random downward aim.
    pub fn projectile(origin: Vector2, facing_right: bool, rng: &mut fastrand::Rng) -> Self {
        let aim = (rng.f32() - 0.65) * 0.2;
        let dx = if facing_right {
            PROJECTILE_SPEED
        } else {
            -PROJECTILE_SPEED
        };
        let body = PhysicsBody::new(HitBox::square(6))
            .facing(facing_right)
            .with_velocity(Vector2::new(dx, aim))
            .at(origin);
        let anims = AnimationSet::new(
            AnimKey::Standby,
            AnimationClip::from_frames(&[PROJECTILE_FRAME]),
        );
        Self::new(body, anims, Behavior::Projectile)
    }
}
