//! Shared kinematic state of every map object.
//!
//! A [`PhysicsBody`] holds the position, velocity and tuning of one entity plus
//! its life-cycle flags. Movement is two-phase: update code writes a
//! destination into [`PhysicsBody::resolved`] (usually via the tile resolver),
//! then [`PhysicsBody::commit`] makes it the new position.
//!
//! # Contract
//!
//! - `alive` only ever goes from true to false.
//! - `pending_removal` is set only once the death sequence is finished (or
//!   immediately, for objects that vanish without one).
//! - [`PhysicsBody::kill`] on a dead body changes nothing and reports not killed.

use bevy_ecs::prelude::Component;
use raylib::prelude::Vector2;

use crate::components::hitbox::HitBox;
use crate::resources::tilegrid::{
    HALF_TILE, PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH, TILE_SIZE,
};

/// Per-variant movement constants.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionTuning {
    pub move_acceleration: f32,
    pub move_speed_max: f32,
    pub move_stop_acceleration: f32,
    pub fall_speed: f32,
    pub fall_speed_max: f32,
    /// Fixed downward speed while slow-falling.
    pub fall_slow: f32,
    pub jump_initial_speed: f32,
    pub jump_speed: f32,
    pub jump_stop_speed: f32,
    pub max_jump_height: f32,
}

#[derive(Component, Debug, Clone)]
pub struct PhysicsBody {
    pub position: Vector2,
    pub velocity: Vector2,
    /// Destination computed this tick, applied by [`PhysicsBody::commit`].
    pub resolved: Vector2,
    pub spawn_point: Vector2,
    pub hit_box: HitBox,
    pub facing_right: bool,
    pub hp: i32,
    pub score: u32,
    pub tuning: MotionTuning,
    pub jumping: bool,
    pub falling: bool,
    pub initial_jump_y: f32,
    pub time_after_death: i32,
    /// Set by a non-lethal hit, cleared once the flash has been drawn.
    pub hit_flash: bool,
    alive: bool,
    pending_removal: bool,
}

impl PhysicsBody {
    pub fn new(hit_box: HitBox) -> Self {
        Self {
            position: Vector2::zero(),
            velocity: Vector2::zero(),
            resolved: Vector2::zero(),
            spawn_point: Vector2::zero(),
            hit_box,
            facing_right: true,
            hp: 1,
            score: 0,
            tuning: MotionTuning::default(),
            jumping: false,
            falling: false,
            initial_jump_y: 0.0,
            time_after_death: 0,
            hit_flash: false,
            alive: true,
            pending_removal: false,
        }
    }

    pub fn with_tuning(mut self, tuning: MotionTuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn with_stats(mut self, hp: i32, score: u32) -> Self {
        self.hp = hp;
        self.score = score;
        self
    }

    pub fn with_time_after_death(mut self, ticks: i32) -> Self {
        self.time_after_death = ticks;
        self
    }

    pub fn with_velocity(mut self, velocity: Vector2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn facing(mut self, right: bool) -> Self {
        self.facing_right = right;
        self
    }

    /// Place the body at the center of tile `(column, row)`.
    pub fn at_tile(mut self, column: i32, row: i32) -> Self {
        self.set_spawn_tile(column, row);
        self
    }

    /// Place the body at an exact pixel position.
    pub fn at(mut self, position: Vector2) -> Self {
        self.spawn_point = position;
        self.position = position;
        self.resolved = position;
        self
    }

    pub fn set_spawn_tile(&mut self, column: i32, row: i32) {
        let p = Vector2::new(
            (column * TILE_SIZE + HALF_TILE) as f32,
            (row * TILE_SIZE + HALF_TILE) as f32,
        );
        self.spawn_point = p;
        self.position = p;
        self.resolved = p;
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_pending_removal(&self) -> bool {
        self.pending_removal
    }

    pub fn mark_for_removal(&mut self) {
        self.pending_removal = true;
    }

    /// Neither jumping nor falling.
    pub fn grounded(&self) -> bool {
        !self.jumping && !self.falling
    }

    /// Take one point of damage. Returns true only on the killing blow.
    pub fn kill(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        self.hp -= 1;
        if self.hp <= 0 {
            self.alive = false;
            true
        } else {
            self.hit_flash = true;
            false
        }
    }

    /// Die without taking damage.
    pub fn expire(&mut self) {
        self.alive = false;
    }

    /// Decay horizontal speed toward zero by `stop` per call.
    pub fn stop_x_movement(&mut self, stop: f32) {
        if self.facing_right {
            self.velocity.x -= stop;
            if self.velocity.x < 0.0 {
                self.velocity.x = 0.0;
            }
        } else {
            self.velocity.x += stop;
            if self.velocity.x > 0.0 {
                self.velocity.x = 0.0;
            }
        }
    }

    /// Clamp the pending destination so the tile at the body stays on screen.
    pub fn limit_to_screen(&mut self) {
        let max_x = (PLAYFIELD_WIDTH - TILE_SIZE) as f32;
        let max_y = (PLAYFIELD_HEIGHT - TILE_SIZE) as f32;
        self.resolved.x = self.resolved.x.clamp(0.0, max_x);
        self.resolved.y = self.resolved.y.clamp(0.0, max_y);
    }

    /// Make the pending destination the new position, wrapped to the playfield.
    pub fn commit(&mut self) {
        self.position = Vector2::new(
            self.resolved.x % PLAYFIELD_WIDTH as f32,
            self.resolved.y % PLAYFIELD_HEIGHT as f32,
        );
    }

    /// Hit-box overlap with another body at their current positions.
    pub fn intersects(&self, other: &PhysicsBody) -> bool {
        self.hit_box
            .overlaps(self.position, &other.hit_box, other.position)
    }

    /// `(x, y, w, h)` of the hit-box at the current position.
    pub fn rect(&self) -> (i32, i32, i32, i32) {
        self.hit_box.rect(self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn spawn_tile_centers_body() {
        let body = PhysicsBody::new(HitBox::square(12)).at_tile(3, 2);
        assert!(approx_eq(body.position.x, 56.0));
        assert!(approx_eq(body.position.y, 40.0));
        assert_eq!(body.spawn_point, body.position);
    }

    #[test]
    fn kill_reports_only_the_lethal_transition() {
        let mut body = PhysicsBody::new(HitBox::square(12)).with_stats(2, 100);
        assert!(!body.kill());
        assert!(body.hit_flash);
        assert!(body.is_alive());
        assert!(body.kill());
        assert!(!body.is_alive());
        assert!(!body.kill());
        assert_eq!(body.hp, 0);
    }

    #[test]
    fn single_hp_dies_on_first_hit() {
        let mut body = PhysicsBody::new(HitBox::square(6));
        assert!(body.kill());
        assert!(!body.hit_flash);
    }

    #[test]
    fn stop_x_movement_never_overshoots() {
        let mut body = PhysicsBody::new(HitBox::square(12)).with_velocity(Vector2::new(0.05, 0.0));
        body.stop_x_movement(0.025);
        assert!(approx_eq(body.velocity.x, 0.025));
        body.stop_x_movement(0.025);
        body.stop_x_movement(0.025);
        assert!(approx_eq(body.velocity.x, 0.0));

        let mut left = PhysicsBody::new(HitBox::square(12))
            .facing(false)
            .with_velocity(Vector2::new(-1.0, 0.0));
        left.stop_x_movement(2.0);
        assert!(approx_eq(left.velocity.x, 0.0));
    }

    #[test]
    fn limit_to_screen_clamps_destination() {
        let mut body = PhysicsBody::new(HitBox::square(12));
        body.resolved = Vector2::new(-3.0, 400.0);
        body.limit_to_screen();
        assert!(approx_eq(body.resolved.x, 0.0));
        assert!(approx_eq(body.resolved.y, 240.0));
    }

    #[test]
    fn commit_wraps_to_playfield() {
        let mut body = PhysicsBody::new(HitBox::square(12));
        body.resolved = Vector2::new(330.0, 10.0);
        body.commit();
        assert!(approx_eq(body.position.x, 10.0));
        assert!(approx_eq(body.position.y, 10.0));
    }

    #[test]
    fn grounded_is_neither_jumping_nor_falling() {
        let mut body = PhysicsBody::new(HitBox::square(12));
        assert!(body.grounded());
        body.falling = true;
        assert!(!body.grounded());
    }
}
