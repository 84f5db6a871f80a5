//! Velocity rules shared by the map-object variants.
//!
//! These helpers only touch [`PhysicsBody::velocity`] and the jump flags;
//! turning velocity into a destination is the tile resolver's job (or, for
//! bodies that ignore tiles, [`steer_boss`] itself).
//!
//! # Contract
//!
//! - Right wins over left when both are held.
//! - A jump starts only from the ground with jump held.
//! - The jump ends (and the fall begins) as soon as jump is released or
//!   `y - initial_jump_y < max_jump_height`; the second test is kept exactly as
//!   written, so an upward jump normally ends on its first ascent tick.
//! - Falling speed never exceeds `fall_speed_max`.

use raylib::prelude::Vector2;

use crate::components::controls::Controls;
use crate::components::physicsbody::PhysicsBody;
use crate::resources::tilegrid::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};

/// Accelerate toward the held direction, or decelerate toward a stand-still.
pub fn accelerate(body: &mut PhysicsBody, controls: &Controls) {
    let t = body.tuning;
    let mut dx = body.velocity.x;
    if controls.right {
        dx = (dx + t.move_acceleration).min(t.move_speed_max);
    } else if controls.left {
        dx = (dx - t.move_acceleration).max(-t.move_speed_max);
    } else if dx > 0.0 {
        dx = (dx - t.move_stop_acceleration).max(0.0);
    } else if dx < 0.0 {
        dx = (dx + t.move_stop_acceleration).min(0.0);
    }
    body.velocity.x = dx;
}

/// Start, hold and end jumps, then apply gravity while falling.
///
/// `slow_fall` replaces gravity with the fixed slow-fall speed once the body
/// is on its way down. Returns true when a jump started on this call.
pub fn jump_and_fall(body: &mut PhysicsBody, controls: &Controls, slow_fall: bool) -> bool {
    let t = body.tuning;
    let mut dy = body.velocity.y;
    let mut started = false;

    if !body.falling && controls.jump && !body.jumping {
        dy = t.jump_initial_speed;
        body.initial_jump_y = body.position.y;
        body.jumping = true;
        started = true;
    }

    if body.jumping && !body.falling {
        if controls.jump {
            dy -= t.jump_speed;
        }
        if !controls.jump || (body.position.y - body.initial_jump_y) < t.max_jump_height {
            body.jumping = false;
            body.falling = true;
        }
    }

    if body.falling {
        if dy < 0.0 {
            dy += t.jump_stop_speed;
        }
        if dy >= 0.0 {
            if slow_fall {
                dy = t.fall_slow;
            } else {
                dy += t.fall_speed;
            }
        }
        if dy > t.fall_speed_max {
            dy = t.fall_speed_max;
        }
    }

    body.velocity.y = dy;
    started
}

fn decay(v: f32, stop: f32) -> f32 {
    if v > 0.0 {
        (v - stop).max(0.0)
    } else if v < 0.0 {
        (v + stop).min(0.0)
    } else {
        0.0
    }
}

/// Free flight for the boss: accelerate on both axes with a sine-driven
/// overshoot past the top speed, then move without looking at tiles.
///
/// `counter` is the boss's phase in degrees and advances by one per call.
pub fn steer_boss(body: &mut PhysicsBody, controls: &Controls, counter: &mut f32) {
    let t = body.tuning;
    let c = *counter;
    let sx = c.to_radians().sin() * 1.5;
    let sy = (c / 3.0).to_radians().cos() * 1.5;
    let mut dx = body.velocity.x;
    let mut dy = body.velocity.y;

    if controls.right {
        dx += t.move_acceleration;
        if dx > t.move_speed_max {
            dx = t.move_speed_max + sx;
        }
    } else if controls.left {
        dx -= t.move_acceleration;
        if dx < -t.move_speed_max {
            dx = -t.move_speed_max + sy;
        }
    } else {
        dx = decay(dx, t.move_stop_acceleration);
    }

    if controls.down {
        dy += t.move_acceleration;
        if dy > t.move_speed_max {
            dy = t.move_speed_max + c.to_radians().sin() * 4.0;
        }
    } else if controls.up {
        dy -= t.move_acceleration;
        if dy < -t.move_speed_max {
            dy = -t.move_speed_max;
        }
    } else {
        dy = decay(dy, t.move_stop_acceleration);
    }

    *counter += 1.0;
    body.velocity = Vector2::new(dx, dy);
    body.resolved = Vector2::new(body.position.x + dx, body.position.y + dy);
}

/// Turn around at the playfield edges, inset by half the hit-box.
/// The destination itself is not clamped.
pub fn bounce_off_edges(body: &mut PhysicsBody, controls: &mut Controls) {
    let half_w = (body.hit_box.width / 2) as f32;
    let half_h = (body.hit_box.height / 2) as f32;
    let Vector2 { x, y } = body.resolved;

    if x > PLAYFIELD_WIDTH as f32 - half_w {
        controls.left = true;
        controls.right = false;
        body.facing_right = false;
        body.velocity.x = -body.velocity.x;
    } else if x < half_w {
        controls.left = false;
        controls.right = true;
        body.facing_right = true;
        body.velocity.x = -body.velocity.x;
    }

    if y > PLAYFIELD_HEIGHT as f32 - half_h {
        controls.up = true;
        controls.down = false;
        body.velocity.y = -body.velocity.y;
    } else if y < half_h {
        controls.up = false;
        controls.down = true;
        body.velocity.y = -body.velocity.y;
    }
}
