//! Body vs. tile-grid collision resolution.
//!
//! The resolver looks at the four corners of a tile-sized box centered on a
//! probe point and moves the body either by its velocity or, when a solid
//! tile is in the way, flush against the tile edge.
//!
//! # Contract
//!
//! - Corners are sampled with a fixed half-tile inset, whatever the body's
//!   hit-box size.
//! - The horizontal pass probes at `(x + dx, y)`, the vertical pass at
//!   `(x, y + dy)`, both from the pre-move position.
//! - A blocked axis gets zero velocity; a blocked fall ends the fall.
//! - Whatever the axes, a final probe one pixel below `y + dy` starts a fall
//!   when both bottom corners are open.
//! - The result is written to [`PhysicsBody::resolved`]; the position itself
//!   is not touched.

use raylib::prelude::Vector2;

use crate::components::physicsbody::PhysicsBody;
use crate::resources::tilegrid::{HALF_TILE, TILE_SIZE, TileGrid};

/// Which of the four corners of the probe box sit on a solid tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Corners {
    pub nw: bool,
    pub ne: bool,
    pub sw: bool,
    pub se: bool,
}

/// Sample the corners of the tile-sized box centered at `(x, y)`.
pub fn probe_corners(grid: &TileGrid, x: f32, y: f32) -> Corners {
    let half = HALF_TILE as f32;
    let w = (x - half) as i32 / TILE_SIZE;
    let e = (x + half - 1.0) as i32 / TILE_SIZE;
    let n = (y - half) as i32 / TILE_SIZE;
    let s = (y + half - 1.0) as i32 / TILE_SIZE;
    Corners {
        nw: grid.is_solid(w, n),
        ne: grid.is_solid(e, n),
        sw: grid.is_solid(w, s),
        se: grid.is_solid(e, s),
    }
}

/// Axes the resolver is allowed to move along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisMask {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl AxisMask {
    pub const ALL: AxisMask = AxisMask {
        up: true,
        down: true,
        left: true,
        right: true,
    };
    pub const DOWN_ONLY: AxisMask = AxisMask {
        up: false,
        down: true,
        left: false,
        right: false,
    };
}

/// Walls met during a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TileContact {
    pub left_wall: bool,
    pub right_wall: bool,
    pub ceiling: bool,
    pub floor: bool,
}

/// Resolve the body's velocity against `grid` and store the destination.
pub fn resolve_tile_collision(
    body: &mut PhysicsBody,
    grid: &TileGrid,
    axes: AxisMask,
) -> TileContact {
    let ts = TILE_SIZE as f32;
    let half = HALF_TILE as f32;
    let Vector2 { x, y } = body.position;
    let mut dx = body.velocity.x;
    let mut dy = body.velocity.y;
    let mut tx = x;
    let mut ty = y;
    let map_x = (x / ts) as i32;
    let map_y = (y / ts) as i32;
    let dest_x = x + dx;
    let dest_y = y + dy;
    let mut contact = TileContact::default();

    if axes.left || axes.right {
        let c = probe_corners(grid, dest_x, y);
        if axes.left && dx < 0.0 {
            if c.nw || c.sw {
                dx = 0.0;
                tx = map_x as f32 * ts + half;
                contact.left_wall = true;
            } else {
                tx += dx;
            }
        }
        if axes.right && dx > 0.0 {
            if c.ne || c.se {
                dx = 0.0;
                tx = (map_x + 1) as f32 * ts - half;
                contact.right_wall = true;
            } else {
                tx += dx;
            }
        }
    }

    if axes.up || axes.down {
        let c = probe_corners(grid, x, dest_y);
        if axes.up && dy < 0.0 {
            if c.nw || c.ne {
                dy = 0.0;
                ty = map_y as f32 * ts + half;
                contact.ceiling = true;
            } else {
                ty += dy;
            }
        }
        if axes.down && dy > 0.0 {
            if c.sw || c.se {
                dy = 0.0;
                ty = (map_y + 1) as f32 * ts - half;
                body.falling = false;
                contact.floor = true;
            } else {
                ty += dy;
            }
        }
    }

    let below = probe_corners(grid, x, dest_y + 1.0);
    if !below.sw && !below.se {
        body.falling = true;
    }

    body.resolved = Vector2::new(tx, ty);
    body.velocity = Vector2::new(dx, dy);
    contact
}

/// Push the resolved destination `push` pixels sideways, stopping at walls.
///
/// The push is skipped when the body is already steering in the push
/// direction (`steering_with_push`), so recoil never adds to walking speed.
pub fn resolve_recoil(
    body: &mut PhysicsBody,
    grid: &TileGrid,
    push: f32,
    steering_with_push: bool,
) {
    let ts = TILE_SIZE as f32;
    let half = HALF_TILE as f32;
    let x = body.resolved.x;
    let map_x = (x / ts) as i32;
    if steering_with_push {
        return;
    }
    let c = probe_corners(grid, x + push, body.position.y);
    if push < 0.0 {
        body.resolved.x = if c.nw || c.sw {
            map_x as f32 * ts + half
        } else {
            x + push
        };
    } else if push > 0.0 {
        body.resolved.x = if c.ne || c.se {
            (map_x + 1) as f32 * ts - half
        } else {
            x + push
        };
    }
}
