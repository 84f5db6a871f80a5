//! Level render systems.
//!
//! Rendering is recorded, not drawn: each system appends [`DrawList`]
//! commands in painter's order and the frontend replays the list onto the
//! render target. A level's render schedule chains these systems in the
//! order its screen needs, usually: back layers, playground, map objects,
//! front layers, HUD.
//!
//! Animation clips advance here, once per rendered frame.

use bevy_ecs::prelude::*;

use crate::components::animation::AnimationSet;
use crate::components::behavior::Behavior;
use crate::components::mapobject::PROJECTILE_FRAME;
use crate::components::physicsbody::PhysicsBody;
use crate::resources::drawlist::{DrawList, Quadrant};
use crate::resources::levelrules::LevelRules;
use crate::resources::parallax::{LayerSlot, Parallax};
use crate::resources::roster::Roster;
use crate::resources::runprogress::{Counter, Item, RunProgress};
use crate::resources::tilegrid::{
    HALF_TILE, PLAYFIELD_COLUMNS, PLAYFIELD_ROWS, TILE_SIZE, TileGrid,
};

/// Sheet tile holding the gun sprite in two of its quarters.
pub const GUN_FRAME: i32 = 7 * 32 + 20;
/// Sheet tile of the muzzle flash.
pub const MUZZLE_FRAME: i32 = 9 * 32 + 8;
/// HUD icon shown while the run owns slow-fall.
pub const SLOW_FALL_ICON: i32 = 11 * 32 + 2;

/// Shown once the player's death sequence is over.
pub const DEAD_OVERLAY: &str = concat!(
    "Your data core  ",
    "has been        ",
    "uploaded to the ",
    "cloud.          ",
    "                ",
    "Press Fire to   ",
    "play again!     ",
);

pub type RenderQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static mut PhysicsBody,
        &'static mut AnimationSet,
        &'static mut Behavior,
    ),
>;

pub fn render_back_layers(parallax: Res<Parallax>, mut draw: ResMut<DrawList>) {
    parallax.render(LayerSlot::Background, &mut draw);
    parallax.render(LayerSlot::BehindObjects, &mut draw);
}

pub fn render_front_layers(parallax: Res<Parallax>, mut draw: ResMut<DrawList>) {
    parallax.render(LayerSlot::InFrontOfObjects, &mut draw);
    parallax.render(LayerSlot::Foreground, &mut draw);
}

/// Only the background slot; for screens that draw nothing else behind text.
pub fn render_background_only(parallax: Res<Parallax>, mut draw: ResMut<DrawList>) {
    parallax.render(LayerSlot::Background, &mut draw);
}

/// The level's own tiles, one screen, repeated if the room is smaller.
pub fn render_playground(grid: Res<TileGrid>, mut draw: ResMut<DrawList>) {
    let columns = grid.columns();
    let rows = grid.rows();
    if columns <= 0 || rows <= 0 {
        return;
    }
    for x in 0..PLAYFIELD_COLUMNS {
        for y in 0..PLAYFIELD_ROWS {
            let cell = grid.cell(x % columns, y % rows);
            if cell.image_id != 0 {
                draw.tile_in_set(cell.image_id, cell.set, x * TILE_SIZE, y * TILE_SIZE);
            }
        }
    }
}

/// Interactables, enemies, the player (plus the retry overlay once it is
/// gone) and projectiles, in that order.
pub fn render_map_objects(
    roster: Res<Roster>,
    rules: Res<LevelRules>,
    mut objects: RenderQuery,
    mut draw: ResMut<DrawList>,
) {
    for &entity in &roster.interactables {
        draw_listed(entity, &mut objects, &mut draw);
    }
    for &entity in &roster.enemies {
        if rules.hide_removed_enemies {
            let removed = objects
                .get(entity)
                .map(|(body, _, _)| body.is_pending_removal())
                .unwrap_or(true);
            if removed {
                continue;
            }
        }
        draw_listed(entity, &mut objects, &mut draw);
    }
    if let Some(player) = roster.player {
        draw_listed(player, &mut objects, &mut draw);
        let gone = objects
            .get(player)
            .map(|(body, _, _)| body.is_pending_removal())
            .unwrap_or(false);
        if gone {
            draw.text(DEAD_OVERLAY, 2, 2, 16);
        }
    }
    for &entity in &roster.projectiles {
        draw_listed(entity, &mut objects, &mut draw);
    }
}

fn draw_listed(entity: Entity, objects: &mut RenderQuery, draw: &mut DrawList) {
    if let Ok((mut body, mut anims, mut behavior)) = objects.get_mut(entity) {
        draw_map_object(&mut behavior, &mut body, &mut anims, draw);
    }
}

/// Record the sprite of one map object and advance its animation.
pub fn draw_map_object(
    behavior: &mut Behavior,
    body: &mut PhysicsBody,
    anims: &mut AnimationSet,
    draw: &mut DrawList,
) {
    let x = body.position.x;
    let y = body.position.y;
    let half = HALF_TILE as f32;
    match behavior {
        Behavior::Player(gun) => {
            draw.tile(anims.advance(), (x - half) as i32, (y - half) as i32);
            if body.facing_right {
                draw.quarter(GUN_FRAME, Quadrant::BottomRight, x as i32, y as i32);
            } else {
                draw.quarter(GUN_FRAME, Quadrant::BottomLeft, (x - half) as i32, y as i32);
            }
            if gun.muzzle_flash > 0 {
                let offset = if body.facing_right { 10.0 } else { -10.0 };
                draw.tile(MUZZLE_FRAME, (x + offset - half) as i32, (y - 5.0) as i32);
                gun.muzzle_flash -= 1;
            }
        }
        Behavior::GroundEnemy(_) | Behavior::StaticHazard => {
            draw.tile(anims.advance(), (x - half) as i32, (y - half) as i32);
            draw_hit_flash(body, draw);
        }
        Behavior::FlyingBoss { .. } => {
            let frame = anims.advance();
            let hw = (body.hit_box.width / 2) as f32;
            let hh = (body.hit_box.height / 2) as f32;
            for tx in 0..3 {
                for ty in 0..3 {
                    let (ox, oy) = ((tx - 1) as f32, (ty - 1) as f32);
                    draw.tile(
                        frame + (tx - 1) + (ty - 1) * 32,
                        (x - hw + ox * hw) as i32 + HALF_TILE,
                        (y - hh + oy * hh) as i32 + HALF_TILE,
                    );
                }
            }
            draw_hit_flash(body, draw);
        }
        Behavior::Projectile => {
            draw.quarter(
                PROJECTILE_FRAME,
                Quadrant::TopLeft,
                (x - half / 2.0) as i32,
                (y - half / 2.0) as i32,
            );
        }
        Behavior::Interactable(_) => {
            draw.tile(anims.advance(), (x - half) as i32, (y - half) as i32);
        }
    }
}

/// Flash the hit-box once after a non-lethal hit.
fn draw_hit_flash(body: &mut PhysicsBody, draw: &mut DrawList) {
    if body.hit_flash {
        draw.flash(body.rect());
        body.hit_flash = false;
    }
}

/// Run totals across the top row.
pub fn render_hud(progress: Res<RunProgress>, mut draw: ResMut<DrawList>) {
    draw.hud_element(3, "deaths", progress.get(Counter::Deaths));
    draw.hud_element(12, "kills", progress.get(Counter::Kills));
    draw.hud_element(20, "score", progress.get(Counter::Score));
    draw.hud_element(30, "key", u64::from(progress.has(Item::Key)));
    if progress.has(Item::SlowFall) {
        draw.tile(SLOW_FALL_ICON, 17 * TILE_SIZE, 0);
    }
}

/// One red line per remaining hit point of the first enemy.
pub fn render_boss_hp(
    rules: Res<LevelRules>,
    roster: Res<Roster>,
    bodies: Query<&PhysicsBody>,
    mut draw: ResMut<DrawList>,
) {
    if !rules.boss_hp_bar {
        return;
    }
    let Some(boss) = roster.enemies.first().and_then(|&e| bodies.get(e).ok()) else {
        return;
    };
    for i in 0..boss.hp.max(0) {
        let y = 20 + i * 2;
        draw.line(20, y, 30, y);
    }
}
