//! Per-tick stepping of map objects.
//!
//! [`step_map_object`] advances one body according to its [`Behavior`]; the
//! systems below walk the level's [`Roster`] lists in spawn order and call it
//! for interactables, enemies, the player and projectiles, in that order.
//!
//! # Contract
//!
//! - Living bodies move through the tile resolver (or, for the boss and
//!   projectiles, their own rules) and then commit.
//! - Dying bodies coast to a stop, play their death clip and are flagged for
//!   removal once the clip has played and `time_after_death` is below zero.
//!   The boss skips the clip check since its death clip loops.
//! - Interactions read the player's state as it was before the interactable
//!   pass, and do not check whether the player is alive.

use bevy_ecs::prelude::*;

use crate::components::animation::{AnimKey, AnimationSet};
use crate::components::behavior::{Behavior, InteractAction, Interaction, PlayerGun};
use crate::components::controls::Controls;
use crate::components::physicsbody::PhysicsBody;
use crate::events::audio::{AudioCmd, SoundId};
use crate::resources::levelrules::LevelRules;
use crate::resources::levelstate::NextLevel;
use crate::resources::roster::Roster;
use crate::resources::runprogress::{Item, RunProgress};
use crate::resources::tilegrid::{PLAYFIELD_WIDTH, TILE_SIZE, TileGrid};
use crate::resources::worldtime::WorldTime;
use crate::systems::motion::{accelerate, bounce_off_edges, jump_and_fall, steer_boss};
use crate::systems::tilecollision::{AxisMask, resolve_recoil, resolve_tile_collision};

/// Horizontal speed lost per tick while dying.
pub const DEATH_SLOWDOWN: f32 = 0.025;

/// Sideways kick of a shot, in pixels.
pub const RECOIL_DISTANCE: f32 = 2.0;

/// Frames the muzzle flash stays up after a shot.
pub const MUZZLE_FLASH_FRAMES: u8 = 2;

/// The components every stepped map object carries.
pub type MapObjectQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static mut PhysicsBody,
        &'static mut Controls,
        &'static mut AnimationSet,
        &'static mut Behavior,
    ),
>;

/// Level state a step may read, plus the sounds it wants played.
pub struct StepContext<'a> {
    pub grid: &'a TileGrid,
    /// Wall-clock seconds, for the fire cooldown.
    pub now: f32,
    /// The run owns the slow-fall power-up.
    pub slow_fall: bool,
    pub sounds: &'a mut Vec<AudioCmd>,
}

/// Advance one map object by a tick.
pub fn step_map_object(
    behavior: &mut Behavior,
    body: &mut PhysicsBody,
    controls: &mut Controls,
    anims: &mut AnimationSet,
    ctx: &mut StepContext,
) {
    match behavior {
        Behavior::Player(gun) => {
            if body.is_alive() {
                step_player(gun, body, controls, anims, ctx);
            } else {
                step_dying(body, anims, ctx.grid, AxisMask::ALL);
            }
        }
        Behavior::GroundEnemy(_) => {
            if body.is_alive() {
                step_ground_enemy(body, controls, anims, ctx.grid);
            } else {
                step_dying(body, anims, ctx.grid, AxisMask::ALL);
            }
        }
        Behavior::FlyingBoss { sin_counter } => {
            if body.is_alive() {
                steer_boss(body, controls, sin_counter);
                bounce_off_edges(body, controls);
                body.commit();
            } else {
                body.commit();
                anims.select(AnimKey::Death);
                body.time_after_death = body.time_after_death.saturating_sub(1);
                if body.time_after_death < 0 {
                    body.mark_for_removal();
                }
            }
        }
        Behavior::Projectile => {
            if body.is_alive() {
                step_projectile(body);
            } else {
                body.mark_for_removal();
            }
        }
        Behavior::StaticHazard => {
            if body.is_alive() {
                // Hazards never pick up speed; they stay where they were placed.
                anims.select_motion(AnimKey::Standby);
                resolve_tile_collision(body, ctx.grid, AxisMask::DOWN_ONLY);
                body.limit_to_screen();
                body.commit();
            } else {
                step_dying(body, anims, ctx.grid, AxisMask::DOWN_ONLY);
            }
        }
        Behavior::Interactable(_) => {}
    }
}

/// Walk clip for the held direction, or the standby clip for the facing.
pub fn player_motion_key(controls: &Controls, facing_right: bool) -> AnimKey {
    if controls.right {
        AnimKey::Right
    } else if controls.left {
        AnimKey::Left
    } else if facing_right {
        AnimKey::StandbyRight
    } else {
        AnimKey::StandbyLeft
    }
}

fn step_player(
    gun: &mut PlayerGun,
    body: &mut PhysicsBody,
    controls: &Controls,
    anims: &mut AnimationSet,
    ctx: &mut StepContext,
) {
    if controls.fire && gun.ready(ctx.now) {
        gun.spawn_projectile = true;
        gun.last_shot = Some(ctx.now);
        gun.muzzle_flash = MUZZLE_FLASH_FRAMES;
        gun.recoil = true;
        ctx.sounds.push(AudioCmd::fx(SoundId::Shoot));
    }

    accelerate(body, controls);
    anims.select_motion(player_motion_key(controls, body.facing_right));

    if jump_and_fall(body, controls, ctx.slow_fall && controls.up) {
        ctx.sounds.push(AudioCmd::fx(SoundId::SshShort));
    }

    resolve_tile_collision(body, ctx.grid, AxisMask::ALL);

    if std::mem::take(&mut gun.recoil) {
        let push = if body.facing_right {
            -RECOIL_DISTANCE
        } else {
            RECOIL_DISTANCE
        };
        let steering_with_push = if push < 0.0 {
            controls.left
        } else {
            controls.right
        };
        resolve_recoil(body, ctx.grid, push, steering_with_push);
    }

    body.limit_to_screen();
    body.commit();
}

fn step_ground_enemy(
    body: &mut PhysicsBody,
    controls: &mut Controls,
    anims: &mut AnimationSet,
    grid: &TileGrid,
) {
    accelerate(body, controls);
    let key = if body.velocity.x > 0.0 {
        AnimKey::Right
    } else if body.velocity.x < 0.0 {
        AnimKey::Left
    } else {
        AnimKey::Standby
    };
    anims.select_motion(key);
    jump_and_fall(body, controls, false);

    let contact = resolve_tile_collision(body, grid, AxisMask::ALL);
    if contact.left_wall {
        controls.left = false;
        controls.right = true;
        body.facing_right = true;
    }
    if contact.right_wall {
        controls.left = true;
        controls.right = false;
        body.facing_right = false;
    }

    body.limit_to_screen();
    body.commit();
}

fn step_projectile(body: &mut PhysicsBody) {
    body.resolved = body.position + body.velocity;
    let max_x = (PLAYFIELD_WIDTH - TILE_SIZE) as f32;
    if body.resolved.x > max_x {
        body.resolved.x = max_x;
        body.expire();
        body.mark_for_removal();
    } else if body.resolved.x < 0.0 {
        body.resolved.x = 0.0;
        body.expire();
        body.mark_for_removal();
    }
    body.commit();
}

fn step_dying(body: &mut PhysicsBody, anims: &mut AnimationSet, grid: &TileGrid, axes: AxisMask) {
    body.stop_x_movement(DEATH_SLOWDOWN);
    resolve_tile_collision(body, grid, axes);
    body.commit();
    anims.select(AnimKey::Death);
    body.time_after_death = body.time_after_death.saturating_sub(1);
    if anims.has_played_once(AnimKey::Death) && body.time_after_death < 0 {
        body.mark_for_removal();
    }
}

fn step_list(
    entities: &[Entity],
    objects: &mut MapObjectQuery,
    ctx: &mut StepContext,
) {
    for &entity in entities {
        if let Ok((mut body, mut controls, mut anims, mut behavior)) = objects.get_mut(entity) {
            step_map_object(&mut behavior, &mut body, &mut controls, &mut anims, ctx);
        }
    }
}

// ==================== SYSTEMS ====================

/// Step every interactable, then let it act on the player.
#[allow(clippy::too_many_arguments)]
pub fn update_interactables(
    roster: Res<Roster>,
    grid: Res<TileGrid>,
    time: Res<WorldTime>,
    rules: Res<LevelRules>,
    mut progress: ResMut<RunProgress>,
    mut next: ResMut<NextLevel>,
    mut objects: MapObjectQuery,
    interactions: Query<&Interaction>,
    mut audio: MessageWriter<AudioCmd>,
) {
    let mut sounds = Vec::new();
    let player = roster
        .player
        .and_then(|e| objects.get(e).ok())
        .map(|(body, controls, _, _)| (body.clone(), *controls));
    let mut hurt_player = false;

    {
        let mut ctx = StepContext {
            grid: &grid,
            now: time.elapsed,
            slow_fall: false,
            sounds: &mut sounds,
        };
        for &entity in &roster.interactables {
            let Ok((mut body, mut controls, mut anims, mut behavior)) = objects.get_mut(entity)
            else {
                continue;
            };
            step_map_object(&mut behavior, &mut body, &mut controls, &mut anims, &mut ctx);

            let Some((player_body, player_controls)) = &player else {
                continue;
            };
            let Ok(interaction) = interactions.get(entity) else {
                continue;
            };
            if !body.intersects(player_body) {
                continue;
            }
            if player_controls.up {
                match interaction.action {
                    InteractAction::Teleport(target) => {
                        if progress.has(Item::Key) {
                            ctx.sounds.push(AudioCmd::fx(SoundId::Door));
                            if let Some(music) = rules.teleport_stops_music {
                                ctx.sounds.push(AudioCmd::stop_music(music));
                            }
                            next.set(target);
                        }
                    }
                    InteractAction::GrantKey => {
                        progress.add(Item::Key);
                        collect(&mut body, ctx.sounds);
                    }
                    InteractAction::GrantSlowFall => {
                        progress.add(Item::SlowFall);
                        collect(&mut body, ctx.sounds);
                    }
                    InteractAction::Damage => {}
                }
            } else if interaction.action == InteractAction::Damage {
                hurt_player = true;
            }
        }
    }

    if hurt_player {
        if let Some(e) = roster.player {
            if let Ok((mut body, _, _, _)) = objects.get_mut(e) {
                body.kill();
            }
        }
    }
    audio.write_batch(sounds);
}

fn collect(body: &mut PhysicsBody, sounds: &mut Vec<AudioCmd>) {
    body.kill();
    body.mark_for_removal();
    sounds.push(AudioCmd::fx(SoundId::Pickup));
}

pub fn update_enemies(
    roster: Res<Roster>,
    grid: Res<TileGrid>,
    time: Res<WorldTime>,
    mut objects: MapObjectQuery,
    mut audio: MessageWriter<AudioCmd>,
) {
    let mut sounds = Vec::new();
    let mut ctx = StepContext {
        grid: &grid,
        now: time.elapsed,
        slow_fall: false,
        sounds: &mut sounds,
    };
    step_list(&roster.enemies, &mut objects, &mut ctx);
    audio.write_batch(sounds);
}

pub fn update_player(
    roster: Res<Roster>,
    grid: Res<TileGrid>,
    time: Res<WorldTime>,
    progress: Res<RunProgress>,
    mut objects: MapObjectQuery,
    mut audio: MessageWriter<AudioCmd>,
) {
    let mut sounds = Vec::new();
    let mut ctx = StepContext {
        grid: &grid,
        now: time.elapsed,
        slow_fall: progress.has(Item::SlowFall),
        sounds: &mut sounds,
    };
    if let Some(player) = roster.player {
        step_list(&[player], &mut objects, &mut ctx);
    }
    audio.write_batch(sounds);
}

pub fn update_projectiles(
    roster: Res<Roster>,
    grid: Res<TileGrid>,
    time: Res<WorldTime>,
    mut objects: MapObjectQuery,
    mut audio: MessageWriter<AudioCmd>,
) {
    let mut sounds = Vec::new();
    let mut ctx = StepContext {
        grid: &grid,
        now: time.elapsed,
        slow_fall: false,
        sounds: &mut sounds,
    };
    step_list(&roster.projectiles, &mut objects, &mut ctx);
    audio.write_batch(sounds);
}
