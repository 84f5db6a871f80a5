//! Shots, hits and the removal sweep.
//!
//! These run after every map object has been stepped:
//! [`spawn_projectile`] turns the player's shot request into a projectile,
//! [`resolve_combat`] settles projectile/enemy and enemy/player contacts, and
//! [`sweep_removed`] despawns finished projectiles and interactables.
//!
//! # Contract
//!
//! - Enemies are visited in roster order; for each, every projectile is tested
//!   before the player.
//! - Kills and score are counted only on the killing blow, so a dead enemy
//!   never scores twice.
//! - Enemies are never swept; their bodies stay in the roster after dying.

use bevy_ecs::prelude::*;
use log::debug;
use raylib::prelude::Vector2;

use crate::components::behavior::{Behavior, OnDefeat, RewardSpawn};
use crate::components::mapobject::MapObject;
use crate::components::physicsbody::PhysicsBody;
use crate::events::audio::{AudioCmd, SoundId};
use crate::resources::levelrng::LevelRng;
use crate::resources::levelstate::{LevelSignals, SHAKE_SCREEN};
use crate::resources::roster::Roster;
use crate::resources::runprogress::{Counter, RunProgress};
use crate::resources::tilegrid::HALF_TILE;

/// Spawn a projectile in front of the player if it fired this tick.
pub fn spawn_projectile(
    mut commands: Commands,
    mut roster: ResMut<Roster>,
    mut players: Query<(&PhysicsBody, &mut Behavior)>,
    mut rng: ResMut<LevelRng>,
    mut signals: ResMut<LevelSignals>,
) {
    let Some(player) = roster.player else {
        return;
    };
    let Ok((body, mut behavior)) = players.get_mut(player) else {
        return;
    };
    let Behavior::Player(gun) = &mut *behavior else {
        return;
    };
    if !gun.take_shot() {
        return;
    }

    let ahead = (HALF_TILE / 2) as f32;
    let origin = Vector2::new(
        body.position.x + if body.facing_right { ahead } else { -ahead },
        body.position.y + (HALF_TILE / 4) as f32,
    );
    let shot = MapObject::projectile(origin, body.facing_right, &mut rng.0).spawn(&mut commands);
    roster.projectiles.push(shot);
    signals.set_flag(SHAKE_SCREEN);
}

/// Settle projectile hits on enemies and enemy contact with the player.
pub fn resolve_combat(
    mut commands: Commands,
    mut roster: ResMut<Roster>,
    mut bodies: Query<&mut PhysicsBody>,
    rewards: Query<&OnDefeat>,
    mut progress: ResMut<RunProgress>,
    mut audio: MessageWriter<AudioCmd>,
) {
    let mut sounds = Vec::new();
    let mut spawns: Vec<RewardSpawn> = Vec::new();

    for &enemy in &roster.enemies {
        for &shot in &roster.projectiles {
            let Ok([mut target, mut bullet]) = bodies.get_many_mut([enemy, shot]) else {
                continue;
            };
            if !(bullet.is_alive() && target.is_alive()) || !bullet.intersects(&target) {
                continue;
            }
            sounds.push(AudioCmd::fx(SoundId::Boom));
            bullet.kill();
            if target.kill() {
                sounds.push(AudioCmd::fx(SoundId::EnemyDeath));
                progress.add_point(Counter::Kills);
                progress.add_points(Counter::Score, u64::from(target.score));
                if let Ok(reward) = rewards.get(enemy) {
                    debug!("Enemy {:?} defeated, granting {} reward(s)", enemy, reward.spawns.len());
                    if let Some(music) = reward.stop_music {
                        sounds.push(AudioCmd::stop_music(music));
                    }
                    sounds.push(AudioCmd::fx(SoundId::BossDeath));
                    spawns.extend(reward.spawns.iter().copied());
                }
            }
        }

        let Some(player) = roster.player else {
            continue;
        };
        let Ok([mut hero, target]) = bodies.get_many_mut([player, enemy]) else {
            continue;
        };
        if hero.intersects(&target) && target.is_alive() && hero.is_alive() {
            hero.kill();
            progress.add_point(Counter::Deaths);
            sounds.push(AudioCmd::fx(SoundId::Death));
        }
    }

    for spawn in &spawns {
        let entity = MapObject::reward(spawn).spawn(&mut commands);
        roster.interactables.push(entity);
    }
    audio.write_batch(sounds);
}

/// Despawn projectiles and interactables flagged for removal.
pub fn sweep_removed(
    mut commands: Commands,
    mut roster: ResMut<Roster>,
    bodies: Query<&PhysicsBody>,
) {
    let roster = &mut *roster;
    for list in [&mut roster.projectiles, &mut roster.interactables] {
        list.retain(|&entity| match bodies.get(entity) {
            Ok(body) if body.is_pending_removal() => {
                commands.entity(entity).despawn();
                false
            }
            Ok(_) => true,
            Err(_) => false,
        });
    }
}
