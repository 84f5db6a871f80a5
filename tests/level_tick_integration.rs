//! Level tick integration tests: stepping, interactions, combat, the removal
//! sweep, retry and level switching.

use bevy_ecs::prelude::*;
use bevy_ecs::system::ScheduleSystem;
use raylib::prelude::Vector2;

use datacore::components::behavior::{Behavior, InteractAction, OnDefeat, PlayerGun};
use datacore::components::controls::Controls;
use datacore::components::mapobject::MapObject;
use datacore::components::physicsbody::PhysicsBody;
use datacore::events::audio::{AudioCmd, MusicId, SoundId};
use datacore::events::input::{InputAction, InputEvent};
use datacore::game::levels::boss_reward;
use datacore::game::{LevelManager, LevelServices};
use datacore::resources::blueprint::{LevelBlueprint, Spawner};
use datacore::resources::levelrng::LevelRng;
use datacore::resources::levelrules::LevelRules;
use datacore::resources::levelstate::{LevelId, LevelRequest, LevelSignals, NextLevel, SHAKE_SCREEN};
use datacore::resources::roster::Roster;
use datacore::resources::runprogress::{Counter, Item, RunProgress};
use datacore::resources::tilegrid::{SOLID, TileCell, TileGrid};
use datacore::resources::worldtime::WorldTime;
use datacore::systems::combat::{resolve_combat, spawn_projectile, sweep_removed};
use datacore::systems::controls::apply_player_input;
use datacore::systems::mapobjects::{update_enemies, update_interactables, update_projectiles};

const EPSILON: f32 = 1e-4;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn solid() -> TileCell {
    TileCell {
        image_id: 1,
        kind: SOLID,
        set: 0,
    }
}

fn make_world(grid: TileGrid) -> World {
    let mut world = World::new();
    world.insert_resource(grid);
    world.insert_resource(Roster::default());
    world.insert_resource(WorldTime::default());
    world.insert_resource(RunProgress::default());
    world.insert_resource(NextLevel::new());
    world.insert_resource(LevelRules::default());
    world.insert_resource(LevelSignals::default());
    world.insert_resource(LevelRng::with_seed(7));
    world.insert_resource(LevelBlueprint::default());
    world.init_resource::<Messages<AudioCmd>>();
    world.init_resource::<Messages<InputEvent>>();
    world
}

fn spawn(world: &mut World, object: MapObject) -> Entity {
    let entity = {
        let mut commands = world.commands();
        object.spawn(&mut commands)
    };
    world.flush();
    entity
}

fn run<M>(world: &mut World, system: impl IntoScheduleConfigs<ScheduleSystem, M>) {
    let mut schedule = Schedule::default();
    schedule.add_systems(system);
    schedule.run(world);
}

fn sounds(world: &mut World) -> Vec<AudioCmd> {
    world.resource_mut::<Messages<AudioCmd>>().drain().collect()
}

// ==================== STEPPING ====================

#[test]
fn enemy_snaps_to_wall_and_turns_around() {
    let mut grid = TileGrid::default_room();
    grid.set_cell(4, 5, solid());
    let mut world = make_world(grid);
    let enemy = spawn(&mut world, MapObject::mushroom(5, 5).moving_left());
    world.resource_mut::<Roster>().enemies.push(enemy);

    run(&mut world, update_enemies);

    let body = world.get::<PhysicsBody>(enemy).unwrap();
    assert!(approx_eq(body.position.x, 88.0));
    assert!(body.facing_right);
    let controls = world.get::<Controls>(enemy).unwrap();
    assert!(controls.right && !controls.left);
}

#[test]
fn projectile_is_removed_past_the_right_edge() {
    let mut world = make_world(TileGrid::default_room());
    let mut rng = fastrand::Rng::with_seed(1);
    let shot = spawn(
        &mut world,
        MapObject::projectile(Vector2::new(100.0, 100.0), true, &mut rng),
    );
    world.resource_mut::<Roster>().projectiles.push(shot);

    // 100 + 40 * 5 = 300 still fits under 320 - 16.
    for _ in 0..40 {
        run(&mut world, update_projectiles);
    }
    assert!(!world.get::<PhysicsBody>(shot).unwrap().is_pending_removal());

    run(&mut world, update_projectiles);
    let body = world.get::<PhysicsBody>(shot).unwrap();
    assert!(body.is_pending_removal());
    assert!(approx_eq(body.position.x, 304.0));

    run(&mut world, sweep_removed);
    assert!(world.resource::<Roster>().projectiles.is_empty());
    assert!(world.get_entity(shot).is_err());
}

// ==================== INTERACTIONS ====================

fn door_scene() -> (World, Entity) {
    let mut world = make_world(TileGrid::default_room());
    let door = spawn(
        &mut world,
        MapObject::door(5, 5).with_action(InteractAction::Teleport(LevelId::Level2)),
    );
    let player = spawn(
        &mut world,
        MapObject::player(5, 5).with_controls(Controls {
            up: true,
            ..Controls::default()
        }),
    );
    let mut roster = world.resource_mut::<Roster>();
    roster.interactables.push(door);
    roster.player = Some(player);
    (world, player)
}

#[test]
fn teleport_without_key_does_nothing() {
    let (mut world, _) = door_scene();
    run(&mut world, update_interactables);
    assert_eq!(world.resource_mut::<NextLevel>().take(), None);
    assert!(sounds(&mut world).is_empty());
}

#[test]
fn teleport_with_key_switches_level() {
    let (mut world, _) = door_scene();
    world.resource_mut::<RunProgress>().add(Item::Key);
    run(&mut world, update_interactables);
    assert_eq!(
        world.resource_mut::<NextLevel>().take(),
        Some(LevelRequest::Switch(LevelId::Level2))
    );
    assert_eq!(sounds(&mut world), vec![AudioCmd::fx(SoundId::Door)]);
}

#[test]
fn teleport_can_stop_level_music() {
    let (mut world, _) = door_scene();
    world.resource_mut::<RunProgress>().add(Item::Key);
    world.insert_resource(LevelRules {
        teleport_stops_music: Some(MusicId::Overworld),
        ..LevelRules::default()
    });
    run(&mut world, update_interactables);
    assert_eq!(
        sounds(&mut world),
        vec![
            AudioCmd::fx(SoundId::Door),
            AudioCmd::stop_music(MusicId::Overworld)
        ]
    );
}

#[test]
fn key_pickup_is_consumed_and_swept() {
    let mut world = make_world(TileGrid::default_room());
    let key = spawn(&mut world, MapObject::key(3, 3));
    let player = spawn(
        &mut world,
        MapObject::player(3, 3).with_controls(Controls {
            up: true,
            ..Controls::default()
        }),
    );
    {
        let mut roster = world.resource_mut::<Roster>();
        roster.interactables.push(key);
        roster.player = Some(player);
    }

    run(&mut world, update_interactables);
    assert!(world.resource::<RunProgress>().has(Item::Key));
    assert_eq!(sounds(&mut world), vec![AudioCmd::fx(SoundId::Pickup)]);

    run(&mut world, sweep_removed);
    assert!(world.resource::<Roster>().interactables.is_empty());
}

#[test]
fn damaging_hazard_kills_player_without_up() {
    let mut world = make_world(TileGrid::default_room());
    let spike = spawn(
        &mut world,
        MapObject::spike(6, 6).with_action(InteractAction::Damage),
    );
    let player = spawn(&mut world, MapObject::player(6, 6));
    {
        let mut roster = world.resource_mut::<Roster>();
        roster.interactables.push(spike);
        roster.player = Some(player);
    }

    run(&mut world, update_interactables);
    assert!(!world.get::<PhysicsBody>(player).unwrap().is_alive());
    // Hazards do not count deaths.
    assert_eq!(world.resource::<RunProgress>().get(Counter::Deaths), 0);
}

// ==================== COMBAT ====================

fn shot_at(world: &mut World, x: f32, y: f32) -> Entity {
    let mut rng = fastrand::Rng::with_seed(3);
    let shot = spawn(
        world,
        MapObject::projectile(Vector2::new(x, y), true, &mut rng),
    );
    world.resource_mut::<Roster>().projectiles.push(shot);
    shot
}

#[test]
fn kill_and_score_are_counted_once() {
    let mut world = make_world(TileGrid::default_room());
    let mut enemy = MapObject::mushroom(8, 8);
    enemy.body.hp = 1;
    let enemy = spawn(&mut world, enemy);
    world.resource_mut::<Roster>().enemies.push(enemy);
    let first = shot_at(&mut world, 136.0, 136.0);
    let second = shot_at(&mut world, 137.0, 136.0);

    run(&mut world, resolve_combat);
    run(&mut world, resolve_combat);

    let progress = world.resource::<RunProgress>();
    assert_eq!(progress.get(Counter::Kills), 1);
    assert_eq!(progress.get(Counter::Score), 10_000);
    assert!(!world.get::<PhysicsBody>(first).unwrap().is_alive());
    // The second shot found the enemy already dead.
    assert!(world.get::<PhysicsBody>(second).unwrap().is_alive());
    assert_eq!(
        sounds(&mut world),
        vec![AudioCmd::fx(SoundId::Boom), AudioCmd::fx(SoundId::EnemyDeath)]
    );
}

#[test]
fn non_lethal_hit_flashes() {
    let mut world = make_world(TileGrid::default_room());
    let enemy = spawn(&mut world, MapObject::tank(8, 8));
    world.resource_mut::<Roster>().enemies.push(enemy);
    shot_at(&mut world, 136.0, 136.0);

    run(&mut world, resolve_combat);

    let body = world.get::<PhysicsBody>(enemy).unwrap();
    assert!(body.is_alive());
    assert_eq!(body.hp, 7);
    assert!(body.hit_flash);
    assert_eq!(world.resource::<RunProgress>().get(Counter::Kills), 0);
}

#[test]
fn enemy_contact_kills_player_once() {
    let mut world = make_world(TileGrid::default_room());
    let enemy = spawn(&mut world, MapObject::mushroom(4, 4));
    let player = spawn(&mut world, MapObject::player(4, 4));
    {
        let mut roster = world.resource_mut::<Roster>();
        roster.enemies.push(enemy);
        roster.player = Some(player);
    }

    run(&mut world, resolve_combat);
    run(&mut world, resolve_combat);

    assert!(!world.get::<PhysicsBody>(player).unwrap().is_alive());
    assert_eq!(world.resource::<RunProgress>().get(Counter::Deaths), 1);
    assert_eq!(sounds(&mut world), vec![AudioCmd::fx(SoundId::Death)]);
}

#[test]
fn boss_defeat_spawns_the_reward() {
    let mut world = make_world(TileGrid::default_room());
    let mut boss = MapObject::boss(10, 8).with_reward(boss_reward());
    boss.body.hp = 1;
    let boss = spawn(&mut world, boss);
    world.resource_mut::<Roster>().enemies.push(boss);
    shot_at(&mut world, 168.0, 136.0);

    run(&mut world, resolve_combat);

    let roster = world.resource::<Roster>().clone();
    assert_eq!(roster.interactables.len(), 2);
    let door = world.get::<PhysicsBody>(roster.interactables[0]).unwrap();
    assert!(approx_eq(door.position.x, 8.0 * 16.0 + 8.0));
    assert!(approx_eq(door.position.y, 14.0 * 16.0 + 8.0));
    assert!(world.get::<OnDefeat>(boss).is_some());
    assert_eq!(world.resource::<RunProgress>().get(Counter::Score), 1_000_000);
    assert_eq!(
        sounds(&mut world),
        vec![
            AudioCmd::fx(SoundId::Boom),
            AudioCmd::fx(SoundId::EnemyDeath),
            AudioCmd::stop_music(MusicId::Boss),
            AudioCmd::fx(SoundId::BossDeath),
        ]
    );
}

#[test]
fn sweep_keeps_removed_enemies() {
    let mut world = make_world(TileGrid::default_room());
    let mut enemy = MapObject::mushroom(2, 2);
    enemy.body.kill();
    enemy.body.mark_for_removal();
    let enemy = spawn(&mut world, enemy);
    world.resource_mut::<Roster>().enemies.push(enemy);

    run(&mut world, sweep_removed);

    assert_eq!(world.resource::<Roster>().enemies, vec![enemy]);
    assert!(world.get_entity(enemy).is_ok());
}

#[test]
fn fired_shot_spawns_ahead_of_player_and_shakes() {
    let mut world = make_world(TileGrid::default_room());
    let mut player = MapObject::player(5, 5);
    player.behavior = Behavior::Player(PlayerGun {
        spawn_projectile: true,
        ..PlayerGun::default()
    });
    let player = spawn(&mut world, player);
    world.resource_mut::<Roster>().player = Some(player);

    run(&mut world, spawn_projectile);

    let shot = world.resource::<Roster>().projectiles[0];
    let body = world.get::<PhysicsBody>(shot).unwrap();
    assert!(approx_eq(body.position.x, 92.0));
    assert!(approx_eq(body.position.y, 90.0));
    assert!(world.resource::<LevelSignals>().has_flag(SHAKE_SCREEN));
}

// ==================== RETRY ====================

fn retry_blueprint(s: &mut Spawner) {
    s.enemy(MapObject::mushroom(3, 3).moving_left());
    s.player(MapObject::player(1, 1));
}

#[test]
fn fire_after_death_rebuilds_the_level() {
    let mut world = make_world(TileGrid::default_room());
    world.insert_resource(LevelBlueprint(retry_blueprint));
    let mut dead = MapObject::player(9, 9);
    dead.body.kill();
    dead.body.mark_for_removal();
    let dead = spawn(&mut world, dead);
    world.resource_mut::<Roster>().player = Some(dead);
    world.resource_mut::<RunProgress>().add_point(Counter::Deaths);

    world
        .resource_mut::<Messages<InputEvent>>()
        .write(InputEvent::press(InputAction::Fire));
    run(&mut world, apply_player_input);

    let roster = world.resource::<Roster>().clone();
    let player = roster.player.unwrap();
    assert_ne!(player, dead);
    assert!(world.get_entity(dead).is_err());
    assert!(world.get::<PhysicsBody>(player).unwrap().is_alive());
    assert_eq!(roster.enemies.len(), 1);
    assert_eq!(world.resource::<RunProgress>().get(Counter::Deaths), 1);
    assert_eq!(sounds(&mut world), vec![AudioCmd::fx(SoundId::Spawn)]);
}

#[test]
fn other_keys_are_ignored_while_dead() {
    let mut world = make_world(TileGrid::default_room());
    world.insert_resource(LevelBlueprint(retry_blueprint));
    let mut dead = MapObject::player(9, 9);
    dead.body.kill();
    dead.body.mark_for_removal();
    let dead = spawn(&mut world, dead);
    world.resource_mut::<Roster>().player = Some(dead);

    world
        .resource_mut::<Messages<InputEvent>>()
        .write(InputEvent::press(InputAction::Left));
    run(&mut world, apply_player_input);

    assert_eq!(world.resource::<Roster>().player, Some(dead));
    assert!(!world.get::<Controls>(dead).unwrap().left);
}

// ==================== LEVEL MANAGER ====================

#[test]
fn switching_leaves_one_active_level() {
    let (tx, rx) = crossbeam_channel::unbounded();
    let assets = std::env::temp_dir().join("datacore-integration-no-assets");
    let mut manager = LevelManager::new(LevelServices::new(tx, assets));
    let _ = rx.try_iter().count();

    manager.set_state(LevelId::Level4);
    assert_eq!(manager.active(), LevelId::Level4);
    assert!(manager.is_loaded(LevelId::Loading));
    assert!(!manager.is_loaded(LevelId::Menu));
    assert_eq!(manager.loaded_count(), 2);
    let sent: Vec<AudioCmd> = rx.try_iter().collect();
    assert!(sent.contains(&AudioCmd::music(MusicId::Underworld)));
    assert!(sent.contains(&AudioCmd::fx(SoundId::Spawn)));

    manager.set_state(LevelId::Info);
    assert!(!manager.is_loaded(LevelId::Level4));
    assert_eq!(manager.active(), LevelId::Info);
}

#[test]
fn info_fire_returns_to_menu() {
    let (tx, _rx) = crossbeam_channel::unbounded();
    let assets = std::env::temp_dir().join("datacore-integration-no-assets");
    let mut manager = LevelManager::new(LevelServices::new(tx, assets));
    manager.set_state(LevelId::Info);

    manager.update(&[InputEvent::press(InputAction::Fire)], 0.1);

    assert_eq!(manager.active(), LevelId::Menu);
    assert!(!manager.should_quit());
}
