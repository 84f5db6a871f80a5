//! Level catalogue: rooms, layers, music, placements and schedules.
//!
//! [`build`] constructs a ready-to-run [`Level`] for any [`LevelId`]. Every
//! construction soft-resets the run (the key is lost); level 1 starts a new
//! run and hands out the key.

use std::path::{Path, PathBuf};

use bevy_ecs::prelude::*;
use log::debug;
use raylib::prelude::Vector2;

use crate::components::behavior::{InteractAction, InteractableKind, OnDefeat, RewardSpawn};
use crate::components::controls::Controls;
use crate::components::mapobject::MapObject;
use crate::events::audio::{AudioCmd, MusicId};
use crate::events::input::InputEvent;
use crate::game::{Level, LevelServices};
use crate::resources::audio::AudioSender;
use crate::resources::blueprint::{LevelBlueprint, Spawner};
use crate::resources::drawlist::DrawList;
use crate::resources::levelrng::LevelRng;
use crate::resources::levelrules::LevelRules;
use crate::resources::levelstate::{LevelId, LevelSignals, NextLevel};
use crate::resources::menu::MainMenu;
use crate::resources::pager::EndPager;
use crate::resources::parallax::{LayerSlot, Parallax, ParallaxLayer};
use crate::resources::roster::Roster;
use crate::resources::runprogress::{Item, RunProgress};
use crate::resources::tilegrid::TileGrid;
use crate::resources::worldtime::WorldTime;
use crate::systems::audio::{forward_audio_cmds, update_bevy_audio_cmds};
use crate::systems::combat::{resolve_combat, spawn_projectile, sweep_removed};
use crate::systems::controls::apply_player_input;
use crate::systems::input::update_bevy_input_events;
use crate::systems::layers::{update_back_layers, update_front_layers};
use crate::systems::mapobjects::{
    update_enemies, update_interactables, update_player, update_projectiles,
};
use crate::systems::render::{
    render_back_layers, render_background_only, render_boss_hp, render_front_layers, render_hud,
    render_map_objects, render_playground,
};
use crate::systems::screens::{
    END_PAGES, end_input, info_input, menu_input, on_showcase_page, render_end_page,
    render_info_page, render_menu_options,
};

/// Path of a room document: `<assets>/map/<room>.json`.
pub fn room_path(assets: &Path, room: &str) -> PathBuf {
    assets.join("map").join(format!("{room}.json"))
}

struct LayerSpec {
    slot: LayerSlot,
    room: &'static str,
    velocity: (f32, f32),
}

const fn layer(slot: LayerSlot, room: &'static str, velocity: (f32, f32)) -> LayerSpec {
    LayerSpec {
        slot,
        room,
        velocity,
    }
}

/// How a level runs and draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Playing,
    Menu,
    Info,
    TheEnd,
    Loading,
}

/// Static description of a level.
struct Stage {
    screen: Screen,
    room: &'static str,
    layers: &'static [LayerSpec],
    music: Option<MusicId>,
    rules: LevelRules,
    blueprint: fn(&mut Spawner),
}

static OVERWORLD_1: [LayerSpec; 3] = [
    layer(LayerSlot::Background, "level1/backgroundbluesky", (0.0, 0.0)),
    layer(LayerSlot::Background, "level1/backgroundsun", (0.0, 0.0)),
    layer(LayerSlot::BehindObjects, "level1/backgroundclouds", (0.025, 0.0)),
];

static OVERWORLD_2: [LayerSpec; 3] = [
    layer(LayerSlot::Background, "level2/backgroundbluesky", (0.0, 0.0)),
    layer(LayerSlot::Background, "level2/backgroundsun", (0.0, 0.0)),
    layer(LayerSlot::BehindObjects, "level2/backgroundclouds", (0.025, 0.0)),
];

static OVERWORLD_3: [LayerSpec; 3] = [
    layer(LayerSlot::Background, "level3/backgroundbluesky", (0.0, 0.0)),
    layer(LayerSlot::Background, "level3/backgroundsun", (0.0, 0.0)),
    layer(LayerSlot::BehindObjects, "level3/backgroundclouds", (0.025, 0.0)),
];

static CAVE_4: [LayerSpec; 1] = [layer(LayerSlot::Background, "level4/backgroundcave", (0.0, 0.0))];
static CAVE_5: [LayerSpec; 1] = [layer(LayerSlot::Background, "level5/backgroundcave", (0.0, 0.0))];
static CAVE_6: [LayerSpec; 1] = [layer(LayerSlot::Background, "level6/backgroundcave", (0.0, 0.0))];

static MENU_LAYERS: [LayerSpec; 3] = [
    layer(LayerSlot::Background, "menu/backgroundbluesky", (0.0, 0.0)),
    layer(LayerSlot::Background, "menu/backgroundsun", (0.0, 0.0)),
    layer(LayerSlot::Foreground, "menu/backgroundclouds", (0.25, 0.0)),
];

static INFO_LAYERS: [LayerSpec; 1] = [layer(LayerSlot::Background, "info/backgroundnight", (0.0, 0.05))];
static END_LAYERS: [LayerSpec; 1] = [layer(LayerSlot::Background, "theend/backgroundnight", (0.0, 0.05))];

fn playing(
    room: &'static str,
    layers: &'static [LayerSpec],
    music: Option<MusicId>,
    blueprint: fn(&mut Spawner),
) -> Stage {
    Stage {
        screen: Screen::Playing,
        room,
        layers,
        music,
        rules: LevelRules::default(),
        blueprint,
    }
}

fn stage(id: LevelId) -> Stage {
    match id {
        LevelId::Level1 => playing("level1/level1", &OVERWORLD_1, Some(MusicId::Overworld), level1),
        LevelId::Level2 => playing("level2/level2", &OVERWORLD_2, None, level2),
        LevelId::Level3 => Stage {
            rules: LevelRules {
                teleport_stops_music: Some(MusicId::Overworld),
                ..LevelRules::default()
            },
            ..playing("level3/level3", &OVERWORLD_3, None, level3)
        },
        LevelId::Level4 => playing("level4/level4", &CAVE_4, Some(MusicId::Underworld), level4),
        LevelId::Level5 => Stage {
            rules: LevelRules {
                teleport_stops_music: Some(MusicId::Underworld),
                ..LevelRules::default()
            },
            ..playing("level5/level5", &CAVE_5, None, level5)
        },
        LevelId::Level6 => Stage {
            rules: LevelRules {
                hide_removed_enemies: true,
                boss_hp_bar: true,
                ..LevelRules::default()
            },
            ..playing("level6/level6", &CAVE_6, Some(MusicId::Boss), level6)
        },
        LevelId::Menu => Stage {
            screen: Screen::Menu,
            room: "menu/playground",
            layers: &MENU_LAYERS,
            music: Some(MusicId::MainMenu),
            rules: LevelRules::default(),
            blueprint: empty,
        },
        LevelId::Info => Stage {
            screen: Screen::Info,
            room: "info/backgroundnight",
            layers: &INFO_LAYERS,
            music: None,
            rules: LevelRules::default(),
            blueprint: empty,
        },
        LevelId::TheEnd => Stage {
            screen: Screen::TheEnd,
            room: "theend/theend",
            layers: &END_LAYERS,
            music: Some(MusicId::End),
            rules: LevelRules::default(),
            blueprint: showcase,
        },
        LevelId::Loading => Stage {
            screen: Screen::Loading,
            room: "loading/loading",
            layers: &[],
            music: None,
            rules: LevelRules::default(),
            blueprint: empty,
        },
    }
}

/// Construct level `id`, adjusting `progress` the way entering it does.
pub fn build(id: LevelId, services: &LevelServices, progress: &mut RunProgress) -> Level {
    let stage = stage(id);

    progress.reset();
    if id == LevelId::Level1 {
        progress.hard_reset();
        progress.add(Item::Key);
    }

    let grid = TileGrid::load_or_default(room_path(&services.assets, stage.room));
    let mut parallax = Parallax::default();
    for spec in stage.layers {
        let layer_grid = TileGrid::load_or_default(room_path(&services.assets, spec.room));
        let (vx, vy) = spec.velocity;
        parallax.push(
            spec.slot,
            ParallaxLayer::new(layer_grid).with_velocity(Vector2::new(vx, vy)),
        );
    }

    let mut world = World::new();
    world.insert_resource(grid);
    world.insert_resource(parallax);
    world.insert_resource(WorldTime::default());
    world.insert_resource(NextLevel::new());
    world.insert_resource(LevelSignals::default());
    world.insert_resource(stage.rules);
    world.insert_resource(DrawList::default());
    world.insert_resource(LevelRng::default());
    world.insert_resource(AudioSender(services.audio.clone()));
    world.init_resource::<Messages<InputEvent>>();
    world.init_resource::<Messages<AudioCmd>>();
    match stage.screen {
        Screen::Menu => {
            world.insert_resource(MainMenu::new(services.menu_select_delay));
        }
        Screen::TheEnd => {
            world.insert_resource(EndPager::new(END_PAGES));
        }
        _ => {}
    }

    let blueprint = LevelBlueprint(stage.blueprint);
    let mut roster = Roster::default();
    let sounds = {
        let mut commands = world.commands();
        blueprint.spawn(&mut commands, &mut roster, progress)
    };
    world.flush();
    debug!(
        "Level {:?}: {} enemies, {} interactables",
        id,
        roster.enemies.len(),
        roster.interactables.len()
    );
    world.insert_resource(roster);
    world.insert_resource(blueprint);

    if let Some(music) = stage.music {
        services.send(AudioCmd::music(music));
    }
    for cmd in sounds {
        services.send(cmd);
    }

    let (update, render) = schedules(stage.screen);
    Level::new(id, world, update, render)
}

fn schedules(screen: Screen) -> (Schedule, Schedule) {
    let mut update = Schedule::default();
    let mut render = Schedule::default();
    match screen {
        Screen::Playing => {
            update.add_systems(
                (
                    update_back_layers,
                    apply_player_input,
                    update_interactables,
                    update_enemies,
                    update_player,
                    update_projectiles,
                    spawn_projectile,
                    resolve_combat,
                    sweep_removed,
                    update_front_layers,
                    forward_audio_cmds,
                    update_bevy_audio_cmds,
                    update_bevy_input_events,
                )
                    .chain(),
            );
            render.add_systems(
                (
                    render_back_layers,
                    render_playground,
                    render_map_objects,
                    render_front_layers,
                    render_hud,
                    render_boss_hp,
                )
                    .chain(),
            );
        }
        Screen::Menu => {
            update.add_systems(
                (
                    update_back_layers,
                    menu_input,
                    update_front_layers,
                    forward_audio_cmds,
                    update_bevy_audio_cmds,
                    update_bevy_input_events,
                )
                    .chain(),
            );
            render.add_systems(
                (
                    render_back_layers,
                    render_playground,
                    render_menu_options,
                    render_front_layers,
                )
                    .chain(),
            );
        }
        Screen::Info => {
            update.add_systems(
                (
                    update_back_layers,
                    info_input,
                    forward_audio_cmds,
                    update_bevy_audio_cmds,
                    update_bevy_input_events,
                )
                    .chain(),
            );
            render.add_systems((render_background_only, render_info_page, render_hud).chain());
        }
        Screen::TheEnd => {
            update.add_systems(
                (
                    update_back_layers,
                    end_input,
                    update_front_layers,
                    forward_audio_cmds,
                    update_bevy_audio_cmds,
                    update_bevy_input_events,
                )
                    .chain(),
            );
            render.add_systems(
                (
                    render_back_layers,
                    render_playground,
                    render_map_objects.run_if(on_showcase_page),
                    render_end_page,
                    render_front_layers,
                    render_hud,
                )
                    .chain(),
            );
        }
        Screen::Loading => {
            update.add_systems(update_bevy_input_events);
            render.add_systems(render_playground);
        }
    }
    (update, render)
}

// ==================== PLACEMENTS ====================

fn empty(_: &mut Spawner) {}

fn door_to(column: i32, row: i32, target: LevelId) -> MapObject {
    MapObject::door(column, row).with_action(InteractAction::Teleport(target))
}

fn damaging_spike(column: i32, row: i32) -> MapObject {
    MapObject::spike(column, row).with_action(InteractAction::Damage)
}

fn level1(s: &mut Spawner) {
    s.interactable(door_to(18, 12, LevelId::Level2));
    s.enemy(MapObject::mushroom(13, 14).moving_left());
    s.player(MapObject::player(1, 11));
}

fn level2(s: &mut Spawner) {
    s.interactable(door_to(16, 14, LevelId::Level3));
    s.interactable(MapObject::key(18, 6));
    if !s.progress().has(Item::SlowFall) {
        s.interactable(MapObject::slow_fall(1, 10));
    }
    for (column, row) in [(7, 8), (8, 8), (11, 8), (12, 8)] {
        s.interactable(damaging_spike(column, row));
    }
    s.enemy(MapObject::mushroom(1, 1).moving_right());
    s.enemy(MapObject::mushroom(4, 4).moving_left());
    s.enemy(MapObject::mushroom(8, 10).moving_right());
    s.player(MapObject::player(18, 12));
}

fn level3(s: &mut Spawner) {
    s.interactable(door_to(9, 13, LevelId::Level4));
    s.interactable(MapObject::key(1, 7));
    s.enemy(MapObject::mushroom(1, 7));
    s.enemy(MapObject::mushroom(3, 12).moving_right());
    s.enemy(MapObject::mushroom(4, 4).moving_right());
    s.enemy(MapObject::mushroom(8, 8).moving_right());
    s.enemy(MapObject::tank(8, 8).moving_left());
    s.player(MapObject::player(16, 14));
}

fn level4(s: &mut Spawner) {
    s.interactable(door_to(18, 13, LevelId::Level5));
    s.interactable(MapObject::key(1, 10));
    s.interactable(damaging_spike(10, 8));
    s.enemy(MapObject::mushroom(8, 10).moving_left());
    s.enemy(MapObject::tank(6, 6).moving_right());
    s.enemy(MapObject::tank(14, 6).moving_left());
    s.enemy(MapObject::tank(8, 12).moving_left());
    s.enemy(MapObject::mushroom(1, 6));
    s.player(MapObject::player(9, 13));
}

fn level5(s: &mut Spawner) {
    s.interactable(door_to(18, 14, LevelId::Level6));
    s.interactable(MapObject::key(2, 3));
    for column in [10, 11, 12] {
        s.interactable(MapObject::spike(column, 6));
    }
    s.enemy(MapObject::mushroom(3, 3));
    s.enemy(MapObject::mushroom(3, 3).moving_left());
    s.enemy(MapObject::tank(14, 5).moving_right());
    s.enemy(MapObject::tank(10, 8).moving_left());
    s.enemy(MapObject::tank(16, 5).moving_right());
    s.enemy(MapObject::tank(8, 10).moving_right());
    s.player(MapObject::player(18, 13));
}

/// What the arena hands out when the boss goes down.
pub fn boss_reward() -> OnDefeat {
    OnDefeat {
        stop_music: Some(MusicId::Boss),
        spawns: vec![
            RewardSpawn {
                kind: InteractableKind::Door,
                tile: (8, 14),
                action: InteractAction::Teleport(LevelId::TheEnd),
            },
            RewardSpawn {
                kind: InteractableKind::Key,
                tile: (11, 4),
                action: InteractAction::GrantKey,
            },
        ],
    }
}

fn level6(s: &mut Spawner) {
    let controls = Controls {
        left: true,
        up: true,
        ..Controls::default()
    };
    s.enemy(
        MapObject::boss(10, 8)
            .with_controls(controls)
            .with_reward(boss_reward()),
    );
    s.player(MapObject::player(18, 14));
}

/// One of every kind, standing still next to its name.
fn showcase(s: &mut Spawner) {
    s.interactable(MapObject::door(2, 5));
    s.interactable(MapObject::key(2, 7));
    s.interactable(MapObject::slow_fall(2, 9));
    s.interactable(MapObject::spike(2, 11));
    s.player(MapObject::player(2, 13));
    s.enemy(MapObject::mushroom(12, 6).moving_left());
    s.enemy(MapObject::tank(12, 8).moving_right());
    s.enemy(MapObject::boss(11, 11).moving_right());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::levelstate::LevelRequest;
    use std::time::Duration;

    fn services() -> (LevelServices, crossbeam_channel::Receiver<AudioCmd>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        let dir = std::env::temp_dir().join("datacore-no-such-assets");
        (
            LevelServices::new(tx, dir).with_menu_select_delay(Duration::ZERO),
            rx,
        )
    }

    #[test]
    fn room_paths_live_under_map() {
        let p = room_path(Path::new("assets"), "level1/level1");
        assert_eq!(p, Path::new("assets").join("map").join("level1/level1.json"));
    }

    #[test]
    fn level1_starts_a_new_run_with_the_key() {
        let (services, rx) = services();
        let mut progress = RunProgress::new(3, 4, 5);
        progress.add(Item::SlowFall);
        let level = build(LevelId::Level1, &services, &mut progress);
        assert_eq!(progress.get(crate::resources::runprogress::Counter::Kills), 0);
        assert!(progress.has(Item::Key));
        assert!(!progress.has(Item::SlowFall));

        let sent: Vec<AudioCmd> = rx.try_iter().collect();
        assert_eq!(sent[0], AudioCmd::music(MusicId::Overworld));
        let roster = level.world().resource::<Roster>();
        assert!(roster.player.is_some());
        assert_eq!(roster.enemies.len(), 1);
        assert_eq!(roster.interactables.len(), 1);
    }

    #[test]
    fn other_levels_drop_the_key_only() {
        let (services, _rx) = services();
        let mut progress = RunProgress::new(1, 0, 100);
        progress.add(Item::Key);
        progress.add(Item::SlowFall);
        let level = build(LevelId::Level2, &services, &mut progress);
        assert!(!progress.has(Item::Key));
        assert!(progress.has(Item::SlowFall));
        // Owned slow-fall is not placed again.
        assert_eq!(level.world().resource::<Roster>().interactables.len(), 6);
    }

    #[test]
    fn boss_arena_rules() {
        let (services, _rx) = services();
        let mut progress = RunProgress::default();
        let level = build(LevelId::Level6, &services, &mut progress);
        let rules = level.world().resource::<LevelRules>();
        assert!(rules.boss_hp_bar);
        assert!(rules.hide_removed_enemies);
        let roster = level.world().resource::<Roster>();
        let boss = roster.enemies[0];
        assert!(level.world().get::<OnDefeat>(boss).is_some());
    }

    #[test]
    fn menu_fire_switches_to_level1() {
        let (services, _rx) = services();
        let mut progress = RunProgress::default();
        let mut level = build(LevelId::Menu, &services, &mut progress);
        let request = level.update(
            &[InputEvent::press(crate::events::input::InputAction::Fire)],
            0.016,
            &mut progress,
        );
        assert_eq!(request, Some(LevelRequest::Switch(LevelId::Level1)));
    }

    #[test]
    fn loading_renders_its_room_only() {
        let (services, _rx) = services();
        let mut progress = RunProgress::default();
        let mut level = build(LevelId::Loading, &services, &mut progress);
        assert_eq!(level.update(&[], 0.016, &mut progress), None);
        // The fallback room is empty, so nothing is drawn.
        assert!(level.render(&mut progress).is_empty());
    }
}
