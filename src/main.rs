//! Data Core entry point.
//!
//! A tile-based 2D platformer written in Rust using:
//! - **raylib** for windowing, graphics, and audio
//! - **bevy_ecs** for the frontend world and one world per level
//!
//! # Main Loop
//!
//! 1. Read `config.ini` and the optional display scale argument
//! 2. Open the window, load the tile sheets, create the render target
//! 3. Start the audio thread and preload every sound and track
//! 4. Build the level manager (loading screen, then main menu)
//! 5. Run at a fixed cadence: poll input, tick the active level, present,
//!    then sleep whatever is left of the tick
//! 6. Stop the audio thread on exit
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- 3
//! ```

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use std::path::PathBuf;
use std::time::Instant;

use bevy_ecs::prelude::*;
use clap::Parser;

use datacore::events::input::InputEvent;
use datacore::game::{self, LevelManager, LevelServices};
use datacore::resources::audio::{AudioBridge, preload_commands, setup_audio, shutdown_audio};
use datacore::resources::drawlist::DrawList;
use datacore::resources::gameconfig::GameConfig;
use datacore::resources::input::InputState;
use datacore::resources::levelrng::LevelRng;
use datacore::resources::rendertarget::RenderTarget;
use datacore::resources::screenshake::ScreenShake;
use datacore::resources::tilegrid::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
use datacore::resources::tilesheets::TileSheets;
use datacore::resources::worldtime::WorldTime;
use datacore::systems::audio::{log_audio_messages, poll_audio_messages, update_bevy_audio_messages};
use datacore::systems::input::{update_bevy_input_events, update_input_state};
use datacore::systems::present::present;
use datacore::systems::time::update_world_time;

/// Data Core
#[derive(Parser)]
#[command(version, about = "Data Core, a tile-based platformer.")]
struct Cli {
    /// Integer display scale of the 320x256 playfield.
    scale: Option<String>,

    /// Configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        log::warn!("{}; using defaults", e);
    }
    config.apply_scale_arg(cli.scale.as_deref());

    let (window_width, window_height) = config.window_size(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT);
    let (mut rl, thread) = raylib::init()
        .size(window_width, window_height)
        .title("Data Core")
        .build();
    // Quit is a game action, not raylib's exit key.
    rl.set_exit_key(None);

    let sheets = TileSheets::load_all(&mut rl, &thread, &config.assets_root);
    let render_target = match RenderTarget::new(
        &mut rl,
        &thread,
        PLAYFIELD_WIDTH as u32,
        PLAYFIELD_HEIGHT as u32,
    ) {
        Ok(target) => target,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    // --------------- Frontend world ---------------
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world.insert_resource(InputState::default());
    world.insert_resource(ScreenShake::default());
    world.insert_resource(LevelRng::default());
    world.insert_resource(DrawList::default());
    world.init_resource::<Messages<InputEvent>>();
    world.insert_non_send_resource(render_target);
    world.insert_non_send_resource(sheets);

    setup_audio(&mut world);
    let audio = world.resource::<AudioBridge>().tx_cmd.clone();
    for cmd in preload_commands(&config.assets_root) {
        let _ = audio.send(cmd);
    }

    let services = LevelServices::new(audio, config.assets_root.clone());
    world.insert_resource(LevelManager::new(services));
    let frame = config.frame_duration();
    world.insert_resource(config);

    world.insert_non_send_resource(rl);
    world.insert_non_send_resource(thread);

    let mut update = Schedule::default();
    update.add_systems(
        (
            update_input_state,
            game::update,
            present,
            update_bevy_input_events,
        )
            .chain(),
    );
    update.add_systems(
        (
            poll_audio_messages,
            log_audio_messages,
            update_bevy_audio_messages,
        )
            .chain(),
    );

    // --------------- Main loop ---------------
    let mut last = Instant::now();
    while !world
        .non_send_resource::<raylib::RaylibHandle>()
        .window_should_close()
        && !world.resource::<LevelManager>().should_quit()
    {
        let start = Instant::now();
        update_world_time(&mut world, start.duration_since(last).as_secs_f32());
        last = start;

        update.run(&mut world);

        // No catch-up: a late tick just starts the next one right away.
        std::thread::sleep(frame.saturating_sub(start.elapsed()));
    }

    shutdown_audio(&mut world);
}
