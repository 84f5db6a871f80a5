//! Input and drawing for the non-playing screens: main menu, info page and
//! the closing pages.

use bevy_ecs::prelude::*;
use log::info;

use crate::events::audio::{AudioCmd, MusicId, SoundId};
use crate::events::input::{InputAction, InputEvent};
use crate::resources::audio::AudioSender;
use crate::resources::drawlist::DrawList;
use crate::resources::levelstate::{LevelId, NextLevel};
use crate::resources::menu::{MainMenu, MenuAction};
use crate::resources::pager::EndPager;
use crate::resources::tilegrid::TileGrid;

// ==================== MAIN MENU ====================

/// Up/down move the highlight, fire picks the option.
///
/// Picking plays the select sound straight through the audio sender and then
/// blocks for the menu's select delay, so the sound is heard before the switch.
pub fn menu_input(
    mut events: MessageReader<InputEvent>,
    mut menu: ResMut<MainMenu>,
    sender: Res<AudioSender>,
    mut next: ResMut<NextLevel>,
) {
    for event in events.read() {
        if !event.pressed {
            continue;
        }
        match event.action {
            InputAction::Down => {
                menu.next();
                let _ = sender.0.send(AudioCmd::fx(SoundId::MenuOption));
            }
            InputAction::Up => {
                menu.prev();
                let _ = sender.0.send(AudioCmd::fx(SoundId::MenuOption));
            }
            InputAction::Fire => {
                let selected = menu.selected;
                let Some(action) = menu.current().map(|o| o.action) else {
                    continue;
                };
                if selected != 0 && action != MenuAction::Quit {
                    let _ = sender.0.send(AudioCmd::stop_music(MusicId::MainMenu));
                }
                let _ = sender.0.send(AudioCmd::fx(SoundId::Select));
                std::thread::sleep(menu.select_delay);
                match action {
                    MenuAction::Goto(level) => {
                        info!("Menu selected {:?}", level);
                        next.set(level);
                    }
                    MenuAction::Quit => {
                        info!("Menu selected exit");
                        next.quit();
                    }
                }
                return;
            }
            _ => {}
        }
    }
}

/// Option labels centered on the room, with the marker on both sides of the
/// highlighted one.
pub fn render_menu_options(
    grid: Res<TileGrid>,
    mut menu: ResMut<MainMenu>,
    mut draw: ResMut<DrawList>,
) {
    let columns = grid.columns();
    let rows = grid.rows();
    let menu = &mut *menu;
    for (i, option) in menu.options.iter().enumerate() {
        let half_len = option.label.chars().count() as i32 / 2;
        let x = columns / 2 - half_len;
        let y = rows / 2 + i as i32;
        draw.text(option.label, x, y, 10);
        if i == menu.selected {
            let left = menu.marker.advance();
            draw.tile(left, (x - 1) * 16, y * 16);
            let right = menu.marker.advance();
            draw.tile(right, (columns / 2 + half_len) * 16, y * 16);
        }
    }
}

// ==================== INFO ====================

pub const INFO_LINES: [&str; 10] = [
    "Move left.......arrow left",
    "Move right......arrow right",
    "Jump............x, spacebar",
    "Fire............z, c",
    "Slowfall........up, while falling",
    "Pick up item....up",
    "Open door.......up",
    "",
    "Best played with controller.",
    "any joytokey converter should work.",
];

pub const BACK_TO_MENU: &str = "press fire for main menu";
pub const NEXT_PAGE: &str = "press jump for next page";

/// Fire goes back to the main menu.
pub fn info_input(mut events: MessageReader<InputEvent>, mut next: ResMut<NextLevel>) {
    for event in events.read() {
        if event.pressed && event.action == InputAction::Fire {
            next.set(LevelId::Menu);
        }
    }
}

pub fn render_info_page(mut draw: ResMut<DrawList>) {
    draw.text("Controls", 3, 4, 10);
    draw.small_text_lines(&INFO_LINES, 2, 6);
    draw.small_text(5, 14, BACK_TO_MENU, false, false);
}

// ==================== CLOSING PAGES ====================

pub const SHOWCASE_LABELS: [(i32, i32, &str); 8] = [
    (4, 5, "Ms Door"),
    (4, 7, "Mr Key"),
    (4, 9, "SlowFall"),
    (4, 11, "SpikR"),
    (4, 13, "Robot Overlord"),
    (14, 6, "Mush Mush"),
    (14, 8, "Tankzor"),
    (14, 11, "Sparkly Jr"),
];

pub const CREDITS: [&str; 20] = [
    "Credits",
    "",
    "Programming",
    "    Pumbaa aka Erik Holstensson",
    "",
    "Pixly Graphics",
    "    Pumbaa aka Erik Holstensson",
    "",
    "Cheeky Sound Effects",
    "    Pumbaa aka Erik Holstensson",
    "",
    "Awesome Music",
    "    Esau aka David Enheden",
    "",
    "All music used with permission from the",
    "creator.",
    "",
    "For more awesome music,",
    "visit www.amigatraktor.com",
    "",
];

pub const POEM: [&str; 14] = [
    "for every human still alive,",
    "a robot will be built,",
    "to kill the breed within the hive,",
    "and free the world of guilt.",
    "",
    "to live and prosper on this world,",
    "is the only goal,",
    "for all the humans still not hurled,",
    "down the fire hole.",
    "",
    "the robot lords will brutally kill,",
    "every fleshie still not burned,",
    "there are no more free will,",
    "when the humans are overturned.",
];

pub const MISSION: [&str; 13] = [
    "You are the robot overlord",
    "",
    "Your task is to dominate the",
    "world.",
    "",
    "To succeed in the mission, you",
    "have to complete the stages, and",
    "kill Sparlky Jr and his minions",
    "They are the only robots which",
    "still symphetize with the humans.",
    "",
    "Thank you for playing the game!",
    "Have a nice day!",
];

pub const END_PAGES: usize = 4;

/// Fire stops the closing music and goes to the menu; jump flips the page.
pub fn end_input(
    mut events: MessageReader<InputEvent>,
    mut pager: ResMut<EndPager>,
    mut next: ResMut<NextLevel>,
    mut audio: MessageWriter<AudioCmd>,
) {
    for event in events.read() {
        if !event.pressed {
            continue;
        }
        match event.action {
            InputAction::Fire => {
                audio.write(AudioCmd::stop_music(MusicId::End));
                next.set(LevelId::Menu);
            }
            InputAction::Jump => pager.next_page(),
            _ => {}
        }
    }
}

/// Run condition: the closing screen shows its entity showcase.
pub fn on_showcase_page(pager: Res<EndPager>) -> bool {
    pager.page() == 0
}

/// Text of the current closing page, then count the frame.
pub fn render_end_page(mut pager: ResMut<EndPager>, mut draw: ResMut<DrawList>) {
    match pager.page() {
        0 => {
            for (column, row, label) in SHOWCASE_LABELS {
                draw.small_text(column, row, label, false, false);
            }
        }
        1 => draw.small_text_lines(&CREDITS, 2, 3),
        2 => draw.small_text_lines(&POEM, 2, 4),
        3 => draw.small_text_lines(&MISSION, 2, 3),
        _ => {}
    }
    draw.small_text(5, 14, BACK_TO_MENU, false, false);
    draw.small_text(5, 14, NEXT_PAGE, false, true);
    if pager.page() == 3 {
        draw.text("TERMINATE ALL HUMANS!", 2, 11, 14);
    }
    pager.tick();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::drawlist::DrawCmd;
    use std::time::Duration;

    fn menu_world() -> (World, crossbeam_channel::Receiver<AudioCmd>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut world = World::new();
        world.insert_resource(MainMenu::new(Duration::ZERO));
        world.insert_resource(AudioSender(tx));
        world.insert_resource(NextLevel::new());
        world.init_resource::<Messages<InputEvent>>();
        (world, rx)
    }

    fn press(world: &mut World, action: InputAction) {
        world
            .resource_mut::<Messages<InputEvent>>()
            .write(InputEvent::press(action));
    }

    #[test]
    fn menu_wraps_and_plays_option_sound() {
        let (mut world, rx) = menu_world();
        press(&mut world, InputAction::Up);
        press(&mut world, InputAction::Up);
        let mut schedule = Schedule::default();
        schedule.add_systems(menu_input);
        schedule.run(&mut world);

        assert_eq!(world.resource::<MainMenu>().selected, 2);
        assert_eq!(rx.try_iter().count(), 2);
    }

    #[test]
    fn start_game_stops_menu_music_and_switches() {
        let (mut world, rx) = menu_world();
        press(&mut world, InputAction::Fire);
        let mut schedule = Schedule::default();
        schedule.add_systems(menu_input);
        schedule.run(&mut world);

        let sent: Vec<AudioCmd> = rx.try_iter().collect();
        assert_eq!(
            sent,
            vec![
                AudioCmd::stop_music(MusicId::MainMenu),
                AudioCmd::fx(SoundId::Select)
            ]
        );
        let next = world.resource_mut::<NextLevel>().take();
        assert_eq!(
            next,
            Some(crate::resources::levelstate::LevelRequest::Switch(
                LevelId::Level1
            ))
        );
    }

    #[test]
    fn info_keeps_menu_music() {
        let (mut world, rx) = menu_world();
        world.resource_mut::<MainMenu>().selected = 0;
        press(&mut world, InputAction::Fire);
        let mut schedule = Schedule::default();
        schedule.add_systems(menu_input);
        schedule.run(&mut world);

        let sent: Vec<AudioCmd> = rx.try_iter().collect();
        assert_eq!(sent, vec![AudioCmd::fx(SoundId::Select)]);
    }

    #[test]
    fn marker_frames_flank_the_selection() {
        let mut world = World::new();
        world.insert_resource(MainMenu::new(Duration::ZERO));
        world.insert_resource(TileGrid::default_room());
        world.insert_resource(DrawList::default());
        let mut schedule = Schedule::default();
        schedule.add_systems(render_menu_options);
        schedule.run(&mut world);

        // "START GAME": 10 glyphs at x = 10 - 5, markers at columns 4 and 15.
        let draw = world.resource::<DrawList>();
        let markers: Vec<i32> = draw
            .commands()
            .iter()
            .filter_map(|c| match *c {
                DrawCmd::Tile { image_id, x, .. } if (2..7).contains(&image_id) => Some(x),
                _ => None,
            })
            .collect();
        assert_eq!(markers, vec![4 * 16, 15 * 16]);
    }

    #[test]
    fn jump_flips_end_page() {
        let mut world = World::new();
        world.insert_resource(EndPager::new(END_PAGES));
        world.insert_resource(NextLevel::new());
        world.init_resource::<Messages<InputEvent>>();
        world.init_resource::<Messages<AudioCmd>>();
        press(&mut world, InputAction::Jump);
        let mut schedule = Schedule::default();
        schedule.add_systems(end_input);
        schedule.run(&mut world);
        assert_eq!(world.resource::<EndPager>().page(), 1);
    }
}
