//! Main-menu state: the option list, the highlighted entry and its marker.

use std::time::Duration;

use bevy_ecs::prelude::Resource;

use crate::components::animation::AnimationClip;
use crate::resources::levelstate::LevelId;

/// What choosing an option does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Goto(LevelId),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOption {
    pub label: &'static str,
    pub action: MenuAction,
}

#[derive(Resource, Debug, Clone)]
pub struct MainMenu {
    pub options: Vec<MenuOption>,
    pub selected: usize,
    pub marker: AnimationClip,
    /// Pause after a selection before the level switch.
    pub select_delay: Duration,
}

impl MainMenu {
    pub fn new(select_delay: Duration) -> Self {
        Self {
            options: vec![
                MenuOption {
                    label: "GAME  INFO",
                    action: MenuAction::Goto(LevelId::Info),
                },
                MenuOption {
                    label: "START GAME",
                    action: MenuAction::Goto(LevelId::Level1),
                },
                MenuOption {
                    label: "EXIT  GAME",
                    action: MenuAction::Quit,
                },
            ],
            selected: 1,
            marker: AnimationClip::from_range(2, 5).with_delay(15),
            select_delay,
        }
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % self.options.len().max(1);
    }

    pub fn prev(&mut self) {
        let len = self.options.len().max(1);
        self.selected = (self.selected + len - 1) % len;
    }

    pub fn current(&self) -> Option<&MenuOption> {
        self.options.get(self.selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_start_game_and_wraps() {
        let mut menu = MainMenu::new(Duration::ZERO);
        assert_eq!(menu.current().unwrap().label, "START GAME");
        menu.next();
        menu.next();
        assert_eq!(menu.selected, 0);
        menu.prev();
        assert_eq!(menu.current().unwrap().action, MenuAction::Quit);
    }
}
