//! Level identity and level-switch requests.
//!
//! Systems inside a level never switch levels directly; they record the wish
//! in [`NextLevel`] and the [`LevelManager`](crate::game::LevelManager) applies
//! it once the tick is over.

use bevy_ecs::prelude::Resource;
use rustc_hash::FxHashSet;

/// Every level the game knows about, with its stable numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelId {
    Menu,
    Level1,
    Level2,
    Level3,
    Level4,
    Level5,
    Level6,
    Info,
    TheEnd,
    /// Transit state while a level is being constructed.
    Loading,
}

impl LevelId {
    pub const ALL: [LevelId; 10] = [
        LevelId::Menu,
        LevelId::Level1,
        LevelId::Level2,
        LevelId::Level3,
        LevelId::Level4,
        LevelId::Level5,
        LevelId::Level6,
        LevelId::Info,
        LevelId::TheEnd,
        LevelId::Loading,
    ];

    pub const fn code(self) -> u8 {
        match self {
            LevelId::Menu => 0,
            LevelId::Level1 => 10,
            LevelId::Level2 => 11,
            LevelId::Level3 => 12,
            LevelId::Level4 => 13,
            LevelId::Level5 => 14,
            LevelId::Level6 => 15,
            LevelId::Info => 97,
            LevelId::TheEnd => 98,
            LevelId::Loading => 99,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.code() == code)
    }
}

/// What a level asks the manager to do after the tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelRequest {
    Switch(LevelId),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NextLevels {
    #[default]
    Unchanged,
    Pending(LevelRequest),
}

/// Intent to leave the current level.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Default)]
pub struct NextLevel {
    next: NextLevels,
}

impl NextLevel {
    pub fn new() -> Self {
        Self {
            next: NextLevels::Unchanged,
        }
    }

    pub fn get(&self) -> &NextLevels {
        &self.next
    }

    /// Request a switch to `level`. A later request in the same tick wins.
    pub fn set(&mut self, level: LevelId) {
        self.next = NextLevels::Pending(LevelRequest::Switch(level));
    }

    pub fn quit(&mut self) {
        self.next = NextLevels::Pending(LevelRequest::Quit);
    }

    pub fn reset(&mut self) {
        self.next = NextLevels::Unchanged;
    }

    /// Return the pending request, if any, and reset to unchanged.
    pub fn take(&mut self) -> Option<LevelRequest> {
        match std::mem::take(&mut self.next) {
            NextLevels::Pending(req) => Some(req),
            NextLevels::Unchanged => None,
        }
    }
}

/// Flag name raised when the screen should shake.
pub const SHAKE_SCREEN: &str = "shake_screen";

/// Presence-only flags a level raises for the frontend.
#[derive(Resource, Debug, Clone, Default)]
pub struct LevelSignals {
    flags: FxHashSet<String>,
}

impl LevelSignals {
    pub fn set_flag(&mut self, key: impl Into<String>) {
        self.flags.insert(key.into());
    }

    pub fn has_flag(&self, key: &str) -> bool {
        self.flags.contains(key)
    }

    pub fn clear_flag(&mut self, key: &str) {
        self.flags.remove(key);
    }

    /// Clear the flag and report whether it was set.
    pub fn take_flag(&mut self, key: &str) -> bool {
        self.flags.remove(key)
    }
}
