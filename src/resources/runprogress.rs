//! Cross-level run totals and inventory.
//!
//! [`RunProgress`] outlives every level: the
//! [`LevelManager`](crate::game::LevelManager) owns it and lends it to the
//! active level as a resource while that level runs.

use bevy_ecs::prelude::Resource;

/// Counted totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Counter {
    Kills,
    Deaths,
    Score,
}

/// Inventory items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Item {
    Key,
    SlowFall,
}

#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct RunProgress {
    kills: u64,
    deaths: u64,
    score: u64,
    has_key: bool,
    has_slow_fall: bool,
}

impl RunProgress {
    pub fn new(kills: u64, deaths: u64, score: u64) -> Self {
        Self {
            kills,
            deaths,
            score,
            ..Self::default()
        }
    }

    pub fn add_point(&mut self, counter: Counter) {
        self.add_points(counter, 1);
    }

    pub fn add_points(&mut self, counter: Counter, points: u64) {
        let slot = match counter {
            Counter::Kills => &mut self.kills,
            Counter::Deaths => &mut self.deaths,
            Counter::Score => &mut self.score,
        };
        *slot = slot.saturating_add(points);
    }

    pub fn get(&self, counter: Counter) -> u64 {
        match counter {
            Counter::Kills => self.kills,
            Counter::Deaths => self.deaths,
            Counter::Score => self.score,
        }
    }

    pub fn add(&mut self, item: Item) {
        match item {
            Item::Key => self.has_key = true,
            Item::SlowFall => self.has_slow_fall = true,
        }
    }

    pub fn has(&self, item: Item) -> bool {
        match item {
            Item::Key => self.has_key,
            Item::SlowFall => self.has_slow_fall,
        }
    }

    /// Soft reset done on every level construction: only the key is lost.
    pub fn reset(&mut self) {
        self.has_key = false;
    }

    /// Start a new run.
    pub fn hard_reset(&mut self) {
        *self = Self::default();
    }
}
