//! Level registry and the active-level tick.
//!
//! The [`LevelManager`] owns every loaded [`Level`] and the run's
//! [`RunProgress`]. Each tick it feeds the frontend's input to the active
//! level, runs its update schedule, applies any level switch the level asked
//! for, then runs the render schedule and hands back the recorded draw list.
//!
//! # Contract
//!
//! - At most one level besides `Loading` is registered at any time.
//! - Switching always passes through `Loading`: the previous level is
//!   released before the target is built, registered and activated.
//! - [`RunProgress`] lives in the manager and is lent to the active level's
//!   world for the length of a schedule run.

pub mod levels;

use std::path::PathBuf;
use std::time::Duration;

use bevy_ecs::prelude::*;
use crossbeam_channel::Sender;
use log::{debug, info};
use rustc_hash::FxHashMap;

use crate::events::audio::AudioCmd;
use crate::events::input::{InputAction, InputEvent};
use crate::resources::drawlist::{DrawCmd, DrawList};
use crate::resources::levelstate::{LevelId, LevelRequest, LevelSignals, NextLevel, SHAKE_SCREEN};
use crate::resources::runprogress::RunProgress;
use crate::resources::screenshake::ScreenShake;
use crate::resources::worldtime::WorldTime;

/// Pause after a main-menu selection, so the select sound is heard.
pub const MENU_SELECT_DELAY: Duration = Duration::from_millis(700);

/// Services a level needs while it is built and while it runs.
#[derive(Clone)]
pub struct LevelServices {
    pub audio: Sender<AudioCmd>,
    /// Directory holding `map/`, `sheet/` and `sound/`.
    pub assets: PathBuf,
    pub menu_select_delay: Duration,
}

impl LevelServices {
    pub fn new(audio: Sender<AudioCmd>, assets: impl Into<PathBuf>) -> Self {
        Self {
            audio,
            assets: assets.into(),
            menu_select_delay: MENU_SELECT_DELAY,
        }
    }

    pub fn with_menu_select_delay(mut self, delay: Duration) -> Self {
        self.menu_select_delay = delay;
        self
    }

    /// Fire-and-forget; a missing audio thread only means silence.
    pub fn send(&self, cmd: AudioCmd) {
        let _ = self.audio.send(cmd);
    }
}

/// One loaded level: its world and the two schedules that drive it.
pub struct Level {
    id: LevelId,
    world: World,
    update: Schedule,
    render: Schedule,
}

impl Level {
    pub fn new(id: LevelId, world: World, update: Schedule, render: Schedule) -> Self {
        Self {
            id,
            world,
            update,
            render,
        }
    }

    pub fn id(&self) -> LevelId {
        self.id
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Run one update tick with this tick's input and the run's progress.
    /// Returns the level switch the tick asked for, if any.
    pub fn update(
        &mut self,
        events: &[InputEvent],
        elapsed: f32,
        progress: &mut RunProgress,
    ) -> Option<LevelRequest> {
        {
            let mut time = self.world.resource_mut::<WorldTime>();
            time.delta = elapsed - time.elapsed;
            time.elapsed = elapsed;
            time.frame_count += 1;
        }
        self.world
            .resource_mut::<Messages<InputEvent>>()
            .write_batch(events.iter().copied());

        self.world.insert_resource(std::mem::take(progress));
        self.update.run(&mut self.world);
        *progress = self
            .world
            .remove_resource::<RunProgress>()
            .unwrap_or_default();

        self.world.resource_mut::<NextLevel>().take()
    }

    /// Run the render schedule and return what it recorded.
    pub fn render(&mut self, progress: &mut RunProgress) -> Vec<DrawCmd> {
        self.world.insert_resource(std::mem::take(progress));
        self.render.run(&mut self.world);
        *progress = self
            .world
            .remove_resource::<RunProgress>()
            .unwrap_or_default();
        self.world.resource_mut::<DrawList>().take()
    }

    /// True once per shake the level asked for.
    pub fn take_shake(&mut self) -> bool {
        self.world
            .get_resource_mut::<LevelSignals>()
            .map(|mut s| s.take_flag(SHAKE_SCREEN))
            .unwrap_or(false)
    }
}

/// Registry of loaded levels with a single active one.
#[derive(Resource)]
pub struct LevelManager {
    services: LevelServices,
    levels: FxHashMap<LevelId, Level>,
    active: LevelId,
    progress: RunProgress,
    quit: bool,
}

impl LevelManager {
    /// Build the loading screen, then the main menu.
    pub fn new(services: LevelServices) -> Self {
        let mut manager = Self {
            services,
            levels: FxHashMap::default(),
            active: LevelId::Loading,
            progress: RunProgress::default(),
            quit: false,
        };
        let loading = levels::build(LevelId::Loading, &manager.services, &mut manager.progress);
        manager.levels.insert(LevelId::Loading, loading);
        manager.set_state(LevelId::Menu);
        manager
    }

    /// Switch to `target`: build it while the loading level is active, then
    /// release the level that was active before.
    pub fn set_state(&mut self, target: LevelId) {
        if target == LevelId::Loading {
            debug!("Ignoring switch to the loading level");
            return;
        }
        let previous = self.active;
        self.active = LevelId::Loading;

        info!("Building level {:?} (code {})", target, target.code());
        let level = levels::build(target, &self.services, &mut self.progress);
        if previous != LevelId::Loading
            && previous != target
            && self.levels.remove(&previous).is_some()
        {
            debug!("Released level {:?}", previous);
        }
        // Re-entering the active level replaces it.
        self.levels.insert(target, level);
        self.active = target;
    }

    pub fn active(&self) -> LevelId {
        self.active
    }

    pub fn is_loaded(&self, id: LevelId) -> bool {
        self.levels.contains_key(&id)
    }

    /// Number of registered levels, the loading screen included.
    pub fn loaded_count(&self) -> usize {
        self.levels.len()
    }

    pub fn level(&self, id: LevelId) -> Option<&Level> {
        self.levels.get(&id)
    }

    pub fn level_mut(&mut self, id: LevelId) -> Option<&mut Level> {
        self.levels.get_mut(&id)
    }

    pub fn progress(&self) -> &RunProgress {
        &self.progress
    }

    pub fn progress_mut(&mut self) -> &mut RunProgress {
        &mut self.progress
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    /// Update the active level with this tick's input, then apply whatever
    /// switch it requested.
    pub fn update(&mut self, events: &[InputEvent], elapsed: f32) {
        if events
            .iter()
            .any(|e| e.pressed && e.action == InputAction::Quit)
        {
            info!("Quit key pressed");
            self.quit = true;
            return;
        }
        let active = self.active;
        let Some(level) = self.levels.get_mut(&active) else {
            return;
        };
        match level.update(events, elapsed, &mut self.progress) {
            Some(LevelRequest::Switch(target)) => self.set_state(target),
            Some(LevelRequest::Quit) => {
                info!("Level {:?} asked to quit", active);
                self.quit = true;
            }
            None => {}
        }
    }

    pub fn render(&mut self) -> Vec<DrawCmd> {
        let active = self.active;
        match self.levels.get_mut(&active) {
            Some(level) => level.render(&mut self.progress),
            None => Vec::new(),
        }
    }

    pub fn take_shake(&mut self) -> bool {
        let active = self.active;
        self.levels
            .get_mut(&active)
            .map(|level| level.take_shake())
            .unwrap_or(false)
    }
}

/// Frontend system: run the active level for one tick and keep its drawing.
pub fn update(
    mut manager: ResMut<LevelManager>,
    mut events: MessageReader<InputEvent>,
    time: Res<WorldTime>,
    mut shake: ResMut<ScreenShake>,
    mut draw: ResMut<DrawList>,
) {
    let events: Vec<InputEvent> = events.read().copied().collect();
    manager.update(&events, time.elapsed);
    if manager.should_quit() {
        return;
    }
    if manager.take_shake() {
        shake.trigger();
    }
    draw.clear();
    for cmd in manager.render() {
        draw.push(cmd);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::audio::SoundId;
    use crate::resources::runprogress::Item;

    fn services() -> (LevelServices, crossbeam_channel::Receiver<AudioCmd>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        let dir = std::env::temp_dir().join("datacore-missing-assets");
        (
            LevelServices::new(tx, dir).with_menu_select_delay(Duration::ZERO),
            rx,
        )
    }

    #[test]
    fn starts_on_menu_with_loading_registered() {
        let (services, _rx) = services();
        let manager = LevelManager::new(services);
        assert_eq!(manager.active(), LevelId::Menu);
        assert!(manager.is_loaded(LevelId::Loading));
        assert_eq!(manager.loaded_count(), 2);
    }

    #[test]
    fn switching_releases_previous_level() {
        let (services, _rx) = services();
        let mut manager = LevelManager::new(services);
        manager.set_state(LevelId::Level1);
        assert_eq!(manager.active(), LevelId::Level1);
        assert!(!manager.is_loaded(LevelId::Menu));
        assert_eq!(manager.loaded_count(), 2);
        // Level 1 starts a fresh run holding the key.
        assert!(manager.progress().has(Item::Key));
    }

    #[test]
    fn reentering_a_level_rebuilds_it() {
        let (services, rx) = services();
        let mut manager = LevelManager::new(services);
        manager.set_state(LevelId::Level2);
        let _ = rx.try_iter().count();

        manager.set_state(LevelId::Level2);
        assert_eq!(manager.active(), LevelId::Level2);
        assert_eq!(manager.loaded_count(), 2);
        // The fresh build spawns the player again.
        assert!(rx.try_iter().any(|cmd| cmd == AudioCmd::fx(SoundId::Spawn)));
    }

    #[test]
    fn loading_target_is_ignored() {
        let (services, _rx) = services();
        let mut manager = LevelManager::new(services);
        manager.set_state(LevelId::Loading);
        assert_eq!(manager.active(), LevelId::Menu);
    }

    #[test]
    fn quit_key_stops_the_game() {
        let (services, _rx) = services();
        let mut manager = LevelManager::new(services);
        manager.update(&[InputEvent::press(InputAction::Quit)], 0.016);
        assert!(manager.should_quit());
    }

    #[test]
    fn progress_survives_a_tick() {
        let (services, _rx) = services();
        let mut manager = LevelManager::new(services);
        manager.set_state(LevelId::Level2);
        manager.progress_mut().add(Item::SlowFall);
        manager.update(&[], 0.016);
        let _ = manager.render();
        assert!(manager.progress().has(Item::SlowFall));
    }
}
