//! Frame-sequence animation clips.
//!
//! An [`AnimationClip`] is advanced once per *render* call: the frame shown is
//! the frame after advancing. The delay counter counts advances and moves to the
//! next frame when it reaches the clip's delay limit.
//!
//! [`AnimationSet`] groups the clips an entity can show, keyed by
//! [`AnimKey`], and remembers which one is current.

use bevy_ecs::prelude::Component;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Delay limit used when a clip does not set one.
pub const DEFAULT_DELAY_LIMIT: u32 = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    frames: SmallVec<[i32; 8]>,
    current: usize,
    delay: u32,
    delay_limit: u32,
    looping: bool,
    played_once: bool,
}

impl AnimationClip {
    /// Clip over an explicit list of sheet frames. An empty list shows frame 0.
    pub fn from_frames(frames: &[i32]) -> Self {
        let mut list: SmallVec<[i32; 8]> = SmallVec::from_slice(frames);
        if list.is_empty() {
            list.push(0);
        }
        Self {
            frames: list,
            current: 0,
            delay: 0,
            delay_limit: DEFAULT_DELAY_LIMIT,
            looping: true,
            played_once: false,
        }
    }

    /// Clip over `count` consecutive frames starting at `first`.
    pub fn from_range(first: i32, count: i32) -> Self {
        let frames: SmallVec<[i32; 8]> = (0..count.max(1)).map(|i| first + i).collect();
        Self::from_frames(&frames)
    }

    pub fn with_delay(mut self, delay_limit: u32) -> Self {
        self.delay_limit = delay_limit.max(1);
        self
    }

    /// Play the clip a single time and hold the last frame.
    pub fn once(mut self) -> Self {
        self.looping = false;
        self
    }

    /// Advance one tick and return the frame to draw.
    pub fn advance(&mut self) -> i32 {
        self.delay += 1;
        if self.delay >= self.delay_limit {
            self.current += 1;
            if self.current >= self.frames.len() {
                if self.looping {
                    self.current %= self.frames.len();
                } else {
                    self.current = self.frames.len() - 1;
                    self.played_once = true;
                }
            }
            self.delay = 0;
        }
        self.frame()
    }

    /// Frame at the current position, without advancing.
    pub fn frame(&self) -> i32 {
        self.frames[self.current]
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn delay_limit(&self) -> u32 {
        self.delay_limit
    }

    pub fn has_played_once(&self) -> bool {
        self.played_once
    }

    /// Rewind to the first frame and clear the played-once mark.
    /// The delay counter keeps its value.
    ///
    /// This also clears `played_once`, so a once clip has to play through
    /// again before [`AnimationClip::has_played_once`] reports true.
    pub fn reset(&mut self) {
        self.current = 0;
        self.played_once = false;
    }
}

/// Named clip slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimKey {
    Left,
    Right,
    Standby,
    StandbyLeft,
    StandbyRight,
    Death,
}

/// The clips of one entity plus the one currently shown.
#[derive(Component, Debug, Clone)]
pub struct AnimationSet {
    clips: FxHashMap<AnimKey, AnimationClip>,
    current: AnimKey,
}

impl AnimationSet {
    /// A set showing `clip` under `key`.
    pub fn new(key: AnimKey, clip: AnimationClip) -> Self {
        let mut clips = FxHashMap::default();
        clips.insert(key, clip);
        Self {
            clips,
            current: key,
        }
    }

    pub fn with(mut self, key: AnimKey, clip: AnimationClip) -> Self {
        self.clips.insert(key, clip);
        self
    }

    pub fn current(&self) -> AnimKey {
        self.current
    }

    pub fn clip(&self, key: AnimKey) -> Option<&AnimationClip> {
        self.clips.get(&key)
    }

    /// Switch to a movement clip and rewind every other clip except the death clip.
    pub fn select_motion(&mut self, key: AnimKey) {
        self.current = key;
        for (k, clip) in self.clips.iter_mut() {
            if *k != key && *k != AnimKey::Death {
                clip.reset();
            }
        }
    }

    /// Switch clips without touching the others.
    pub fn select(&mut self, key: AnimKey) {
        self.current = key;
    }

    /// Advance the current clip and return the frame to draw.
    /// Missing clips draw frame 0.
    pub fn advance(&mut self) -> i32 {
        self.clips
            .get_mut(&self.current)
            .map(|c| c.advance())
            .unwrap_or(0)
    }

    /// True when the clip under `key` exists and has played through once.
    pub fn has_played_once(&self, key: AnimKey) -> bool {
        self.clips
            .get(&key)
            .map(|c| c.has_played_once())
            .unwrap_or(false)
    }
}
