//! Screen shake applied when presenting the playfield.
//!
//! A shake lasts [`SHAKE_FRAMES`] frames of random offset, then the offset
//! settles back toward zero by [`SHAKE_RETURN`] pixels per frame.

use bevy_ecs::prelude::Resource;
use raylib::prelude::Vector2;

pub const SHAKE_FRAMES: u32 = 10;
/// Largest offset in pixels; offsets fall in `[-SHAKE_SCALE, 0)`.
pub const SHAKE_SCALE: f32 = 7.0;
pub const SHAKE_RETURN: f32 = 0.8;

#[derive(Resource, Debug, Clone, Default)]
pub struct ScreenShake {
    active: bool,
    timer: u32,
    offset: Vector2,
}

fn settle(v: f32) -> f32 {
    if v > 0.0 {
        (v - SHAKE_RETURN).max(0.0)
    } else if v < 0.0 {
        (v + SHAKE_RETURN).min(0.0)
    } else {
        0.0
    }
}

impl ScreenShake {
    /// Start (or restart) a shake.
    pub fn trigger(&mut self) {
        self.active = true;
        self.timer = SHAKE_FRAMES;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn offset(&self) -> Vector2 {
        self.offset
    }

    /// Advance one frame and return the offset to draw with.
    pub fn step(&mut self, rng: &mut fastrand::Rng) -> Vector2 {
        if self.active {
            self.offset = Vector2::new(
                (rng.f32() - 1.0) * SHAKE_SCALE,
                (rng.f32() - 1.0) * SHAKE_SCALE,
            );
            if self.timer > 0 {
                self.timer -= 1;
            } else {
                self.active = false;
            }
        } else {
            self.offset = Vector2::new(settle(self.offset.x), settle(self.offset.y));
        }
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shake_stays_in_range_then_settles() {
        let mut rng = fastrand::Rng::with_seed(7);
        let mut shake = ScreenShake::default();
        shake.trigger();
        for _ in 0..=SHAKE_FRAMES {
            let o = shake.step(&mut rng);
            assert!(o.x >= -SHAKE_SCALE && o.x <= 0.0);
            assert!(o.y >= -SHAKE_SCALE && o.y <= 0.0);
        }
        assert!(!shake.is_active());
        for _ in 0..10 {
            shake.step(&mut rng);
        }
        assert_eq!(shake.offset(), Vector2::zero());
    }

    #[test]
    fn idle_shake_does_nothing() {
        let mut rng = fastrand::Rng::with_seed(1);
        let mut shake = ScreenShake::default();
        assert_eq!(shake.step(&mut rng), Vector2::zero());
    }
}
