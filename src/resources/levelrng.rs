use bevy_ecs::prelude::Resource;

/// Random source of a level. Seeded explicitly in tests.
#[derive(Resource, Debug, Clone)]
pub struct LevelRng(pub fastrand::Rng);

impl Default for LevelRng {
    fn default() -> Self {
        Self(fastrand::Rng::new())
    }
}

impl LevelRng {
    pub fn with_seed(seed: u64) -> Self {
        Self(fastrand::Rng::with_seed(seed))
    }
}
