//! Data Core library.
//!
//! This module exposes the game's ECS components, resources, systems, and
//! events, plus the level manager, for the binary and the integration tests.

pub mod components;
pub mod events;
pub mod game;
pub mod resources;
pub mod systems;
