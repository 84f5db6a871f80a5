//! Game systems.
//!
//! Level systems step map objects, settle combat and record drawing; the
//! frontend systems poll input and present frames.
//!
//! Submodules overview
//! - [`audio`] – the audio thread and the message bridges around it
//! - [`combat`] – projectile spawning, hit resolution and the removal sweep
//! - [`controls`] – keyboard events to player controls, retry after death
//! - [`input`] – poll raylib into [`crate::resources::input::InputState`]
//! - [`layers`] – parallax scrolling
//! - [`mapobjects`] – per-variant stepping of map objects and interactions
//! - [`motion`] – acceleration, jump and fall rules
//! - [`present`] – replay the draw list onto the window
//! - [`render`] – record the playfield, map objects and HUD
//! - [`screens`] – menu, info and closing screens
//! - [`tilecollision`] – body vs. tile-grid resolution
//! - [`time`] – advance the frontend clock

pub mod audio;
pub mod combat;
pub mod controls;
pub mod input;
pub mod layers;
pub mod mapobjects;
pub mod motion;
pub mod present;
pub mod render;
pub mod screens;
pub mod tilecollision;
pub mod time;
