//! ECS components for map objects.
//!
//! Every map object (player, enemies, projectiles, pickups, doors, hazards)
//! carries the same set: a [`physicsbody::PhysicsBody`], its
//! [`controls::Controls`], an [`animation::AnimationSet`] and a
//! [`behavior::Behavior`].
//!
//! Submodules overview:
//! - [`animation`] – frame-sequence clips and the per-object clip set
//! - [`behavior`] – the closed set of map-object variants and their extras
//! - [`controls`] – held-key state, from the keyboard or a spawn blueprint
//! - [`hitbox`] – integer hit-box centered on a body
//! - [`mapobject`] – prefabs bundling the components of each kind
//! - [`physicsbody`] – position, velocity, tuning and life-cycle flags

pub mod animation;
pub mod behavior;
pub mod controls;
pub mod hitbox;
pub mod mapobject;
pub mod physicsbody;
