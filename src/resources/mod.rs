//! ECS resources made available to systems.
//!
//! Level worlds hold the room, its layers, the entity roster and the run
//! progress lent by the level manager; the frontend world holds input state,
//! raylib handles and the audio bridge.
//!
//! Overview
//! - `audio` – bridge and channels for the background audio thread
//! - `blueprint` – a level's entity placement, replayed on retry
//! - `drawlist` – recorded draw commands and the tile font
//! - `gameconfig` – INI configuration with safe defaults
//! - `input` – per-frame keyboard state of the logical actions
//! - `levelrng` – seedable random source
//! - `levelrules` – per-level tweaks of the shared pipeline
//! - `levelstate` – level ids, switch requests and level signals
//! - `menu` – main-menu options and marker
//! - `pager` – page flipping of the closing screens
//! - `parallax` – scrolling tile layers
//! - `rendertarget` – fixed-resolution framebuffer
//! - `roster` – spawn-ordered entity lists
//! - `runprogress` – cross-level totals and inventory
//! - `screenshake` – presentation offset after a shot
//! - `tilegrid` – the room grid and its loader
//! - `tilesheets` – tile sheet textures
//! - `worldtime` – wall-clock time and tick count
pub mod audio;
pub mod blueprint;
pub mod drawlist;
pub mod gameconfig;
pub mod input;
pub mod levelrng;
pub mod levelrules;
pub mod levelstate;
pub mod menu;
pub mod pager;
pub mod parallax;
pub mod rendertarget;
pub mod roster;
pub mod runprogress;
pub mod screenshake;
pub mod tilegrid;
pub mod tilesheets;
pub mod worldtime;
