//! Message types exchanged between the frontend, the levels and the audio
//! thread.
//!
//! Submodules:
//! - [`audio`] – commands and notifications for the background audio thread
//! - [`input`] – logical input actions and their press/release messages
pub mod audio;
pub mod input;
