//! Game configuration resource.
//!
//! Settings come from an INI file. Every value has a safe default, so a
//! missing file or key never stops the game from starting.
//!
//! # Configuration File Format
//!
//! ```ini
//! [window]
//! scale = 2
//! tick_rate = 60
//!
//! [assets]
//! root = ./assets
//! ```

use std::path::PathBuf;
use std::time::Duration;

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;

/// Default safe values for startup
const DEFAULT_SCALE: u32 = 2;
const DEFAULT_TICK_RATE: u32 = 60;
const DEFAULT_ASSETS_ROOT: &str = "./assets";
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    /// Integer upscale from the 320x256 playfield to the window.
    pub scale: u32,
    /// Fixed updates per second.
    pub tick_rate: u32,
    /// Directory holding `map/`, `sheet/` and `sound/`.
    pub assets_root: PathBuf,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            tick_rate: DEFAULT_TICK_RATE,
            assets_root: PathBuf::from(DEFAULT_ASSETS_ROOT),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing or non-positive values keep their current value.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [window] section
        if let Some(scale) = config.getuint("window", "scale").ok().flatten() {
            if scale > 0 {
                self.scale = scale as u32;
            }
        }
        if let Some(rate) = config.getuint("window", "tick_rate").ok().flatten() {
            if rate > 0 {
                self.tick_rate = rate as u32;
            }
        }

        // [assets] section
        if let Some(root) = config.get("assets", "root") {
            if !root.trim().is_empty() {
                self.assets_root = PathBuf::from(root.trim());
            }
        }

        info!(
            "Loaded config: scale={}, tick_rate={}, assets={:?}",
            self.scale, self.tick_rate, self.assets_root
        );

        Ok(())
    }

    /// Apply the display scale given on the command line, if it is valid.
    pub fn apply_scale_arg(&mut self, arg: Option<&str>) {
        if let Some(scale) = arg.and_then(parse_scale) {
            self.scale = scale;
        }
    }

    /// Window size in pixels.
    pub fn window_size(&self, width: i32, height: i32) -> (i32, i32) {
        (width * self.scale as i32, height * self.scale as i32)
    }

    /// Duration of one fixed tick.
    pub fn frame_duration(&self) -> Duration {
        Duration::from_millis(1000 / self.tick_rate.max(1) as u64)
    }
}

/// A display scale is a positive integer; anything else is rejected.
pub fn parse_scale(s: &str) -> Option<u32> {
    s.trim().parse::<u32>().ok().filter(|&v| v > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let cfg = GameConfig::new();
        assert_eq!(cfg.scale, 2);
        assert_eq!(cfg.tick_rate, 60);
        assert_eq!(cfg.frame_duration(), Duration::from_millis(16));
        assert_eq!(cfg.window_size(320, 256), (640, 512));
    }

    #[test]
    fn parse_scale_rejects_garbage() {
        assert_eq!(parse_scale("3"), Some(3));
        assert_eq!(parse_scale(" 4 "), Some(4));
        assert_eq!(parse_scale("0"), None);
        assert_eq!(parse_scale("-2"), None);
        assert_eq!(parse_scale("big"), None);
    }

    #[test]
    fn cli_scale_overrides_only_when_valid() {
        let mut cfg = GameConfig::new();
        cfg.apply_scale_arg(Some("nope"));
        assert_eq!(cfg.scale, 2);
        cfg.apply_scale_arg(Some("5"));
        assert_eq!(cfg.scale, 5);
        cfg.apply_scale_arg(None);
        assert_eq!(cfg.scale, 5);
    }

    #[test]
    fn load_from_file_reads_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[window]\nscale = 3\n\n[assets]\nroot = /data/core").unwrap();
        let mut cfg = GameConfig::with_path(file.path());
        cfg.load_from_file().unwrap();
        assert_eq!(cfg.scale, 3);
        assert_eq!(cfg.tick_rate, 60);
        assert_eq!(cfg.assets_root, PathBuf::from("/data/core"));
    }

    #[test]
    fn missing_file_is_an_error_and_keeps_defaults() {
        let mut cfg = GameConfig::with_path("/definitely/not/here.ini");
        assert!(cfg.load_from_file().is_err());
        assert_eq!(cfg.scale, 2);
    }
}
