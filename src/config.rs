//! Optional settings file loaded from `backdrop.yaml` beside the executable.
//!
//! Every field has a default, so the demo runs with no file at all. Nothing
//! is ever written back.

use std::{fs, path::Path};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Mirror log lines to stderr and drop the level filter to everything.
    pub debug: bool,
    /// Minimum level written to the log file: "info", "warn" or "error".
    pub log_level: String,
    /// Bind into the wallpaper layer immediately on startup.
    pub wallpaper_on_start: bool,
    /// Sleep between frames of the demo loop.
    pub tick_sleep_ms: u64,
    pub locator: LocatorSettings,
    pub windowed: WindowedSettings,
}

/// Tunables for the worker-surface handshake.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LocatorSettings {
    /// Timeout for the spawn message sent to Progman.
    pub spawn_timeout_ms: u32,
    /// Pause between settle-poll searches for the worker sibling.
    pub settle_poll_ms: u64,
    /// Total searches before giving up. The shell creates the worker
    /// asynchronously; raise this on machines where binding is flaky.
    pub settle_attempts: u32,
}

/// Geometry the render window returns to when wallpaper mode is disengaged.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowedSettings {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            debug: false,
            log_level: "info".to_string(),
            wallpaper_on_start: true,
            tick_sleep_ms: 16,
            locator: LocatorSettings::default(),
            windowed: WindowedSettings::default(),
        }
    }
}

impl Default for LocatorSettings {
    fn default() -> Self {
        Self {
            spawn_timeout_ms: 1000,
            settle_poll_ms: 25,
            settle_attempts: 8,
        }
    }
}

impl Default for WindowedSettings {
    fn default() -> Self {
        Self {
            x: 100,
            y: 100,
            width: 800,
            height: 450,
        }
    }
}

impl AppConfig {
    /// Parse the config file, or `None` when it is missing or malformed;
    /// callers fall back to defaults either way.
    pub fn load(path: &Path) -> Option<Self> {
        let raw = fs::read_to_string(path).ok()?;
        serde_yaml::from_str(&raw).ok()
    }
}
