// Configuration - TOML-backed emulator and input settings
//
// Loaded from `famicore.toml` next to the working directory; missing or
// unparseable files fall back to defaults so the emulator always starts.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
const CONFIG_FILE: &str = "famicore.toml";

/// Emulator configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EmulatorConfig {
    pub video: VideoSettings,
    pub audio: AudioSettings,
    pub input: InputConfig,
}

/// Video settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoSettings {
    /// Integer window scale (1-8)
    pub scale: u32,
    /// Enable VSync pacing in the window host
    pub vsync: bool,
}

impl Default for VideoSettings {
    fn default() -> Self {
        VideoSettings {
            scale: 3,
            vsync: true,
        }
    }
}

/// Audio settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioSettings {
    pub enabled: bool,
    /// Output gain (0.0-1.0)
    pub volume: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        AudioSettings {
            enabled: true,
            volume: 1.0,
        }
    }
}

/// Keyboard mapping for player 1, stored as winit KeyCode names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub button_a: String,
    pub button_b: String,
    pub select: String,
    pub start: String,
    pub up: String,
    pub down: String,
    pub left: String,
    pub right: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            button_a: "KeyX".into(),
            button_b: "KeyZ".into(),
            select: "ShiftRight".into(),
            start: "Enter".into(),
            up: "ArrowUp".into(),
            down: "ArrowDown".into(),
            left: "ArrowLeft".into(),
            right: "ArrowRight".into(),
        }
    }
}

impl EmulatorConfig {
    /// Load the default config file, falling back to defaults
    pub fn load_or_default() -> Self {
        Self::load_from(CONFIG_FILE)
    }

    /// Load a specific config file, falling back to defaults
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => toml::from_str(&text).unwrap_or_else(|err| {
                eprintln!("config parse error, using defaults: {}", err);
                EmulatorConfig::default()
            }),
            Err(_) => EmulatorConfig::default(),
        }
    }

    /// Write the config back out
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let text = toml::to_string_pretty(self)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
        fs::write(path, text)
    }

    pub fn default_path() -> PathBuf {
        PathBuf::from(CONFIG_FILE)
    }
}
