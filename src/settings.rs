//! Game settings and preferences
//!
//! Read once at startup from `flappy_gopher.json` in the working directory.
//! Any field may be omitted; a missing or unreadable file means defaults.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Window ===
    pub window_title: String,
    /// Fixed; the simulation is tied to the screen size
    pub window_width: u32,
    pub window_height: u32,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Simulation ===
    /// Fixed RNG seed; a fresh one per run when absent
    pub seed: Option<u64>,
    /// Autopilot plays the game
    pub idle_mode: bool,
    /// Frames simulated by the headless demo run
    pub demo_frames: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_title: "flappy gopher".to_owned(),
            window_width: SCREEN_WIDTH as u32,
            window_height: SCREEN_HEIGHT as u32,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            seed: None,
            // The headless host has no player input
            idle_mode: true,
            demo_frames: 3600,
        }
    }
}

impl Settings {
    /// Settings file name, relative to the working directory
    pub const FILE_NAME: &'static str = "flappy_gopher.json";

    /// Parse settings from JSON; omitted fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid settings JSON")
    }

    /// Effective volume for every sound effect player
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0) * self.sfx_volume.clamp(0.0, 1.0)
        }
    }

    /// Load settings from the working directory
    pub fn load() -> Self {
        Self::load_from(Path::new(Self::FILE_NAME))
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) => {
                log::info!("Using default settings ({}: {})", path.display(), err);
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("Ignoring {}: {:#}", path.display(), err);
                Self::default()
            }
        }
    }
}
