//! Player-adjustable settings
//!
//! Persisted as JSON next to the executable; missing or corrupt files fall
//! back to defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Frame-rate cap presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FpsCap {
    Thirty,
    #[default]
    Sixty,
    OneTwenty,
}

impl FpsCap {
    pub fn as_fps(&self) -> u32 {
        match self {
            FpsCap::Thirty => 30,
            FpsCap::Sixty => 60,
            FpsCap::OneTwenty => 120,
        }
    }

    pub fn from_fps(fps: u32) -> Option<Self> {
        match fps {
            30 => Some(FpsCap::Thirty),
            60 => Some(FpsCap::Sixty),
            120 => Some(FpsCap::OneTwenty),
            _ => None,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    // === Driving ===
    /// Base car speed (1 - 50)
    pub car_speed: u32,
    /// Steering sensitivity multiplier (0.1 - 5.0)
    pub steering_sensitivity: f32,
    /// Brake sensitivity step (1 - 10); higher reacts to a smaller palm
    pub brake_sensitivity: u32,

    // === Spawning ===
    /// Traffic spawn interval in frames (5 - 120, steps of 5)
    pub spawn_frequency: u32,

    // === Display ===
    /// Frame-rate cap
    pub max_fps: FpsCap,
    /// Show the camera preview overlay
    pub show_camera: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            car_speed: 10,
            steering_sensitivity: 1.0,
            brake_sensitivity: 3,
            spawn_frequency: 60,
            max_fps: FpsCap::Sixty,
            show_camera: true,
        }
    }
}

impl Settings {
    /// Clamp every field into its valid range
    ///
    /// Applied after loading so hand-edited files cannot produce
    /// out-of-range values.
    pub fn sanitized(mut self) -> Self {
        self.car_speed = self.car_speed.clamp(1, 50);
        self.steering_sensitivity = self.steering_sensitivity.clamp(0.1, 5.0);
        self.brake_sensitivity = self.brake_sensitivity.clamp(1, 10);
        self.spawn_frequency = (self.spawn_frequency.clamp(5, 120) / 5) * 5;
        self
    }

    /// Palm-open detection margin derived from brake sensitivity
    pub fn brake_threshold(&self) -> f32 {
        0.07 - 0.01 * self.brake_sensitivity as f32
    }

    /// Load from a JSON file, defaulting on any failure
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<Settings>(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings.sanitized()
                }
                Err(err) => {
                    log::warn!("Corrupt settings file {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save as pretty-printed JSON
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
