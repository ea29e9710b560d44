//! Data-driven game tuning
//!
//! Everything the hazard engine and road model consume comes through
//! `GameConfig` so variants (spawn rates, lane bias, map borders) stay
//! declarative rather than hard-coded in the managers.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Lane-selection policy used when spawning a hazard class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpawnLaneBias {
    /// Uniformly random lane
    #[default]
    Uniform,
    /// Always the middle lane (`lane_count / 2`)
    Middle,
}

/// Per-map road border override
///
/// Background art disagrees about where the visually-correct road edges sit,
/// so each map may override the nominal road borders either in absolute
/// pixels or as a ratio of the window width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderOverride {
    Pixels { left: i32, right: i32 },
    WidthRatio { left: f32, right: f32 },
}

impl BorderOverride {
    /// Resolve to absolute pixel borders for the given window width
    pub fn resolve(&self, window_width: i32) -> (f32, f32) {
        match *self {
            BorderOverride::Pixels { left, right } => (left as f32, right as f32),
            BorderOverride::WidthRatio { left, right } => (
                left * window_width as f32,
                right * window_width as f32,
            ),
        }
    }
}

/// One background map with its optional border override
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapProfile {
    pub name: String,
    #[serde(default)]
    pub border: Option<BorderOverride>,
}

/// Spawn/kinematics tuning for one hazard class
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardTuning {
    /// Frames between spawn attempts (clamped to at least 1)
    pub spawn_frequency: u32,
    /// Maximum simultaneous active hazards of this class
    pub max_active: usize,
    /// Fraction of lane width the hazard occupies
    pub lane_width_ratio: f32,
    /// Width floor in pixels after scaling
    pub min_size: u32,
    /// Minimum horizontal inset from lane boundaries
    pub min_padding: i32,
    /// Spawn-y jitter above the screen, inclusive range
    pub jitter_min: i32,
    pub jitter_max: i32,
    /// Lane-selection policy for this class
    #[serde(default)]
    pub lane_bias: SpawnLaneBias,
    /// Re-clamp spawn x to the active map borders
    #[serde(default)]
    pub clamp_to_borders: bool,
}

impl HazardTuning {
    pub fn spawn_frequency(&self) -> u32 {
        self.spawn_frequency.max(1)
    }
}

/// A true/false question entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrueFalseEntry {
    pub prompt: String,
    pub answer: bool,
}

/// A multiple-choice question entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultipleChoiceEntry {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_index: usize,
}

/// Complete game tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub traffic: HazardTuning,
    pub crack: HazardTuning,
    pub br: HazardTuning,
    pub oil_spill: HazardTuning,

    /// Switch background map every this many points
    pub map_switch_score: u64,
    /// Background maps in rotation order
    pub maps: Vec<MapProfile>,
    /// Scroll distance in pixels over which borders blend on a map switch
    pub border_transition_px: f32,

    /// Hazards stay frozen this many frames after braking ends
    pub brake_freeze_frames: u32,

    /// Points deducted on a hazard collision
    pub collision_penalty: u64,
    /// Points awarded for a correct question answer
    pub question_bonus: u64,
    /// Points deducted for a wrong question answer
    pub question_penalty: u64,

    /// Boost tuning (ticks at the nominal 60 Hz game rate)
    pub boost_duration_ticks: u32,
    pub boost_cooldown_ticks: u32,
    /// Speed-cap multiplier while boosting
    pub boost_multiplier: f32,

    #[serde(default)]
    pub true_false_questions: Vec<TrueFalseEntry>,
    #[serde(default)]
    pub multiple_choice_questions: Vec<MultipleChoiceEntry>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            traffic: HazardTuning {
                spawn_frequency: 60,
                max_active: 3,
                lane_width_ratio: 0.7,
                min_size: 24,
                min_padding: 10,
                jitter_min: 0,
                jitter_max: 100,
                lane_bias: SpawnLaneBias::Middle,
                clamp_to_borders: false,
            },
            crack: HazardTuning {
                spawn_frequency: 300,
                max_active: 2,
                lane_width_ratio: 0.6,
                min_size: 24,
                min_padding: 14,
                jitter_min: 40,
                jitter_max: 260,
                lane_bias: SpawnLaneBias::Uniform,
                clamp_to_borders: true,
            },
            br: HazardTuning {
                spawn_frequency: 240,
                max_active: 2,
                lane_width_ratio: 0.55,
                min_size: 24,
                min_padding: 10,
                jitter_min: 40,
                jitter_max: 220,
                lane_bias: SpawnLaneBias::Uniform,
                clamp_to_borders: false,
            },
            oil_spill: HazardTuning {
                spawn_frequency: 420,
                max_active: 1,
                lane_width_ratio: 0.65,
                min_size: 28,
                min_padding: 8,
                jitter_min: 50,
                jitter_max: 240,
                lane_bias: SpawnLaneBias::Uniform,
                clamp_to_borders: true,
            },
            map_switch_score: 5000,
            maps: vec![
                MapProfile {
                    name: "city".into(),
                    border: Some(BorderOverride::Pixels {
                        left: (WINDOW_WIDTH - ROAD_WIDTH) / 2,
                        right: (WINDOW_WIDTH + ROAD_WIDTH) / 2,
                    }),
                },
                MapProfile {
                    name: "desert".into(),
                    border: Some(BorderOverride::WidthRatio {
                        left: 0.33,
                        right: 0.67,
                    }),
                },
                MapProfile {
                    name: "highway".into(),
                    border: None,
                },
            ],
            border_transition_px: 540.0,
            brake_freeze_frames: 21,
            collision_penalty: 100,
            question_bonus: 250,
            question_penalty: 100,
            boost_duration_ticks: 60,
            boost_cooldown_ticks: 600,
            boost_multiplier: 1.5,
            true_false_questions: Vec::new(),
            multiple_choice_questions: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_sane() {
        let config = GameConfig::default();
        assert!(config.traffic.spawn_frequency() >= 1);
        assert!(config.traffic.max_active > 0);
        assert!(!config.maps.is_empty());
        assert!(config.border_transition_px > 0.0);
    }

    #[test]
    fn test_border_override_resolution() {
        let px = BorderOverride::Pixels {
            left: 660,
            right: 1260,
        };
        assert_eq!(px.resolve(1920), (660.0, 1260.0));

        let ratio = BorderOverride::WidthRatio {
            left: 0.25,
            right: 0.75,
        };
        assert_eq!(ratio.resolve(1920), (480.0, 1440.0));
    }

    #[test]
    fn test_config_round_trip() {
        let config = GameConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.map_switch_score, config.map_switch_score);
        assert_eq!(back.traffic.lane_bias, SpawnLaneBias::Middle);
        assert_eq!(back.maps.len(), config.maps.len());
    }
}
