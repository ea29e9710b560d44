//! Lane Racer - gesture-controlled lane-driving arcade core
//!
//! Core modules:
//! - `gesture`: Stateless classifiers over hand-landmark frames
//! - `control`: Debounced control state machine (steer/brake/shift/boost)
//! - `capture`: Camera thread with a lock-guarded latest-snapshot slot
//! - `road`: Lane partitioning and per-map border geometry
//! - `hazard`: Procedural hazard spawning, kinematics and reaping
//! - `mask`: Per-pixel collision masks and rect math
//! - `game`: Integration tick (player car, gears, boost, collisions, score)

pub mod capture;
pub mod config;
pub mod control;
pub mod game;
pub mod gesture;
pub mod hazard;
pub mod mask;
pub mod question;
pub mod road;
pub mod score;
pub mod settings;

pub use config::GameConfig;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Screen dimensions (the road scrolls vertically through this window)
    pub const WINDOW_WIDTH: i32 = 1920;
    pub const WINDOW_HEIGHT: i32 = 1080;

    /// Nominal road width; individual maps may override their visual borders
    pub const ROAD_WIDTH: i32 = 600;

    /// Lane count bounds enforced by the road model
    pub const MIN_LANE_COUNT: usize = 2;
    pub const MAX_LANE_COUNT: usize = 6;
    pub const DEFAULT_LANE_COUNT: usize = 3;

    /// Camera capture resolution requested from the frame source
    pub const CAM_WIDTH: u32 = 640;
    pub const CAM_HEIGHT: u32 = 480;

    /// Steering slope is clamped to this range by the classifier
    pub const STEER_CLAMP: f32 = 5.0;
    /// Guard against division blow-up when wrists are horizontally aligned
    pub const STEER_EPSILON: f32 = 1e-6;

    /// Traffic speed blend: screen speed = traffic_speed + this * player_speed
    pub const TRAFFIC_PLAYER_BLEND: f32 = 0.2;
    /// Blended traffic speed bounds (pixels per frame)
    pub const TRAFFIC_MIN_SPEED: f32 = 1.0;
    pub const TRAFFIC_MAX_SPEED: f32 = 24.0;
    /// Per-frame easing applied to the traffic direction factor
    pub const TRAFFIC_DIRECTION_EASE: f32 = 0.18;

    /// Swipe threshold in normalized wrist-y units
    pub const SWIPE_THRESHOLD: f32 = 0.02;
    /// Index-closed select margin in normalized units
    pub const SELECT_MARGIN: f32 = 0.01;
    /// Palm-open extension ratio (tip vs pip distance from wrist, squared)
    pub const PALM_OPEN_RATIO: f32 = 1.05;
}

/// Clamp a float to a symmetric range `[-limit, limit]`
#[inline]
pub fn clamp_symmetric(value: f32, limit: f32) -> f32 {
    value.clamp(-limit, limit)
}
