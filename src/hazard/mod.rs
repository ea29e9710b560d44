//! Hazard spawning, kinematics and reaping
//!
//! One generic `HazardManager` drives all four hazard classes (traffic,
//! cracks, BRs, oil spills); behavior differences are data in the class
//! descriptor and the per-class `HazardTuning`. Spawning is lane-based with
//! bounded overlap-avoidance against same-class hazards and injected
//! cross-class blocking rects; placement is best-effort and never blocks.
//!
//! Kinematics are asymmetric on purpose: traffic is "other vehicles" with a
//! speed blended against the player's and a direction factor that eases into
//! reverse while braking, while static road hazards (cracks, BRs, spills)
//! scroll with the map and freeze completely during the braking window.

pub mod world;

use std::collections::HashMap;

use rand::Rng;
use rand_pcg::Pcg32;

use crate::config::{HazardTuning, SpawnLaneBias};
use crate::consts::*;
use crate::mask::{Mask, Rect, SpriteImage};
use crate::road::{Lane, Road};

pub use world::HazardWorld;

/// Bounded overlap-avoidance attempts per spawn
const MAX_SPAWN_ATTEMPTS: u32 = 10;

/// The four hazard classes sharing the road
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HazardClass {
    Traffic,
    Crack,
    Br,
    OilSpill,
}

impl HazardClass {
    /// Whether this class uses the relative-speed traffic kinematics or the
    /// freeze-on-brake map scroll
    fn is_traffic(self) -> bool {
        matches!(self, HazardClass::Traffic)
    }

    /// Placeholder height as a fraction of width when no model art exists
    fn placeholder_aspect(self) -> f32 {
        match self {
            HazardClass::Traffic => 1.0,
            HazardClass::Crack => 0.5,
            HazardClass::Br => 0.9,
            HazardClass::OilSpill => 0.6,
        }
    }

    /// Procedural placeholder sprite (spawning never halts on missing art)
    fn placeholder(self, width: u32, height: u32) -> SpriteImage {
        match self {
            HazardClass::Traffic | HazardClass::Br => SpriteImage::filled_rect(width, height),
            HazardClass::Crack | HazardClass::OilSpill => {
                SpriteImage::filled_ellipse(width, height)
            }
        }
    }
}

/// One active hazard
#[derive(Debug, Clone)]
pub struct Hazard {
    pub x: i32,
    /// Float y for sub-pixel accuracy; the rect truncates it
    pub y: f32,
    pub width: i32,
    pub height: i32,
    pub mask: Mask,
    /// Current screen speed (traffic only; static hazards track map speed)
    speed: f32,
    /// Per-vehicle base approach speed sampled at spawn
    traffic_speed: f32,
    /// Smoothed direction: +1 approaching the player, -1 backing away
    direction_factor: f32,
    alive: bool,
}

impl Hazard {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y as i32, self.width, self.height)
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn direction_factor(&self) -> f32 {
        self.direction_factor
    }

    /// Traffic kinematics: blended relative speed with eased direction
    fn update_traffic(&mut self, player_speed: f32, screen_height: i32, braking: bool) {
        self.speed = blend_traffic_speed(self.traffic_speed, player_speed);
        let target_direction = if braking { -1.0 } else { 1.0 };
        self.direction_factor +=
            (target_direction - self.direction_factor) * TRAFFIC_DIRECTION_EASE;
        self.y += self.speed * self.direction_factor;

        // Traffic can leave by either edge once it reverses
        let rect = self.rect();
        if rect.top() > screen_height + self.height || rect.bottom() < -self.height {
            self.alive = false;
        }
    }

    /// Static-hazard kinematics: scroll with the map, freeze while braking
    fn update_scroll(&mut self, map_speed: f32, screen_height: i32, braking: bool) {
        if braking {
            return;
        }
        self.y += map_speed.max(1.0);
        if self.rect().top() > screen_height + self.height {
            self.alive = false;
        }
    }
}

/// Traffic screen speed from the per-vehicle base speed and player speed
#[inline]
pub fn blend_traffic_speed(traffic_speed: f32, player_speed: f32) -> f32 {
    (traffic_speed + TRAFFIC_PLAYER_BLEND * player_speed)
        .clamp(TRAFFIC_MIN_SPEED, TRAFFIC_MAX_SPEED)
}

/// Validated model-image pool for one hazard class
#[derive(Debug, Clone, Default)]
pub struct ModelPool {
    images: Vec<SpriteImage>,
}

impl ModelPool {
    /// Keep successfully loaded images, logging and skipping failures
    pub fn from_candidates(candidates: Vec<Option<SpriteImage>>) -> Self {
        let total = candidates.len();
        let images: Vec<SpriteImage> = candidates.into_iter().flatten().collect();
        if images.len() < total {
            log::warn!(
                "model pool: {} of {} images failed to load, excluded",
                total - images.len(),
                total
            );
        }
        Self { images }
    }

    pub fn new(images: Vec<SpriteImage>) -> Self {
        Self { images }
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }
}

/// Spawn/update/reap state machine for one hazard class
#[derive(Debug)]
pub struct HazardManager {
    class: HazardClass,
    tuning: HazardTuning,
    hazards: Vec<Hazard>,
    timer: u32,
    models: ModelPool,
    /// Scaled-model cache keyed by `(model_index, target_width)`
    scale_cache: HashMap<(usize, u32), SpriteImage>,
    rng: Pcg32,
}

impl HazardManager {
    pub fn new(class: HazardClass, tuning: HazardTuning, models: ModelPool, rng: Pcg32) -> Self {
        Self {
            class,
            tuning,
            hazards: Vec::new(),
            timer: 0,
            models,
            scale_cache: HashMap::new(),
            rng,
        }
    }

    pub fn class(&self) -> HazardClass {
        self.class
    }

    pub fn hazards(&self) -> &[Hazard] {
        &self.hazards
    }

    pub fn active_count(&self) -> usize {
        self.hazards.len()
    }

    /// Rect snapshot used as a blocking group by other managers
    pub fn rects(&self) -> Vec<Rect> {
        self.hazards.iter().map(Hazard::rect).collect()
    }

    pub fn clear(&mut self) {
        self.hazards.clear();
    }

    pub fn set_spawn_frequency(&mut self, frequency: u32) {
        self.tuning.spawn_frequency = frequency.max(1);
    }

    /// Advance timers, spawn, update kinematics and reap for one tick
    ///
    /// `freeze` suspends spawning and static-hazard motion (the braking
    /// window); `braking` additionally steers traffic into reverse.
    pub fn update(
        &mut self,
        road: &Road,
        player_speed: f32,
        map_speed: f32,
        freeze: bool,
        braking: bool,
        blocking: &[Rect],
    ) {
        if !freeze {
            self.timer += 1;
            if self.timer >= self.tuning.spawn_frequency() {
                self.timer = 0;
                if self.hazards.len() < self.tuning.max_active {
                    self.spawn(road, player_speed, blocking);
                }
            }
        }

        let screen_height = road.height();
        if self.class.is_traffic() {
            for hazard in &mut self.hazards {
                hazard.update_traffic(player_speed, screen_height, braking);
            }
        } else {
            for hazard in &mut self.hazards {
                hazard.update_scroll(map_speed, screen_height, freeze);
            }
        }
        self.hazards.retain(|h| h.alive);
    }

    /// Pick a lane per the class bias
    fn pick_lane(&mut self, road: &Road) -> Lane {
        match self.tuning.lane_bias {
            SpawnLaneBias::Uniform => road.random_lane(&mut self.rng),
            SpawnLaneBias::Middle => road.middle_lane(),
        }
    }

    /// Random model scaled to the lane, cached by `(model, width)`
    fn scaled_model(&mut self, lane: Lane) -> SpriteImage {
        let lane_fit_width = (lane.width() - 20).max(1) as u32;
        let target_width = (lane.width() as f32 * self.tuning.lane_width_ratio) as u32;
        let target_width = target_width.min(lane_fit_width).max(self.tuning.min_size);

        if self.models.is_empty() {
            let height =
                ((target_width as f32 * self.class.placeholder_aspect()) as u32).max(12);
            return self.class.placeholder(target_width, height);
        }

        let model_index = self.rng.random_range(0..self.models.len());
        if let Some(cached) = self.scale_cache.get(&(model_index, target_width)) {
            return cached.clone();
        }
        let scaled = self.models.images[model_index].scaled_to_width(target_width, 12);
        self.scale_cache
            .insert((model_index, target_width), scaled.clone());
        scaled
    }

    /// Best-effort spawn with bounded overlap avoidance
    ///
    /// Rejects candidates that horizontally overlap and sit within 3x height
    /// of a same-class hazard, or horizontally overlap any blocking rect.
    /// After the attempt budget the last candidate spawns regardless.
    fn spawn(&mut self, road: &Road, player_speed: f32, blocking: &[Rect]) {
        let mut chosen: Option<(Rect, SpriteImage)> = None;

        for _ in 0..MAX_SPAWN_ATTEMPTS {
            let lane = self.pick_lane(road);
            let image = self.scaled_model(lane);
            let width = image.width() as i32;
            let height = image.height() as i32;

            let mut x = road.lane_spawn_x(&mut self.rng, lane, width, self.tuning.min_padding);
            if self.tuning.clamp_to_borders {
                x = road.clamp_spawn_x_to_borders(x, width, self.tuning.min_padding);
            }
            // Spawn just above the screen for smooth entry
            let jitter = self
                .rng
                .random_range(self.tuning.jitter_min..=self.tuning.jitter_max.max(self.tuning.jitter_min));
            let y = -height - jitter;
            let rect = Rect::new(x, y, width, height);

            let overlap = self.overlaps_same_class(&rect)
                || blocking.iter().any(|b| rect.overlaps_horizontally(b));
            chosen = Some((rect, image));
            if !overlap {
                break;
            }
        }

        let Some((rect, image)) = chosen else {
            return;
        };
        let traffic_speed = self.rng.random_range(0.5..2.5);
        self.hazards.push(Hazard {
            x: rect.x,
            y: rect.y as f32,
            width: rect.w,
            height: rect.h,
            mask: Mask::from_image(&image),
            speed: blend_traffic_speed(traffic_speed, player_speed),
            traffic_speed,
            direction_factor: 1.0,
            alive: true,
        });
    }

    fn overlaps_same_class(&self, rect: &Rect) -> bool {
        self.hazards.iter().any(|h| {
            let existing = h.rect();
            existing.overlaps_horizontally(rect)
                && (existing.y - rect.y).abs() < rect.h * 3
        })
    }
}
