//! World-level hazard orchestration
//!
//! `HazardWorld` owns the road and the four hazard managers, wires the
//! cross-class blocking groups, and runs the shared braking-freeze window.
//! The blocking graph is deliberately non-symmetric: traffic avoids BRs, BRs
//! avoid traffic, oil spills avoid traffic, BRs and cracks, and cracks avoid
//! nothing.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::GameConfig;
use crate::hazard::{Hazard, HazardClass, HazardManager, ModelPool};
use crate::mask::Rect;
use crate::road::Road;

/// Model-art pools for each hazard class; empty pools fall back to
/// procedural placeholders
#[derive(Debug, Clone, Default)]
pub struct HazardModels {
    pub traffic: ModelPool,
    pub crack: ModelPool,
    pub br: ModelPool,
    pub oil_spill: ModelPool,
}

pub struct HazardWorld {
    road: Road,
    traffic: HazardManager,
    crack: HazardManager,
    br: HazardManager,
    oil_spill: HazardManager,
    /// Map scroll speed applied to static hazards and the background
    map_speed: f32,
    /// Remaining ticks of post-brake freeze
    freeze_frames_left: u32,
    brake_freeze_frames: u32,
    map_switch_score: u64,
}

impl HazardWorld {
    pub fn new(config: &GameConfig, road: Road, models: HazardModels, seed: u64) -> Self {
        // Stream-split so each class gets an independent deterministic RNG
        let rng = |stream: u64| Pcg32::seed_from_u64(seed.wrapping_add(stream));
        Self {
            road,
            traffic: HazardManager::new(
                HazardClass::Traffic,
                config.traffic.clone(),
                models.traffic,
                rng(0),
            ),
            crack: HazardManager::new(
                HazardClass::Crack,
                config.crack.clone(),
                models.crack,
                rng(1),
            ),
            br: HazardManager::new(HazardClass::Br, config.br.clone(), models.br, rng(2)),
            oil_spill: HazardManager::new(
                HazardClass::OilSpill,
                config.oil_spill.clone(),
                models.oil_spill,
                rng(3),
            ),
            map_speed: 0.0,
            freeze_frames_left: 0,
            brake_freeze_frames: config.brake_freeze_frames,
            map_switch_score: config.map_switch_score,
        }
    }

    pub fn road(&self) -> &Road {
        &self.road
    }

    pub fn road_mut(&mut self) -> &mut Road {
        &mut self.road
    }

    pub fn set_map_speed(&mut self, speed: f32) {
        self.map_speed = speed;
    }

    pub fn map_speed(&self) -> f32 {
        self.map_speed
    }

    /// Whether the braking-freeze window is currently active
    pub fn frozen(&self) -> bool {
        self.freeze_frames_left > 0
    }

    pub fn hazards(&self, class: HazardClass) -> &[Hazard] {
        self.manager(class).hazards()
    }

    pub fn active_count(&self) -> usize {
        self.traffic.active_count()
            + self.crack.active_count()
            + self.br.active_count()
            + self.oil_spill.active_count()
    }

    fn manager(&self, class: HazardClass) -> &HazardManager {
        match class {
            HazardClass::Traffic => &self.traffic,
            HazardClass::Crack => &self.crack,
            HazardClass::Br => &self.br,
            HazardClass::OilSpill => &self.oil_spill,
        }
    }

    /// Remove every active hazard (map switch, game reset)
    pub fn clear_hazards(&mut self) {
        self.traffic.clear();
        self.crack.clear();
        self.br.clear();
        self.oil_spill.clear();
    }

    /// Rotate the active map when the score crosses a switch boundary;
    /// clears hazards so the new borders start clean
    pub fn apply_score(&mut self, score: u64) {
        let before = self.road.current_map_index();
        self.road.set_map_by_score(score, self.map_switch_score);
        if self.road.current_map_index() != before {
            log::info!(
                "map switch at score {}: map index {}",
                score,
                self.road.current_map_index()
            );
            self.clear_hazards();
        }
    }

    /// Advance the world by one tick
    ///
    /// Braking refreshes the freeze window; the window keeps spawning and
    /// static-hazard motion suspended for `brake_freeze_frames` ticks after
    /// the player releases the brake.
    pub fn update(&mut self, player_speed: f32, braking: bool) {
        let freeze = braking || self.freeze_frames_left > 0;
        if braking {
            self.freeze_frames_left = self.brake_freeze_frames;
        } else {
            self.freeze_frames_left = self.freeze_frames_left.saturating_sub(1);
        }

        if !freeze {
            self.road.advance_scroll(self.map_speed);
        }

        // Blocking snapshots are taken before any manager moves this tick so
        // every class sees the same consistent world state
        let traffic_rects = self.traffic.rects();
        let crack_rects = self.crack.rects();
        let br_rects = self.br.rects();

        self.traffic
            .update(&self.road, player_speed, self.map_speed, freeze, braking, &br_rects);
        self.crack
            .update(&self.road, player_speed, self.map_speed, freeze, braking, &[]);
        self.br.update(
            &self.road,
            player_speed,
            self.map_speed,
            freeze,
            braking,
            &traffic_rects,
        );

        let mut oil_blocking =
            Vec::with_capacity(traffic_rects.len() + br_rects.len() + crack_rects.len());
        oil_blocking.extend_from_slice(&traffic_rects);
        oil_blocking.extend_from_slice(&br_rects);
        oil_blocking.extend_from_slice(&crack_rects);
        self.oil_spill.update(
            &self.road,
            player_speed,
            self.map_speed,
            freeze,
            braking,
            &oil_blocking,
        );
    }

    /// First hazard whose mask overlaps the given mask, if any
    pub fn collide(
        &self,
        mask: &crate::mask::Mask,
        pos: (i32, i32),
    ) -> Option<(HazardClass, Rect)> {
        for class in [
            HazardClass::Traffic,
            HazardClass::Crack,
            HazardClass::Br,
            HazardClass::OilSpill,
        ] {
            for hazard in self.manager(class).hazards() {
                let hazard_pos = (hazard.x, hazard.y as i32);
                if crate::mask::masks_collide(mask, pos, &hazard.mask, hazard_pos) {
                    return Some((class, hazard.rect()));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::mask::Mask;

    fn test_world(config: &GameConfig) -> HazardWorld {
        let road = Road::new(
            WINDOW_WIDTH,
            WINDOW_HEIGHT,
            ROAD_WIDTH,
            DEFAULT_LANE_COUNT,
            config.maps.clone(),
            config.border_transition_px,
        );
        HazardWorld::new(config, road, HazardModels::default(), 7)
    }

    fn fast_config() -> GameConfig {
        let mut config = GameConfig::default();
        config.traffic.spawn_frequency = 1;
        config.crack.spawn_frequency = 1;
        config.br.spawn_frequency = 1;
        config.oil_spill.spawn_frequency = 1;
        config
    }

    #[test]
    fn test_update_spawns_all_classes() {
        let config = fast_config();
        let mut world = test_world(&config);
        world.set_map_speed(5.0);
        for _ in 0..10 {
            world.update(5.0, false);
        }
        assert!(!world.hazards(HazardClass::Traffic).is_empty());
        assert!(!world.hazards(HazardClass::Crack).is_empty());
        assert!(!world.hazards(HazardClass::Br).is_empty());
        assert!(!world.hazards(HazardClass::OilSpill).is_empty());
    }

    #[test]
    fn test_freeze_window_outlasts_braking() {
        let mut config = fast_config();
        config.brake_freeze_frames = 5;
        let mut world = test_world(&config);
        world.set_map_speed(5.0);
        world.update(5.0, false);
        let crack_y = world.hazards(HazardClass::Crack)[0].y;

        // Brake for one tick, then release: freeze persists for 5 more ticks
        world.update(5.0, true);
        assert!(world.frozen());
        for _ in 0..5 {
            world.update(5.0, false);
            assert_eq!(world.hazards(HazardClass::Crack)[0].y, crack_y);
        }
        assert!(!world.frozen());
        world.update(5.0, false);
        assert!(world.hazards(HazardClass::Crack)[0].y > crack_y);
    }

    #[test]
    fn test_scroll_frozen_with_hazards() {
        let config = fast_config();
        let mut world = test_world(&config);
        world.set_map_speed(5.0);
        world.update(5.0, false);
        let scrolled = world.road().bg_scroll();
        world.update(5.0, true);
        assert_eq!(world.road().bg_scroll(), scrolled);
    }

    #[test]
    fn test_clear_hazards() {
        let config = fast_config();
        let mut world = test_world(&config);
        world.set_map_speed(5.0);
        for _ in 0..10 {
            world.update(5.0, false);
        }
        assert!(world.active_count() > 0);
        world.clear_hazards();
        assert_eq!(world.active_count(), 0);
    }

    #[test]
    fn test_map_switch_clears_hazards() {
        let config = fast_config();
        let mut world = test_world(&config);
        world.set_map_speed(5.0);
        for _ in 0..10 {
            world.update(5.0, false);
        }
        assert!(world.active_count() > 0);
        world.apply_score(config.map_switch_score);
        assert_eq!(world.active_count(), 0);
        assert_eq!(world.road().current_map_index(), 1);
    }

    #[test]
    fn test_apply_score_without_boundary_keeps_hazards() {
        let config = fast_config();
        let mut world = test_world(&config);
        world.set_map_speed(5.0);
        for _ in 0..10 {
            world.update(5.0, false);
        }
        let count = world.active_count();
        world.apply_score(10);
        assert_eq!(world.active_count(), count);
    }

    #[test]
    fn test_collide_reports_class_and_rect() {
        let config = fast_config();
        let mut world = test_world(&config);
        world.set_map_speed(5.0);
        world.update(5.0, false);
        let hazard_rect = world.hazards(HazardClass::Traffic)[0].rect();

        let probe = Mask::solid(hazard_rect.w as u32, hazard_rect.h as u32);
        let hit = world.collide(&probe, (hazard_rect.x, hazard_rect.y));
        assert!(matches!(hit, Some((HazardClass::Traffic, _))));

        // Far away: no contact
        let miss = world.collide(&probe, (0, WINDOW_HEIGHT - 1));
        assert!(miss.is_none());
    }
}
