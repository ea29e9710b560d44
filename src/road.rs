//! Road geometry: lane partitioning and per-map border state
//!
//! The road is a fixed-width vertical strip centered in the window, split
//! into equal lanes. Background maps may override the visually-correct road
//! borders; switching maps blends the borders linearly as the road scrolls.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::MapProfile;
use crate::consts::*;

/// Immutable lane segment defined by horizontal boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lane {
    pub index: usize,
    pub left: i32,
    pub right: i32,
}

impl Lane {
    /// Pixel width of the lane (at least 1)
    pub fn width(&self) -> i32 {
        (self.right - self.left).max(1)
    }
}

/// Road geometry plus active-map border state
#[derive(Debug, Clone)]
pub struct Road {
    window_width: i32,
    height: i32,
    width: i32,
    /// Left x of the nominal road strip
    x: i32,
    lane_count: usize,

    maps: Vec<MapProfile>,
    current_map_index: usize,
    /// Border blend state: interpolate `from` -> `to` over `transition_px`
    border_from: (f32, f32),
    border_to: (f32, f32),
    transition_scrolled: f32,
    transition_px: f32,

    /// Background scroll offset, wraps at `height`
    bg_scroll: f32,
}

impl Road {
    pub fn new(
        window_width: i32,
        height: i32,
        road_width: i32,
        lane_count: usize,
        maps: Vec<MapProfile>,
        transition_px: f32,
    ) -> Self {
        let x = (window_width - road_width) / 2;
        let mut road = Self {
            window_width,
            height,
            width: road_width,
            x,
            lane_count: MIN_LANE_COUNT,
            maps,
            current_map_index: 0,
            border_from: (x as f32, (x + road_width) as f32),
            border_to: (x as f32, (x + road_width) as f32),
            transition_scrolled: f32::INFINITY,
            transition_px: transition_px.max(1.0),
            bg_scroll: 0.0,
        };
        road.set_lane_count(lane_count);
        let target = road.map_borders(0);
        road.border_from = target;
        road.border_to = target;
        road
    }

    /// Clamp and apply the active number of lanes
    ///
    /// Existing hazards are not reflowed; only future spawns see the change.
    pub fn set_lane_count(&mut self, lane_count: usize) {
        self.lane_count = lane_count.clamp(MIN_LANE_COUNT, MAX_LANE_COUNT);
    }

    pub fn lane_count(&self) -> usize {
        self.lane_count
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    /// Width of one lane in pixels (float, before remainder absorption)
    pub fn lane_width(&self) -> f32 {
        self.width as f32 / self.lane_count as f32
    }

    /// Lane boundaries for a clamped lane index
    ///
    /// The final lane absorbs the integer-division remainder so the lanes
    /// tile the road exactly.
    pub fn lane(&self, lane_index: usize) -> Lane {
        let clamped = lane_index.min(self.lane_count - 1);
        let lane_w = self.lane_width();
        let left = self.x + (clamped as f32 * lane_w) as i32;
        let right = if clamped == self.lane_count - 1 {
            self.x + self.width
        } else {
            self.x + ((clamped + 1) as f32 * lane_w) as i32
        };
        Lane {
            index: clamped,
            left,
            right,
        }
    }

    /// Uniformly random lane
    pub fn random_lane<R: Rng>(&self, rng: &mut R) -> Lane {
        self.lane(rng.random_range(0..self.lane_count))
    }

    /// Middle lane (traffic bias variant)
    pub fn middle_lane(&self) -> Lane {
        self.lane(self.lane_count / 2)
    }

    /// Uniform spawn x for an object of `width` inside `lane`, inset by
    /// `min_padding`; centers the object when the padded range is degenerate
    pub fn lane_spawn_x<R: Rng>(
        &self,
        rng: &mut R,
        lane: Lane,
        width: i32,
        min_padding: i32,
    ) -> i32 {
        let padding = min_padding.min(((lane.width() - width) / 2).max(0));
        let min_left = lane.left + padding;
        let max_left = lane.right - width - padding;
        if max_left <= min_left {
            return lane.left + ((lane.width() - width) / 2).max(0);
        }
        rng.random_range(min_left..=max_left)
    }

    /// Clamp a spawn x against the active map borders
    ///
    /// Falls back to centering within the border span when the padded range
    /// is degenerate, and to flush-right placement when even centering would
    /// leave the left edge outside the road.
    pub fn clamp_spawn_x_to_borders(&self, x: i32, width: i32, min_padding: i32) -> i32 {
        let (left_f, right_f) = self.borders();
        let left = left_f as i32;
        let right = right_f as i32;
        let min_x = left + min_padding;
        let max_x = right - width - min_padding;
        if min_x <= max_x {
            return x.clamp(min_x, max_x);
        }
        let centered = left + (right - left - width) / 2;
        if centered >= left {
            centered
        } else {
            right - width
        }
    }

    /// Current (possibly mid-transition) border positions
    pub fn borders(&self) -> (f32, f32) {
        let t = self.transition_progress();
        (
            self.border_from.0 + (self.border_to.0 - self.border_from.0) * t,
            self.border_from.1 + (self.border_to.1 - self.border_from.1) * t,
        )
    }

    /// Blend progress of the active border transition, in `[0, 1]`
    pub fn transition_progress(&self) -> f32 {
        (self.transition_scrolled / self.transition_px).clamp(0.0, 1.0)
    }

    pub fn current_map_index(&self) -> usize {
        self.current_map_index
    }

    /// Resolve a map's borders, defaulting to the nominal road strip
    fn map_borders(&self, map_index: usize) -> (f32, f32) {
        self.maps
            .get(map_index)
            .and_then(|m| m.border)
            .map(|b| b.resolve(self.window_width))
            .unwrap_or((self.x as f32, (self.x + self.width) as f32))
    }

    /// Switch background map from the score threshold (modulo rotation)
    ///
    /// Starting a switch freezes the current blended borders as the `from`
    /// endpoint and blends toward the new map's borders as the road scrolls.
    pub fn set_map_by_score(&mut self, score: u64, map_switch_score: u64) {
        if self.maps.is_empty() || map_switch_score == 0 {
            return;
        }
        let map_index = ((score / map_switch_score) % self.maps.len() as u64) as usize;
        if map_index == self.current_map_index {
            return;
        }
        log::info!(
            "map switch: {} -> {} at score {}",
            self.current_map_index,
            map_index,
            score
        );
        self.border_from = self.borders();
        self.border_to = self.map_borders(map_index);
        self.transition_scrolled = 0.0;
        self.current_map_index = map_index;
    }

    /// Advance the background scroll; also drives border blending
    pub fn advance_scroll(&mut self, speed: f32) {
        self.bg_scroll += speed;
        if self.bg_scroll >= self.height as f32 {
            self.bg_scroll -= self.height as f32;
        }
        if self.transition_scrolled < self.transition_px {
            self.transition_scrolled = (self.transition_scrolled + speed).min(self.transition_px);
        }
    }

    pub fn bg_scroll(&self) -> f32 {
        self.bg_scroll
    }

    /// Nominal road borders, ignoring map overrides (for out-of-bounds tests)
    pub fn nominal_borders(&self) -> (i32, i32) {
        (self.x, self.x + self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BorderOverride, GameConfig};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn test_road(lane_count: usize) -> Road {
        Road::new(
            WINDOW_WIDTH,
            WINDOW_HEIGHT,
            ROAD_WIDTH,
            lane_count,
            GameConfig::default().maps,
            540.0,
        )
    }

    #[test]
    fn test_lane_count_clamped() {
        let mut road = test_road(3);
        road.set_lane_count(0);
        assert_eq!(road.lane_count(), MIN_LANE_COUNT);
        road.set_lane_count(100);
        assert_eq!(road.lane_count(), MAX_LANE_COUNT);
    }

    #[test]
    fn test_lane_index_clamped() {
        let road = test_road(3);
        assert_eq!(road.lane(99).index, 2);
    }

    #[test]
    fn test_lanes_tile_road_exactly() {
        for n in MIN_LANE_COUNT..=MAX_LANE_COUNT {
            let road = test_road(n);
            let (left, right) = road.nominal_borders();
            let mut edge = left;
            for i in 0..n {
                let lane = road.lane(i);
                assert_eq!(lane.left, edge, "gap before lane {i} at {n} lanes");
                assert!(lane.width() >= 1);
                edge = lane.right;
            }
            assert_eq!(edge, right, "lanes do not reach road edge at {n} lanes");
        }
    }

    proptest! {
        #[test]
        fn prop_lane_partition_is_contiguous(
            lane_count in MIN_LANE_COUNT..=MAX_LANE_COUNT,
            road_width in 100i32..2000,
        ) {
            let road = Road::new(
                WINDOW_WIDTH,
                WINDOW_HEIGHT,
                road_width,
                lane_count,
                Vec::new(),
                540.0,
            );
            let total: i32 = (0..lane_count).map(|i| road.lane(i).width()).sum();
            prop_assert_eq!(total, road_width);
            for i in 1..lane_count {
                prop_assert_eq!(road.lane(i - 1).right, road.lane(i).left);
            }
        }
    }

    #[test]
    fn test_lane_spawn_x_within_lane() {
        let road = test_road(3);
        let lane = road.lane(1);
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            let x = road.lane_spawn_x(&mut rng, lane, 40, 10);
            assert!(x >= lane.left + 10);
            assert!(x + 40 <= lane.right - 10);
        }
    }

    #[test]
    fn test_lane_spawn_x_degenerate_centers() {
        let road = test_road(MAX_LANE_COUNT);
        let lane = road.lane(0);
        let mut rng = Pcg32::seed_from_u64(7);
        // Object as wide as the lane: padded range collapses, expect centering
        let x = road.lane_spawn_x(&mut rng, lane, lane.width(), 10);
        assert_eq!(x, lane.left);
        // Object wider than the lane still returns the lane edge, not a panic
        let x = road.lane_spawn_x(&mut rng, lane, lane.width() + 50, 10);
        assert_eq!(x, lane.left);
    }

    #[test]
    fn test_clamp_spawn_x_to_borders() {
        let road = test_road(3);
        let (left, right) = road.nominal_borders();
        assert_eq!(road.clamp_spawn_x_to_borders(0, 40, 10), left + 10);
        assert_eq!(
            road.clamp_spawn_x_to_borders(WINDOW_WIDTH, 40, 10),
            right - 50
        );
        // In-range x is untouched
        let mid = left + 100;
        assert_eq!(road.clamp_spawn_x_to_borders(mid, 40, 10), mid);
    }

    #[test]
    fn test_clamp_spawn_x_degenerate_borders() {
        let maps = vec![MapProfile {
            name: "narrow".into(),
            border: Some(BorderOverride::Pixels {
                left: 900,
                right: 1000,
            }),
        }];
        let road = Road::new(WINDOW_WIDTH, WINDOW_HEIGHT, ROAD_WIDTH, 3, maps, 540.0);
        // 90px object in a 100px border span with 10px padding: centered
        assert_eq!(road.clamp_spawn_x_to_borders(0, 90, 10), 905);
        // Object wider than the span: flush against the right border
        assert_eq!(road.clamp_spawn_x_to_borders(0, 150, 10), 850);
    }

    #[test]
    fn test_map_switch_by_score_modulo() {
        let mut road = test_road(3);
        road.set_map_by_score(0, 5000);
        assert_eq!(road.current_map_index(), 0);
        road.set_map_by_score(5200, 5000);
        assert_eq!(road.current_map_index(), 1);
        road.set_map_by_score(15000, 5000);
        assert_eq!(road.current_map_index(), 0);
    }

    #[test]
    fn test_border_transition_endpoints_and_monotonic() {
        let mut road = test_road(3);
        let from = road.borders();
        road.set_map_by_score(5000, 5000); // switch to "desert" ratio borders
        assert_eq!(road.transition_progress(), 0.0);
        assert_eq!(road.borders(), from);

        let target = BorderOverride::WidthRatio {
            left: 0.33,
            right: 0.67,
        }
        .resolve(WINDOW_WIDTH);

        let mut prev_left = road.borders().0;
        for _ in 0..54 {
            road.advance_scroll(10.0);
            let (left, _) = road.borders();
            // Borders move monotonically toward the target
            assert!((left - target.0).abs() <= (prev_left - target.0).abs() + 1e-3);
            prev_left = left;
        }
        assert_eq!(road.transition_progress(), 1.0);
        let (left, right) = road.borders();
        assert!((left - target.0).abs() < 1e-3);
        assert!((right - target.1).abs() < 1e-3);
    }

    #[test]
    fn test_lane_serde_round_trip() {
        let lane = Lane {
            index: 2,
            left: 660,
            right: 860,
        };
        let json = serde_json::to_string(&lane).unwrap();
        let back: Lane = serde_json::from_str(&json).unwrap();
        assert_eq!(back, lane);
    }

    #[test]
    fn test_bg_scroll_wraps() {
        let mut road = test_road(3);
        for _ in 0..200 {
            road.advance_scroll(10.0);
            assert!(road.bg_scroll() < WINDOW_HEIGHT as f32);
            assert!(road.bg_scroll() >= 0.0);
        }
    }
}
