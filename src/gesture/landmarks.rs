//! The 21-point hand skeleton published by the landmark detector
//!
//! Coordinates are normalized to `[0, 1] x [0, 1]` with y growing downward
//! (image coordinates). Indices follow the MediaPipe hand topology.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Number of landmarks per detected hand
pub const LANDMARK_COUNT: usize = 21;

/// Skeletal landmark indices (wrist, then four joints per finger)
pub mod index {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_MCP: usize = 5;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_DIP: usize = 7;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_DIP: usize = 11;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP: usize = 13;
    pub const RING_PIP: usize = 14;
    pub const RING_DIP: usize = 15;
    pub const RING_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;
}

/// Tip/PIP index pairs for the four non-thumb fingers
pub const FINGER_TIP_PIP: [(usize, usize); 4] = [
    (index::INDEX_TIP, index::INDEX_PIP),
    (index::MIDDLE_TIP, index::MIDDLE_PIP),
    (index::RING_TIP, index::RING_PIP),
    (index::PINKY_TIP, index::PINKY_PIP),
];

/// Handedness label assigned by the detector's classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

/// One hand's landmark set, immutable per detection frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandLandmarks {
    points: [Vec2; LANDMARK_COUNT],
}

impl HandLandmarks {
    pub fn new(points: [Vec2; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    #[inline]
    pub fn point(&self, landmark_index: usize) -> Vec2 {
        self.points[landmark_index]
    }

    #[inline]
    pub fn wrist(&self) -> Vec2 {
        self.points[index::WRIST]
    }
}

/// A detected hand with its optional handedness label
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectedHand {
    pub landmarks: HandLandmarks,
    pub handedness: Option<Handedness>,
}

/// All hands detected in one camera frame (0, 1 or 2)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandFrame {
    hands: Vec<DetectedHand>,
}

impl HandFrame {
    /// Build a frame, keeping at most two hands (detector contract)
    pub fn new(mut hands: Vec<DetectedHand>) -> Self {
        if hands.len() > 2 {
            log::warn!("detector returned {} hands, keeping first two", hands.len());
            hands.truncate(2);
        }
        Self { hands }
    }

    pub fn empty() -> Self {
        Self { hands: Vec::new() }
    }

    pub fn hand_count(&self) -> usize {
        self.hands.len()
    }

    /// First detected hand, used as the primary hand in single-hand mode
    pub fn primary(&self) -> Option<&DetectedHand> {
        self.hands.first()
    }

    /// Resolve two hands into `(left, right)` order
    ///
    /// Uses handedness labels when present; falls back to detector order
    /// (index 0 = left, index 1 = right) when labels are missing or
    /// ambiguous. Returns `None` unless exactly two hands are present.
    pub fn resolve_left_right(&self) -> Option<(&HandLandmarks, &HandLandmarks)> {
        if self.hands.len() != 2 {
            return None;
        }
        let mut left_idx = 0;
        let mut right_idx = 1;
        for (i, hand) in self.hands.iter().enumerate() {
            match hand.handedness {
                Some(Handedness::Left) => left_idx = i,
                Some(Handedness::Right) => right_idx = i,
                None => {}
            }
        }
        Some((
            &self.hands[left_idx].landmarks,
            &self.hands[right_idx].landmarks,
        ))
    }
}
