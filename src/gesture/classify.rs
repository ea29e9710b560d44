//! Stateless per-frame gesture predicates
//!
//! Pure functions over a single hand's landmarks (or a wrist pair for
//! steering). All of them tolerate degenerate geometry: near-zero
//! denominators are guarded with an epsilon and missing extension simply
//! reads as "not posed".

use glam::Vec2;

use super::landmarks::{FINGER_TIP_PIP, HandLandmarks, index};
use crate::clamp_symmetric;
use crate::consts::{PALM_OPEN_RATIO, SELECT_MARGIN, STEER_CLAMP, STEER_EPSILON};

/// Open-palm (braking) gesture
///
/// A finger counts as extended when its tip is noticeably farther from the
/// wrist than its PIP joint (squared distances, 1.05x margin). The palm is
/// open when at least three of the four non-thumb fingers are extended.
pub fn is_palm_open(hand: &HandLandmarks) -> bool {
    let wrist = hand.wrist();
    let extended = FINGER_TIP_PIP
        .iter()
        .filter(|&&(tip, pip)| {
            hand.point(tip).distance_squared(wrist)
                > hand.point(pip).distance_squared(wrist) * PALM_OPEN_RATIO
        })
        .count();
    extended >= 3
}

/// Thumbs-up (boost) gesture
///
/// Thumb tip above the thumb MCP (y grows downward) with at least three of
/// the other fingers curled.
pub fn is_thumbs_up(hand: &HandLandmarks) -> bool {
    let thumb_up = hand.point(index::THUMB_TIP).y < hand.point(index::THUMB_MCP).y;
    thumb_up && curled_finger_count(hand) >= 3
}

/// Index-only pointer (shift) gesture
///
/// The index finger must be fully extended upward (tip above PIP above MCP)
/// while at least two of the remaining three fingers stay curled.
pub fn is_index_only(hand: &HandLandmarks) -> bool {
    let tip_y = hand.point(index::INDEX_TIP).y;
    let pip_y = hand.point(index::INDEX_PIP).y;
    let mcp_y = hand.point(index::INDEX_MCP).y;
    let index_extended = tip_y < pip_y && pip_y < mcp_y;

    let curled = [
        (index::MIDDLE_TIP, index::MIDDLE_PIP),
        (index::RING_TIP, index::RING_PIP),
        (index::PINKY_TIP, index::PINKY_PIP),
    ]
    .iter()
    .filter(|&&(tip, pip)| hand.point(tip).y > hand.point(pip).y)
    .count();

    index_extended && curled >= 2
}

/// Index-closed (question-select) gesture: index tip folded below its PIP
/// by a fixed normalized margin
pub fn is_index_closed(hand: &HandLandmarks) -> bool {
    hand.point(index::INDEX_TIP).y > hand.point(index::INDEX_PIP).y + SELECT_MARGIN
}

/// Steering slope from the two wrist positions, clamped to `[-5, 5]`
///
/// Negative slope (right wrist above left) steers left. The epsilon keeps
/// the division finite when the wrists are horizontally aligned.
pub fn steering_slope(left_wrist: Vec2, right_wrist: Vec2) -> f32 {
    let slope = (right_wrist.y - left_wrist.y) / (right_wrist.x - left_wrist.x + STEER_EPSILON);
    clamp_symmetric(slope, STEER_CLAMP)
}

/// Count of curled non-thumb fingers (tip below PIP)
fn curled_finger_count(hand: &HandLandmarks) -> usize {
    FINGER_TIP_PIP
        .iter()
        .filter(|&&(tip, pip)| hand.point(tip).y > hand.point(pip).y)
        .count()
}
