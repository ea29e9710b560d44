//! Control state machine over per-frame gesture classifications
//!
//! Consumes `HandFrame`s and derives debounced control signals: continuous
//! steer/brake/boost states plus edge-triggered one-shot requests (shift,
//! swipe, question select) with read-and-clear semantics.
//!
//! Braking uses the open-palm gesture on either hand; steer is forced to
//! neutral while braking. Losing hand tracking resets every derived output
//! within the same update so gameplay never acts on stale signals.

use serde::{Deserialize, Serialize};

use crate::consts::SWIPE_THRESHOLD;
use crate::gesture::{
    HandFrame, is_index_closed, is_index_only, is_palm_open, is_thumbs_up, steering_slope,
};

/// Current mode of the control state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControlMode {
    /// No hands tracked this frame
    #[default]
    NoHands,
    /// Wrong hand count while two-hand driving is required
    InsufficientHands,
    /// Both hands tracked, full driving controls active
    TwoHandDriving,
    /// Single-hand menu/question mode: swipe and select only
    SingleHandQuestion,
}

/// Vertical swipe direction detected in single-hand mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwipeDirection {
    Up,
    Down,
}

/// Copy-out view of the full control state for one game tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlSnapshot {
    pub mode: ControlMode,
    /// Steering slope in `[-5, 5]`; zero while braking
    pub steer: f32,
    pub braking: bool,
    /// Sustained thumbs-up on the left hand; the game layer edge-triggers it
    pub boosting: bool,
    pub left_shift_active: bool,
    pub right_shift_active: bool,
    pub shift_up_requested: bool,
    pub shift_down_requested: bool,
    pub question_select_requested: bool,
    pub swipe: Option<SwipeDirection>,
}

/// The control state machine
///
/// Owned by the capture session; `update` runs once per detection frame and
/// the `consume_*` accessors hand one-shot requests to the game loop exactly
/// once.
#[derive(Debug, Default)]
pub struct HandControls {
    mode: ControlMode,
    require_two_hands: bool,

    steer: f32,
    braking: bool,
    boosting: bool,

    left_shift_active: bool,
    right_shift_active: bool,
    prev_left_shift_active: bool,
    prev_right_shift_active: bool,
    shift_up_requested: bool,
    shift_down_requested: bool,

    question_select_requested: bool,
    prev_index_closed: bool,
    prev_wrist_y: Option<f32>,
    swipe: Option<SwipeDirection>,
}

impl HandControls {
    pub fn new() -> Self {
        Self {
            require_two_hands: true,
            ..Self::default()
        }
    }

    /// Switch between two-hand driving and single-hand question mode
    ///
    /// Also clears the swipe/select history so the first frame in the new
    /// mode cannot trigger from stale samples.
    pub fn set_require_two_hands(&mut self, require: bool) {
        if self.require_two_hands != require {
            self.require_two_hands = require;
            self.prev_wrist_y = None;
            self.prev_index_closed = false;
            self.swipe = None;
            self.question_select_requested = false;
        }
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    pub fn steer(&self) -> f32 {
        self.steer
    }

    pub fn braking(&self) -> bool {
        self.braking
    }

    pub fn boosting(&self) -> bool {
        self.boosting
    }

    /// Process one detection frame
    pub fn update(&mut self, frame: &HandFrame) {
        let count = frame.hand_count();
        if count == 0 {
            self.mode = ControlMode::NoHands;
            self.reset_outputs();
            return;
        }

        if self.require_two_hands {
            if count != 2 {
                self.mode = ControlMode::InsufficientHands;
                self.reset_outputs();
                return;
            }
            self.mode = ControlMode::TwoHandDriving;
            self.update_driving(frame);
        } else {
            self.mode = ControlMode::SingleHandQuestion;
            self.update_question_mode(frame);
        }
    }

    /// Return and clear the edge-triggered shift requests as `(down, up)`
    pub fn consume_shift_requests(&mut self) -> (bool, bool) {
        let down = self.shift_down_requested;
        let up = self.shift_up_requested;
        self.shift_down_requested = false;
        self.shift_up_requested = false;
        (down, up)
    }

    /// Return and clear the question-select request
    pub fn consume_question_select(&mut self) -> bool {
        std::mem::take(&mut self.question_select_requested)
    }

    /// Return and clear the pending swipe, if any
    pub fn consume_swipe(&mut self) -> Option<SwipeDirection> {
        self.swipe.take()
    }

    /// Copy-out of the current state
    pub fn snapshot(&self) -> ControlSnapshot {
        ControlSnapshot {
            mode: self.mode,
            steer: self.steer,
            braking: self.braking,
            boosting: self.boosting,
            left_shift_active: self.left_shift_active,
            right_shift_active: self.right_shift_active,
            shift_up_requested: self.shift_up_requested,
            shift_down_requested: self.shift_down_requested,
            question_select_requested: self.question_select_requested,
            swipe: self.swipe,
        }
    }

    /// Reset every derived output to its neutral value
    fn reset_outputs(&mut self) {
        self.steer = 0.0;
        self.braking = false;
        self.boosting = false;
        self.left_shift_active = false;
        self.right_shift_active = false;
        self.prev_left_shift_active = false;
        self.prev_right_shift_active = false;
        self.shift_up_requested = false;
        self.shift_down_requested = false;
        self.question_select_requested = false;
        self.prev_index_closed = false;
        self.prev_wrist_y = None;
        self.swipe = None;
    }

    fn update_driving(&mut self, frame: &HandFrame) {
        let Some((left, right)) = frame.resolve_left_right() else {
            // Unreachable with count == 2, but never panic on detector data
            self.reset_outputs();
            return;
        };

        self.braking = is_palm_open(left) || is_palm_open(right);

        // Sustained shift poses; requests pulse on the rising edge only
        self.left_shift_active = is_index_only(left);
        self.right_shift_active = is_index_only(right);
        self.shift_down_requested = self.left_shift_active && !self.prev_left_shift_active;
        self.shift_up_requested = self.right_shift_active && !self.prev_right_shift_active;
        self.prev_left_shift_active = self.left_shift_active;
        self.prev_right_shift_active = self.right_shift_active;

        // Boost is left-hand only and continuous at this layer
        self.boosting = is_thumbs_up(left);

        let slope = steering_slope(left.wrist(), right.wrist());
        self.steer = if self.braking { 0.0 } else { slope };

        // Question-mode history must not survive into driving
        self.prev_wrist_y = None;
        self.prev_index_closed = false;
        self.swipe = None;
        self.question_select_requested = false;
    }

    fn update_question_mode(&mut self, frame: &HandFrame) {
        // Driving outputs are forced neutral in question mode
        self.steer = 0.0;
        self.braking = false;
        self.boosting = false;
        self.left_shift_active = false;
        self.right_shift_active = false;
        self.prev_left_shift_active = false;
        self.prev_right_shift_active = false;
        self.shift_up_requested = false;
        self.shift_down_requested = false;

        let Some(hand) = frame.primary() else {
            return;
        };
        let wrist_y = hand.landmarks.wrist().y;

        // Swipes need a live previous sample; the first post-reset frame
        // cannot trigger one.
        if let Some(prev_y) = self.prev_wrist_y {
            let dy = prev_y - wrist_y;
            if dy > SWIPE_THRESHOLD {
                self.swipe = Some(SwipeDirection::Up);
            } else if dy < -SWIPE_THRESHOLD {
                self.swipe = Some(SwipeDirection::Down);
            }
        }
        self.prev_wrist_y = Some(wrist_y);

        let closed = is_index_closed(&hand.landmarks);
        if closed && !self.prev_index_closed {
            self.question_select_requested = true;
        }
        self.prev_index_closed = closed;
    }
}
