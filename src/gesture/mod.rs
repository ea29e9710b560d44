//! Hand-landmark data model and stateless gesture classifiers
//!
//! - `landmarks`: the 21-point hand skeleton, handedness, per-frame hand sets
//! - `classify`: pure per-frame predicates (palm-open, thumbs-up, index poses)
//!   and the steering-slope estimator

pub mod classify;
pub mod landmarks;

pub use classify::{
    is_index_closed, is_index_only, is_palm_open, is_thumbs_up, steering_slope,
};
pub use landmarks::{DetectedHand, HandFrame, HandLandmarks, Handedness};
