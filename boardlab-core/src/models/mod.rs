//! Scoring models over factor outputs.
//!
//! - `strength`: weighted composite of the four factor scores, ranked
//! - `rotation`: rotation-readiness forecasts and next-in-line candidates

pub mod rotation;
pub mod strength;

pub use rotation::{
    predict_next_session, predict_rotation_candidates, RotationBreakdown, RotationCandidate,
    DEFAULT_SMOOTHING,
};
pub use strength::{rank_boards, BoardScore, StrengthBreakdown};
