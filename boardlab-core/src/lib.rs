//! BoardLab Core: board domain types, factor computers, ranking, rotation
//! prediction, selection and regime sizing.
//!
//! Everything in this crate is a pure function over in-memory collections:
//! - Domain records (boards, dated bar series, component quotes)
//! - Indicator primitives over `&[f64]` windows
//! - Factor computers (trend, hype, capital, leader) and the rotation combiner
//! - Strength ranking and rotation prediction models
//! - Board / leader selection, market regime and allocation
//!
//! Every keyed output is a `BTreeMap` and every sort has a fully specified
//! key, so results are identical across runs and thread schedules.

pub mod domain;
pub mod factors;
pub mod indicators;
pub mod models;
pub mod strategy;
pub mod weights;

pub use factors::{FactorComponents, FactorKind, FactorScore, FactorSet};
pub use models::{BoardScore, RotationCandidate};
pub use strategy::{Regime, RegimeSummary};
pub use weights::{FactorWeights, RotationWeights, WeightError};
