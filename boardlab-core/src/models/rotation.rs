//! Rotation prediction: which boards are about to rotate in.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::strength::BoardScore;
use crate::factors::RotationComponents;
use crate::weights::RotationWeights;

/// Smoothing applied to the weighted breakdown in `predict_next_session`.
pub const DEFAULT_SMOOTHING: f64 = 0.7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RotationBreakdown {
    pub relative_lag: f64,
    pub capital_spillover: f64,
    pub hype_spillover: f64,
    pub technical_readiness: f64,
}

impl RotationBreakdown {
    pub fn weighted(components: &RotationComponents, weights: &RotationWeights) -> Self {
        Self {
            relative_lag: components.catch_up * weights.relative_lag,
            capital_spillover: components.capital_follow_through * weights.capital_spillover,
            hype_spillover: components.hype_transmission * weights.hype_spillover,
            technical_readiness: components.technical_setup * weights.technical_readiness,
        }
    }

    pub fn total(&self) -> f64 {
        self.relative_lag + self.capital_spillover + self.hype_spillover + self.technical_readiness
    }

    pub fn as_map(&self) -> BTreeMap<String, f64> {
        BTreeMap::from([
            ("relative_lag".to_string(), self.relative_lag),
            ("capital_spillover".to_string(), self.capital_spillover),
            ("hype_spillover".to_string(), self.hype_spillover),
            ("technical_readiness".to_string(), self.technical_readiness),
        ])
    }
}

/// A board ranked by rotation readiness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationCandidate {
    pub board: String,
    pub name: Option<String>,
    /// Sum of `breakdown`.
    pub predicted: f64,
    pub breakdown: RotationBreakdown,
}

/// Short-term projection per board.
///
/// `weighted_sum * smoothing + capital_follow_through + hype_transmission`,
/// boosting boards with both money and attention building.
pub fn predict_next_session(
    rotation: &BTreeMap<String, RotationComponents>,
    weights: &RotationWeights,
    smoothing: f64,
) -> BTreeMap<String, f64> {
    rotation
        .iter()
        .map(|(board, components)| {
            let base = RotationBreakdown::weighted(components, weights).total();
            let boost = components.capital_follow_through + components.hype_transmission;
            (board.clone(), base * smoothing + boost)
        })
        .collect()
}

/// Rank boards not in `strengths` by weighted rotation readiness.
///
/// With `exclude_current` false nothing is excluded. Ties resolve to board
/// code ascending. At most `top_n` candidates are returned.
pub fn predict_rotation_candidates(
    strengths: &[BoardScore],
    rotation: &BTreeMap<String, RotationComponents>,
    weights: &RotationWeights,
    names: &BTreeMap<String, String>,
    top_n: usize,
    exclude_current: bool,
) -> Vec<RotationCandidate> {
    let excluded: BTreeSet<&str> = if exclude_current {
        strengths.iter().map(|s| s.board.as_str()).collect()
    } else {
        BTreeSet::new()
    };

    let mut candidates: Vec<RotationCandidate> = rotation
        .iter()
        .filter(|(board, _)| !excluded.contains(board.as_str()))
        .map(|(board, components)| {
            let breakdown = RotationBreakdown::weighted(components, weights);
            RotationCandidate {
                board: board.clone(),
                name: names.get(board).cloned(),
                predicted: breakdown.total(),
                breakdown,
            }
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.predicted
            .total_cmp(&a.predicted)
            .then_with(|| a.board.cmp(&b.board))
    });
    candidates.truncate(top_n);
    candidates
}
