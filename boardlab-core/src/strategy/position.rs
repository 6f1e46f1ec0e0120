//! Market regime and equal-weight allocation.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::BoardScore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    Bullish,
    Constructive,
    Neutral,
    Defensive,
}

impl Regime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bullish => "bullish",
            Self::Constructive => "constructive",
            Self::Neutral => "neutral",
            Self::Defensive => "defensive",
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeSummary {
    pub regime: Regime,
    /// Fraction of cash to deploy.
    pub multiplier: f64,
    pub avg_strength: f64,
    pub avg_rotation: f64,
}

impl RegimeSummary {
    /// Regime reported when nothing was selected.
    pub fn empty() -> Self {
        Self {
            regime: Regime::Neutral,
            multiplier: 0.5,
            avg_strength: 0.0,
            avg_rotation: 0.0,
        }
    }
}

/// Classify the market from the selected boards' average strength and
/// next-session prediction. A board without a prediction counts as 0.
pub fn assess_market_regime(
    selected: &[BoardScore],
    predictions: &BTreeMap<String, f64>,
) -> RegimeSummary {
    if selected.is_empty() {
        return RegimeSummary::empty();
    }

    let n = selected.len() as f64;
    let avg_strength = selected.iter().map(|s| s.score).sum::<f64>() / n;
    let avg_rotation = selected
        .iter()
        .map(|s| predictions.get(&s.board).copied().unwrap_or(0.0))
        .sum::<f64>()
        / n;

    let (regime, multiplier) = if avg_strength >= 25.0 && avg_rotation >= 15.0 {
        (Regime::Bullish, 1.0)
    } else if avg_strength >= 15.0 && avg_rotation >= 8.0 {
        (Regime::Constructive, 0.8)
    } else if avg_strength <= 8.0 && avg_rotation <= 3.0 {
        (Regime::Defensive, 0.4)
    } else {
        (Regime::Neutral, 0.6)
    };

    RegimeSummary {
        regime,
        multiplier,
        avg_strength,
        avg_rotation,
    }
}

/// Split `cash * multiplier` equally across the selections.
///
/// Empty selections give an empty map; a non-positive investable amount
/// gives every board 0.
pub fn allocate_portfolio(
    cash: f64,
    selections: &[BoardScore],
    regime: &RegimeSummary,
) -> BTreeMap<String, f64> {
    if selections.is_empty() {
        return BTreeMap::new();
    }
    let investable = cash * regime.multiplier;
    let per_board = if investable <= 0.0 {
        0.0
    } else {
        investable / selections.len() as f64
    };
    selections
        .iter()
        .map(|s| (s.board.clone(), per_board))
        .collect()
}
