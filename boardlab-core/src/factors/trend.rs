//! Trend factor: windowed returns of the board index.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{FactorKind, FactorScore};
use crate::domain::PriceBar;
use crate::indicators::{trailing_mean, window_return};

/// Price momentum of one board over the window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendComponents {
    pub board: String,
    pub return_3d: f64,
    pub return_5d: f64,
    pub return_10d: f64,
    /// Mean of the last 5 closes minus mean of the last 10.
    pub ma_gap: f64,
    /// 10-bar return minus the reference index's 10-bar return.
    pub excess_return: f64,
}

impl FactorScore for TrendComponents {
    fn kind(&self) -> FactorKind {
        FactorKind::Trend
    }

    fn score(&self) -> f64 {
        self.return_3d * 20.0
            + self.return_5d * 30.0
            + self.return_10d * 40.0
            + self.excess_return * 20.0
            + self.ma_gap
    }
}

/// Compute trend components per board.
///
/// `reference` is the benchmark index series; without it the excess return is 0.
pub fn compute_trend(
    prices: &BTreeMap<String, Vec<PriceBar>>,
    reference: Option<&[PriceBar]>,
) -> BTreeMap<String, TrendComponents> {
    let reference_return = reference
        .map(|bars| {
            let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
            window_return(&closes, 10)
        })
        .unwrap_or(0.0);

    prices
        .iter()
        .filter(|(_, bars)| !bars.is_empty())
        .map(|(code, bars)| {
            let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
            let return_10d = window_return(&closes, 10);
            let excess_return = if reference.is_some() {
                return_10d - reference_return
            } else {
                0.0
            };
            let components = TrendComponents {
                board: code.clone(),
                return_3d: window_return(&closes, 3),
                return_5d: window_return(&closes, 5),
                return_10d,
                ma_gap: trailing_mean(&closes, 5) - trailing_mean(&closes, 10),
                excess_return,
            };
            (code.clone(), components)
        })
        .collect()
}
