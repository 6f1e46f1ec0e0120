//! Hype factor: attention level and momentum.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{FactorKind, FactorScore};
use crate::domain::HotBar;
use crate::indicators::{moving_average, rate_of_change};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HypeComponents {
    pub board: String,
    pub avg_hot_score: f64,
    pub avg_mentions: f64,
    /// Rate of change of the hot score over the window.
    pub hot_momentum: f64,
    /// Rate of change of mentions over the window.
    pub mentions_change: f64,
}

impl FactorScore for HypeComponents {
    fn kind(&self) -> FactorKind {
        FactorKind::Hype
    }

    fn score(&self) -> f64 {
        self.avg_hot_score * 0.1
            + self.avg_mentions / 1_000.0
            + self.hot_momentum * 2.0
            + self.mentions_change * 1.5
    }
}

pub fn compute_hype(hot: &BTreeMap<String, Vec<HotBar>>) -> BTreeMap<String, HypeComponents> {
    hot.iter()
        .filter(|(_, bars)| !bars.is_empty())
        .map(|(code, bars)| {
            let scores: Vec<f64> = bars.iter().map(|b| b.hot_score).collect();
            let mentions: Vec<f64> = bars.iter().map(|b| b.mentions).collect();
            let components = HypeComponents {
                board: code.clone(),
                avg_hot_score: moving_average(&scores),
                avg_mentions: moving_average(&mentions),
                hot_momentum: rate_of_change(&scores),
                mentions_change: rate_of_change(&mentions),
            };
            (code.clone(), components)
        })
        .collect()
}
