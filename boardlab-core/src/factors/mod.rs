//! Factor computers.
//!
//! Four factor families turn one category of per-board series into a small
//! components record with a derived score:
//! - **Trend**: windowed returns, moving-average gap, excess return vs. an index
//! - **Hype**: hot score / mentions levels and momentum
//! - **Capital**: net and main-fund inflow, inflow streak continuity
//! - **Leader**: strongest constituents of the board
//!
//! A fifth record, **Rotation**, is combined from the other four.
//!
//! The family is closed: `FactorKind` enumerates it and every components type
//! implements `FactorScore`, so the ranking model is written once against the
//! trait rather than per factor.

pub mod capital;
pub mod hype;
pub mod leader;
pub mod rotation;
pub mod trend;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use capital::{compute_capital, CapitalComponents};
pub use hype::{compute_hype, HypeComponents};
pub use leader::{
    compute_leaders, LeaderCandidate, LeaderComponents, LeaderOutput, LeaderParams,
    DEFAULT_LIMIT_UP_THRESHOLD,
};
pub use rotation::{compute_rotation, RotationComponents};
pub use trend::{compute_trend, TrendComponents};

/// The four factor families that feed the strength score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactorKind {
    Trend,
    Hype,
    Capital,
    Leader,
}

impl FactorKind {
    pub const ALL: [FactorKind; 4] = [Self::Trend, Self::Hype, Self::Capital, Self::Leader];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trend => "trend",
            Self::Hype => "hype",
            Self::Capital => "capital",
            Self::Leader => "leader",
        }
    }
}

/// Uniform accessor over every factor components record.
///
/// `score()` is a fixed linear combination of the record's own fields.
pub trait FactorScore {
    fn kind(&self) -> FactorKind;
    fn score(&self) -> f64;
}

/// Tagged variant over the four factor records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "factor", rename_all = "lowercase")]
pub enum FactorComponents {
    Trend(TrendComponents),
    Hype(HypeComponents),
    Capital(CapitalComponents),
    Leader(LeaderComponents),
}

impl FactorScore for FactorComponents {
    fn kind(&self) -> FactorKind {
        match self {
            Self::Trend(_) => FactorKind::Trend,
            Self::Hype(_) => FactorKind::Hype,
            Self::Capital(_) => FactorKind::Capital,
            Self::Leader(_) => FactorKind::Leader,
        }
    }

    fn score(&self) -> f64 {
        match self {
            Self::Trend(c) => c.score(),
            Self::Hype(c) => c.score(),
            Self::Capital(c) => c.score(),
            Self::Leader(c) => c.score(),
        }
    }
}

/// All factor outputs of one run, keyed by board code.
///
/// `BTreeMap` keeps iteration order independent of how the maps were built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactorSet {
    pub trend: BTreeMap<String, TrendComponents>,
    pub hype: BTreeMap<String, HypeComponents>,
    pub capital: BTreeMap<String, CapitalComponents>,
    pub leader: BTreeMap<String, LeaderComponents>,
}

impl FactorSet {
    /// Boards present in Trend ∩ Hype ∩ Capital, ascending by code.
    pub fn scored_boards(&self) -> Vec<&str> {
        self.trend
            .keys()
            .filter(|code| self.hype.contains_key(*code) && self.capital.contains_key(*code))
            .map(|code| code.as_str())
            .collect()
    }

    /// The four components of a board, with the empty Leader sentinel filled in.
    ///
    /// Returns `None` unless Trend, Hype and Capital all exist for the board.
    pub fn components_for(&self, board: &str) -> Option<[FactorComponents; 4]> {
        let trend = self.trend.get(board)?;
        let hype = self.hype.get(board)?;
        let capital = self.capital.get(board)?;
        let leader = self
            .leader
            .get(board)
            .cloned()
            .unwrap_or_else(|| LeaderComponents::empty(board));
        Some([
            FactorComponents::Trend(trend.clone()),
            FactorComponents::Hype(hype.clone()),
            FactorComponents::Capital(capital.clone()),
            FactorComponents::Leader(leader),
        ])
    }
}
