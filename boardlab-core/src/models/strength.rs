//! Strength ranking: weighted composite of the factor scores.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::factors::{FactorComponents, FactorKind, FactorScore, FactorSet};
use crate::weights::FactorWeights;

/// Weighted contribution of each factor to a board's score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StrengthBreakdown {
    pub trend: f64,
    pub hype: f64,
    pub capital: f64,
    pub leader: f64,
}

impl StrengthBreakdown {
    /// Weight each component by its factor's weight.
    pub fn from_components(components: &[FactorComponents], weights: &FactorWeights) -> Self {
        let mut breakdown = Self::default();
        for component in components {
            let value = component.score() * weights.weight_for(component.kind());
            match component.kind() {
                FactorKind::Trend => breakdown.trend = value,
                FactorKind::Hype => breakdown.hype = value,
                FactorKind::Capital => breakdown.capital = value,
                FactorKind::Leader => breakdown.leader = value,
            }
        }
        breakdown
    }

    pub fn total(&self) -> f64 {
        self.trend + self.hype + self.capital + self.leader
    }

    /// Name → value view for persistence and reports.
    pub fn as_map(&self) -> BTreeMap<String, f64> {
        BTreeMap::from([
            ("trend".to_string(), self.trend),
            ("hype".to_string(), self.hype),
            ("capital".to_string(), self.capital),
            ("leader".to_string(), self.leader),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardScore {
    pub board: String,
    pub name: String,
    pub score: f64,
    pub breakdown: StrengthBreakdown,
}

/// Rank boards present in Trend ∩ Hype ∩ Capital by weighted score.
///
/// A board without Leader components uses the empty sentinel. The sort is
/// stable over ascending board codes, so equal scores stay in code order.
/// Names fall back to the board code.
pub fn rank_boards(
    factors: &FactorSet,
    names: &BTreeMap<String, String>,
    weights: &FactorWeights,
) -> Vec<BoardScore> {
    let mut scores: Vec<BoardScore> = factors
        .scored_boards()
        .into_iter()
        .filter_map(|board| {
            let components = factors.components_for(board)?;
            let breakdown = StrengthBreakdown::from_components(&components, weights);
            Some(BoardScore {
                board: board.to_string(),
                name: names.get(board).cloned().unwrap_or_else(|| board.to_string()),
                score: breakdown.total(),
                breakdown,
            })
        })
        .collect();

    scores.sort_by(|a, b| b.score.total_cmp(&a.score));
    debug!(boards = scores.len(), "ranked boards by strength");
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factors::test_support::*;
    use crate::factors::LeaderComponents;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    fn set_with(boards: &[(&str, f64, f64, f64)]) -> FactorSet {
        let mut set = FactorSet::default();
        for &(code, trend, hype, capital) in boards {
            set.trend.insert(code.into(), trend_with_score(trend));
            set.hype.insert(code.into(), hype_with_score(hype));
            set.capital.insert(code.into(), capital_with_score(capital));
        }
        set
    }

    #[test]
    fn breakdown_sums_to_score() {
        let set = set_with(&[("A", 30.0, 5.0, 2.0), ("B", 10.0, 5.0, 2.0)]);
        let ranked = rank_boards(&set, &BTreeMap::new(), &FactorWeights::default());
        for score in &ranked {
            assert_approx(score.breakdown.total(), score.score, 1e-9);
        }
    }

    #[test]
    fn equal_weights_rank_a_over_b() {
        let set = set_with(&[("B", 10.0, 5.0, 2.0), ("A", 30.0, 5.0, 2.0)]);
        let ranked = rank_boards(&set, &BTreeMap::new(), &FactorWeights::uniform());
        assert_eq!(ranked[0].board, "A");
        assert_approx(ranked[0].score, 37.0, 1e-9);
        assert_approx(ranked[1].score, 17.0, 1e-9);
    }

    #[test]
    fn ties_resolve_by_board_code() {
        let set = set_with(&[
            ("BK003", 1.0, 1.0, 1.0),
            ("BK001", 1.0, 1.0, 1.0),
            ("BK002", 1.0, 1.0, 1.0),
        ]);
        let ranked = rank_boards(&set, &BTreeMap::new(), &FactorWeights::default());
        let order: Vec<&str> = ranked.iter().map(|s| s.board.as_str()).collect();
        assert_eq!(order, vec!["BK001", "BK002", "BK003"]);
    }

    #[test]
    fn leader_component_is_weighted() {
        let mut set = set_with(&[("A", 0.0, 0.0, 0.0)]);
        set.leader.insert(
            "A".into(),
            LeaderComponents {
                board: "A".into(),
                limit_up_count: 1,
                ..LeaderComponents::default()
            },
        );
        let weights = FactorWeights {
            leader: 2.0,
            ..FactorWeights::default()
        };
        let ranked = rank_boards(&set, &BTreeMap::new(), &weights);
        assert_approx(ranked[0].breakdown.leader, 30.0, DEFAULT_EPSILON);
    }

    #[test]
    fn name_lookup_falls_back_to_code() {
        let set = set_with(&[("BK001", 1.0, 1.0, 1.0), ("BK002", 1.0, 1.0, 1.0)]);
        let names = BTreeMap::from([("BK001".to_string(), "Semiconductors".to_string())]);
        let ranked = rank_boards(&set, &names, &FactorWeights::default());
        assert_eq!(ranked[0].name, "Semiconductors");
        assert_eq!(ranked[1].name, "BK002");
    }

    #[test]
    fn board_missing_hype_is_not_ranked() {
        let mut set = set_with(&[("A", 1.0, 1.0, 1.0)]);
        set.trend.insert("B".into(), trend_with_score(50.0));
        set.capital.insert("B".into(), capital_with_score(50.0));
        let ranked = rank_boards(&set, &BTreeMap::new(), &FactorWeights::default());
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn as_map_has_four_named_entries() {
        let breakdown = StrengthBreakdown {
            trend: 1.0,
            hype: 2.0,
            capital: 3.0,
            leader: 4.0,
        };
        let map = breakdown.as_map();
        assert_eq!(map.len(), 4);
        assert_eq!(map["capital"], 3.0);
    }
}
