//! Rotation readiness, combined from the other factor outputs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{CapitalComponents, HypeComponents, LeaderComponents, TrendComponents};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RotationComponents {
    pub board: String,
    /// Lagging price with money already flowing in.
    pub catch_up: f64,
    pub capital_follow_through: f64,
    /// Attention rising faster than price.
    pub hype_transmission: f64,
    pub technical_setup: f64,
    pub leader_confirmation: f64,
}

impl RotationComponents {
    pub fn score(&self) -> f64 {
        self.catch_up * 40.0
            + self.capital_follow_through * 60.0
            + self.hype_transmission * 50.0
            + self.technical_setup * 30.0
            + self.leader_confirmation * 20.0
    }
}

/// Combine factor outputs into rotation components.
///
/// Only boards present in all of `trend`, `capital` and `hype` qualify; the
/// leader map is optional per board.
pub fn compute_rotation(
    trend: &BTreeMap<String, TrendComponents>,
    capital: &BTreeMap<String, CapitalComponents>,
    hype: &BTreeMap<String, HypeComponents>,
    leaders: &BTreeMap<String, LeaderComponents>,
) -> BTreeMap<String, RotationComponents> {
    trend
        .iter()
        .filter_map(|(code, t)| {
            let c = capital.get(code)?;
            let h = hype.get(code)?;
            let leader_confirmation = leaders
                .get(code)
                .map(|l| l.limit_up_count as f64 * 0.5 + l.leader_turnover_share)
                .unwrap_or(0.0);
            let components = RotationComponents {
                board: code.clone(),
                catch_up: catch_up(t, c),
                capital_follow_through: c.continuity.max(0.0),
                hype_transmission: (h.hot_momentum - t.return_5d).max(0.0)
                    + h.mentions_change.max(0.0),
                technical_setup: t.ma_gap.max(0.0),
                leader_confirmation,
            };
            Some((code.clone(), components))
        })
        .collect()
}

fn catch_up(trend: &TrendComponents, capital: &CapitalComponents) -> f64 {
    if trend.return_10d >= 0.0 || capital.avg_net_inflow <= 0.0 {
        return 0.0;
    }
    trend
        .return_10d
        .abs()
        .min(capital.avg_net_inflow / 1_000_000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    fn inputs(
        return_10d: f64,
        net: f64,
    ) -> (
        BTreeMap<String, TrendComponents>,
        BTreeMap<String, CapitalComponents>,
        BTreeMap<String, HypeComponents>,
    ) {
        let mut trend = BTreeMap::new();
        trend.insert(
            "BK001".to_string(),
            TrendComponents {
                board: "BK001".into(),
                return_5d: 0.1,
                return_10d,
                ma_gap: -0.5,
                ..TrendComponents::default()
            },
        );
        let mut capital = BTreeMap::new();
        capital.insert(
            "BK001".to_string(),
            CapitalComponents {
                board: "BK001".into(),
                avg_net_inflow: net,
                continuity: 0.4,
                ..CapitalComponents::default()
            },
        );
        let mut hype = BTreeMap::new();
        hype.insert(
            "BK001".to_string(),
            HypeComponents {
                board: "BK001".into(),
                hot_momentum: 0.3,
                mentions_change: -0.2,
                ..HypeComponents::default()
            },
        );
        (trend, capital, hype)
    }

    #[test]
    fn lagging_board_with_inflow_catches_up() {
        let (trend, capital, hype) = inputs(-0.08, 2_000_000.0);
        let out = compute_rotation(&trend, &capital, &hype, &BTreeMap::new());
        let r = &out["BK001"];
        assert_approx(r.catch_up, 0.08, DEFAULT_EPSILON);
        assert_approx(r.capital_follow_through, 0.4, DEFAULT_EPSILON);
        // max(0, 0.3 - 0.1) + max(0, -0.2)
        assert_approx(r.hype_transmission, 0.2, DEFAULT_EPSILON);
        assert_eq!(r.technical_setup, 0.0);
        assert_eq!(r.leader_confirmation, 0.0);
        // 3.2 + 24 + 10
        assert_approx(r.score(), 37.2, 1e-9);
    }

    #[test]
    fn catch_up_capped_by_inflow() {
        let (trend, capital, hype) = inputs(-0.5, 200_000.0);
        let out = compute_rotation(&trend, &capital, &hype, &BTreeMap::new());
        assert_approx(out["BK001"].catch_up, 0.2, DEFAULT_EPSILON);
    }

    #[test]
    fn no_catch_up_when_rising_or_outflow() {
        let (trend, capital, hype) = inputs(0.05, 2_000_000.0);
        let out = compute_rotation(&trend, &capital, &hype, &BTreeMap::new());
        assert_eq!(out["BK001"].catch_up, 0.0);

        let (trend, capital, hype) = inputs(-0.05, -1.0);
        let out = compute_rotation(&trend, &capital, &hype, &BTreeMap::new());
        assert_eq!(out["BK001"].catch_up, 0.0);
    }

    #[test]
    fn leader_confirmation_when_present() {
        let (trend, capital, hype) = inputs(0.0, 0.0);
        let mut leaders = BTreeMap::new();
        leaders.insert(
            "BK001".to_string(),
            LeaderComponents {
                board: "BK001".into(),
                limit_up_count: 2,
                leader_turnover_share: 0.25,
                ..LeaderComponents::default()
            },
        );
        let out = compute_rotation(&trend, &capital, &hype, &leaders);
        assert_approx(out["BK001"].leader_confirmation, 1.25, DEFAULT_EPSILON);
    }

    #[test]
    fn board_missing_a_required_factor_is_skipped() {
        let (trend, capital, _) = inputs(0.0, 0.0);
        let out = compute_rotation(&trend, &capital, &BTreeMap::new(), &BTreeMap::new());
        assert!(out.is_empty());
    }
}
