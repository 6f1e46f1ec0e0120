//! Capital factor: fund flow level and persistence.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{FactorKind, FactorScore};
use crate::domain::MoneyFlowBar;
use crate::indicators::{moving_average, positive_run_ratio};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapitalComponents {
    pub board: String,
    pub avg_net_inflow: f64,
    pub avg_main_inflow: f64,
    /// `avg_main_inflow / avg_net_inflow`, 0 when net is 0.
    pub main_ratio: f64,
    /// Longest positive net-inflow streak over the bar count.
    pub continuity: f64,
}

impl FactorScore for CapitalComponents {
    fn kind(&self) -> FactorKind {
        FactorKind::Capital
    }

    fn score(&self) -> f64 {
        (self.avg_net_inflow * 0.6 + self.avg_main_inflow * 0.4) / 1_000_000.0
            + self.continuity * 2.0
    }
}

pub fn compute_capital(
    flows: &BTreeMap<String, Vec<MoneyFlowBar>>,
) -> BTreeMap<String, CapitalComponents> {
    flows
        .iter()
        .filter(|(_, bars)| !bars.is_empty())
        .map(|(code, bars)| {
            let net: Vec<f64> = bars.iter().map(|b| b.net_inflow).collect();
            let main: Vec<f64> = bars.iter().map(|b| b.main_inflow).collect();
            let avg_net_inflow = moving_average(&net);
            let avg_main_inflow = moving_average(&main);
            let main_ratio = if avg_net_inflow == 0.0 {
                0.0
            } else {
                avg_main_inflow / avg_net_inflow
            };
            let components = CapitalComponents {
                board: code.clone(),
                avg_net_inflow,
                avg_main_inflow,
                main_ratio,
                continuity: positive_run_ratio(&net),
            };
            (code.clone(), components)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};
    use chrono::NaiveDate;

    fn flows(board: &str, rows: &[(f64, f64)]) -> Vec<MoneyFlowBar> {
        let start = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        rows.iter()
            .enumerate()
            .map(|(i, &(net_inflow, main_inflow))| MoneyFlowBar {
                board: board.into(),
                date: start + chrono::Duration::days(i as i64),
                net_inflow,
                main_inflow,
            })
            .collect()
    }

    #[test]
    fn averages_ratio_and_continuity() {
        let mut series = BTreeMap::new();
        series.insert(
            "BK001".to_string(),
            flows(
                "BK001",
                &[
                    (2_000_000.0, 1_000_000.0),
                    (-1_000_000.0, -500_000.0),
                    (3_000_000.0, 2_000_000.0),
                    (4_000_000.0, 1_500_000.0),
                ],
            ),
        );

        let c = &compute_capital(&series)["BK001"];
        assert_approx(c.avg_net_inflow, 2_000_000.0, DEFAULT_EPSILON);
        assert_approx(c.avg_main_inflow, 1_000_000.0, DEFAULT_EPSILON);
        assert_approx(c.main_ratio, 0.5, DEFAULT_EPSILON);
        // longest positive run is 2 of 4
        assert_approx(c.continuity, 0.5, DEFAULT_EPSILON);
        // (1.2 + 0.4) + 1.0
        assert_approx(c.score(), 2.6, 1e-9);
    }

    #[test]
    fn zero_net_gives_zero_ratio() {
        let mut series = BTreeMap::new();
        series.insert(
            "BK002".to_string(),
            flows("BK002", &[(1_000.0, 500.0), (-1_000.0, 200.0)]),
        );
        let c = &compute_capital(&series)["BK002"];
        assert_eq!(c.avg_net_inflow, 0.0);
        assert_eq!(c.main_ratio, 0.0);
    }

    #[test]
    fn more_inflow_scores_higher() {
        let mut series = BTreeMap::new();
        series.insert("LOW".to_string(), flows("LOW", &[(1e6, 1e6)]));
        series.insert("HIGH".to_string(), flows("HIGH", &[(5e6, 5e6)]));
        let out = compute_capital(&series);
        assert!(out["HIGH"].score() > out["LOW"].score());
    }
}
