//! Leader factor: the strongest members of each board.
//!
//! Computed jointly with instrument selection: the same pass yields the
//! per-board candidate list (consumed by `strategy::select_leaders`) and the
//! aggregated board-level components (consumed by ranking and rotation).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{FactorKind, FactorScore};
use crate::domain::{ComponentQuote, StockBar};
use crate::indicators::rate_of_change;

/// Percent change at or above which a member counts as limit-up.
pub const DEFAULT_LIMIT_UP_THRESHOLD: f64 = 9.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeaderParams {
    /// Members kept per board, by percent change.
    pub top_n: usize,
    pub limit_up_threshold: f64,
}

impl Default for LeaderParams {
    fn default() -> Self {
        Self {
            top_n: 3,
            limit_up_threshold: DEFAULT_LIMIT_UP_THRESHOLD,
        }
    }
}

/// One candidate leader instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderCandidate {
    pub symbol: String,
    pub name: String,
    /// Realized return over the window (fraction).
    pub return_pct: f64,
    /// Reference-day percent change (5.0 = +5%).
    pub pct_change: f64,
    pub turnover_share: f64,
    pub is_limit_up: bool,
}

impl LeaderCandidate {
    pub fn score(&self) -> f64 {
        let limit_bonus = if self.is_limit_up { 5.0 } else { 0.0 };
        self.return_pct * 100.0 + self.turnover_share * 100.0 + self.pct_change + limit_bonus
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeaderComponents {
    pub board: String,
    pub limit_up_count: usize,
    pub leader_turnover_share: f64,
    pub avg_leader_return: f64,
    pub leader_symbols: Vec<String>,
}

impl LeaderComponents {
    /// Zero-valued components for a board without quote data.
    pub fn empty(board: &str) -> Self {
        Self {
            board: board.to_string(),
            ..Self::default()
        }
    }
}

impl FactorScore for LeaderComponents {
    fn kind(&self) -> FactorKind {
        FactorKind::Leader
    }

    fn score(&self) -> f64 {
        self.limit_up_count as f64 * 15.0
            + self.leader_turnover_share * 120.0
            + self.avg_leader_return * 90.0
    }
}

/// Candidates and aggregated components, both keyed by board code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeaderOutput {
    pub candidates: BTreeMap<String, Vec<LeaderCandidate>>,
    pub components: BTreeMap<String, LeaderComponents>,
}

/// Pick the top members per board and aggregate them.
///
/// Members are ranked by `pct_change` descending, ties by symbol ascending.
/// `stock_history` is keyed by symbol; a member without history falls back
/// to `pct_change / 100` as its realized return.
pub fn compute_leaders(
    quotes: &BTreeMap<String, Vec<ComponentQuote>>,
    stock_history: &BTreeMap<String, Vec<StockBar>>,
    params: &LeaderParams,
) -> LeaderOutput {
    let mut output = LeaderOutput::default();

    for (board, board_quotes) in quotes {
        if board_quotes.is_empty() || params.top_n == 0 {
            continue;
        }

        let mut ranked: Vec<&ComponentQuote> = board_quotes.iter().collect();
        ranked.sort_by(|a, b| {
            b.pct_change
                .total_cmp(&a.pct_change)
                .then_with(|| a.symbol.cmp(&b.symbol))
        });

        let candidates: Vec<LeaderCandidate> = ranked
            .into_iter()
            .take(params.top_n)
            .map(|quote| {
                let return_pct = match stock_history.get(&quote.symbol) {
                    Some(history) if !history.is_empty() => {
                        let closes: Vec<f64> = history.iter().map(|b| b.close).collect();
                        rate_of_change(&closes)
                    }
                    _ => quote.pct_change / 100.0,
                };
                LeaderCandidate {
                    symbol: quote.symbol.clone(),
                    name: quote.name.clone(),
                    return_pct,
                    pct_change: quote.pct_change,
                    turnover_share: quote.turnover_share,
                    is_limit_up: quote.pct_change >= params.limit_up_threshold,
                }
            })
            .collect();

        let count = candidates.len() as f64;
        let components = LeaderComponents {
            board: board.clone(),
            limit_up_count: candidates.iter().filter(|c| c.is_limit_up).count(),
            leader_turnover_share: candidates.iter().map(|c| c.turnover_share).sum(),
            avg_leader_return: candidates.iter().map(|c| c.return_pct).sum::<f64>() / count,
            leader_symbols: candidates.iter().map(|c| c.symbol.clone()).collect(),
        };

        output.candidates.insert(board.clone(), candidates);
        output.components.insert(board.clone(), components);
    }

    output
}
