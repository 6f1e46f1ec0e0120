//! Bars: the dated records supplied by the data collaborators.
//!
//! One bar per (entity, date). Series are ordered by date, fall inside the
//! requested window and hold finite values; `series::check_series` enforces
//! that at pipeline entry.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::series::{Dated, Measured};

/// Daily board index bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub board: String,
    pub date: NaiveDate,
    pub close: f64,
    /// Percent change vs. previous close (5.0 = +5%).
    pub change_pct: f64,
    pub volume: f64,
    pub turnover: f64,
    pub turnover_rate: f64,
}

/// Daily board money flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoneyFlowBar {
    pub board: String,
    pub date: NaiveDate,
    pub net_inflow: f64,
    pub main_inflow: f64,
}

/// Daily board popularity / sentiment proxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotBar {
    pub board: String,
    pub date: NaiveDate,
    pub hot_score: f64,
    pub mentions: f64,
}

/// Daily bar of a single board member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockBar {
    pub symbol: String,
    pub date: NaiveDate,
    pub close: f64,
    pub turnover_rate: f64,
}

/// Reference-day quote of one board member.
///
/// `turnover_share` is the member's turnover divided by the board's total
/// turnover on that day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentQuote {
    pub board: String,
    pub symbol: String,
    pub name: String,
    pub last_price: f64,
    pub pct_change: f64,
    pub turnover: f64,
    pub turnover_rate: f64,
    pub turnover_share: f64,
}

impl ComponentQuote {
    /// Fill `turnover_share` for a board snapshot from raw turnover values.
    ///
    /// A zero total is treated as 1 so shares stay finite.
    pub fn assign_turnover_shares(quotes: &mut [ComponentQuote]) {
        let total: f64 = quotes.iter().map(|q| q.turnover).sum();
        let denom = if total == 0.0 { 1.0 } else { total };
        for quote in quotes.iter_mut() {
            quote.turnover_share = quote.turnover / denom;
        }
    }
}

impl Dated for PriceBar {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for MoneyFlowBar {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for HotBar {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for StockBar {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Measured for PriceBar {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("close", self.close),
            ("change_pct", self.change_pct),
            ("volume", self.volume),
            ("turnover", self.turnover),
            ("turnover_rate", self.turnover_rate),
        ]
    }
}

impl Measured for MoneyFlowBar {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![("net_inflow", self.net_inflow), ("main_inflow", self.main_inflow)]
    }
}

impl Measured for HotBar {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![("hot_score", self.hot_score), ("mentions", self.mentions)]
    }
}

impl Measured for StockBar {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![("close", self.close), ("turnover_rate", self.turnover_rate)]
    }
}

impl Measured for ComponentQuote {
    fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("last_price", self.last_price),
            ("pct_change", self.pct_change),
            ("turnover", self.turnover),
            ("turnover_rate", self.turnover_rate),
            ("turnover_share", self.turnover_share),
        ]
    }
}
