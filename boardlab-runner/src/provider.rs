//! Data provider trait and structured error types.
//!
//! The `BoardDataProvider` trait abstracts over data sources (CSV directory,
//! synthetic generator) so the loader can swap implementations and tests can
//! mock them. Calls are synchronous, one identifier at a time, and carry no
//! caching assumption.

use chrono::NaiveDate;
use thiserror::Error;

use boardlab_core::domain::{
    Board, BoardCategory, ComponentQuote, HotBar, MoneyFlowBar, PriceBar, StockBar,
};

#[derive(Debug, Error)]
pub enum DataError {
    /// No data for the identifier. Treated as absence, not failure.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("parse error: {0}")]
    Parse(String),
}

impl DataError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Source of board catalog entries and dated series.
///
/// Every series method returns bars for one identifier over `[start, end]`.
pub trait BoardDataProvider: Send + Sync {
    /// Human-readable provider name, recorded with loaded data.
    fn name(&self) -> &str;

    /// Whether the provider can serve requests right now.
    fn is_available(&self) -> bool {
        true
    }

    /// Catalog boards in the given categories, in catalog order.
    fn list_boards(&self, categories: &[BoardCategory]) -> Result<Vec<Board>, DataError>;

    fn board_prices(
        &self,
        board: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, DataError>;

    fn money_flow(
        &self,
        board: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<MoneyFlowBar>, DataError>;

    fn hot_metrics(
        &self,
        board: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<HotBar>, DataError>;

    /// Member snapshot of a board as of `as_of`.
    fn component_quotes(&self, board: &str, as_of: NaiveDate)
        -> Result<Vec<ComponentQuote>, DataError>;

    fn stock_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<StockBar>, DataError>;

    fn index_prices(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, DataError>;
}
