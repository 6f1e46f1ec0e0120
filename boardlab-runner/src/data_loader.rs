//! Market data loading for the runner.
//!
//! Resolves the board catalog and fetches every series for a run. Fallback
//! policy, applied per series:
//! 1. If the primary provider is available and returns data → use it
//! 2. If it fails and a fallback provider is configured → use the fallback
//!    (logged, and the result is tagged `has_synthetic`)
//! 3. If the failure is `NotFound` → the series is absent from the maps
//! 4. Otherwise → fail with the provider error
//!
//! Loaded series are validated (one bar per date, inside the window, finite
//! values) before return.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use boardlab_core::domain::{
    check_finite, check_series, Board, BoardCategory, ComponentQuote, HotBar, MoneyFlowBar, PriceBar,
    SeriesError, StockBar,
};

use crate::config::AnalysisConfig;
pub use crate::provider::{BoardDataProvider, DataError};

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("board '{0}' not found in catalog")]
    BoardNotFound(String),

    #[error("no boards in catalog for categories {categories:?}")]
    EmptyCatalog { categories: Vec<BoardCategory> },

    #[error("data error: {0}")]
    Data(#[from] DataError),

    #[error("invalid series: {0}")]
    Series(#[from] SeriesError),
}

/// Everything one analysis run reads, keyed by board code or symbol.
///
/// Absent series are missing keys, never empty vectors.
#[derive(Debug, Clone, Default)]
pub struct MarketData {
    /// Catalog boards analysed, in catalog order.
    pub boards: Vec<Board>,
    pub prices: BTreeMap<String, Vec<PriceBar>>,
    pub money_flow: BTreeMap<String, Vec<MoneyFlowBar>>,
    pub hot: BTreeMap<String, Vec<HotBar>>,
    pub quotes: BTreeMap<String, Vec<ComponentQuote>>,
    /// Member histories keyed by symbol.
    pub stock_history: BTreeMap<String, Vec<StockBar>>,
    /// Benchmark index bars, when a reference index is configured.
    pub reference: Option<Vec<PriceBar>>,
    /// Boards with at least one series served by the fallback provider.
    pub fallback_boards: BTreeSet<String>,
    /// Whether any series came from the fallback provider.
    pub has_synthetic: bool,
    /// BLAKE3 hash over all loaded data.
    pub dataset_hash: String,
}

impl MarketData {
    /// Board code → display name.
    pub fn names(&self) -> BTreeMap<String, String> {
        self.boards
            .iter()
            .map(|b| (b.code.clone(), b.name.clone()))
            .collect()
    }

    pub fn board(&self, code: &str) -> Result<&Board, LoadError> {
        self.boards
            .iter()
            .find(|b| b.code == code)
            .ok_or_else(|| LoadError::BoardNotFound(code.to_string()))
    }

    /// Check every series is strictly date-ordered, inside `[start, end]` and
    /// finite, and every quote snapshot is finite.
    pub fn validate(&self, start: NaiveDate, end: NaiveDate) -> Result<(), SeriesError> {
        for (code, bars) in &self.prices {
            check_series(code, bars, start, end)?;
        }
        for (code, bars) in &self.money_flow {
            check_series(code, bars, start, end)?;
        }
        for (code, bars) in &self.hot {
            check_series(code, bars, start, end)?;
        }
        for (code, quotes) in &self.quotes {
            check_finite(code, quotes)?;
        }
        for (symbol, bars) in &self.stock_history {
            check_series(symbol, bars, start, end)?;
        }
        if let Some(bars) = &self.reference {
            check_series("reference", bars, start, end)?;
        }
        Ok(())
    }

    /// Recompute `dataset_hash` from the loaded series.
    pub fn rehash(&mut self) {
        self.dataset_hash = compute_dataset_hash(self);
    }
}

enum Fetched<T> {
    Primary(T),
    Fallback(T),
    Absent,
}

impl<T> Fetched<T> {
    fn used_fallback(&self) -> bool {
        matches!(self, Fetched::Fallback(_))
    }

    fn into_option(self) -> Option<T> {
        match self {
            Fetched::Primary(v) | Fetched::Fallback(v) => Some(v),
            Fetched::Absent => None,
        }
    }
}

#[derive(Clone, Copy)]
struct Sources<'a> {
    primary: &'a dyn BoardDataProvider,
    fallback: Option<&'a dyn BoardDataProvider>,
}

impl<'a> Sources<'a> {
    fn fetch<T>(
        &self,
        kind: &'static str,
        id: &str,
        f: impl Fn(&dyn BoardDataProvider) -> Result<T, DataError>,
    ) -> Result<Fetched<T>, DataError> {
        let primary_err = if self.primary.is_available() {
            match f(self.primary) {
                Ok(v) => return Ok(Fetched::Primary(v)),
                Err(e) => e,
            }
        } else {
            DataError::Unavailable(self.primary.name().to_string())
        };

        match self.fallback {
            Some(fallback) => {
                warn!(
                    id,
                    kind,
                    provider = fallback.name(),
                    error = %primary_err,
                    "primary provider failed, using fallback data"
                );
                match f(fallback) {
                    Ok(v) => Ok(Fetched::Fallback(v)),
                    Err(e) if e.is_not_found() => {
                        debug!(id, kind, "no data from fallback provider");
                        Ok(Fetched::Absent)
                    }
                    Err(e) => Err(e),
                }
            }
            None if primary_err.is_not_found() => {
                debug!(id, kind, "no data");
                Ok(Fetched::Absent)
            }
            None => Err(primary_err),
        }
    }
}

struct BoardSeries {
    code: String,
    prices: Option<Vec<PriceBar>>,
    money_flow: Option<Vec<MoneyFlowBar>>,
    hot: Option<Vec<HotBar>>,
    quotes: Option<Vec<ComponentQuote>>,
    used_fallback: bool,
}

fn fetch_board(
    sources: Sources<'_>,
    code: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<BoardSeries, DataError> {
    let prices = sources.fetch("prices", code, |p| p.board_prices(code, start, end))?;
    let money_flow = sources.fetch("money flow", code, |p| p.money_flow(code, start, end))?;
    let hot = sources.fetch("hot metrics", code, |p| p.hot_metrics(code, start, end))?;
    let quotes = sources.fetch("quotes", code, |p| p.component_quotes(code, end))?;

    let used_fallback = prices.used_fallback()
        || money_flow.used_fallback()
        || hot.used_fallback()
        || quotes.used_fallback();

    Ok(BoardSeries {
        code: code.to_string(),
        prices: prices.into_option(),
        money_flow: money_flow.into_option(),
        hot: hot.into_option(),
        quotes: quotes.into_option(),
        used_fallback,
    })
}

fn insert_non_empty<T>(map: &mut BTreeMap<String, Vec<T>>, key: &str, series: Option<Vec<T>>) {
    if let Some(series) = series.filter(|s| !s.is_empty()) {
        map.insert(key.to_string(), series);
    }
}

/// Load every series a run needs, with per-series fallback.
///
/// This is the primary entry point for the pipeline to get market data.
pub fn load_market_data(
    primary: &dyn BoardDataProvider,
    fallback: Option<&dyn BoardDataProvider>,
    config: &AnalysisConfig,
) -> Result<MarketData, LoadError> {
    let sources = Sources { primary, fallback };
    let (start, end) = (config.start_date, config.end_date);

    let catalog = sources.fetch("catalog", "boards", |p| p.list_boards(&config.categories))?;
    let catalog_fallback = catalog.used_fallback();
    let catalog = catalog.into_option().unwrap_or_default();
    let boards: Vec<Board> = catalog.into_iter().take(config.board_count).collect();
    if boards.is_empty() {
        return Err(LoadError::EmptyCatalog {
            categories: config.categories.clone(),
        });
    }
    info!(
        boards = boards.len(),
        provider = primary.name(),
        %start,
        %end,
        "loading market data"
    );

    let fetched = boards
        .par_iter()
        .map(|board| fetch_board(sources, &board.code, start, end))
        .collect::<Result<Vec<_>, DataError>>()?;

    let mut market = MarketData {
        boards,
        ..MarketData::default()
    };
    for series in fetched {
        if series.used_fallback {
            market.fallback_boards.insert(series.code.clone());
        }
        insert_non_empty(&mut market.prices, &series.code, series.prices);
        insert_non_empty(&mut market.money_flow, &series.code, series.money_flow);
        insert_non_empty(&mut market.hot, &series.code, series.hot);
        if let Some(mut quotes) = series.quotes.filter(|q| !q.is_empty()) {
            ComponentQuote::assign_turnover_shares(&mut quotes);
            market.quotes.insert(series.code, quotes);
        }
    }

    let symbols: BTreeSet<String> = market
        .quotes
        .values()
        .flatten()
        .map(|q| q.symbol.clone())
        .collect();
    let histories = symbols
        .par_iter()
        .map(|symbol| {
            sources
                .fetch("stock history", symbol, |p| p.stock_history(symbol, start, end))
                .map(|f| (symbol.clone(), f))
        })
        .collect::<Result<Vec<_>, DataError>>()?;
    let mut stock_fallback = false;
    for (symbol, history) in histories {
        stock_fallback |= history.used_fallback();
        insert_non_empty(&mut market.stock_history, &symbol, history.into_option());
    }

    let mut reference_fallback = false;
    if let Some(index) = &config.reference_index {
        let fetched = sources.fetch("index", index, |p| p.index_prices(index, start, end))?;
        reference_fallback = fetched.used_fallback();
        market.reference = fetched.into_option().filter(|bars| !bars.is_empty());
    }

    market.has_synthetic = catalog_fallback
        || !market.fallback_boards.is_empty()
        || stock_fallback
        || reference_fallback;
    market.validate(start, end)?;
    market.rehash();

    info!(
        prices = market.prices.len(),
        quotes = market.quotes.len(),
        stocks = market.stock_history.len(),
        has_synthetic = market.has_synthetic,
        "market data loaded"
    );
    Ok(market)
}

/// Deterministic BLAKE3 hash over all loaded data, in key order.
fn compute_dataset_hash(market: &MarketData) -> String {
    let mut hasher = blake3::Hasher::new();

    for board in &market.boards {
        hasher.update(board.code.as_bytes());
        hasher.update(board.category.as_str().as_bytes());
    }
    for (code, bars) in &market.prices {
        hasher.update(b"prices");
        hasher.update(code.as_bytes());
        for bar in bars {
            hasher.update(bar.date.to_string().as_bytes());
            hasher.update(&bar.close.to_le_bytes());
            hasher.update(&bar.change_pct.to_le_bytes());
            hasher.update(&bar.volume.to_le_bytes());
            hasher.update(&bar.turnover.to_le_bytes());
            hasher.update(&bar.turnover_rate.to_le_bytes());
        }
    }
    for (code, bars) in &market.money_flow {
        hasher.update(b"money_flow");
        hasher.update(code.as_bytes());
        for bar in bars {
            hasher.update(bar.date.to_string().as_bytes());
            hasher.update(&bar.net_inflow.to_le_bytes());
            hasher.update(&bar.main_inflow.to_le_bytes());
        }
    }
    for (code, bars) in &market.hot {
        hasher.update(b"hot");
        hasher.update(code.as_bytes());
        for bar in bars {
            hasher.update(bar.date.to_string().as_bytes());
            hasher.update(&bar.hot_score.to_le_bytes());
            hasher.update(&bar.mentions.to_le_bytes());
        }
    }
    for (code, quotes) in &market.quotes {
        hasher.update(b"quotes");
        hasher.update(code.as_bytes());
        for q in quotes {
            hasher.update(q.symbol.as_bytes());
            hasher.update(&q.last_price.to_le_bytes());
            hasher.update(&q.pct_change.to_le_bytes());
            hasher.update(&q.turnover.to_le_bytes());
            hasher.update(&q.turnover_rate.to_le_bytes());
        }
    }
    for (symbol, bars) in &market.stock_history {
        hasher.update(b"stocks");
        hasher.update(symbol.as_bytes());
        for bar in bars {
            hasher.update(bar.date.to_string().as_bytes());
            hasher.update(&bar.close.to_le_bytes());
            hasher.update(&bar.turnover_rate.to_le_bytes());
        }
    }
    if let Some(bars) = &market.reference {
        hasher.update(b"reference");
        for bar in bars {
            hasher.update(bar.date.to_string().as_bytes());
            hasher.update(&bar.close.to_le_bytes());
        }
    }

    hasher.finalize().to_hex().to_string()
}
