//! CSV directory provider.
//!
//! Layout under the root directory:
//!
//! ```text
//! boards.csv                code,name,category (industry/concept, any case)
//! prices/<code>.csv         date,close,change_pct,volume,turnover,turnover_rate
//! money_flow/<code>.csv     date,net_inflow,main_inflow
//! hot/<code>.csv            date,hot_score,mentions
//! quotes/<code>.csv         symbol,name,last_price,pct_change,turnover,turnover_rate
//! stocks/<symbol>.csv       date,close,turnover_rate
//! index/<symbol>.csv        same columns as prices
//! ```
//!
//! A missing file is `DataError::NotFound`. Rows are filtered to the window
//! and sorted by date.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use boardlab_core::domain::{
    Board, BoardCategory, ComponentQuote, HotBar, MoneyFlowBar, PriceBar, StockBar,
};

use crate::provider::{BoardDataProvider, DataError};

#[derive(Debug, Deserialize)]
struct BoardRow {
    code: String,
    name: String,
    category: String,
}

#[derive(Debug, Deserialize)]
struct PriceRow {
    date: NaiveDate,
    close: f64,
    change_pct: f64,
    volume: f64,
    turnover: f64,
    turnover_rate: f64,
}

#[derive(Debug, Deserialize)]
struct FlowRow {
    date: NaiveDate,
    net_inflow: f64,
    main_inflow: f64,
}

#[derive(Debug, Deserialize)]
struct HotRow {
    date: NaiveDate,
    hot_score: f64,
    mentions: f64,
}

#[derive(Debug, Deserialize)]
struct QuoteRow {
    symbol: String,
    name: String,
    last_price: f64,
    pct_change: f64,
    turnover: f64,
    turnover_rate: f64,
}

#[derive(Debug, Deserialize)]
struct StockRow {
    date: NaiveDate,
    close: f64,
    turnover_rate: f64,
}

/// Reads board data from a directory of CSV files.
#[derive(Debug, Clone)]
pub struct CsvProvider {
    root: PathBuf,
}

impl CsvProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn series_path(&self, dir: &str, id: &str) -> PathBuf {
        self.root.join(dir).join(format!("{id}.csv"))
    }

    fn read_rows<T: DeserializeOwned>(
        &self,
        path: &Path,
        kind: &'static str,
        id: &str,
    ) -> Result<Vec<T>, DataError> {
        if !path.exists() {
            return Err(DataError::not_found(kind, id));
        }
        let mut reader = csv::Reader::from_path(path)?;
        let rows = reader.deserialize().collect::<Result<Vec<T>, _>>()?;
        Ok(rows)
    }

    fn read_prices(
        &self,
        dir: &str,
        kind: &'static str,
        id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, DataError> {
        let rows: Vec<PriceRow> = self.read_rows(&self.series_path(dir, id), kind, id)?;
        let mut bars: Vec<PriceBar> = rows
            .into_iter()
            .filter(|r| r.date >= start && r.date <= end)
            .map(|r| PriceBar {
                board: id.to_string(),
                date: r.date,
                close: r.close,
                change_pct: r.change_pct,
                volume: r.volume,
                turnover: r.turnover,
                turnover_rate: r.turnover_rate,
            })
            .collect();
        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

impl BoardDataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn is_available(&self) -> bool {
        self.root.is_dir()
    }

    fn list_boards(&self, categories: &[BoardCategory]) -> Result<Vec<Board>, DataError> {
        let rows: Vec<BoardRow> = self.read_rows(&self.root.join("boards.csv"), "catalog", "boards")?;
        let mut boards = Vec::with_capacity(rows.len());
        for row in rows {
            let category: BoardCategory = row.category.parse().map_err(DataError::Parse)?;
            if categories.contains(&category) {
                boards.push(Board::new(row.code, row.name, category));
            }
        }
        Ok(boards)
    }

    fn board_prices(
        &self,
        board: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, DataError> {
        self.read_prices("prices", "prices", board, start, end)
    }

    fn money_flow(
        &self,
        board: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<MoneyFlowBar>, DataError> {
        let rows: Vec<FlowRow> =
            self.read_rows(&self.series_path("money_flow", board), "money flow", board)?;
        let mut bars: Vec<MoneyFlowBar> = rows
            .into_iter()
            .filter(|r| r.date >= start && r.date <= end)
            .map(|r| MoneyFlowBar {
                board: board.to_string(),
                date: r.date,
                net_inflow: r.net_inflow,
                main_inflow: r.main_inflow,
            })
            .collect();
        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    fn hot_metrics(
        &self,
        board: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<HotBar>, DataError> {
        let rows: Vec<HotRow> = self.read_rows(&self.series_path("hot", board), "hot metrics", board)?;
        let mut bars: Vec<HotBar> = rows
            .into_iter()
            .filter(|r| r.date >= start && r.date <= end)
            .map(|r| HotBar {
                board: board.to_string(),
                date: r.date,
                hot_score: r.hot_score,
                mentions: r.mentions,
            })
            .collect();
        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    /// The quote file is the latest snapshot; `as_of` is not filtered on.
    fn component_quotes(
        &self,
        board: &str,
        _as_of: NaiveDate,
    ) -> Result<Vec<ComponentQuote>, DataError> {
        let rows: Vec<QuoteRow> = self.read_rows(&self.series_path("quotes", board), "quotes", board)?;
        let mut quotes: Vec<ComponentQuote> = rows
            .into_iter()
            .map(|r| ComponentQuote {
                board: board.to_string(),
                symbol: r.symbol,
                name: r.name,
                last_price: r.last_price,
                pct_change: r.pct_change,
                turnover: r.turnover,
                turnover_rate: r.turnover_rate,
                turnover_share: 0.0,
            })
            .collect();
        ComponentQuote::assign_turnover_shares(&mut quotes);
        Ok(quotes)
    }

    fn stock_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<StockBar>, DataError> {
        let rows: Vec<StockRow> =
            self.read_rows(&self.series_path("stocks", symbol), "stock history", symbol)?;
        let mut bars: Vec<StockBar> = rows
            .into_iter()
            .filter(|r| r.date >= start && r.date <= end)
            .map(|r| StockBar {
                symbol: symbol.to_string(),
                date: r.date,
                close: r.close,
                turnover_rate: r.turnover_rate,
            })
            .collect();
        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    fn index_prices(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, DataError> {
        self.read_prices("index", "index", symbol, start, end)
    }
}
