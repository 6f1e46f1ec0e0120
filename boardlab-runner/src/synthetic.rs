//! Deterministic synthetic market data.
//!
//! Every series is a pure function of (series kind, identifier, window):
//! the RNG is seeded from a BLAKE3 hash of the kind and identifier, so two
//! runs over the same window see identical data. Sessions are calendar days.
//!
//! Synthetic data is a fallback and developer aid. Results that used it are
//! tagged `has_synthetic`.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use boardlab_core::domain::{
    Board, BoardCategory, ComponentQuote, HotBar, MoneyFlowBar, PriceBar, StockBar,
};

use crate::provider::{BoardDataProvider, DataError};

struct CatalogEntry {
    code: &'static str,
    name: &'static str,
    category: BoardCategory,
    members: &'static [&'static str],
}

const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        code: "BK001",
        name: "Semiconductors",
        category: BoardCategory::Industry,
        members: &["600703", "600584", "688396"],
    },
    CatalogEntry {
        code: "BK002",
        name: "New Energy",
        category: BoardCategory::Industry,
        members: &["300750", "002594", "002812"],
    },
    CatalogEntry {
        code: "BK003",
        name: "Consumer Electronics",
        category: BoardCategory::Industry,
        members: &["000100", "002475", "603986"],
    },
    CatalogEntry {
        code: "BK004",
        name: "Pharmaceuticals",
        category: BoardCategory::Industry,
        members: &["600276", "600196", "002007"],
    },
    CatalogEntry {
        code: "BK005",
        name: "Brokerage",
        category: BoardCategory::Industry,
        members: &["600030", "600837", "601901"],
    },
    CatalogEntry {
        code: "BK006",
        name: "New Energy Vehicles",
        category: BoardCategory::Industry,
        members: &["002594", "601238", "300750"],
    },
    CatalogEntry {
        code: "BK101",
        name: "Data Elements",
        category: BoardCategory::Concept,
        members: &["002154", "300170", "688288"],
    },
    CatalogEntry {
        code: "BK102",
        name: "Computing Power",
        category: BoardCategory::Concept,
        members: &["300496", "000977", "603019"],
    },
    CatalogEntry {
        code: "BK103",
        name: "Humanoid Robots",
        category: BoardCategory::Concept,
        members: &["002031", "300126", "000625"],
    },
];

/// Seeded RNG for one (kind, id) series.
fn rng_for(kind: &str, id: &str) -> StdRng {
    let seed_bytes = blake3::hash(format!("{kind}-{id}").as_bytes());
    StdRng::from_seed(*seed_bytes.as_bytes())
}

fn days(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |d| *d <= end)
}

/// Multiplicative random walk floored at 1.0.
fn random_walk(rng: &mut StdRng, base: f64, step: f64, n: usize) -> Vec<f64> {
    let mut price = base;
    (0..n)
        .map(|_| {
            price = (price * (1.0 + rng.gen_range(-step..step))).max(1.0);
            price
        })
        .collect()
}

/// Built-in catalog of 6 industry and 3 concept boards.
#[derive(Debug, Clone, Default)]
pub struct SyntheticProvider;

impl SyntheticProvider {
    pub fn new() -> Self {
        Self
    }

    fn entry(&self, code: &str) -> Result<&'static CatalogEntry, DataError> {
        CATALOG
            .iter()
            .find(|e| e.code == code)
            .ok_or_else(|| DataError::not_found("board", code))
    }

    /// Member symbols of a catalog board.
    pub fn members(&self, code: &str) -> Result<Vec<String>, DataError> {
        Ok(self.entry(code)?.members.iter().map(|s| s.to_string()).collect())
    }

    fn price_series(&self, kind: &str, id: &str, start: NaiveDate, end: NaiveDate) -> Vec<PriceBar> {
        let dates: Vec<NaiveDate> = days(start, end).collect();
        let mut rng = rng_for(kind, id);
        let closes = random_walk(&mut rng, 100.0, 0.05, dates.len());
        let mut prev_close = closes.first().copied().unwrap_or(100.0);
        dates
            .into_iter()
            .zip(closes)
            .enumerate()
            .map(|(i, (date, close))| {
                let change_pct = if i == 0 {
                    0.0
                } else {
                    (close - prev_close) / prev_close * 100.0
                };
                let volume = 1_000_000.0 * (1.0 + rng.gen_range(-0.3..0.3));
                let bar = PriceBar {
                    board: id.to_string(),
                    date,
                    close,
                    change_pct,
                    volume,
                    turnover: close * volume / 10_000.0,
                    turnover_rate: rng.gen_range(0.5..8.0),
                };
                prev_close = close;
                bar
            })
            .collect()
    }
}

impl BoardDataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn list_boards(&self, categories: &[BoardCategory]) -> Result<Vec<Board>, DataError> {
        Ok(CATALOG
            .iter()
            .filter(|e| categories.contains(&e.category))
            .map(|e| Board::new(e.code, e.name, e.category))
            .collect())
    }

    fn board_prices(
        &self,
        board: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, DataError> {
        self.entry(board)?;
        Ok(self.price_series("price", board, start, end))
    }

    fn money_flow(
        &self,
        board: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<MoneyFlowBar>, DataError> {
        self.entry(board)?;
        let mut rng = rng_for("money", board);
        Ok(days(start, end)
            .map(|date| {
                let main = rng.gen_range(-5_000_000.0..5_000_000.0);
                let medium = rng.gen_range(-1_000_000.0..1_000_000.0);
                let small = rng.gen_range(-500_000.0..500_000.0);
                MoneyFlowBar {
                    board: board.to_string(),
                    date,
                    net_inflow: main + medium + small,
                    main_inflow: main,
                }
            })
            .collect())
    }

    /// Hot score and mentions proxy the board's turnover rate and volume.
    fn hot_metrics(
        &self,
        board: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<HotBar>, DataError> {
        Ok(self
            .board_prices(board, start, end)?
            .into_iter()
            .map(|bar| HotBar {
                board: bar.board,
                date: bar.date,
                hot_score: bar.turnover_rate,
                mentions: bar.volume,
            })
            .collect())
    }

    fn component_quotes(
        &self,
        board: &str,
        as_of: NaiveDate,
    ) -> Result<Vec<ComponentQuote>, DataError> {
        let entry = self.entry(board)?;
        let mut rng = rng_for("snapshot", &format!("{board}-{as_of}"));
        let mut quotes: Vec<ComponentQuote> = entry
            .members
            .iter()
            .map(|symbol| ComponentQuote {
                board: board.to_string(),
                symbol: symbol.to_string(),
                name: symbol.to_string(),
                last_price: rng.gen_range(5.0..120.0),
                pct_change: rng.gen_range(-5.0..10.0),
                turnover: rng.gen_range(10_000_000.0..200_000_000.0),
                turnover_rate: rng.gen_range(0.5..12.0),
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
        let dates: Vec<NaiveDate> = days(start, end).collect();
        let mut rng = rng_for("stock", symbol);
        let closes = random_walk(&mut rng, 50.0, 0.08, dates.len());
        Ok(dates
            .into_iter()
            .zip(closes)
            .map(|(date, close)| StockBar {
                symbol: symbol.to_string(),
                date,
                close,
                turnover_rate: rng.gen_range(0.5..10.0),
            })
            .collect())
    }

    fn index_prices(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, DataError> {
        Ok(self.price_series("index", symbol, start, end))
    }
}
