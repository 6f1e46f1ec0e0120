//! Domain types for BoardLab.
//!
//! Everything here is a plain value record: boards from the catalog and the
//! dated bar series the factor computers consume.

pub mod bar;
pub mod board;
pub mod series;

pub use bar::{ComponentQuote, HotBar, MoneyFlowBar, PriceBar, StockBar};
pub use board::{Board, BoardCategory};
pub use series::{check_finite, check_series, Dated, Measured, SeriesError};
