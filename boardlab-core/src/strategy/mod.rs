//! Selection and sizing over ranked outputs.

pub mod board_selection;
pub mod position;
pub mod stock_selection;

pub use board_selection::{select_candidate_boards, select_primary_boards};
pub use position::{allocate_portfolio, assess_market_regime, Regime, RegimeSummary};
pub use stock_selection::select_leaders;
