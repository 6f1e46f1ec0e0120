//! Daily analysis pipeline.
//!
//! Control flow: market data → factor computers (parallel) → rotation
//! combiner → strength ranking + next-session prediction (parallel) →
//! selection → regime and allocation.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use boardlab_core::domain::SeriesError;
use boardlab_core::factors::{
    compute_capital, compute_hype, compute_leaders, compute_rotation, compute_trend,
    LeaderCandidate, LeaderOutput,
};
use boardlab_core::models::{
    predict_next_session, predict_rotation_candidates, rank_boards, BoardScore, RotationCandidate,
};
use boardlab_core::strategy::{
    allocate_portfolio, assess_market_regime, select_candidate_boards, select_leaders,
    select_primary_boards, RegimeSummary,
};
use boardlab_core::FactorSet;

use crate::config::{AnalysisConfig, ConfigError, RunId};
use crate::data_loader::{load_market_data, BoardDataProvider, LoadError, MarketData};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Load(#[from] LoadError),
    #[error("invalid input series: {0}")]
    Series(#[from] SeriesError),
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Complete result of one daily analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub run_id: RunId,
    pub start_date: NaiveDate,
    /// Reference day of the run (the window's last date).
    pub as_of: NaiveDate,
    pub config: AnalysisConfig,
    pub dataset_hash: String,
    pub has_synthetic: bool,
    /// Every scored board, strongest first.
    pub rankings: Vec<BoardScore>,
    /// Primary boards, a prefix of `rankings`.
    pub primaries: Vec<BoardScore>,
    /// Next-in-line boards, never overlapping `primaries`.
    pub candidates: Vec<RotationCandidate>,
    /// Next-session projection per board.
    pub next_session: BTreeMap<String, f64>,
    /// Leaders per primary board.
    pub leaders: BTreeMap<String, Vec<LeaderCandidate>>,
    /// Leaders per candidate board.
    pub candidate_leaders: BTreeMap<String, Vec<LeaderCandidate>>,
    pub regime: RegimeSummary,
    /// Board code → hypothetical cash allocation.
    pub allocation: BTreeMap<String, f64>,
}

impl AnalysisResult {
    /// First 8 hex chars of the run id.
    pub fn short_id(&self) -> &str {
        let end = self.run_id.len().min(8);
        &self.run_id[..end]
    }

    pub fn is_primary(&self, board: &str) -> bool {
        self.primaries.iter().any(|s| s.board == board)
    }
}

/// Load data through the providers and analyse it.
///
/// This is the high-level entry point used by the CLI. For pre-loaded data
/// use `analyze()` instead.
pub fn run_daily_analysis(
    primary: &dyn BoardDataProvider,
    fallback: Option<&dyn BoardDataProvider>,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, RunError> {
    config.validate()?;
    let market = load_market_data(primary, fallback, config)?;
    analyze(&market, config)
}

/// Run the four factor computers in parallel.
pub fn compute_factors(market: &MarketData, config: &AnalysisConfig) -> (FactorSet, LeaderOutput) {
    let params = config.leader_params();
    let ((trend, hype), (capital, leader_out)) = rayon::join(
        || {
            rayon::join(
                || compute_trend(&market.prices, market.reference.as_deref()),
                || compute_hype(&market.hot),
            )
        },
        || {
            rayon::join(
                || compute_capital(&market.money_flow),
                || compute_leaders(&market.quotes, &market.stock_history, &params),
            )
        },
    );
    let set = FactorSet {
        trend,
        hype,
        capital,
        leader: leader_out.components.clone(),
    };
    (set, leader_out)
}

/// Analyse already-loaded market data.
pub fn analyze(market: &MarketData, config: &AnalysisConfig) -> Result<AnalysisResult, RunError> {
    config.validate()?;
    market.validate(config.start_date, config.end_date)?;

    let names = market.names();
    let (factors, leader_out) = compute_factors(market, config);
    debug!(
        trend = factors.trend.len(),
        hype = factors.hype.len(),
        capital = factors.capital.len(),
        leader = factors.leader.len(),
        "factors computed"
    );

    let rotation = compute_rotation(&factors.trend, &factors.capital, &factors.hype, &factors.leader);
    let (rankings, next_session) = rayon::join(
        || rank_boards(&factors, &names, &config.factor_weights),
        || predict_next_session(&rotation, &config.rotation_weights, config.smoothing),
    );

    let primaries =
        select_primary_boards(&rankings, config.primary_top_n, config.primary_min_score);
    let predicted = predict_rotation_candidates(
        &primaries,
        &rotation,
        &config.rotation_weights,
        &names,
        config.candidate_top_n,
        true,
    );
    let exclude: BTreeSet<String> = primaries.iter().map(|s| s.board.clone()).collect();
    let candidates = select_candidate_boards(
        &predicted,
        &exclude,
        config.candidate_top_n,
        config.candidate_min_predicted,
    );

    let leaders = select_leaders(
        primaries.iter().map(|s| s.board.as_str()),
        &leader_out.candidates,
        config.leaders_per_board,
        config.min_turnover_share,
    );
    let candidate_leaders = select_leaders(
        candidates.iter().map(|c| c.board.as_str()),
        &leader_out.candidates,
        config.leaders_per_board,
        config.min_turnover_share,
    );

    let regime = assess_market_regime(&primaries, &next_session);
    let allocation = allocate_portfolio(config.initial_cash, &primaries, &regime);

    info!(
        as_of = %config.end_date,
        ranked = rankings.len(),
        primaries = primaries.len(),
        candidates = candidates.len(),
        regime = %regime.regime,
        "analysis complete"
    );

    Ok(AnalysisResult {
        schema_version: SCHEMA_VERSION,
        run_id: config.run_id(),
        start_date: config.start_date,
        as_of: config.end_date,
        config: config.clone(),
        dataset_hash: market.dataset_hash.clone(),
        has_synthetic: market.has_synthetic,
        rankings,
        primaries,
        candidates,
        next_session,
        leaders,
        candidate_leaders,
        regime,
        allocation,
    })
}

/// Leaders of one named board.
///
/// Fails with `LoadError::BoardNotFound` when the board is not in the
/// loaded catalog.
pub fn leaders_for_board(
    market: &MarketData,
    config: &AnalysisConfig,
    board: &str,
) -> Result<Vec<LeaderCandidate>, RunError> {
    let board = market.board(board)?;
    let quotes: BTreeMap<String, _> = market
        .quotes
        .get(&board.code)
        .map(|q| BTreeMap::from([(board.code.clone(), q.clone())]))
        .unwrap_or_default();
    let out = compute_leaders(&quotes, &market.stock_history, &config.leader_params());
    let mut picked = select_leaders(
        [board.code.as_str()],
        &out.candidates,
        config.leaders_per_board,
        config.min_turnover_share,
    );
    Ok(picked.remove(&board.code).unwrap_or_default())
}
