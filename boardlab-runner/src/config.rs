//! Serializable analysis configuration.
//!
//! Loaded from TOML; every field except the date window has a default.
//! `validate()` is called once at pipeline entry so that bad counts,
//! thresholds or weights fail before any data is fetched.

use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use boardlab_core::domain::BoardCategory;
use boardlab_core::factors::{LeaderParams, DEFAULT_LIMIT_UP_THRESHOLD};
use boardlab_core::models::DEFAULT_SMOOTHING;
use boardlab_core::{FactorWeights, RotationWeights, WeightError};

/// Unique identifier for an analysis run (content-addressable hash).
pub type RunId = String;

/// Calendar days covered by `AnalysisConfig::daily_defaults`.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("start_date {start} is after end_date {end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },

    #[error("'{field}' must be at least 1")]
    ZeroCount { field: &'static str },

    #[error("'{field}' is out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("at least one board category is required")]
    NoCategories,

    #[error("invalid weights: {0}")]
    Weights(#[from] WeightError),
}

fn default_board_count() -> usize {
    6
}
fn default_categories() -> Vec<BoardCategory> {
    BoardCategory::all().to_vec()
}
fn default_leader_pool() -> usize {
    3
}
fn default_leaders_per_board() -> usize {
    2
}
fn default_primary_top_n() -> usize {
    3
}
fn default_candidate_top_n() -> usize {
    5
}
fn default_min_turnover_share() -> f64 {
    0.01
}
fn default_limit_up_threshold() -> f64 {
    DEFAULT_LIMIT_UP_THRESHOLD
}
fn default_smoothing() -> f64 {
    DEFAULT_SMOOTHING
}
fn default_initial_cash() -> f64 {
    1_000_000.0
}

/// Input configuration for one daily analysis run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisConfig {
    /// First date of the window (inclusive).
    pub start_date: NaiveDate,
    /// Last date of the window (inclusive); the run's as-of date.
    pub end_date: NaiveDate,

    /// Number of catalog boards analysed.
    #[serde(default = "default_board_count")]
    pub board_count: usize,
    #[serde(default = "default_categories")]
    pub categories: Vec<BoardCategory>,
    /// Benchmark index for the trend factor's excess return.
    #[serde(default)]
    pub reference_index: Option<String>,

    /// Members kept per board by the leader factor.
    #[serde(default = "default_leader_pool")]
    pub leader_pool: usize,
    #[serde(default = "default_leaders_per_board")]
    pub leaders_per_board: usize,
    #[serde(default = "default_primary_top_n")]
    pub primary_top_n: usize,
    #[serde(default)]
    pub primary_min_score: f64,
    #[serde(default = "default_candidate_top_n")]
    pub candidate_top_n: usize,
    #[serde(default)]
    pub candidate_min_predicted: f64,
    #[serde(default = "default_min_turnover_share")]
    pub min_turnover_share: f64,
    #[serde(default = "default_limit_up_threshold")]
    pub limit_up_threshold: f64,
    #[serde(default = "default_smoothing")]
    pub smoothing: f64,
    #[serde(default = "default_initial_cash")]
    pub initial_cash: f64,

    #[serde(default)]
    pub factor_weights: FactorWeights,
    #[serde(default)]
    pub rotation_weights: RotationWeights,
}

impl AnalysisConfig {
    /// Defaults over the given window.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            board_count: default_board_count(),
            categories: default_categories(),
            reference_index: None,
            leader_pool: default_leader_pool(),
            leaders_per_board: default_leaders_per_board(),
            primary_top_n: default_primary_top_n(),
            primary_min_score: 0.0,
            candidate_top_n: default_candidate_top_n(),
            candidate_min_predicted: 0.0,
            min_turnover_share: default_min_turnover_share(),
            limit_up_threshold: default_limit_up_threshold(),
            smoothing: default_smoothing(),
            initial_cash: default_initial_cash(),
            factor_weights: FactorWeights::default(),
            rotation_weights: RotationWeights::default(),
        }
    }

    /// Defaults over the trailing `DEFAULT_LOOKBACK_DAYS` ending at `as_of`.
    pub fn daily_defaults(as_of: NaiveDate) -> Self {
        Self::new(as_of - Duration::days(DEFAULT_LOOKBACK_DAYS), as_of)
    }

    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string. Does not validate.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_date > self.end_date {
            return Err(ConfigError::InvalidWindow {
                start: self.start_date,
                end: self.end_date,
            });
        }
        if self.categories.is_empty() {
            return Err(ConfigError::NoCategories);
        }
        for (field, value) in [
            ("board_count", self.board_count),
            ("leader_pool", self.leader_pool),
            ("leaders_per_board", self.leaders_per_board),
            ("primary_top_n", self.primary_top_n),
            ("candidate_top_n", self.candidate_top_n),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroCount { field });
            }
        }
        if !(0.0..=1.0).contains(&self.min_turnover_share) {
            return Err(ConfigError::OutOfRange {
                field: "min_turnover_share",
                value: self.min_turnover_share,
            });
        }
        if !self.limit_up_threshold.is_finite() || self.limit_up_threshold <= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "limit_up_threshold",
                value: self.limit_up_threshold,
            });
        }
        if !(0.0..=1.0).contains(&self.smoothing) {
            return Err(ConfigError::OutOfRange {
                field: "smoothing",
                value: self.smoothing,
            });
        }
        if !self.initial_cash.is_finite() || self.initial_cash < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "initial_cash",
                value: self.initial_cash,
            });
        }
        for (field, value) in [
            ("primary_min_score", self.primary_min_score),
            ("candidate_min_predicted", self.candidate_min_predicted),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }
        self.factor_weights.validate()?;
        self.rotation_weights.validate()?;
        Ok(())
    }

    /// Leader factor parameters derived from this config.
    pub fn leader_params(&self) -> LeaderParams {
        LeaderParams {
            top_n: self.leader_pool,
            limit_up_threshold: self.limit_up_threshold,
        }
    }

    /// Deterministic hash of this configuration.
    ///
    /// Two runs with identical configs share a RunId.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
