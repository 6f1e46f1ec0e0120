//! BoardLab Runner: configuration, data loading, pipeline orchestration,
//! history and export.
//!
//! This crate builds on `boardlab-core` to provide:
//! - TOML analysis configuration with validation
//! - Data providers (CSV directory, deterministic synthetic) and a loader
//!   with per-series fallback
//! - The daily analysis pipeline
//! - JSONL result history
//! - JSON/CSV artifacts and the plain-text report

pub mod config;
pub mod csv_provider;
pub mod data_loader;
pub mod export;
pub mod history;
pub mod pipeline;
pub mod provider;
pub mod report;
pub mod synthetic;

pub use config::{AnalysisConfig, ConfigError, RunId};
pub use csv_provider::CsvProvider;
pub use data_loader::{load_market_data, LoadError, MarketData};
pub use export::{export_json, import_json, load_artifacts, save_artifacts};
pub use history::{AnalysisHistory, HistoryRow};
pub use pipeline::{analyze, leaders_for_board, run_daily_analysis, AnalysisResult, RunError};
pub use provider::{BoardDataProvider, DataError};
pub use report::render_report;
pub use synthetic::SyntheticProvider;
