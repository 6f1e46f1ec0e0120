//! Analysis history: JSONL append-only persistence.
//!
//! Each run appends one line per row to a single file. Rows are tagged with
//! the table they belong to (`strong_boards`, `rps_candidates`, `leaders`),
//! so the file can be streamed and filtered without a database.

use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::pipeline::AnalysisResult;

/// A primary board with its weighted factor contributions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrongBoardRow {
    pub run_date: NaiveDate,
    pub board: String,
    pub name: String,
    pub score: f64,
    pub trend: f64,
    pub hype: f64,
    pub capital: f64,
    pub leader: f64,
}

/// A rotation candidate with its readiness breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpsCandidateRow {
    pub run_date: NaiveDate,
    pub board: String,
    pub name: Option<String>,
    pub predicted: f64,
    pub relative_lag: f64,
    pub capital_spillover: f64,
    pub hype_spillover: f64,
    pub technical_readiness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderRow {
    pub run_date: NaiveDate,
    pub board: String,
    pub symbol: String,
    pub name: String,
    /// True for leaders of primary boards, false for candidate boards.
    pub primary: bool,
    pub is_limit_up: bool,
    pub strength: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "table", rename_all = "snake_case")]
pub enum HistoryRow {
    StrongBoards(StrongBoardRow),
    RpsCandidates(RpsCandidateRow),
    Leaders(LeaderRow),
}

impl HistoryRow {
    pub fn run_date(&self) -> NaiveDate {
        match self {
            Self::StrongBoards(r) => r.run_date,
            Self::RpsCandidates(r) => r.run_date,
            Self::Leaders(r) => r.run_date,
        }
    }
}

/// Flatten a result into history rows: primaries, candidates, then leaders.
pub fn rows_from_result(result: &AnalysisResult) -> Vec<HistoryRow> {
    let run_date = result.as_of;
    let mut rows = Vec::new();

    for s in &result.primaries {
        rows.push(HistoryRow::StrongBoards(StrongBoardRow {
            run_date,
            board: s.board.clone(),
            name: s.name.clone(),
            score: s.score,
            trend: s.breakdown.trend,
            hype: s.breakdown.hype,
            capital: s.breakdown.capital,
            leader: s.breakdown.leader,
        }));
    }
    for c in &result.candidates {
        rows.push(HistoryRow::RpsCandidates(RpsCandidateRow {
            run_date,
            board: c.board.clone(),
            name: c.name.clone(),
            predicted: c.predicted,
            relative_lag: c.breakdown.relative_lag,
            capital_spillover: c.breakdown.capital_spillover,
            hype_spillover: c.breakdown.hype_spillover,
            technical_readiness: c.breakdown.technical_readiness,
        }));
    }
    for (primary, leaders) in [(true, &result.leaders), (false, &result.candidate_leaders)] {
        for (board, picks) in leaders {
            for leader in picks {
                rows.push(HistoryRow::Leaders(LeaderRow {
                    run_date,
                    board: board.clone(),
                    symbol: leader.symbol.clone(),
                    name: leader.name.clone(),
                    primary,
                    is_limit_up: leader.is_limit_up,
                    strength: leader.score(),
                }));
            }
        }
    }
    rows
}

/// JSONL history file manager.
///
/// Each line is an independent JSON object, making the format resilient to
/// partial writes and easy to stream.
pub struct AnalysisHistory {
    path: PathBuf,
}

impl AnalysisHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append every row of a result. Returns the number of rows written.
    pub fn append_result(&self, result: &AnalysisResult) -> io::Result<usize> {
        let rows = rows_from_result(result);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        for row in &rows {
            let json = serde_json::to_string(row)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            writeln!(file, "{json}")?;
        }
        file.flush()?;

        Ok(rows.len())
    }

    /// Read all rows from the history file.
    ///
    /// Skips malformed lines (logged but not fatal).
    pub fn read_all(&self) -> io::Result<Vec<HistoryRow>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = fs::File::open(&self.path)?;
        let reader = io::BufReader::new(file);
        let mut rows = Vec::new();

        for (n, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<HistoryRow>(&line) {
                Ok(row) => rows.push(row),
                Err(e) => warn!(line = n + 1, error = %e, "skipping malformed history line"),
            }
        }

        Ok(rows)
    }

    /// Strong-board rows of one board, oldest first.
    pub fn strong_board_history(&self, board: &str) -> io::Result<Vec<StrongBoardRow>> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter_map(|row| match row {
                HistoryRow::StrongBoards(r) if r.board == board => Some(r),
                _ => None,
            })
            .collect())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::pipeline::run_daily_analysis;
    use crate::synthetic::SyntheticProvider;

    fn result() -> AnalysisResult {
        let config = AnalysisConfig::daily_defaults(NaiveDate::from_ymd_opt(2025, 10, 13).unwrap());
        run_daily_analysis(&SyntheticProvider::new(), None, &config).unwrap()
    }

    #[test]
    fn rows_cover_every_table() {
        let result = result();
        let rows = rows_from_result(&result);
        let strong = rows.iter().filter(|r| matches!(r, HistoryRow::StrongBoards(_))).count();
        let rps = rows.iter().filter(|r| matches!(r, HistoryRow::RpsCandidates(_))).count();
        let leaders = rows.iter().filter(|r| matches!(r, HistoryRow::Leaders(_))).count();

        assert_eq!(strong, result.primaries.len());
        assert_eq!(rps, result.candidates.len());
        let expected_leaders: usize = result
            .leaders
            .values()
            .chain(result.candidate_leaders.values())
            .map(Vec::len)
            .sum();
        assert_eq!(leaders, expected_leaders);
        assert!(rows.iter().all(|r| r.run_date() == result.as_of));
    }

    #[test]
    fn rows_are_tagged_by_table() {
        let row = HistoryRow::Leaders(LeaderRow {
            run_date: NaiveDate::from_ymd_opt(2025, 10, 13).unwrap(),
            board: "BK001".into(),
            symbol: "600703".into(),
            name: "600703".into(),
            primary: true,
            is_limit_up: false,
            strength: 12.5,
        });
        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains("\"table\":\"leaders\""));
    }

    #[test]
    fn append_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let history = AnalysisHistory::new(dir.path().join("nested").join("history.jsonl"));
        let result = result();

        let written = history.append_result(&result).unwrap();
        let again = history.append_result(&result).unwrap();
        assert_eq!(written, again);

        let rows = history.read_all().unwrap();
        assert_eq!(rows.len(), written * 2);

        let top = &result.primaries[0].board;
        assert_eq!(history.strong_board_history(top).unwrap().len(), 2);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let history = AnalysisHistory::new(dir.path().join("history.jsonl"));
        history.append_result(&result()).unwrap();
        let good = history.read_all().unwrap().len();

        let mut file = OpenOptions::new().append(true).open(history.path()).unwrap();
        writeln!(file, "{{not json").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "{{\"table\":\"unknown\"}}").unwrap();

        assert_eq!(history.read_all().unwrap().len(), good);
    }

    #[test]
    fn missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let history = AnalysisHistory::new(dir.path().join("none.jsonl"));
        assert!(history.read_all().unwrap().is_empty());
    }
}
