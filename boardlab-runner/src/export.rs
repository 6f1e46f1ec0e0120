//! Export: JSON, CSV and text artifact generation.
//!
//! - **JSON**: full serialization of `AnalysisResult` with schema versioning
//! - **CSV**: rankings, rotation candidates and leaders for spreadsheets
//! - **Text**: the rendered daily report
//!
//! Persisted JSON carries a `schema_version`; newer versions are rejected on
//! load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::pipeline::{AnalysisResult, SCHEMA_VERSION};
use crate::report::render_report;

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize an `AnalysisResult` to pretty JSON.
pub fn export_json(result: &AnalysisResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize AnalysisResult to JSON")
}

/// Deserialize an `AnalysisResult` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<AnalysisResult> {
    let result: AnalysisResult =
        serde_json::from_str(json).context("failed to deserialize AnalysisResult from JSON")?;
    if result.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            result.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(result)
}

// ─── CSV export ─────────────────────────────────────────────────────

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export the strength ranking.
///
/// Columns: rank, board, name, score, trend, hype, capital, leader, primary
pub fn export_rankings_csv(result: &AnalysisResult) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "rank", "board", "name", "score", "trend", "hype", "capital", "leader", "primary",
    ])?;
    for (i, s) in result.rankings.iter().enumerate() {
        wtr.write_record([
            (i + 1).to_string(),
            s.board.clone(),
            s.name.clone(),
            format!("{:.6}", s.score),
            format!("{:.6}", s.breakdown.trend),
            format!("{:.6}", s.breakdown.hype),
            format!("{:.6}", s.breakdown.capital),
            format!("{:.6}", s.breakdown.leader),
            result.is_primary(&s.board).to_string(),
        ])?;
    }
    finish(wtr)
}

/// Export the selected rotation candidates.
///
/// Columns: board, name, predicted, relative_lag, capital_spillover,
/// hype_spillover, technical_readiness, next_session
pub fn export_candidates_csv(result: &AnalysisResult) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "board",
        "name",
        "predicted",
        "relative_lag",
        "capital_spillover",
        "hype_spillover",
        "technical_readiness",
        "next_session",
    ])?;
    for c in &result.candidates {
        let next = result.next_session.get(&c.board).copied().unwrap_or(0.0);
        wtr.write_record([
            c.board.clone(),
            c.name.clone().unwrap_or_default(),
            format!("{:.6}", c.predicted),
            format!("{:.6}", c.breakdown.relative_lag),
            format!("{:.6}", c.breakdown.capital_spillover),
            format!("{:.6}", c.breakdown.hype_spillover),
            format!("{:.6}", c.breakdown.technical_readiness),
            format!("{:.6}", next),
        ])?;
    }
    finish(wtr)
}

/// Export leaders of primary and candidate boards.
///
/// Columns: board, role, symbol, name, pct_change, return_pct,
/// turnover_share, is_limit_up, strength
pub fn export_leaders_csv(result: &AnalysisResult) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "board",
        "role",
        "symbol",
        "name",
        "pct_change",
        "return_pct",
        "turnover_share",
        "is_limit_up",
        "strength",
    ])?;
    for (role, leaders) in [("primary", &result.leaders), ("candidate", &result.candidate_leaders)] {
        for (board, picks) in leaders {
            for l in picks {
                wtr.write_record([
                    board.clone(),
                    role.to_string(),
                    l.symbol.clone(),
                    l.name.clone(),
                    format!("{:.4}", l.pct_change),
                    format!("{:.6}", l.return_pct),
                    format!("{:.6}", l.turnover_share),
                    l.is_limit_up.to_string(),
                    format!("{:.4}", l.score()),
                ])?;
            }
        }
    }
    finish(wtr)
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for one run.
///
/// Creates `{as_of}_{run_id prefix}/` under `output_dir` containing:
/// - `result.json`: the full `AnalysisResult`
/// - `rankings.csv`, `candidates.csv`, `leaders.csv`
/// - `report.txt`: the rendered report
///
/// Returns the path to the created directory. Re-running the same config on
/// the same day overwrites the same directory.
pub fn save_artifacts(result: &AnalysisResult, output_dir: &Path) -> Result<PathBuf> {
    let run_dir = output_dir.join(format!("{}_{}", result.as_of, result.short_id()));
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    let files = [
        ("result.json", export_json(result)?),
        ("rankings.csv", export_rankings_csv(result)?),
        ("candidates.csv", export_candidates_csv(result)?),
        ("leaders.csv", export_leaders_csv(result)?),
        ("report.txt", render_report(result)),
    ];
    for (name, content) in files {
        let path = run_dir.join(name);
        std::fs::write(&path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    Ok(run_dir)
}

/// Load an `AnalysisResult` from an artifact directory's result.json.
///
/// Rejects unknown schema versions.
pub fn load_artifacts(dir: &Path) -> Result<AnalysisResult> {
    let path = dir.join("result.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::pipeline::run_daily_analysis;
    use crate::synthetic::SyntheticProvider;
    use chrono::NaiveDate;

    fn result() -> AnalysisResult {
        let config = AnalysisConfig::daily_defaults(NaiveDate::from_ymd_opt(2025, 10, 13).unwrap());
        run_daily_analysis(&SyntheticProvider::new(), None, &config).unwrap()
    }

    #[test]
    fn json_import_matches_export() {
        let result = result();
        let json = export_json(&result).unwrap();
        let back = import_json(&json).unwrap();
        assert_eq!(back.run_id, result.run_id);
        assert_eq!(back.rankings.len(), result.rankings.len());
        assert_eq!(back.regime.regime, result.regime.regime);
    }

    #[test]
    fn newer_schema_rejected() {
        let mut result = result();
        result.schema_version = SCHEMA_VERSION + 1;
        let json = export_json(&result).unwrap();
        let err = import_json(&json).unwrap_err();
        assert!(err.to_string().contains("unsupported schema version"));
    }

    #[test]
    fn missing_schema_version_defaults_to_current() {
        let result = result();
        let mut value: serde_json::Value = serde_json::to_value(&result).unwrap();
        value.as_object_mut().unwrap().remove("schema_version");
        let back = import_json(&value.to_string()).unwrap();
        assert_eq!(back.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn rankings_csv_has_row_per_board() {
        let result = result();
        let csv = export_rankings_csv(&result).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert!(lines[0].starts_with("rank,board,name,score"));
        assert_eq!(lines.len(), result.rankings.len() + 1);
        let primaries = lines.iter().filter(|l| l.ends_with(",true")).count();
        assert_eq!(primaries, result.primaries.len());
    }

    #[test]
    fn candidates_and_leaders_csv_headers() {
        let result = result();
        let candidates = export_candidates_csv(&result).unwrap();
        assert!(candidates.starts_with("board,name,predicted,relative_lag"));
        assert_eq!(candidates.lines().count(), result.candidates.len() + 1);

        let leaders = export_leaders_csv(&result).unwrap();
        assert!(leaders.starts_with("board,role,symbol"));
    }
}
