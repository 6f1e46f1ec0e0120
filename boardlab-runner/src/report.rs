//! Plain-text report rendering.
//!
//! Sections: daily summary (score, allocation, next-session projection and
//! leaders per primary board), rotation heatmap, factor table and rotation
//! pathway. Every renderer is a pure function of the result.

use std::collections::BTreeMap;
use std::fmt::Write;

use boardlab_core::factors::{FactorKind, LeaderCandidate};
use boardlab_core::models::{BoardScore, RotationCandidate};

use crate::pipeline::AnalysisResult;

const HEATMAP_WIDTH: f64 = 10.0;

/// Group an amount with thousands separators, no decimals.
pub fn format_amount(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn format_leaders(leaders: Option<&Vec<LeaderCandidate>>) -> String {
    match leaders {
        Some(list) if !list.is_empty() => list
            .iter()
            .map(|l| {
                let flag = if l.is_limit_up { " LU" } else { "" };
                format!("{} {} ({:+.2}%{flag})", l.symbol, l.name, l.pct_change)
            })
            .collect::<Vec<_>>()
            .join(", "),
        _ => "(none)".to_string(),
    }
}

/// Daily summary: one block per primary board, then the regime.
pub fn daily_report(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Board Rotation Report {} (window {} to {})",
        result.as_of, result.start_date, result.as_of
    );
    if result.has_synthetic {
        let _ = writeln!(out, "WARNING: includes synthetic data");
    }
    out.push('\n');

    if result.primaries.is_empty() {
        let _ = writeln!(out, "(no boards selected)");
    }
    for s in &result.primaries {
        let allocation = result.allocation.get(&s.board).copied().unwrap_or(0.0);
        let next = result.next_session.get(&s.board).copied().unwrap_or(0.0);
        let _ = writeln!(
            out,
            "{} {}: score={:.2} allocation={} next={:.2}",
            s.board,
            s.name,
            s.score,
            format_amount(allocation),
            next
        );
        let _ = writeln!(out, "  leaders: {}", format_leaders(result.leaders.get(&s.board)));
    }

    out.push('\n');
    let r = &result.regime;
    let _ = writeln!(
        out,
        "Regime: {} (exposure x{:.2}, avg strength {:.2}, avg rotation {:.2})",
        r.regime, r.multiplier, r.avg_strength, r.avg_rotation
    );
    out
}

/// One bar per board, scaled to the strongest score.
pub fn rotation_heatmap(rankings: &[BoardScore]) -> String {
    if rankings.is_empty() {
        return "(no data)\n".to_string();
    }
    let max = rankings
        .iter()
        .map(|s| s.score)
        .fold(f64::NEG_INFINITY, f64::max);

    let mut out = String::new();
    for s in rankings {
        let ratio = if max > 0.0 { s.score / max } else { 0.0 };
        let width = (ratio * HEATMAP_WIDTH).floor().max(0.0) as usize;
        let bar = if width == 0 {
            "-".to_string()
        } else {
            "#".repeat(width)
        };
        let _ = writeln!(out, "{:<6} | {} ({:.2})", s.board, bar, s.score);
    }
    out
}

/// Weighted factor contributions per ranked board.
pub fn factor_table(rankings: &[BoardScore]) -> String {
    let mut out = String::from("Board   Name            Trend    Hype     Capital  Leader\n");
    for s in rankings {
        let name: String = s.name.chars().take(15).collect();
        let _ = write!(out, "{:<8}{:<16}", s.board, name);
        let values = s.breakdown.as_map();
        for kind in FactorKind::ALL {
            let value = values.get(kind.as_str()).copied().unwrap_or(0.0);
            let _ = write!(out, "{value:<9.2}");
        }
        out.truncate(out.trim_end().len());
        out.push('\n');
    }
    out
}

/// Candidates in readiness order with their next-session projection.
pub fn rotation_pathway(
    candidates: &[RotationCandidate],
    next_session: &BTreeMap<String, f64>,
) -> String {
    let mut out = String::from("Rotation Pathway\n");
    if candidates.is_empty() {
        out.push_str("(no rotation candidates)\n");
        return out;
    }
    for c in candidates {
        let label = match &c.name {
            Some(name) => format!("{} {}", c.board, name),
            None => c.board.clone(),
        };
        let next = next_session.get(&c.board).copied().unwrap_or(0.0);
        let _ = writeln!(out, "{label} -> readiness={:.2} next={:.2}", c.predicted, next);
    }
    out
}

/// Full report: summary, heatmap, factor table and pathway.
pub fn render_report(result: &AnalysisResult) -> String {
    [
        daily_report(result),
        format!("Rotation Heatmap\n{}", rotation_heatmap(&result.rankings)),
        factor_table(&result.rankings),
        rotation_pathway(&result.candidates, &result.next_session),
    ]
    .join("\n")
}
