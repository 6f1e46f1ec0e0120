//! Board selection.

use std::collections::BTreeSet;

use crate::models::{BoardScore, RotationCandidate};

/// Walk the ranked list and accept boards until `top_n` are accepted.
///
/// A board is accepted if it clears `min_score` OR the quota is still
/// unfilled. The second clause means a ranked list of at least `top_n`
/// entries always yields exactly `top_n`, floor or not (fill-to-quota).
pub fn select_primary_boards(ranked: &[BoardScore], top_n: usize, min_score: f64) -> Vec<BoardScore> {
    let mut selected = Vec::with_capacity(top_n.min(ranked.len()));
    for score in ranked {
        if selected.len() >= top_n {
            break;
        }
        if score.score >= min_score || selected.len() < top_n {
            selected.push(score.clone());
        }
    }
    selected
}

/// Keep the first `top_n` candidates not excluded and at or above `min_predicted`.
///
/// Input order is preserved; candidates are expected pre-sorted.
pub fn select_candidate_boards(
    candidates: &[RotationCandidate],
    exclude: &BTreeSet<String>,
    top_n: usize,
    min_predicted: f64,
) -> Vec<RotationCandidate> {
    candidates
        .iter()
        .filter(|c| !exclude.contains(&c.board) && c.predicted >= min_predicted)
        .take(top_n)
        .cloned()
        .collect()
}
