//! Leader instrument selection per board.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::factors::LeaderCandidate;

fn desc(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

/// Limit-up first, then turnover share, percent change, realized return
/// (all descending), then symbol ascending.
fn leader_order(a: &LeaderCandidate, b: &LeaderCandidate) -> Ordering {
    b.is_limit_up
        .cmp(&a.is_limit_up)
        .then_with(|| desc(a.turnover_share, b.turnover_share))
        .then_with(|| desc(a.pct_change, b.pct_change))
        .then_with(|| desc(a.return_pct, b.return_pct))
        .then_with(|| a.symbol.cmp(&b.symbol))
}

/// Pick up to `per_board` leaders for each requested board.
///
/// Every requested board gets an entry, empty when it has no candidates
/// above `min_turnover_share`. The result does not depend on the order of
/// the candidate lists.
pub fn select_leaders<'a>(
    boards: impl IntoIterator<Item = &'a str>,
    candidates: &BTreeMap<String, Vec<LeaderCandidate>>,
    per_board: usize,
    min_turnover_share: f64,
) -> BTreeMap<String, Vec<LeaderCandidate>> {
    boards
        .into_iter()
        .map(|board| {
            let mut picks: Vec<LeaderCandidate> = candidates
                .get(board)
                .map(|list| {
                    list.iter()
                        .filter(|c| c.turnover_share >= min_turnover_share)
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();
            picks.sort_by(leader_order);
            picks.truncate(per_board);
            (board.to_string(), picks)
        })
        .collect()
}
