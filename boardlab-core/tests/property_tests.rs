//! Property tests for ranking and selection invariants.
//!
//! Uses proptest to verify:
//! 1. Breakdown identity: strength breakdown sums to the board score
//! 2. Rotation identity: candidate breakdown sums to `predicted`
//! 3. Fill-to-quota: primary selection returns exactly `min(top_n, len)`
//! 4. Leader ordering is invariant under input permutation
//! 5. Ranking is sorted descending and ties resolve by board code

use proptest::prelude::*;
use std::collections::BTreeMap;

use boardlab_core::factors::{
    CapitalComponents, HypeComponents, LeaderCandidate, LeaderComponents, RotationComponents,
    TrendComponents,
};
use boardlab_core::models::{predict_rotation_candidates, rank_boards, BoardScore, StrengthBreakdown};
use boardlab_core::strategy::{select_leaders, select_primary_boards};
use boardlab_core::{FactorSet, FactorWeights, RotationWeights};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_weight() -> impl Strategy<Value = f64> {
    0.0..5.0_f64
}

fn arb_factor_weights() -> impl Strategy<Value = FactorWeights> {
    (arb_weight(), arb_weight(), arb_weight(), arb_weight()).prop_map(
        |(trend, hype, capital, leader)| FactorWeights {
            trend,
            hype,
            capital,
            leader,
        },
    )
}

fn arb_rotation_weights() -> impl Strategy<Value = RotationWeights> {
    (arb_weight(), arb_weight(), arb_weight(), arb_weight()).prop_map(|(a, b, c, d)| {
        RotationWeights {
            relative_lag: a,
            capital_spillover: b,
            hype_spillover: c,
            technical_readiness: d,
        }
    })
}

/// (return_10d, ma_gap, hot_momentum, avg_net_inflow, continuity, limit_up_count)
fn arb_board_inputs() -> impl Strategy<Value = (f64, f64, f64, f64, f64, usize)> {
    (
        -0.3..0.3_f64,
        -5.0..5.0_f64,
        -1.0..1.0_f64,
        -5e7..5e7_f64,
        0.0..1.0_f64,
        0usize..4,
    )
}

fn factor_set(inputs: &[(f64, f64, f64, f64, f64, usize)]) -> FactorSet {
    let mut set = FactorSet::default();
    for (i, &(ret, gap, hot, net, continuity, limit_ups)) in inputs.iter().enumerate() {
        let code = format!("BK{i:03}");
        set.trend.insert(
            code.clone(),
            TrendComponents {
                board: code.clone(),
                return_3d: ret / 3.0,
                return_5d: ret / 2.0,
                return_10d: ret,
                ma_gap: gap,
                excess_return: 0.0,
            },
        );
        set.hype.insert(
            code.clone(),
            HypeComponents {
                board: code.clone(),
                avg_hot_score: 50.0,
                avg_mentions: 1_000.0,
                hot_momentum: hot,
                mentions_change: hot / 2.0,
            },
        );
        set.capital.insert(
            code.clone(),
            CapitalComponents {
                board: code.clone(),
                avg_net_inflow: net,
                avg_main_inflow: net / 2.0,
                main_ratio: 0.5,
                continuity,
            },
        );
        if limit_ups > 0 {
            set.leader.insert(
                code.clone(),
                LeaderComponents {
                    board: code.clone(),
                    limit_up_count: limit_ups,
                    leader_turnover_share: 0.1,
                    avg_leader_return: ret,
                    leader_symbols: Vec::new(),
                },
            );
        }
    }
    set
}

fn arb_leader() -> impl Strategy<Value = LeaderCandidate> {
    (0u32..6, any::<bool>(), 0u32..4, -2i32..11, -5i32..5).prop_map(
        |(id, is_limit_up, share, pct, ret)| LeaderCandidate {
            symbol: format!("60000{id}"),
            name: format!("Stock {id}"),
            return_pct: ret as f64 / 100.0,
            pct_change: pct as f64,
            turnover_share: share as f64 / 10.0,
            is_limit_up,
        },
    )
}

// ── 1 & 5. Strength ranking ──────────────────────────────────────────

proptest! {
    /// Breakdown values sum to the composite score.
    #[test]
    fn strength_breakdown_sums_to_score(
        inputs in prop::collection::vec(arb_board_inputs(), 1..12),
        weights in arb_factor_weights(),
    ) {
        let set = factor_set(&inputs);
        let ranked = rank_boards(&set, &BTreeMap::new(), &weights);
        prop_assert_eq!(ranked.len(), inputs.len());
        for score in &ranked {
            prop_assert!((score.breakdown.total() - score.score).abs() < 1e-9);
        }
    }

    /// Ranking is non-increasing; equal scores appear in ascending code order.
    #[test]
    fn ranking_sorted_with_code_tiebreak(
        inputs in prop::collection::vec(arb_board_inputs(), 1..12),
        weights in arb_factor_weights(),
    ) {
        let set = factor_set(&inputs);
        let ranked = rank_boards(&set, &BTreeMap::new(), &weights);
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
            if pair[0].score == pair[1].score {
                prop_assert!(pair[0].board < pair[1].board);
            }
        }
    }
}

// ── 2. Rotation candidates ───────────────────────────────────────────

proptest! {
    /// Candidate breakdown sums to `predicted`; excluded boards never appear.
    #[test]
    fn rotation_breakdown_sums_to_predicted(
        values in prop::collection::vec((0.0..1.0_f64, 0.0..1.0_f64, 0.0..2.0_f64, 0.0..5.0_f64), 1..12),
        weights in arb_rotation_weights(),
        top_n in 0usize..8,
    ) {
        let rotation: BTreeMap<String, RotationComponents> = values
            .iter()
            .enumerate()
            .map(|(i, &(catch_up, follow, hype, setup))| {
                let code = format!("BK{i:03}");
                (code.clone(), RotationComponents {
                    board: code,
                    catch_up,
                    capital_follow_through: follow,
                    hype_transmission: hype,
                    technical_setup: setup,
                    leader_confirmation: 0.0,
                })
            })
            .collect();
        let current = vec![BoardScore {
            board: "BK000".into(),
            name: "BK000".into(),
            score: 1.0,
            breakdown: StrengthBreakdown::default(),
        }];

        let out = predict_rotation_candidates(&current, &rotation, &weights, &BTreeMap::new(), top_n, true);
        prop_assert!(out.len() <= top_n);
        for candidate in &out {
            prop_assert!(candidate.board != "BK000");
            prop_assert!((candidate.breakdown.total() - candidate.predicted).abs() < 1e-9);
        }
    }
}

// ── 3. Fill-to-quota ─────────────────────────────────────────────────

proptest! {
    /// Never more than `top_n`; exactly `top_n` when enough boards are ranked.
    #[test]
    fn primary_selection_fills_quota(
        scores in prop::collection::vec(-50.0..50.0_f64, 0..15),
        top_n in 0usize..8,
        min_score in -100.0..100.0_f64,
    ) {
        let ranked: Vec<BoardScore> = scores
            .iter()
            .enumerate()
            .map(|(i, &score)| BoardScore {
                board: format!("BK{i:03}"),
                name: String::new(),
                score,
                breakdown: StrengthBreakdown::default(),
            })
            .collect();
        let picked = select_primary_boards(&ranked, top_n, min_score);
        prop_assert_eq!(picked.len(), top_n.min(ranked.len()));
        for (picked, ranked) in picked.iter().zip(&ranked) {
            prop_assert_eq!(&picked.board, &ranked.board);
        }
    }
}

// ── 4. Leader permutation invariance ─────────────────────────────────

proptest! {
    /// Shuffling the candidate list does not change the selection.
    #[test]
    fn leader_selection_is_permutation_invariant(
        leaders in prop::collection::vec(arb_leader(), 0..10),
        seed in any::<u64>(),
        per_board in 0usize..6,
    ) {
        let mut shuffled = leaders.clone();
        // deterministic Fisher-Yates driven by the seed
        let mut state = seed;
        for i in (1..shuffled.len()).rev() {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let j = (state >> 33) as usize % (i + 1);
            shuffled.swap(i, j);
        }

        let original = BTreeMap::from([("BK001".to_string(), leaders)]);
        let permuted = BTreeMap::from([("BK001".to_string(), shuffled)]);
        let a = select_leaders(["BK001"], &original, per_board, 0.1);
        let b = select_leaders(["BK001"], &permuted, per_board, 0.1);
        prop_assert_eq!(a, b);
    }
}
