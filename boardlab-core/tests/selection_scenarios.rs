//! Scenario tests: factor outputs through ranking, selection and sizing.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use boardlab_core::domain::{ComponentQuote, HotBar, MoneyFlowBar, PriceBar};
use boardlab_core::factors::{
    compute_capital, compute_hype, compute_leaders, compute_rotation, compute_trend,
    CapitalComponents, HypeComponents, LeaderParams, TrendComponents,
};
use boardlab_core::models::{
    predict_next_session, predict_rotation_candidates, rank_boards, DEFAULT_SMOOTHING,
};
use boardlab_core::strategy::{
    allocate_portfolio, assess_market_regime, select_candidate_boards, select_leaders,
    select_primary_boards, Regime,
};
use boardlab_core::{FactorSet, FactorWeights, RotationWeights};

fn day(i: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 1).unwrap() + chrono::Duration::days(i as i64)
}

/// Two boards whose raw factor scores are Trend 30/10, Hype 5/5, Capital 2/2.
fn two_board_factors() -> FactorSet {
    let mut set = FactorSet::default();
    for (code, trend) in [("A", 30.0), ("B", 10.0)] {
        set.trend.insert(
            code.into(),
            TrendComponents {
                board: code.into(),
                ma_gap: trend,
                ..TrendComponents::default()
            },
        );
        set.hype.insert(
            code.into(),
            HypeComponents {
                board: code.into(),
                avg_hot_score: 50.0,
                ..HypeComponents::default()
            },
        );
        set.capital.insert(
            code.into(),
            CapitalComponents {
                board: code.into(),
                avg_net_inflow: 2_000_000.0,
                avg_main_inflow: 2_000_000.0,
                ..CapitalComponents::default()
            },
        );
    }
    set
}

#[test]
fn two_board_scenario_selects_a() {
    // GIVEN: A and B differ only in trend, weights all 1
    let set = two_board_factors();

    // WHEN: ranked and the top board selected
    let ranked = rank_boards(&set, &BTreeMap::new(), &FactorWeights::uniform());
    let selected = select_primary_boards(&ranked, 1, 0.0);

    // THEN: A scores 37, B 17, and only A is selected
    assert_eq!(ranked[0].board, "A");
    assert!((ranked[0].score - 37.0).abs() < 1e-9);
    assert!((ranked[1].score - 17.0).abs() < 1e-9);
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].board, "A");
}

#[test]
fn allocation_example_splits_after_multiplier() {
    let set = two_board_factors();
    let ranked = rank_boards(&set, &BTreeMap::new(), &FactorWeights::uniform());
    let regime = boardlab_core::RegimeSummary {
        regime: Regime::Constructive,
        multiplier: 0.8,
        avg_strength: 0.0,
        avg_rotation: 0.0,
    };

    let alloc = allocate_portfolio(1_000_000.0, &ranked, &regime);

    assert_eq!(alloc.len(), 2);
    assert!((alloc["A"] - 400_000.0).abs() < 1e-6);
    assert!((alloc["B"] - 400_000.0).abs() < 1e-6);
}

#[test]
fn raw_bars_flow_through_the_whole_chain() {
    // GIVEN: a rising board with inflow and hype, and a falling board with
    // inflow (catch-up candidate), plus quotes for the rising board
    let mut prices = BTreeMap::new();
    let mut flows = BTreeMap::new();
    let mut hot = BTreeMap::new();
    for (code, drift, net) in [("BK001", 1.0, 3e6), ("BK002", -0.8, 2e6), ("BK003", 0.1, -1e6)] {
        prices.insert(
            code.to_string(),
            (0..12)
                .map(|i| PriceBar {
                    board: code.into(),
                    date: day(i),
                    close: 100.0 + drift * i as f64,
                    change_pct: drift,
                    volume: 1e6,
                    turnover: 1e8,
                    turnover_rate: 2.0,
                })
                .collect::<Vec<_>>(),
        );
        flows.insert(
            code.to_string(),
            (0..12)
                .map(|i| MoneyFlowBar {
                    board: code.into(),
                    date: day(i),
                    net_inflow: net,
                    main_inflow: net * 0.6,
                })
                .collect::<Vec<_>>(),
        );
        hot.insert(
            code.to_string(),
            (0..12)
                .map(|i| HotBar {
                    board: code.into(),
                    date: day(i),
                    hot_score: 40.0 + i as f64,
                    mentions: 1_000.0 + 50.0 * i as f64,
                })
                .collect::<Vec<_>>(),
        );
    }
    let mut quotes = vec![
        ComponentQuote {
            board: "BK001".into(),
            symbol: "600001".into(),
            name: "Alpha".into(),
            last_price: 11.0,
            pct_change: 10.0,
            turnover: 3e7,
            turnover_rate: 8.0,
            turnover_share: 0.0,
        },
        ComponentQuote {
            board: "BK001".into(),
            symbol: "600002".into(),
            name: "Beta".into(),
            last_price: 20.0,
            pct_change: 3.0,
            turnover: 7e7,
            turnover_rate: 4.0,
            turnover_share: 0.0,
        },
    ];
    ComponentQuote::assign_turnover_shares(&mut quotes);
    let quotes = BTreeMap::from([("BK001".to_string(), quotes)]);

    // WHEN: every stage runs in order
    let leader_out = compute_leaders(&quotes, &BTreeMap::new(), &LeaderParams::default());
    let set = FactorSet {
        trend: compute_trend(&prices, None),
        hype: compute_hype(&hot),
        capital: compute_capital(&flows),
        leader: leader_out.components.clone(),
    };
    let rotation = compute_rotation(&set.trend, &set.capital, &set.hype, &set.leader);
    let ranked = rank_boards(&set, &BTreeMap::new(), &FactorWeights::default());
    let primaries = select_primary_boards(&ranked, 1, 0.0);
    let predictions = predict_next_session(&rotation, &RotationWeights::default(), DEFAULT_SMOOTHING);
    let candidates = predict_rotation_candidates(
        &primaries,
        &rotation,
        &RotationWeights::default(),
        &BTreeMap::new(),
        5,
        true,
    );
    let exclude: BTreeSet<String> = primaries.iter().map(|s| s.board.clone()).collect();
    let next = select_candidate_boards(&candidates, &exclude, 2, 0.0);
    let leaders = select_leaders(
        primaries.iter().map(|s| s.board.as_str()),
        &leader_out.candidates,
        2,
        0.01,
    );
    let regime = assess_market_regime(&primaries, &predictions);
    let alloc = allocate_portfolio(1_000_000.0, &primaries, &regime);

    // THEN: the rising board leads and its limit-up member ranks first
    assert_eq!(primaries[0].board, "BK001");
    assert_eq!(leaders["BK001"][0].symbol, "600001");
    assert!(leaders["BK001"][0].is_limit_up);
    // the falling board with inflow is the top rotation candidate
    assert_eq!(next[0].board, "BK002");
    assert!(rotation["BK002"].catch_up > 0.0);
    assert!(next.iter().all(|c| c.board != "BK001"));
    assert_eq!(alloc.len(), 1);
    assert!((alloc["BK001"] - 1_000_000.0 * regime.multiplier).abs() < 1e-6);
}
