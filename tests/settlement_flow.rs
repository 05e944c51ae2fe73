//! End-to-end flow: open a project, accumulate bets through the book,
//! snapshot odds, settle after the deadline, and persist the ledger.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use launchbet::book::BetBook;
use launchbet::config::AppConfig;
use launchbet::odds::OddsCalculator;
use launchbet::settlement::SettlementEngine;
use launchbet::storage::LedgerStore;
use launchbet::types::{BetSide, EngineError, Project, ProjectStatus};

fn make_project(deadline_offset_hours: i64) -> Project {
    Project {
        id: "proj-flow".to_string(),
        name: "HyperDrive Labs".to_string(),
        target_metric: 1000,
        current_metric: 250,
        deadline: Utc::now() + Duration::hours(deadline_offset_hours),
        status: ProjectStatus::Active,
        support_pool: None,
        doubt_pool: None,
        total_pool: None,
        platform_fee: None,
    }
}

#[test]
fn full_lifecycle_success_outcome() {
    let config = AppConfig::default();
    let calculator = OddsCalculator::new(config.odds.clone());
    let engine = SettlementEngine::new(config.fees.clone(), config.reputation.clone());

    let mut project = make_project(24);
    let mut book = BetBook::new();
    let now = Utc::now();

    // userA places twice — accumulates into one bet of 100.
    book.place(&project, "userA", BetSide::Support, dec!(60), dec!(1), now)
        .unwrap();
    book.place(&project, "userA", BetSide::Support, dec!(40), dec!(1.1), now)
        .unwrap();
    book.place(&project, "userB", BetSide::Support, dec!(300), dec!(1.2), now)
        .unwrap();
    book.place(&project, "userC", BetSide::Doubt, dec!(200), dec!(2.5), now)
        .unwrap();
    assert_eq!(book.len(), 3);

    // Live odds while betting is open.
    let snap = calculator.snapshot(&project, book.bets(), now);
    assert_eq!(snap.support_pool, dec!(400));
    assert_eq!(snap.doubt_pool, dec!(200));
    assert_eq!(snap.total_pool, dec!(600));
    assert_eq!(snap.support_odds, dec!(600) / dec!(401));
    assert_eq!(snap.doubt_odds, dec!(600) / dec!(201));
    assert_eq!(snap.progress_pct, dec!(25));
    assert_eq!(snap.stats.distinct_bettors, 3);
    assert!(!snap.time_remaining.is_expired());

    // Settlement is rejected while the deadline is in the future.
    let err = engine
        .settle(&project, book.bets(), 1200, now)
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidState { .. }));

    // Past the deadline the project resolves SUCCESS (1200 ≥ 1000).
    let settle_at = project.deadline + Duration::minutes(5);
    let settlement = engine
        .settle(&project, book.bets(), 1200, settle_at)
        .unwrap();

    assert_eq!(settlement.project.status, ProjectStatus::Success);
    assert_eq!(settlement.receipt.platform_fee, dec!(6));
    assert_eq!(settlement.payouts.len(), 2);
    assert_eq!(settlement.payouts[0].user_id, "userA");
    assert_eq!(settlement.payouts[0].amount, dec!(148.5));
    assert_eq!(settlement.payouts[1].user_id, "userB");
    assert_eq!(settlement.payouts[1].amount, dec!(445.5));
    assert_eq!(settlement.total_paid(), dec!(594));

    let deltas: Vec<(String, i32)> = settlement
        .reputation
        .iter()
        .map(|d| (d.user_id.clone(), d.delta))
        .collect();
    assert_eq!(
        deltas,
        vec![
            ("userA".to_string(), 10),
            ("userB".to_string(), 10),
            ("userC".to_string(), -5),
        ]
    );

    // The caller applies the returned project; betting is now closed.
    project = settlement.project.clone();
    let err = book
        .place(&project, "userD", BetSide::Doubt, dec!(10), dec!(1), settle_at)
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidState { .. }));

    // A second settlement attempt on the applied project is rejected.
    let err = engine
        .settle(&project, book.bets(), 1200, settle_at)
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidState { .. }));

    // Persist and reload the ledger; recording is write-once.
    let dir = std::env::temp_dir().join(format!("launchbet_flow_{}", uuid::Uuid::new_v4()));
    let store = LedgerStore::new(dir);

    store.record(&settlement).unwrap();
    assert!(store.record(&settlement).is_err());

    let loaded = store.load(&project.id).unwrap().unwrap();
    assert_eq!(loaded.payouts, settlement.payouts);
    assert_eq!(loaded.reputation, settlement.reputation);
    assert_eq!(
        loaded.total_paid(),
        loaded.receipt.total_pool - loaded.receipt.platform_fee
    );
    store.remove(&project.id).unwrap();
}

#[test]
fn zero_bet_project_settles_cleanly() {
    let config = AppConfig::default();
    let calculator = OddsCalculator::new(config.odds.clone());
    let engine = SettlementEngine::new(config.fees.clone(), config.reputation.clone());

    let project = make_project(-1);
    let now = Utc::now();

    // No bets: odds degrade to 1.0 on both sides.
    let snap = calculator.snapshot(&project, &[], now);
    assert_eq!(snap.total_pool, Decimal::ZERO);
    assert_eq!(snap.support_odds, Decimal::ONE);
    assert_eq!(snap.doubt_odds, Decimal::ONE);

    let settlement = engine.settle(&project, &[], 500, now).unwrap();
    assert_eq!(settlement.project.status, ProjectStatus::Failure);
    assert_eq!(settlement.receipt.total_pool, Decimal::ZERO);
    assert_eq!(settlement.receipt.platform_fee, Decimal::ZERO);
    assert!(settlement.payouts.is_empty());
    assert!(settlement.reputation.is_empty());
}

#[test]
fn failure_outcome_pays_doubt_side() {
    let config = AppConfig::default();
    let engine = SettlementEngine::new(config.fees.clone(), config.reputation.clone());

    let project = make_project(-1);
    let mut book = BetBook::new();
    let now = Utc::now();
    book.place(&project, "userA", BetSide::Support, dec!(100), dec!(1), now)
        .unwrap();
    book.place(&project, "userB", BetSide::Support, dec!(300), dec!(1), now)
        .unwrap();
    book.place(&project, "userC", BetSide::Doubt, dec!(200), dec!(1), now)
        .unwrap();

    let settlement = engine.settle(&project, book.bets(), 500, now).unwrap();
    assert_eq!(settlement.project.status, ProjectStatus::Failure);
    assert_eq!(settlement.payouts.len(), 1);
    assert_eq!(settlement.payouts[0].user_id, "userC");
    assert_eq!(settlement.payouts[0].amount, dec!(594));

    let userc = settlement
        .reputation
        .iter()
        .find(|d| d.user_id == "userC")
        .unwrap();
    assert_eq!(userc.delta, 10);
    assert!(settlement
        .reputation
        .iter()
        .filter(|d| d.user_id != "userC")
        .all(|d| d.delta == -5));
}
