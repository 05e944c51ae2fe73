//! Live odds calculation.
//!
//! Pure function from a project's bet list to the display snapshot shown
//! while betting is open: pool sizes, implied odds, funding progress,
//! countdown, and bet stats. No side effects, no persistence — safe to
//! call from any read path, any number of times.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::warn;

use crate::config::OddsConfig;
use crate::types::{Bet, BetSide, Project};

// ---------------------------------------------------------------------------
// Pool totals
// ---------------------------------------------------------------------------

/// Aggregate staked amounts per side. Derived, never persisted — recomputed
/// on demand from the bet list. The settlement engine reuses these exact
/// sums, so `support + doubt == total` holds with no drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolTotals {
    pub support: Decimal,
    pub doubt: Decimal,
}

impl PoolTotals {
    /// Exact per-side sums over a bet list.
    pub fn from_bets(bets: &[Bet]) -> Self {
        let mut support = Decimal::ZERO;
        let mut doubt = Decimal::ZERO;
        for bet in bets {
            match bet.side {
                BetSide::Support => support += bet.amount,
                BetSide::Doubt => doubt += bet.amount,
            }
        }
        Self { support, doubt }
    }

    pub fn total(&self) -> Decimal {
        self.support + self.doubt
    }

    /// The pool staked on the given side.
    pub fn side(&self, side: BetSide) -> Decimal {
        match side {
            BetSide::Support => self.support,
            BetSide::Doubt => self.doubt,
        }
    }
}

impl fmt::Display for PoolTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "support={} doubt={} total={}",
            self.support,
            self.doubt,
            self.total(),
        )
    }
}

// ---------------------------------------------------------------------------
// Snapshot components
// ---------------------------------------------------------------------------

/// Countdown to the deadline, decomposed into whole days and remaining
/// whole hours. Each component is ceiling-rounded independently, so
/// 0.1 days left still reports 1 day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRemaining {
    pub days: i64,
    pub hours: i64,
}

impl TimeRemaining {
    pub fn is_expired(&self) -> bool {
        self.days == 0 && self.hours == 0
    }
}

impl fmt::Display for TimeRemaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d {}h", self.days, self.hours)
    }
}

/// Betting activity stats for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetStats {
    pub support_count: usize,
    pub doubt_count: usize,
    /// Number of distinct bettor ids across all bets.
    pub distinct_bettors: usize,
    /// The most recently created bets, newest first.
    pub recent: Vec<Bet>,
}

/// Instantaneous odds snapshot for an open project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OddsSnapshot {
    pub support_pool: Decimal,
    pub doubt_pool: Decimal,
    pub total_pool: Decimal,
    pub support_odds: Decimal,
    pub doubt_odds: Decimal,
    /// Progress toward the holder target, 0–100.
    pub progress_pct: Decimal,
    pub time_remaining: TimeRemaining,
    pub stats: BetStats,
}

impl fmt::Display for OddsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pool={} (S:{} D:{}) odds S:{:.2} D:{:.2} | {:.0}% | {}",
            self.total_pool,
            self.support_pool,
            self.doubt_pool,
            self.support_odds,
            self.doubt_odds,
            self.progress_pct,
            self.time_remaining,
        )
    }
}

// ---------------------------------------------------------------------------
// Calculator
// ---------------------------------------------------------------------------

/// Computes display odds from a bet snapshot.
///
/// Never fails: an empty bet list yields zero pools and odds of exactly 1.0.
pub struct OddsCalculator {
    config: OddsConfig,
}

impl OddsCalculator {
    pub fn new(config: OddsConfig) -> Self {
        Self { config }
    }

    /// Access the odds configuration.
    pub fn config(&self) -> &OddsConfig {
        &self.config
    }

    /// Build the full display snapshot for a project at `now`.
    pub fn snapshot(&self, project: &Project, bets: &[Bet], now: DateTime<Utc>) -> OddsSnapshot {
        let pools = PoolTotals::from_bets(bets);
        let (support_odds, doubt_odds) = implied_odds(&pools);

        OddsSnapshot {
            support_pool: pools.support,
            doubt_pool: pools.doubt,
            total_pool: pools.total(),
            support_odds,
            doubt_odds,
            progress_pct: progress_pct(project.current_metric, project.target_metric),
            time_remaining: time_remaining(project.deadline, now),
            stats: self.stats(bets),
        }
    }

    fn stats(&self, bets: &[Bet]) -> BetStats {
        let support_count = bets.iter().filter(|b| b.side == BetSide::Support).count();
        let doubt_count = bets.len() - support_count;
        let distinct_bettors = bets
            .iter()
            .map(|b| b.user_id.as_str())
            .collect::<HashSet<_>>()
            .len();

        let mut recent: Vec<Bet> = bets.to_vec();
        // Newest first; bet id breaks timestamp ties so the order is stable.
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        recent.truncate(self.config.recent_bets);

        BetStats {
            support_count,
            doubt_count,
            distinct_bettors,
            recent,
        }
    }
}

/// Implied display odds with the "+1" denominator guard.
///
/// `support_odds = total / (support + 1)` and likewise for doubt; the guard
/// avoids division by zero when one side is empty. With no bets at all both
/// sides report exactly 1.0.
pub fn implied_odds(pools: &PoolTotals) -> (Decimal, Decimal) {
    let total = pools.total();
    if total.is_zero() {
        return (Decimal::ONE, Decimal::ONE);
    }
    (
        total / (pools.support + Decimal::ONE),
        total / (pools.doubt + Decimal::ONE),
    )
}

/// Progress toward the holder target, capped at 100. A zero target is
/// clamped to 0% rather than erroring — the odds path must degrade
/// gracefully.
pub fn progress_pct(current_metric: u64, target_metric: u64) -> Decimal {
    if target_metric == 0 {
        warn!(current_metric, "Zero target metric, clamping progress to 0");
        return Decimal::ZERO;
    }
    let pct = Decimal::from(current_metric) / Decimal::from(target_metric) * dec!(100);
    pct.min(dec!(100))
}

/// Countdown to `deadline` from `now`, floored at zero. Days and hours are
/// each ceiling-rounded independently.
pub fn time_remaining(deadline: DateTime<Utc>, now: DateTime<Utc>) -> TimeRemaining {
    let secs = (deadline - now).num_seconds().max(0);
    let days = (secs + 86_399) / 86_400;
    let hours = (secs % 86_400 + 3_599) / 3_600;
    TimeRemaining { days, hours }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
