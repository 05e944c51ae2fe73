//! Fee deduction and proportional payout split.
//!
//! The pari-mutuel split: every winning bet is paid
//! `(stake / winning_pool) × winners_pool`, quantized to the configured
//! payout scale with the largest-remainder method so the payouts sum to
//! the winners' pool exactly.

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::types::{Bet, Payout};

/// Platform fee on the total pool, banker-rounded to `scale` decimals.
pub fn platform_fee(total_pool: Decimal, rate: Decimal, scale: u32) -> Decimal {
    (total_pool * rate).round_dp_with_strategy(scale, RoundingStrategy::MidpointNearestEven)
}

/// Split `winners_pool` across `winning_bets` proportionally to stake.
///
/// Rounding policy (largest-remainder): each share is truncated to `scale`
/// decimals, then the leftover is distributed one minor unit at a time to
/// the shares with the largest truncated remainders, ties broken by bet id
/// ascending. The payouts sum to `winners_pool` exactly whenever the stakes
/// carry at most `scale` decimals; finer-grained dust stays with the
/// platform. Deterministic for identical inputs.
///
/// `winning_pool_total` must be the exact sum of the winning bets' stakes.
/// Returns an empty list when it is zero (nobody bet the winning side) —
/// a legal degenerate state, not an error.
pub fn distribute(
    winning_bets: &[&Bet],
    winners_pool: Decimal,
    winning_pool_total: Decimal,
    scale: u32,
) -> Vec<Payout> {
    if winning_bets.is_empty() || winning_pool_total.is_zero() {
        return Vec::new();
    }

    let unit = Decimal::new(1, scale);
    let target = winners_pool.round_dp_with_strategy(scale, RoundingStrategy::ToZero);

    // Truncated shares plus the remainder each truncation dropped.
    let mut amounts: Vec<Decimal> = Vec::with_capacity(winning_bets.len());
    let mut remainders: Vec<Decimal> = Vec::with_capacity(winning_bets.len());
    let mut allocated = Decimal::ZERO;
    for bet in winning_bets {
        let raw = bet.amount * winners_pool / winning_pool_total;
        let floored = raw.round_dp_with_strategy(scale, RoundingStrategy::ToZero);
        remainders.push(raw - floored);
        amounts.push(floored);
        allocated += floored;
    }

    // Hand the leftover out one minor unit at a time, largest remainder
    // first, bet id ascending on ties.
    let mut order: Vec<usize> = (0..winning_bets.len()).collect();
    order.sort_by(|&a, &b| {
        remainders[b]
            .cmp(&remainders[a])
            .then_with(|| winning_bets[a].id.cmp(&winning_bets[b].id))
    });

    let mut leftover = target - allocated;
    let mut i = 0;
    while leftover >= unit {
        amounts[order[i % order.len()]] += unit;
        leftover -= unit;
        i += 1;
    }

    debug!(
        winners = winning_bets.len(),
        pool = %winners_pool,
        corrections = i,
        "Payouts distributed"
    );

    winning_bets
        .iter()
        .zip(amounts)
        .map(|(bet, amount)| Payout {
            user_id: bet.user_id.clone(),
            project_id: bet.project_id.clone(),
            amount,
            side: bet.side,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
