//! Reputation adjustments at settlement.
//!
//! Every distinct bettor on the project gets exactly one delta: the win
//! delta if any of their bets is on the winning side, the loss delta
//! otherwise. "Any winning bet" short-circuits, so a bettor on both sides
//! with at least one winning bet gets the win delta only.

use std::collections::HashMap;

use crate::config::ReputationConfig;
use crate::types::{Bet, BetSide, ReputationDelta};

/// One delta per distinct bettor, in first-appearance order over the
/// bet list.
pub fn reputation_deltas(
    bets: &[Bet],
    winning_side: BetSide,
    config: &ReputationConfig,
) -> Vec<ReputationDelta> {
    let mut order: Vec<&str> = Vec::new();
    let mut won: HashMap<&str, bool> = HashMap::new();

    for bet in bets {
        let entry = won.entry(bet.user_id.as_str()).or_insert_with(|| {
            order.push(bet.user_id.as_str());
            false
        });
        if bet.side == winning_side {
            *entry = true;
        }
    }

    order
        .into_iter()
        .map(|user_id| ReputationDelta {
            user_id: user_id.to_string(),
            delta: if won[user_id] {
                config.win_delta
            } else {
                config.loss_delta
            },
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
