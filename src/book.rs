//! In-memory bet book.
//!
//! Enforces the platform's placement rule: at most one bet per
//! (project, user) pair. Placing again while the project is still open
//! accumulates into the existing bet's amount instead of creating a new
//! record; the original id, creation time, and odds-at-placement are kept.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use crate::types::{Bet, BetSide, EngineError, Project};

/// Bets for a single project, keyed by bettor.
#[derive(Debug, Clone, Default)]
pub struct BetBook {
    bets: Vec<Bet>,
}

impl BetBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a book from an existing bet list (e.g. loaded by the caller).
    pub fn from_bets(bets: Vec<Bet>) -> Self {
        Self { bets }
    }

    /// The current bet snapshot, in placement order.
    pub fn bets(&self) -> &[Bet] {
        &self.bets
    }

    pub fn is_empty(&self) -> bool {
        self.bets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bets.len()
    }

    /// Place a stake for `user_id` on `side`.
    ///
    /// Rejects non-positive amounts and placements on projects that are no
    /// longer open. If the user already has a bet on this project the
    /// amount accumulates into it — including when the new placement names
    /// the other side; the bet keeps its original side, matching the
    /// one-record-per-user model. Returns the resulting bet.
    pub fn place(
        &mut self,
        project: &Project,
        user_id: &str,
        side: BetSide,
        amount: Decimal,
        odds_at_placement: Decimal,
        now: DateTime<Utc>,
    ) -> Result<&Bet, EngineError> {
        if amount <= Decimal::ZERO {
            return Err(EngineError::InvalidBet(format!(
                "amount must be positive, got {amount}"
            )));
        }
        if !project.is_active() {
            return Err(EngineError::InvalidState {
                project_id: project.id.clone(),
                reason: format!("betting is closed (status: {})", project.status),
            });
        }

        if let Some(idx) = self
            .bets
            .iter()
            .position(|b| b.project_id == project.id && b.user_id == user_id)
        {
            self.bets[idx].amount += amount;
            debug!(
                project_id = %project.id,
                user_id,
                added = %amount,
                total = %self.bets[idx].amount,
                "Accumulated into existing bet"
            );
            return Ok(&self.bets[idx]);
        }

        let bet = Bet {
            id: Uuid::new_v4().to_string(),
            project_id: project.id.clone(),
            user_id: user_id.to_string(),
            amount,
            side,
            odds_at_placement,
            created_at: now,
        };
        debug!(project_id = %project.id, user_id, amount = %amount, side = %side, "Bet placed");
        self.bets.push(bet);
        Ok(self.bets.last().unwrap())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
