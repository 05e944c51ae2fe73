//! Settlement engine — one-shot financial resolution of a project.
//!
//! Given a consistent snapshot of a project's bets and the final holder
//! count, computes pools, deducts the platform fee, splits the remainder
//! across the winning side, and produces reputation deltas and the
//! write-once receipt. Purely computational: the returned records are
//! applied by the caller, which also owns the at-most-once guarantee via
//! the project's status transition.

pub mod payout;
pub mod reputation;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::config::{FeeConfig, ReputationConfig};
use crate::odds::PoolTotals;
use crate::types::{
    Bet, BetSide, EngineError, Payout, Project, ProjectStatus, ReputationDelta, ValidationReceipt,
};

// ---------------------------------------------------------------------------
// Settlement result
// ---------------------------------------------------------------------------

/// Everything the resolution workflow must persist transactionally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settlement {
    /// The project with its terminal status, final metric, pools, and fee.
    pub project: Project,
    pub receipt: ValidationReceipt,
    /// One payout per winning bet, in input bet order. Empty when nobody
    /// bet the winning side.
    pub payouts: Vec<Payout>,
    /// One delta per distinct bettor, in first-appearance order.
    pub reputation: Vec<ReputationDelta>,
}

impl Settlement {
    /// The outcome of the settled project.
    pub fn outcome(&self) -> ProjectStatus {
        self.project.status
    }

    /// Total amount owed to winners.
    pub fn total_paid(&self) -> rust_decimal::Decimal {
        self.payouts.iter().map(|p| p.amount).sum()
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Computes the authoritative payout ledger for a project.
///
/// Deterministic: `now` is passed in rather than read from the clock, so
/// identical inputs always produce identical payout and reputation lists.
pub struct SettlementEngine {
    fees: FeeConfig,
    reputation: ReputationConfig,
}

impl SettlementEngine {
    pub fn new(fees: FeeConfig, reputation: ReputationConfig) -> Self {
        Self { fees, reputation }
    }

    /// Settle a project against its final holder count.
    ///
    /// Preconditions (`InvalidState` if violated): the project is `Active`
    /// and `now` is at or past the deadline. All numeric edge cases — zero
    /// bets, zero pools, nobody on the winning side — are valid outcomes,
    /// not errors.
    pub fn settle(
        &self,
        project: &Project,
        bets: &[Bet],
        final_metric: u64,
        now: DateTime<Utc>,
    ) -> Result<Settlement, EngineError> {
        if !project.is_active() {
            return Err(EngineError::InvalidState {
                project_id: project.id.clone(),
                reason: format!("project is not active (status: {})", project.status),
            });
        }
        if !project.deadline_reached(now) {
            return Err(EngineError::InvalidState {
                project_id: project.id.clone(),
                reason: format!("deadline {} not reached at {}", project.deadline, now),
            });
        }

        // Exact pools — no "+1" display guard here.
        let pools = PoolTotals::from_bets(bets);
        let total_pool = pools.total();

        let fee = payout::platform_fee(total_pool, self.fees.platform_rate, self.fees.payout_scale);
        let winners_pool = total_pool - fee;

        let outcome = if final_metric >= project.target_metric {
            ProjectStatus::Success
        } else {
            ProjectStatus::Failure
        };
        let winning_side = match outcome {
            ProjectStatus::Success => BetSide::Support,
            _ => BetSide::Doubt,
        };

        let winning_bets: Vec<&Bet> = bets.iter().filter(|b| b.side == winning_side).collect();
        let winning_pool_total = pools.side(winning_side);

        // Empty winning side: winners_pool is retained as platform revenue.
        let payouts = payout::distribute(
            &winning_bets,
            winners_pool,
            winning_pool_total,
            self.fees.payout_scale,
        );

        let reputation = reputation::reputation_deltas(bets, winning_side, &self.reputation);

        let mut settled = project.clone();
        settled.status = outcome;
        settled.current_metric = final_metric;
        settled.support_pool = Some(pools.support);
        settled.doubt_pool = Some(pools.doubt);
        settled.total_pool = Some(total_pool);
        settled.platform_fee = Some(fee);

        let receipt = ValidationReceipt {
            id: Uuid::new_v4().to_string(),
            project_id: project.id.clone(),
            final_metric,
            support_pool: pools.support,
            doubt_pool: pools.doubt,
            total_pool,
            platform_fee: fee,
            processed_at: now,
        };

        info!(
            project_id = %project.id,
            outcome = %outcome,
            total_pool = %total_pool,
            fee = %fee,
            winners = payouts.len(),
            bettors = reputation.len(),
            "Project settled"
        );

        Ok(Settlement {
            project: settled,
            receipt,
            payouts,
            reputation,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
