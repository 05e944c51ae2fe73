//! Shared types for the settlement core.
//!
//! These types form the data model used across all modules.
//! They are designed to be stable so that the odds, settlement,
//! and book modules can depend on them without circular references.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which side of a project a bet backs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BetSide {
    /// The project will reach its holder target by the deadline.
    Support,
    /// The project will miss its holder target.
    Doubt,
}

impl BetSide {
    /// The opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            BetSide::Support => BetSide::Doubt,
            BetSide::Doubt => BetSide::Support,
        }
    }
}

impl fmt::Display for BetSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetSide::Support => write!(f, "SUPPORT"),
            BetSide::Doubt => write!(f, "DOUBT"),
        }
    }
}

/// Project lifecycle status. Monotonic: `Active` transitions to exactly one
/// of the terminal states at settlement and never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    Active,
    Success,
    Failure,
}

impl ProjectStatus {
    /// Whether this is a terminal (settled) status.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ProjectStatus::Active)
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectStatus::Active => write!(f, "ACTIVE"),
            ProjectStatus::Success => write!(f, "SUCCESS"),
            ProjectStatus::Failure => write!(f, "FAILURE"),
        }
    }
}

// ---------------------------------------------------------------------------
// Bet
// ---------------------------------------------------------------------------

/// A single staked position on a project.
///
/// At most one bet exists per (project, user) pair; re-placing accumulates
/// into the existing record (see `book::BetBook`). Immutable once the
/// project settles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bet {
    pub id: String,
    pub project_id: String,
    pub user_id: String,
    /// Staked amount in token units. Positive.
    pub amount: Decimal,
    pub side: BetSide,
    /// Display odds at the time the bet was first placed. Informational
    /// only — payouts are pari-mutuel and ignore this.
    pub odds_at_placement: Decimal,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Bet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {} {} @ {:.2}",
            self.project_id, self.user_id, self.side, self.amount, self.odds_at_placement,
        )
    }
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// A startup project open for validation betting.
///
/// The pool and fee fields are `None` while the project is `Active` and are
/// populated exactly once by the settlement engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    /// Holder-count target the project must reach. Positive.
    pub target_metric: u64,
    /// Latest observed holder count (final count once settled).
    pub current_metric: u64,
    /// Betting closes and settlement becomes possible at this instant.
    pub deadline: DateTime<Utc>,
    pub status: ProjectStatus,
    pub support_pool: Option<Decimal>,
    pub doubt_pool: Option<Decimal>,
    pub total_pool: Option<Decimal>,
    pub platform_fee: Option<Decimal>,
}

impl Project {
    /// Whether the project is still open for betting.
    pub fn is_active(&self) -> bool {
        self.status == ProjectStatus::Active
    }

    /// Whether the deadline has passed at `now`.
    pub fn deadline_reached(&self, now: DateTime<Utc>) -> bool {
        now >= self.deadline
    }

    /// Helper to build a test project with sensible defaults.
    #[cfg(test)]
    pub fn sample() -> Self {
        Project {
            id: "proj-001".to_string(),
            name: "MoonCat Protocol".to_string(),
            target_metric: 1000,
            current_metric: 250,
            deadline: Utc::now() + chrono::Duration::days(30),
            status: ProjectStatus::Active,
            support_pool: None,
            doubt_pool: None,
            total_pool: None,
            platform_fee: None,
        }
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {} ({}/{} holders, deadline {})",
            self.id, self.name, self.status, self.current_metric, self.target_metric, self.deadline,
        )
    }
}

// ---------------------------------------------------------------------------
// Settlement records
// ---------------------------------------------------------------------------

/// Amount owed to one winning bettor. Created only at settlement, one per
/// winning bet, never mutated after creation. Claim/transfer is the
/// caller's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub user_id: String,
    pub project_id: String,
    pub amount: Decimal,
    pub side: BetSide,
}

impl fmt::Display for Payout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} wins {} ({})",
            self.project_id, self.user_id, self.amount, self.side,
        )
    }
}

/// Settlement receipt. Write-once per project — the authoritative record of
/// the pools and fee at resolution time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReceipt {
    pub id: String,
    pub project_id: String,
    pub final_metric: u64,
    pub support_pool: Decimal,
    pub doubt_pool: Decimal,
    pub total_pool: Decimal,
    pub platform_fee: Decimal,
    pub processed_at: DateTime<Utc>,
}

impl fmt::Display for ValidationReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] final={} support={} doubt={} total={} fee={}",
            self.project_id,
            self.final_metric,
            self.support_pool,
            self.doubt_pool,
            self.total_pool,
            self.platform_fee,
        )
    }
}

/// Reputation adjustment for one bettor after settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReputationDelta {
    pub user_id: String,
    pub delta: i32,
}

impl fmt::Display for ReputationDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.delta >= 0 { "+" } else { "" };
        write!(f, "{} {sign}{}", self.user_id, self.delta)
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for the settlement core.
///
/// Only structural precondition violations are errors. Numeric edge cases
/// (empty pools, zero winners, zero bets) are valid outcomes and the odds
/// and settlement paths return zero-valued/empty outputs for them instead.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid state for project {project_id}: {reason}")]
    InvalidState { project_id: String, reason: String },

    #[error("Invalid bet: {0}")]
    InvalidBet(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
