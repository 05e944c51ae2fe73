//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Every section has defaults so the crate works without a config file;
//! the fee rate in particular is a deployment knob, not business logic.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::fs;

/// Top-level settlement core configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub fees: FeeConfig,
    #[serde(default)]
    pub reputation: ReputationConfig,
    #[serde(default)]
    pub odds: OddsConfig,
}

/// Platform fee and payout rounding parameters.
#[derive(Debug, Deserialize, Clone)]
pub struct FeeConfig {
    /// Fraction of the total pool taken as platform revenue at settlement.
    pub platform_rate: Decimal,
    /// Decimal places payouts are quantized to (token minor units).
    pub payout_scale: u32,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            platform_rate: dec!(0.01), // 1% of the total pool
            payout_scale: 6,
        }
    }
}

/// Reputation deltas applied at settlement.
#[derive(Debug, Deserialize, Clone)]
pub struct ReputationConfig {
    /// Applied to any bettor with at least one winning bet.
    pub win_delta: i32,
    /// Applied to bettors with no winning bets.
    pub loss_delta: i32,
}

impl Default for ReputationConfig {
    fn default() -> Self {
        Self {
            win_delta: 10,
            loss_delta: -5,
        }
    }
}

/// Odds snapshot parameters.
#[derive(Debug, Deserialize, Clone)]
pub struct OddsConfig {
    /// How many of the most recent bets to include in the snapshot stats.
    pub recent_bets: usize,
}

impl Default for OddsConfig {
    fn default() -> Self {
        Self { recent_bets: 10 }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }
}
