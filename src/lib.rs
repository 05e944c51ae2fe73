//! launchbet — pari-mutuel settlement core.
//!
//! Library crate exposing the odds calculator and settlement engine
//! for the startup-validation betting platform, plus the supporting
//! bet book, configuration, and ledger persistence modules.

pub mod book;
pub mod config;
pub mod odds;
pub mod settlement;
pub mod storage;
pub mod types;
