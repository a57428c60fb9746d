//! scoreboard-core: Shared types, configuration, and error handling for the Scoreboard registry.
//!
//! This crate provides the foundational types used across all Scoreboard components:
//! - Identifiers and records for players, matches, and participations
//! - Derived views (standings, per-player outcome)
//! - Layered configuration loading
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use error::ScoreboardError;
pub use types::{
    HistoryEntry, Match, MatchDetail, MatchId, Outcome, Participation, Player, PlayerId,
};
