//! Scoreboard Graph — Neo4j-backed match registry.
//!
//! Players and matches are stored as `:Player` and `:Match` nodes joined by
//! `PLAYED_IN` relationships that carry each player's score. All reads and
//! writes go through [`MatchRegistry`], which owns a [`GraphClient`].

pub mod client;
pub mod mutations;
pub mod queries;
pub mod registry;
pub mod schema;

pub use client::{GraphClient, GraphConfig, StoreError};
pub use registry::MatchRegistry;
