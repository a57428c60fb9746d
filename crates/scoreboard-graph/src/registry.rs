//! The match registry: the single entry point for player and match operations.
//!
//! Reads live in [`crate::queries`], writes in [`crate::mutations`]. The
//! registry holds no state of its own beyond the client handle, so every
//! answer is re-derived from the graph on each call.

use crate::client::GraphClient;

/// Registry of players and matches backed by Neo4j.
#[derive(Clone)]
pub struct MatchRegistry {
    pub(crate) client: GraphClient,
}

impl MatchRegistry {
    pub fn new(client: GraphClient) -> Self {
        Self { client }
    }

    /// Get a reference to the underlying client for direct queries.
    pub fn client(&self) -> &GraphClient {
        &self.client
    }
}
