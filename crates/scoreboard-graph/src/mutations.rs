//! Write operations for the match registry.
//!
//! Participations are always written with MERGE, so re-adding a player to a
//! match or re-recording a score never duplicates the relationship.

use std::collections::BTreeMap;

use neo4rs::query;

use scoreboard_core::{MatchId, PlayerId};

use crate::client::StoreError;
use crate::registry::MatchRegistry;

impl MatchRegistry {
    // ── Players ──────────────────────────────────────────────────

    /// Create a player and return its freshly generated id.
    pub async fn create_player(&self, name: &str) -> Result<PlayerId, StoreError> {
        let id = PlayerId::new();
        let q = query("CREATE (p:Player {id: $id, name: $name})")
            .param("id", id.to_string())
            .param("name", name.to_string());

        self.client.run(q).await?;
        tracing::debug!(player_id = %id, name, "Created player");
        Ok(id)
    }

    /// Rename a player. Returns whether the player exists.
    pub async fn update_player(&self, id: PlayerId, name: &str) -> Result<bool, StoreError> {
        let q = query(
            "MATCH (p:Player {id: $id})
             SET p.name = $name
             RETURN p.id AS id",
        )
        .param("id", id.to_string())
        .param("name", name.to_string());

        let updated = self.client.query_one(q).await?.is_some();
        tracing::debug!(player_id = %id, updated, "Updated player");
        Ok(updated)
    }

    /// Delete a player and every participation it holds.
    ///
    /// Matches the player had won lose their `winner_id`, since the winner
    /// must be a participant. Deleting an unknown id is not an error.
    pub async fn delete_player(&self, id: PlayerId) -> Result<bool, StoreError> {
        let mut txn = self.client.start_txn().await?;

        txn.run(
            query(
                "MATCH (m:Match {winner_id: $id})
                 REMOVE m.winner_id",
            )
            .param("id", id.to_string()),
        )
        .await?;

        txn.run(
            query(
                "MATCH (p:Player {id: $id})
                 DETACH DELETE p",
            )
            .param("id", id.to_string()),
        )
        .await?;

        txn.commit().await?;
        tracing::debug!(player_id = %id, "Deleted player");
        Ok(true)
    }

    // ── Matches ──────────────────────────────────────────────────

    /// Create an empty match stamped with the server's current time.
    pub async fn create_match(&self) -> Result<MatchId, StoreError> {
        let id = MatchId::new();
        let q = query("CREATE (m:Match {id: $id, played_at: datetime()})")
            .param("id", id.to_string());

        self.client.run(q).await?;
        tracing::debug!(match_id = %id, "Created match");
        Ok(id)
    }

    /// Delete a match and every participation in it. Idempotent.
    pub async fn delete_match(&self, id: MatchId) -> Result<bool, StoreError> {
        let q = query(
            "MATCH (m:Match {id: $id})
             DETACH DELETE m",
        )
        .param("id", id.to_string());

        self.client.run(q).await?;
        tracing::debug!(match_id = %id, "Deleted match");
        Ok(true)
    }

    // ── Participations ───────────────────────────────────────────

    /// Add a player to a match without a score.
    ///
    /// Returns `false` if either the player or the match does not exist.
    pub async fn add_player_to_match(
        &self,
        match_id: MatchId,
        player_id: PlayerId,
    ) -> Result<bool, StoreError> {
        let q = query(
            "MATCH (p:Player {id: $player_id})
             MATCH (m:Match {id: $match_id})
             MERGE (p)-[:PLAYED_IN]->(m)
             RETURN p.id AS player_id",
        )
        .param("player_id", player_id.to_string())
        .param("match_id", match_id.to_string());

        let added = self.client.query_one(q).await?.is_some();
        tracing::debug!(
            match_id = %match_id,
            player_id = %player_id,
            added,
            "Added player to match"
        );
        Ok(added)
    }

    /// Record final scores for a match and derive its winner.
    ///
    /// Each score upserts the participation, so players need not have been
    /// added beforehand; ids with no matching player write nothing. With at
    /// least one score, the winner becomes the scored participant with the
    /// highest score, ties going to the lowest player id. An empty `scores`
    /// leaves the match untouched.
    ///
    /// All writes happen in one transaction.
    pub async fn record_result(
        &self,
        match_id: MatchId,
        scores: &BTreeMap<PlayerId, i64>,
    ) -> Result<bool, StoreError> {
        if scores.is_empty() {
            tracing::debug!(match_id = %match_id, "No scores to record");
            return Ok(true);
        }

        let mut txn = self.client.start_txn().await?;

        for (player_id, score) in scores {
            let q = query(
                "MATCH (p:Player {id: $player_id})
                 MATCH (m:Match {id: $match_id})
                 MERGE (p)-[r:PLAYED_IN]->(m)
                 SET r.score = $score",
            )
            .param("player_id", player_id.to_string())
            .param("match_id", match_id.to_string())
            .param("score", *score);

            txn.run(q).await?;
        }

        let q = query(
            "MATCH (m:Match {id: $match_id})
             OPTIONAL MATCH (p:Player)-[r:PLAYED_IN]->(m)
             WHERE r.score IS NOT NULL
             WITH m, p, r
             ORDER BY r.score DESC, p.id ASC
             WITH m, head(collect(p.id)) AS winner_id
             SET m.winner_id = winner_id",
        )
        .param("match_id", match_id.to_string());
        txn.run(q).await?;

        txn.commit().await?;
        tracing::debug!(match_id = %match_id, scores = scores.len(), "Recorded match result");
        Ok(true)
    }
}
