//! Read operations for the match registry.
//!
//! Rows coming back from Neo4j are decoded into typed records here and
//! nowhere else.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use neo4rs::{query, Row};
use serde::Deserialize;

use scoreboard_core::{
    HistoryEntry, Match, MatchDetail, MatchId, Participation, Player, PlayerId, ScoreboardError,
};

use crate::client::StoreError;
use crate::registry::MatchRegistry;

impl MatchRegistry {
    // ── Players ──────────────────────────────────────────────────

    /// Get a player by id, or `None` if there is no such player.
    pub async fn get_player(&self, id: PlayerId) -> Result<Option<Player>, StoreError> {
        let q = query(
            "MATCH (p:Player {id: $id})
             RETURN p",
        )
        .param("id", id.to_string());

        match self.client.query_one(q).await? {
            Some(row) => {
                let node: neo4rs::Node = column(&row, "p")?;
                Ok(Some(player_from_node(&node)?))
            }
            None => Ok(None),
        }
    }

    /// List every player. Order is unspecified.
    pub async fn list_players(&self) -> Result<Vec<Player>, StoreError> {
        let rows = self
            .client
            .query_rows(query("MATCH (p:Player) RETURN p"))
            .await?;

        let mut players = Vec::with_capacity(rows.len());
        for row in rows {
            let node: neo4rs::Node = column(&row, "p")?;
            players.push(player_from_node(&node)?);
        }
        Ok(players)
    }

    // ── Matches ──────────────────────────────────────────────────

    /// Get a match with its participants, or `None` if there is no such match.
    pub async fn get_match(&self, id: MatchId) -> Result<Option<MatchDetail>, StoreError> {
        let q = query(
            "MATCH (m:Match {id: $id})
             RETURN m.id AS id, m.played_at.epochMillis AS played_at_ms,
                    m.winner_id AS winner_id",
        )
        .param("id", id.to_string());

        let Some(row) = self.client.query_one(q).await? else {
            return Ok(None);
        };
        let summary = match_from_row(&row)?;
        let participants = self.participants_for(&[summary.id]).await?;

        Ok(assemble(vec![summary], participants).pop())
    }

    /// List every match with its participants. Order is unspecified.
    pub async fn list_matches(&self) -> Result<Vec<MatchDetail>, StoreError> {
        let rows = self
            .client
            .query_rows(query(
                "MATCH (m:Match)
                 RETURN m.id AS id, m.played_at.epochMillis AS played_at_ms,
                        m.winner_id AS winner_id",
            ))
            .await?;

        let summaries = rows
            .iter()
            .map(match_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        let ids: Vec<MatchId> = summaries.iter().map(|m| m.id).collect();
        let participants = self.participants_for(&ids).await?;

        Ok(assemble(summaries, participants))
    }

    /// Every match a player took part in, most recent first.
    ///
    /// Each entry carries the player's own score and whether they won.
    /// Matches played at the same instant are ordered by match id.
    pub async fn player_history(
        &self,
        player_id: PlayerId,
    ) -> Result<Vec<HistoryEntry>, StoreError> {
        let q = query(
            "MATCH (p:Player {id: $id})-[r:PLAYED_IN]->(m:Match)
             RETURN m.id AS id, m.played_at.epochMillis AS played_at_ms,
                    m.winner_id AS winner_id, r.score AS player_score
             ORDER BY m.played_at DESC, m.id ASC",
        )
        .param("id", player_id.to_string());

        let rows = self.client.query_rows(q).await?;

        let mut summaries = Vec::with_capacity(rows.len());
        let mut own_scores = Vec::with_capacity(rows.len());
        for row in &rows {
            summaries.push(match_from_row(row)?);
            own_scores.push(column::<Option<i64>>(row, "player_score")?);
        }

        let ids: Vec<MatchId> = summaries.iter().map(|m| m.id).collect();
        let participants = self.participants_for(&ids).await?;

        let history = assemble(summaries, participants)
            .into_iter()
            .zip(own_scores)
            .map(|(detail, score)| HistoryEntry::for_player(detail, player_id, score))
            .collect();
        Ok(history)
    }

    /// Fetch participations for a set of matches in one round trip.
    async fn participants_for(
        &self,
        match_ids: &[MatchId],
    ) -> Result<HashMap<MatchId, Vec<Participation>>, StoreError> {
        if match_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let ids: Vec<String> = match_ids.iter().map(ToString::to_string).collect();
        let q = query(
            "MATCH (p:Player)-[r:PLAYED_IN]->(m:Match)
             WHERE m.id IN $match_ids
             RETURN m.id AS match_id, p.id AS player_id,
                    p.name AS player_name, r.score AS score",
        )
        .param("match_ids", ids);

        let rows = self.client.query_rows(q).await?;
        let mut grouped: HashMap<MatchId, Vec<Participation>> = HashMap::new();
        for row in &rows {
            let match_id: MatchId = parse_id(&column::<String>(row, "match_id")?)?;
            grouped
                .entry(match_id)
                .or_default()
                .push(participation_from_row(row)?);
        }
        Ok(grouped)
    }
}

// ── Row decoding ─────────────────────────────────────────────────

/// Join match summaries with their participants, keeping summary order.
fn assemble(
    summaries: Vec<Match>,
    mut participants: HashMap<MatchId, Vec<Participation>>,
) -> Vec<MatchDetail> {
    summaries
        .into_iter()
        .map(|summary| MatchDetail {
            participants: participants.remove(&summary.id).unwrap_or_default(),
            summary,
        })
        .collect()
}

fn player_from_node(node: &neo4rs::Node) -> Result<Player, StoreError> {
    Ok(Player {
        id: parse_id(&property::<String>(node, "id")?)?,
        name: property(node, "name")?,
    })
}

fn match_from_row(row: &Row) -> Result<Match, StoreError> {
    let winner_id: Option<PlayerId> = column::<Option<String>>(row, "winner_id")?
        .as_deref()
        .map(parse_id)
        .transpose()?;

    Ok(Match {
        id: parse_id(&column::<String>(row, "id")?)?,
        played_at: timestamp_from_millis(column(row, "played_at_ms")?)?,
        winner_id,
    })
}

fn participation_from_row(row: &Row) -> Result<Participation, StoreError> {
    Ok(Participation {
        player_id: parse_id(&column::<String>(row, "player_id")?)?,
        player_name: column(row, "player_name")?,
        score: column(row, "score")?,
    })
}

fn column<'r, T: Deserialize<'r>>(row: &'r Row, key: &str) -> Result<T, StoreError> {
    row.get(key)
        .map_err(|e| StoreError::Decode(format!("column `{key}`: {e}")))
}

fn property<'n, T: Deserialize<'n>>(node: &'n neo4rs::Node, key: &str) -> Result<T, StoreError> {
    node.get(key)
        .map_err(|e| StoreError::Decode(format!("property `{key}`: {e}")))
}

fn parse_id<T>(raw: &str) -> Result<T, StoreError>
where
    T: FromStr<Err = ScoreboardError>,
{
    raw.parse().map_err(|e: ScoreboardError| StoreError::Decode(e.to_string()))
}

fn timestamp_from_millis(ms: i64) -> Result<DateTime<Utc>, StoreError> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| StoreError::Decode(format!("timestamp out of range: {ms}")))
}
