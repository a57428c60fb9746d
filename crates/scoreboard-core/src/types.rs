//! Core domain types for the Scoreboard match registry.
//!
//! Players and matches are nodes in the graph; a participation is the
//! `PLAYED_IN` relationship between them and carries the player's score.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ScoreboardError;

// ── Identifiers ───────────────────────────────────────────────────

/// Unique identifier for a player.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for PlayerId {
    type Err = ScoreboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| ScoreboardError::InvalidId {
                kind: "player",
                value: s.to_string(),
            })
    }
}

/// Unique identifier for a match.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchId(pub Uuid);

impl MatchId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for MatchId {
    type Err = ScoreboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| ScoreboardError::InvalidId {
                kind: "match",
                value: s.to_string(),
            })
    }
}

// ── Records ───────────────────────────────────────────────────────

/// A registered player.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

/// A match node. `winner_id` is only ever derived from recorded scores.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Match {
    pub id: MatchId,
    pub played_at: DateTime<Utc>,
    pub winner_id: Option<PlayerId>,
}

/// One player's participation in a match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Participation {
    pub player_id: PlayerId,
    pub player_name: String,
    /// `None` until a result has been recorded for this player.
    pub score: Option<i64>,
}

/// A match together with everyone who played in it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchDetail {
    #[serde(flatten)]
    pub summary: Match,
    pub participants: Vec<Participation>,
}

impl MatchDetail {
    pub fn id(&self) -> MatchId {
        self.summary.id
    }

    /// The participant recorded as winner, if the winner is still a participant.
    pub fn winner(&self) -> Option<&Participation> {
        let winner_id = self.summary.winner_id?;
        self.participants.iter().find(|p| p.player_id == winner_id)
    }

    /// Participants ranked best first.
    ///
    /// Higher scores come first and unscored players come last. Equal
    /// scores are ordered by player id, so the head of the list is the
    /// player the registry records as winner.
    pub fn standings(&self) -> Vec<&Participation> {
        let mut ranked: Vec<&Participation> = self.participants.iter().collect();
        ranked.sort_by(|a, b| rank(a, b));
        ranked
    }
}

fn rank(a: &Participation, b: &Participation) -> Ordering {
    match (a.score, b.score) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    // Uuid byte order matches the order of the stored lowercase strings.
    .then_with(|| a.player_id.cmp(&b.player_id))
}

/// How a match ended from one player's point of view.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Won,
    Lost,
    /// No result has been recorded yet.
    Undecided,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Won => "won",
            Self::Lost => "lost",
            Self::Undecided => "undecided",
        };
        f.write_str(s)
    }
}

/// A match as seen from one player's history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub detail: MatchDetail,
    pub player_score: Option<i64>,
    pub is_winner: bool,
}

impl HistoryEntry {
    pub fn for_player(detail: MatchDetail, player_id: PlayerId, player_score: Option<i64>) -> Self {
        let is_winner = detail.summary.winner_id == Some(player_id);
        Self {
            detail,
            player_score,
            is_winner,
        }
    }

    pub fn outcome(&self) -> Outcome {
        if self.is_winner {
            Outcome::Won
        } else if self.detail.summary.winner_id.is_some() {
            Outcome::Lost
        } else {
            Outcome::Undecided
        }
    }
}
