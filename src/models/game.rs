//! Completed game record, the unit of the game log.
//!
//! The serialized shape of [`GameRecord`] is the interchange format used
//! when players share a finished game between devices, so field names and
//! the `-1` "not recorded" round sentinel are kept exactly as written.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

use super::GameId;

/// Rounds in a game of Five Crowns (wilds 3 through K).
pub const ROUND_COUNT: usize = 11;

/// Wild value of the first round.
pub const FIRST_WILD: u8 = 3;

/// Wire value for a round that was not played or not recorded.
pub const NOT_RECORDED_SENTINEL: i64 = -1;

/// One round's score for one player.
///
/// `None` means the round was never recorded. On the wire this is `-1`; any
/// negative number read from the wire is treated the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RoundScore(Option<u32>);

impl RoundScore {
    pub const NOT_RECORDED: RoundScore = RoundScore(None);

    pub fn played(points: u32) -> Self {
        Self(Some(points))
    }

    pub fn value(&self) -> Option<u32> {
        self.0
    }
}

impl From<i64> for RoundScore {
    fn from(raw: i64) -> Self {
        if raw < 0 {
            Self::NOT_RECORDED
        } else {
            Self(u32::try_from(raw).ok())
        }
    }
}

impl Serialize for RoundScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Some(points) => serializer.serialize_u32(points),
            None => serializer.serialize_i64(NOT_RECORDED_SENTINEL),
        }
    }
}

impl<'de> Deserialize<'de> for RoundScore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        if raw > u32::MAX as i64 {
            return Err(serde::de::Error::custom(format!(
                "round score {} out of range",
                raw
            )));
        }
        Ok(RoundScore::from(raw))
    }
}

/// The wild card of a round: round index + 3, shown as 3..10, J, Q, K.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Wildcard(u8);

impl Wildcard {
    pub fn for_round(round_index: usize) -> Self {
        Self(FIRST_WILD.saturating_add(round_index.min(u8::MAX as usize) as u8))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Serialize for Wildcard {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl fmt::Display for Wildcard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            11 => write!(f, "J"),
            12 => write!(f, "Q"),
            13 => write!(f, "K"),
            n => write!(f, "{}", n),
        }
    }
}

/// A player's row of round scores, written as a `[name, [rounds...]]` tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerScores(pub String, pub Vec<RoundScore>);

impl PlayerScores {
    pub fn new(player: impl Into<String>, rounds: Vec<RoundScore>) -> Self {
        Self(player.into(), rounds)
    }

    pub fn player(&self) -> &str {
        &self.0
    }

    pub fn rounds(&self) -> &[RoundScore] {
        &self.1
    }

    /// Sum of recorded rounds; unrecorded rounds count for nothing.
    pub fn total(&self) -> u64 {
        self.1
            .iter()
            .filter_map(RoundScore::value)
            .map(u64::from)
            .sum()
    }
}

/// A finished game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub winner: String,
    pub players: Vec<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub scores: Vec<PlayerScores>,
    pub go_outs: Vec<String>,
}

impl GameRecord {
    /// Content-derived ID (winner, start, end, roster).
    pub fn id(&self) -> GameId {
        let start = self.start.to_rfc3339();
        let end = self.end.to_rfc3339();
        let roster = self.players.join(",");
        GameId::generate(&[&self.winner, &start, &end, &roster])
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn has_player(&self, player: &str) -> bool {
        self.players.iter().any(|p| p == player)
    }

    pub fn has_scores(&self) -> bool {
        !self.scores.is_empty()
    }

    pub fn scores_for(&self, player: &str) -> Option<&PlayerScores> {
        self.scores.iter().find(|row| row.player() == player)
    }

    /// Final score for a player, or `None` when the record has no row for them.
    pub fn total_for(&self, player: &str) -> Option<u64> {
        self.scores_for(player).map(PlayerScores::total)
    }

    pub fn go_outs_for(&self, player: &str) -> usize {
        self.go_outs.iter().filter(|name| *name == player).count()
    }

    /// Check the invariants a record must hold before joining the log.
    ///
    /// Collects every violation rather than stopping at the first.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let mut violations = Vec::new();

        let roster: HashSet<&str> = self.players.iter().map(String::as_str).collect();
        if roster.len() != self.players.len() {
            violations.push("players contains duplicate names".to_string());
        }
        if roster.len() < 2 {
            violations.push("a game needs at least two players".to_string());
        }
        if !roster.contains(self.winner.as_str()) {
            violations.push(format!("winner '{}' is not one of the players", self.winner));
        }

        if self.has_scores() {
            let scored: HashSet<&str> = self.scores.iter().map(PlayerScores::player).collect();
            if scored.len() != self.scores.len() {
                violations.push("scores contains duplicate player rows".to_string());
            }
            if scored != roster {
                violations.push("scores rows do not match the players".to_string());
            }
            for row in &self.scores {
                if row.rounds().len() != ROUND_COUNT {
                    violations.push(format!(
                        "scores for '{}' has {} rounds, expected {}",
                        row.player(),
                        row.rounds().len(),
                        ROUND_COUNT
                    ));
                }
            }
        }

        if self.go_outs.len() != ROUND_COUNT {
            violations.push(format!(
                "goOuts has {} rounds, expected {}",
                self.go_outs.len(),
                ROUND_COUNT
            ));
        }
        for name in self.go_outs.iter().filter(|n| !n.is_empty()) {
            if !roster.contains(name.as_str()) {
                violations.push(format!("goOuts names unknown player '{}'", name));
            }
        }

        if self.end < self.start {
            violations.push("end is before start".to_string());
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(InvariantError(violations))
        }
    }
}

/// Semantic problems found in a structurally valid record.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("game record violates {} invariant(s): {}", .0.len(), .0.join("; "))]
pub struct InvariantError(pub Vec<String>);
