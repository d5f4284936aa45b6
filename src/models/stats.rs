//! Derived statistics models.
//!
//! Everything here is recomputed from the game log on demand and never
//! persisted.

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;

use super::{GameId, GameRecord, Wildcard};

/// Leaderboard position with tie marker. Displays as `3` or `T3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rank {
    /// 1-based position of the first entry in the tie group
    pub position: usize,
    pub tied: bool,
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tied {
            write!(f, "T{}", self.position)
        } else {
            write!(f, "{}", self.position)
        }
    }
}

impl Serialize for Rank {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A ratio rounded half-up to a fixed number of decimal places.
///
/// Held as a scaled integer so equal displayed values compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ratio {
    scaled: u64,
    places: u32,
}

impl Ratio {
    /// `numerator / denominator`; a zero denominator gives zero.
    pub fn new(numerator: u64, denominator: u64, places: u32) -> Self {
        if denominator == 0 {
            return Self::zero(places);
        }
        let (numerator, denominator) = (u128::from(numerator), u128::from(denominator));
        let scale = 10u128.pow(places);
        let scaled = (numerator * scale * 2 + denominator) / (denominator * 2);
        Self {
            scaled: u64::try_from(scaled).unwrap_or(u64::MAX),
            places,
        }
    }

    pub fn zero(places: u32) -> Self {
        Self { scaled: 0, places }
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.places == 0 {
            return write!(f, "{}", self.scaled);
        }
        let scale = 10u64.pow(self.places);
        write!(
            f,
            "{}.{:0width$}",
            self.scaled / scale,
            self.scaled % scale,
            width = self.places as usize
        )
    }
}

impl Serialize for Ratio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Win/loss leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub player: String,
    pub wins: u32,
    pub losses: u32,
    /// Wins per game, three decimals
    pub average: Ratio,
    /// Sum of every recorded round across the player's games
    pub total_points: u64,
    pub rank: Rank,
}

impl LeaderboardEntry {
    pub fn games_played(&self) -> u32 {
        self.wins + self.losses
    }
}

/// Go-outs-per-game leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoOutsEntry {
    pub player: String,
    pub total_go_outs: u32,
    pub games_played: u32,
    /// Go-outs per game, two decimals
    pub per_game: Ratio,
    pub rank: Rank,
}

/// Highest single-hand score leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighHandEntry {
    pub player: String,
    pub highest_single_hand_score: u32,
    /// Every round the score was hit, duplicates kept, ascending by wild value
    pub wildcards: Vec<Wildcard>,
    pub rank: Rank,
}

/// Average points per game row. Lower is better.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvgScoreEntry {
    pub player: String,
    pub average: Ratio,
    pub total_points: u64,
    pub games_played: u32,
}

/// Scalar summary facts. Durations are human-readable, `N/A` when empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneralFacts {
    pub last_played: String,
    pub total_games: usize,
    pub shortest_game: String,
    pub longest_game: String,
}

/// Average game length for one table size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerCountDuration {
    pub number_of_players: usize,
    pub avg_game_duration: String,
    pub game_count: usize,
}

/// The lowest winning score ever, with every game that reached it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LowestScore {
    pub score: u64,
    /// `"winner (m/d/yyyy)"` per game
    pub players_with_dates: Vec<String>,
}

/// Games started in a calendar month, summed over all years.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthCount {
    pub month: &'static str,
    pub count: usize,
}

/// One point on the cumulative games-played line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub cumulative_count: usize,
}

/// Longest stretch between two consecutive game days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GapAnnotation {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub days: i64,
    pub duration: String,
    /// Dashed segment drawn flat at the running total before the gap
    pub segment: [TrendPoint; 2],
}

/// Cumulative games-played series ending at today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct GamesTrend {
    pub points: Vec<TrendPoint>,
    pub longest_gap: Option<GapAnnotation>,
}

/// Final-score histogram bucket, e.g. `50-74`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistogramBin {
    pub label: String,
    pub start: u64,
    pub count: usize,
}

/// Display row for the game history list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub id: GameId,
    /// End time with duration, e.g. `3/1/2025, 8:15 PM (15m)`
    pub date: String,
    /// `"name (score)"` comma-joined, winner first
    pub players: String,
    pub record: GameRecord,
}
