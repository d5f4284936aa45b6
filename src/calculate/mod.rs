//! Statistics calculation engine.
//!
//! Derives everything shown on the stats screen from the game log:
//! - Player directory
//! - Win/loss, go-outs, highest-hand and average-score leaderboards
//! - Summary facts and duration aggregates
//! - Chart series (score histogram, games-played trend)
//! - Game history
//!
//! Every function is a pure read of a log snapshot. Nothing is cached;
//! callers recompute on demand.

mod charts;
mod duration;
mod facts;
mod history;
mod leaderboards;
mod players;
mod ranking;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Serialize;
use tracing::debug;

use crate::models::{
    AvgScoreEntry, GameRecord, GamesTrend, GeneralFacts, GoOutsEntry, HighHandEntry,
    HistogramBin, HistoryEntry, LeaderboardEntry, LowestScore, MonthCount, PlayerCountDuration,
};

pub use charts::{games_played_trend, score_histogram, BIN_WIDTH};
pub use duration::{format_elapsed, format_game_duration};
pub use facts::{durations_by_player_count, games_by_month, general_facts, lowest_winning_score};
pub use history::game_history;
pub use leaderboards::{
    avg_score_leaderboard, go_outs_leaderboard, high_hand_leaderboard, win_loss_leaderboard,
};
pub use players::{derive_players, locale_cmp};
pub use ranking::assign_ranks;

/// The clock and calendar a computation runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsContext {
    pub now: DateTime<Utc>,
    /// Offset used to turn timestamps into calendar dates
    pub offset: FixedOffset,
}

impl StatsContext {
    pub fn new(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self { now, offset }
    }

    /// Current time in the given offset.
    pub fn at_offset(offset: FixedOffset) -> Self {
        Self::new(Utc::now(), offset)
    }

    pub fn local(&self, timestamp: DateTime<Utc>) -> DateTime<FixedOffset> {
        timestamp.with_timezone(&self.offset)
    }

    pub fn local_date(&self, timestamp: DateTime<Utc>) -> NaiveDate {
        self.local(timestamp).date_naive()
    }

    pub fn today(&self) -> NaiveDate {
        self.local_date(self.now)
    }
}

/// Every derived statistic for one log snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub players: Vec<String>,
    pub general_facts: GeneralFacts,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub go_outs: Vec<GoOutsEntry>,
    pub high_hands: Vec<HighHandEntry>,
    pub avg_scores: Vec<AvgScoreEntry>,
    pub durations_by_player_count: Vec<PlayerCountDuration>,
    pub lowest_score: Option<LowestScore>,
    pub games_by_month: Vec<MonthCount>,
    pub games_played_trend: GamesTrend,
    pub score_distribution: Vec<HistogramBin>,
    pub history: Vec<HistoryEntry>,
}

impl StatsSnapshot {
    pub fn compute(log: &[GameRecord], ctx: &StatsContext) -> Self {
        debug!("Computing stats snapshot over {} games", log.len());

        Self {
            players: derive_players(log),
            general_facts: general_facts(log, ctx),
            leaderboard: win_loss_leaderboard(log),
            go_outs: go_outs_leaderboard(log),
            high_hands: high_hand_leaderboard(log),
            avg_scores: avg_score_leaderboard(log),
            durations_by_player_count: durations_by_player_count(log),
            lowest_score: lowest_winning_score(log, ctx),
            games_by_month: games_by_month(log, ctx),
            games_played_trend: games_played_trend(log, ctx),
            score_distribution: score_histogram(log),
            history: game_history(log, ctx),
        }
    }
}
