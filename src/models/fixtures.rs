//! Record builders shared by unit tests.

use chrono::{DateTime, Duration, Utc};

use super::{GameRecord, PlayerScores, RoundScore, ROUND_COUNT};

pub fn ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .expect("valid RFC 3339 timestamp")
        .with_timezone(&Utc)
}

/// Wire-style rounds: negative values become "not recorded".
pub fn rounds(raw: &[i64]) -> Vec<RoundScore> {
    raw.iter().map(|&r| RoundScore::from(r)).collect()
}

/// Eleven rounds with `raw` first and zeros after.
pub fn full_rounds(raw: &[i64]) -> Vec<RoundScore> {
    let mut out = rounds(raw);
    out.resize(ROUND_COUNT, RoundScore::played(0));
    out
}

/// A game where each player's total sits in the first round.
pub fn game(winner: &str, totals: &[(&str, u32)], start: &str, minutes: i64) -> GameRecord {
    let rows: Vec<(&str, Vec<i64>)> = totals
        .iter()
        .map(|(name, total)| (*name, vec![*total as i64]))
        .collect();
    game_with_rounds(winner, &rows, start, minutes)
}

/// A game with explicit round scores per player, padded to eleven rounds.
pub fn game_with_rounds(
    winner: &str,
    rows: &[(&str, Vec<i64>)],
    start: &str,
    minutes: i64,
) -> GameRecord {
    let start = ts(start);
    GameRecord {
        winner: winner.to_string(),
        players: rows.iter().map(|(name, _)| name.to_string()).collect(),
        start,
        end: start + Duration::minutes(minutes),
        scores: rows
            .iter()
            .map(|(name, raw)| PlayerScores::new(*name, full_rounds(raw)))
            .collect(),
        go_outs: vec![String::new(); ROUND_COUNT],
    }
}

/// Fill the first go-out slots in order.
pub fn with_go_outs(mut record: GameRecord, names: &[&str]) -> GameRecord {
    for (slot, name) in record.go_outs.iter_mut().zip(names) {
        *slot = name.to_string();
    }
    record
}
