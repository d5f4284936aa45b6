//! Summary facts: last played, durations, lowest winning score, months.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration};

use crate::models::{GameRecord, GeneralFacts, LowestScore, MonthCount, PlayerCountDuration};

use super::duration::{format_elapsed, format_game_duration};
use super::StatsContext;

const NOT_AVAILABLE: &str = "N/A";

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Last played, game count, shortest and longest game.
pub fn general_facts(log: &[GameRecord], ctx: &StatsContext) -> GeneralFacts {
    let since_last = log.iter().map(|game| ctx.now - game.end).min();
    let shortest = log.iter().map(GameRecord::duration).min();
    let longest = log.iter().map(GameRecord::duration).max();

    match (since_last, shortest, longest) {
        (Some(since_last), Some(shortest), Some(longest)) => GeneralFacts {
            last_played: format!("{} ago", format_elapsed(since_last)),
            total_games: log.len(),
            shortest_game: format_game_duration(shortest),
            longest_game: format_game_duration(longest),
        },
        _ => GeneralFacts {
            last_played: NOT_AVAILABLE.to_string(),
            total_games: 0,
            shortest_game: NOT_AVAILABLE.to_string(),
            longest_game: NOT_AVAILABLE.to_string(),
        },
    }
}

/// Average game length grouped by table size, smallest table first.
pub fn durations_by_player_count(log: &[GameRecord]) -> Vec<PlayerCountDuration> {
    let grouped = log
        .iter()
        .fold(BTreeMap::<usize, Vec<Duration>>::new(), |mut acc, game| {
            acc.entry(game.players.len())
                .or_default()
                .push(game.duration());
            acc
        });

    grouped
        .into_iter()
        .map(|(number_of_players, durations)| {
            let total_ms: i64 = durations.iter().map(Duration::num_milliseconds).sum();
            let average = Duration::milliseconds(total_ms / durations.len().max(1) as i64);
            PlayerCountDuration {
                number_of_players,
                avg_game_duration: format_game_duration(average),
                game_count: durations.len(),
            }
        })
        .collect()
}

/// The lowest score any winner finished on, with every game that hit it.
/// Games without a score row for the winner are skipped.
pub fn lowest_winning_score(log: &[GameRecord], ctx: &StatsContext) -> Option<LowestScore> {
    let winning: Vec<(&GameRecord, u64)> = log
        .iter()
        .filter_map(|game| game.total_for(&game.winner).map(|score| (game, score)))
        .collect();

    let score = winning.iter().map(|(_, score)| *score).min()?;

    let players_with_dates = winning
        .iter()
        .filter(|(_, s)| *s == score)
        .map(|(game, _)| {
            format!(
                "{} ({})",
                game.winner,
                ctx.local(game.end).format("%-m/%-d/%Y")
            )
        })
        .collect();

    Some(LowestScore {
        score,
        players_with_dates,
    })
}

/// Games counted by the month they started in, January through December.
pub fn games_by_month(log: &[GameRecord], ctx: &StatsContext) -> Vec<MonthCount> {
    let mut counts = [0usize; 12];
    for game in log {
        counts[ctx.local(game.start).month0() as usize] += 1;
    }

    MONTHS
        .into_iter()
        .zip(counts)
        .map(|(month, count)| MonthCount { month, count })
        .collect()
}
