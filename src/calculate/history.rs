//! Game history, newest first, formatted for display.

use crate::models::{GameRecord, HistoryEntry};

use super::duration::format_game_duration;
use super::StatsContext;

/// `"name (score)"` for each scored player, winner first and the rest by
/// ascending score. Records without scores list bare names, winner first.
fn players_line(game: &GameRecord) -> String {
    let not_winner = |name: &str| name != game.winner;

    if !game.has_scores() {
        let mut names: Vec<&str> = game.players.iter().map(String::as_str).collect();
        names.sort_by_key(|name| not_winner(*name));
        return names.join(", ");
    }

    let mut rows: Vec<(&str, u64)> = game
        .scores
        .iter()
        .map(|row| (row.player(), row.total()))
        .collect();
    rows.sort_by(|a, b| {
        not_winner(a.0)
            .cmp(&not_winner(b.0))
            .then(a.1.cmp(&b.1))
    });

    rows.iter()
        .map(|(name, score)| format!("{} ({})", name, score))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Every game sorted by end time descending, with display date and players.
pub fn game_history(log: &[GameRecord], ctx: &StatsContext) -> Vec<HistoryEntry> {
    let mut games: Vec<&GameRecord> = log.iter().collect();
    games.sort_by(|a, b| b.end.cmp(&a.end));

    games
        .into_iter()
        .map(|game| HistoryEntry {
            id: game.id(),
            date: format!(
                "{} ({})",
                ctx.local(game.end).format("%-m/%-d/%Y, %-I:%M %p"),
                format_game_duration(game.duration())
            ),
            players: players_line(game),
            record: game.clone(),
        })
        .collect()
}
