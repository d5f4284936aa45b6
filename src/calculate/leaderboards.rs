//! Ranked leaderboards: wins, go-outs, highest single hand, average score.

use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::models::{
    AvgScoreEntry, GameRecord, GoOutsEntry, HighHandEntry, LeaderboardEntry, Rank, Ratio,
    Wildcard,
};

use super::players::derive_players;
use super::ranking::assign_ranks;

const AVERAGE_PLACES: u32 = 3;
const PER_GAME_PLACES: u32 = 2;

fn games_for<'a>(log: &'a [GameRecord], player: &'a str) -> impl Iterator<Item = &'a GameRecord> {
    log.iter().filter(move |game| game.has_player(player))
}

fn points_for(log: &[GameRecord], player: &str) -> u64 {
    games_for(log, player)
        .filter_map(|game| game.total_for(player))
        .sum()
}

fn apply_ranks<T>(rows: &mut [T], ranks: Vec<Rank>, slot: impl Fn(&mut T) -> &mut Rank) {
    for (row, rank) in rows.iter_mut().zip(ranks) {
        *slot(row) = rank;
    }
}

// ── Wins ────────────────────────────────────────────────────────

fn win_loss_row(log: &[GameRecord], player: String) -> LeaderboardEntry {
    let games = games_for(log, &player).count() as u32;
    let wins = log.iter().filter(|game| game.winner == player).count() as u32;
    let total_points = points_for(log, &player);

    LeaderboardEntry {
        wins,
        losses: games.saturating_sub(wins),
        average: Ratio::new(wins as u64, games as u64, AVERAGE_PLACES),
        total_points,
        player,
        rank: Rank::default(),
    }
}

/// Higher average first. On equal averages, winners with more games rank
/// higher; winless players rank higher with fewer games, then fewer points.
fn compare_win_loss(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.average.cmp(&a.average).then_with(|| match (a.wins > 0, b.wins > 0) {
        (true, true) => b.games_played().cmp(&a.games_played()),
        (false, false) => a
            .games_played()
            .cmp(&b.games_played())
            .then(a.total_points.cmp(&b.total_points)),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
    })
}

/// Win/loss leaderboard over every player in the directory.
pub fn win_loss_leaderboard(log: &[GameRecord]) -> Vec<LeaderboardEntry> {
    let mut rows: Vec<LeaderboardEntry> = derive_players(log)
        .into_iter()
        .map(|player| win_loss_row(log, player))
        .collect();

    rows.sort_by(compare_win_loss);
    let ranks = assign_ranks(&rows, |r| (r.average, r.wins, r.losses));
    apply_ranks(&mut rows, ranks, |r| &mut r.rank);
    rows
}

// ── Go-outs ─────────────────────────────────────────────────────

/// Higher rate first, then more go-outs. Two players who never went out
/// are separated by games played, fewer first.
fn compare_go_outs(a: &GoOutsEntry, b: &GoOutsEntry) -> Ordering {
    b.per_game
        .cmp(&a.per_game)
        .then(b.total_go_outs.cmp(&a.total_go_outs))
        .then_with(|| {
            if a.total_go_outs == 0 && b.total_go_outs == 0 {
                a.games_played.cmp(&b.games_played)
            } else {
                Ordering::Equal
            }
        })
}

/// Go-outs-per-game leaderboard.
pub fn go_outs_leaderboard(log: &[GameRecord]) -> Vec<GoOutsEntry> {
    let mut rows: Vec<GoOutsEntry> = derive_players(log)
        .into_iter()
        .map(|player| {
            let games_played = games_for(log, &player).count() as u32;
            let total_go_outs = games_for(log, &player)
                .map(|game| game.go_outs_for(&player))
                .sum::<usize>() as u32;
            GoOutsEntry {
                per_game: Ratio::new(total_go_outs as u64, games_played as u64, PER_GAME_PLACES),
                total_go_outs,
                games_played,
                player,
                rank: Rank::default(),
            }
        })
        .collect();

    rows.sort_by(compare_go_outs);
    let ranks = assign_ranks(&rows, |r| (r.per_game, r.games_played));
    apply_ranks(&mut rows, ranks, |r| &mut r.rank);
    rows
}

// ── Highest single hand ─────────────────────────────────────────

/// Best hand per player: the score and every round it was reached.
fn best_hands(log: &[GameRecord]) -> HashMap<&str, (u32, Vec<Wildcard>)> {
    let mut best: HashMap<&str, (u32, Vec<Wildcard>)> = HashMap::new();

    for game in log.iter().filter(|g| g.has_scores()) {
        for row in &game.scores {
            let Some(max) = row.rounds().iter().filter_map(|s| s.value()).max() else {
                continue;
            };
            if max == 0 {
                continue;
            }

            let hits: Vec<Wildcard> = row
                .rounds()
                .iter()
                .enumerate()
                .filter(|(_, score)| score.value() == Some(max))
                .map(|(round, _)| Wildcard::for_round(round))
                .collect();

            match best.entry(row.player()) {
                Entry::Vacant(slot) => {
                    slot.insert((max, hits));
                }
                Entry::Occupied(mut slot) => {
                    let (score, wildcards) = slot.get_mut();
                    if max > *score {
                        *score = max;
                        *wildcards = hits;
                    } else if max == *score {
                        // Repeats are kept: the count breaks ties.
                        wildcards.extend(hits);
                    }
                }
            }
        }
    }

    best
}

/// Highest single-hand score leaderboard. Players who never scored a
/// positive hand are left out.
pub fn high_hand_leaderboard(log: &[GameRecord]) -> Vec<HighHandEntry> {
    let mut best = best_hands(log);

    let mut rows: Vec<HighHandEntry> = derive_players(log)
        .into_iter()
        .filter_map(|player| {
            let (score, mut wildcards) = best.remove(player.as_str())?;
            wildcards.sort();
            Some(HighHandEntry {
                player,
                highest_single_hand_score: score,
                wildcards,
                rank: Rank::default(),
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        b.highest_single_hand_score
            .cmp(&a.highest_single_hand_score)
            .then(b.wildcards.len().cmp(&a.wildcards.len()))
    });
    let ranks = assign_ranks(&rows, |r| (r.highest_single_hand_score, r.wildcards.len()));
    apply_ranks(&mut rows, ranks, |r| &mut r.rank);
    rows
}

// ── Average score ───────────────────────────────────────────────

/// Points per game, lowest first. Equal averages keep win/loss order.
pub fn avg_score_leaderboard(log: &[GameRecord]) -> Vec<AvgScoreEntry> {
    let mut rows: Vec<AvgScoreEntry> = win_loss_leaderboard(log)
        .into_iter()
        .map(|entry| AvgScoreEntry {
            average: Ratio::new(
                entry.total_points,
                entry.games_played() as u64,
                PER_GAME_PLACES,
            ),
            total_points: entry.total_points,
            games_played: entry.games_played(),
            player: entry.player,
        })
        .collect();

    rows.sort_by(|a, b| a.average.cmp(&b.average));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{game, game_with_rounds, with_go_outs};
    use pretty_assertions::assert_eq;

    fn summary(rows: &[LeaderboardEntry]) -> Vec<(String, u32, u32, String, String)> {
        rows.iter()
            .map(|r| {
                (
                    r.player.clone(),
                    r.wins,
                    r.losses,
                    r.average.to_string(),
                    r.rank.to_string(),
                )
            })
            .collect()
    }

    #[test]
    fn test_single_game_leaderboard() {
        let log = vec![game(
            "Ron",
            &[("Hermione", 50), ("Ron", 40)],
            "2025-03-01T20:00:00Z",
            15,
        )];

        let board = win_loss_leaderboard(&log);
        assert_eq!(
            summary(&board),
            vec![
                ("Ron".into(), 1, 0, "1.000".into(), "1".into()),
                ("Hermione".into(), 0, 1, "0.000".into(), "2".into()),
            ]
        );
        assert_eq!(board[0].total_points, 40);
        assert_eq!(board[1].total_points, 50);
    }

    fn split_record_log() -> Vec<GameRecord> {
        // Al 1-1; Bea 2-2; Cy 2-2
        vec![
            game("Al", &[("Al", 10), ("Bea", 20)], "2025-01-01T19:00:00Z", 30),
            game("Cy", &[("Al", 20), ("Cy", 10)], "2025-01-02T19:00:00Z", 30),
            game("Bea", &[("Bea", 10), ("Cy", 20)], "2025-01-03T19:00:00Z", 30),
            game("Bea", &[("Bea", 10), ("Cy", 20)], "2025-01-04T19:00:00Z", 30),
            game("Cy", &[("Bea", 20), ("Cy", 10)], "2025-01-05T19:00:00Z", 30),
        ]
    }

    #[test]
    fn test_equal_average_more_games_ranks_higher() {
        let board = win_loss_leaderboard(&split_record_log());
        assert_eq!(
            summary(&board),
            vec![
                ("Bea".into(), 2, 2, "0.500".into(), "T1".into()),
                ("Cy".into(), 2, 2, "0.500".into(), "T1".into()),
                ("Al".into(), 1, 1, "0.500".into(), "3".into()),
            ]
        );
    }

    #[test]
    fn test_wins_sum_to_total_games() {
        let log = split_record_log();
        let board = win_loss_leaderboard(&log);
        let wins: u32 = board.iter().map(|r| r.wins).sum();
        assert_eq!(wins as usize, log.len());
        for row in &board {
            let appearances = log.iter().filter(|g| g.has_player(&row.player)).count();
            assert_eq!(row.games_played() as usize, appearances);
        }
    }

    #[test]
    fn test_winless_fewer_games_then_fewer_points() {
        let log = vec![
            game("Ace", &[("Ace", 5), ("Dud", 90), ("Meh", 40)], "2025-01-01T19:00:00Z", 30),
            game("Ace", &[("Ace", 5), ("Dud", 10), ("Low", 80)], "2025-01-02T19:00:00Z", 30),
            game("Ace", &[("Ace", 5), ("Low", 10)], "2025-01-03T19:00:00Z", 30),
        ];
        // Meh 1 game; Low 2 games (90 pts); Dud 2 games (100 pts)
        let board = win_loss_leaderboard(&log);
        let order: Vec<&str> = board.iter().map(|r| r.player.as_str()).collect();
        assert_eq!(order, vec!["Ace", "Meh", "Low", "Dud"]);
        let ranks: Vec<String> = board.iter().map(|r| r.rank.to_string()).collect();
        assert_eq!(ranks, vec!["1", "2", "T3", "T3"]);
    }

    #[test]
    fn test_total_points_skip_unrecorded_rounds() {
        let log = vec![game_with_rounds(
            "Ron",
            &[("Ron", vec![3, -1, 4]), ("Harry", vec![-1, -1, 10])],
            "2025-01-01T19:00:00Z",
            30,
        )];
        let board = win_loss_leaderboard(&log);
        assert_eq!(board[0].total_points, 7);
        assert_eq!(board[1].total_points, 10);
    }

    #[test]
    fn test_legacy_record_without_scores_counts_games_only() {
        let mut legacy = game("Ron", &[("Ron", 3), ("Harry", 9)], "2025-01-01T19:00:00Z", 30);
        legacy.scores.clear();
        let board = win_loss_leaderboard(&[legacy]);
        assert_eq!(board[0].wins, 1);
        assert_eq!(board[0].total_points, 0);
    }

    #[test]
    fn test_go_outs_rate_and_totals() {
        let log = vec![
            with_go_outs(
                game("Ann", &[("Ann", 10), ("Ben", 30), ("Cat", 20)], "2025-01-01T19:00:00Z", 30),
                &["Ann", "Ann", "Ben", "Ann"],
            ),
            with_go_outs(
                game("Ann", &[("Ann", 10), ("Ben", 30)], "2025-01-02T19:00:00Z", 30),
                &["Ben", "Ann"],
            ),
        ];

        let board = go_outs_leaderboard(&log);
        let rows: Vec<(&str, u32, u32, String, String)> = board
            .iter()
            .map(|r| {
                (
                    r.player.as_str(),
                    r.total_go_outs,
                    r.games_played,
                    r.per_game.to_string(),
                    r.rank.to_string(),
                )
            })
            .collect();
        assert_eq!(
            rows,
            vec![
                ("Ann", 4, 2, "2.00".to_string(), "1".to_string()),
                ("Ben", 2, 2, "1.00".to_string(), "2".to_string()),
                ("Cat", 0, 1, "0.00".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_go_outs_zero_favours_fewer_games() {
        let log = vec![
            with_go_outs(
                game("Ann", &[("Ann", 10), ("Ben", 30), ("Cat", 20)], "2025-01-01T19:00:00Z", 30),
                &["Ann"],
            ),
            game("Ben", &[("Ben", 10), ("Dee", 30)], "2025-01-02T19:00:00Z", 30),
            game("Ben", &[("Ben", 10), ("Dee", 30)], "2025-01-03T19:00:00Z", 30),
        ];
        let board = go_outs_leaderboard(&log);
        let order: Vec<&str> = board.iter().map(|r| r.player.as_str()).collect();
        // Cat: 0 in 1 game; Dee: 0 in 2; Ben: 0 in 3
        assert_eq!(order, vec!["Ann", "Cat", "Dee", "Ben"]);
        assert_eq!(board[1].per_game.to_string(), "0.00");
    }

    #[test]
    fn test_go_outs_ties_share_rank() {
        let log = vec![with_go_outs(
            game("Ann", &[("Ann", 10), ("Ben", 30)], "2025-01-01T19:00:00Z", 30),
            &["Ann", "Ben"],
        )];
        let board = go_outs_leaderboard(&log);
        assert!(board.iter().all(|r| r.rank.to_string() == "T1"));
    }

    #[test]
    fn test_high_hand_across_games_sorts_wildcards() {
        // 35 in the K round, later 35 in the J round
        let mut k_round = [0i64; 11];
        k_round[10] = 35;
        let mut j_round = [0i64; 11];
        j_round[8] = 35;
        let log = vec![
            game_with_rounds(
                "Ron",
                &[("Ron", vec![1]), ("Harry", k_round.to_vec())],
                "2025-01-01T19:00:00Z",
                30,
            ),
            game_with_rounds(
                "Ron",
                &[("Ron", vec![1]), ("Harry", j_round.to_vec())],
                "2025-01-02T19:00:00Z",
                30,
            ),
        ];

        let board = high_hand_leaderboard(&log);
        let harry = board.iter().find(|r| r.player == "Harry").unwrap();
        assert_eq!(harry.highest_single_hand_score, 35);
        let labels: Vec<String> = harry.wildcards.iter().map(|w| w.to_string()).collect();
        assert_eq!(labels, vec!["J", "K"]);
    }

    #[test]
    fn test_high_hand_keeps_duplicates_within_game() {
        let log = vec![game_with_rounds(
            "Ron",
            &[("Ron", vec![1]), ("Harry", vec![20, 5, 20])],
            "2025-01-01T19:00:00Z",
            30,
        )];
        let board = high_hand_leaderboard(&log);
        let harry = board.iter().find(|r| r.player == "Harry").unwrap();
        let labels: Vec<String> = harry.wildcards.iter().map(|w| w.to_string()).collect();
        assert_eq!(labels, vec!["3", "5"]);
    }

    #[test]
    fn test_high_hand_higher_score_replaces() {
        let log = vec![
            game_with_rounds(
                "Ron",
                &[("Ron", vec![1]), ("Harry", vec![20, 20])],
                "2025-01-01T19:00:00Z",
                30,
            ),
            game_with_rounds(
                "Ron",
                &[("Ron", vec![1]), ("Harry", vec![0, 0, 0, 44])],
                "2025-01-02T19:00:00Z",
                30,
            ),
        ];
        let board = high_hand_leaderboard(&log);
        let harry = board.iter().find(|r| r.player == "Harry").unwrap();
        assert_eq!(harry.highest_single_hand_score, 44);
        assert_eq!(harry.wildcards.len(), 1);
        assert_eq!(harry.wildcards[0].to_string(), "6");
    }

    #[test]
    fn test_high_hand_count_breaks_ties_and_zero_players_excluded() {
        let log = vec![game_with_rounds(
            "Zed",
            &[("Amy", vec![30]), ("Bo", vec![30, 30]), ("Zed", vec![0, -1])],
            "2025-01-01T19:00:00Z",
            30,
        )];
        let board = high_hand_leaderboard(&log);
        let rows: Vec<(&str, String)> = board
            .iter()
            .map(|r| (r.player.as_str(), r.rank.to_string()))
            .collect();
        assert_eq!(rows, vec![("Bo", "1".to_string()), ("Amy", "2".to_string())]);
    }

    #[test]
    fn test_avg_score_lowest_first() {
        let log = vec![
            game("Al", &[("Al", 30), ("Bea", 90)], "2025-01-01T19:00:00Z", 30),
            game("Bea", &[("Al", 40), ("Bea", 10)], "2025-01-02T19:00:00Z", 30),
        ];
        let board = avg_score_leaderboard(&log);
        assert_eq!(board[0].player, "Al");
        assert_eq!(board[0].average.to_string(), "35.00");
        assert_eq!(board[1].average.to_string(), "50.00");
        assert_eq!(board[1].games_played, 2);
    }

    #[test]
    fn test_empty_log_boards() {
        assert!(win_loss_leaderboard(&[]).is_empty());
        assert!(go_outs_leaderboard(&[]).is_empty());
        assert!(high_hand_leaderboard(&[]).is_empty());
        assert!(avg_score_leaderboard(&[]).is_empty());
    }
}
