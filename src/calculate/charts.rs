//! Chart series: final-score histogram and cumulative games-played trend.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use tracing::debug;

use crate::models::{
    GameRecord, GamesTrend, GapAnnotation, HistogramBin, PlayerScores, TrendPoint,
};

use super::duration::format_elapsed;
use super::StatsContext;

/// Width of a final-score bucket.
pub const BIN_WIDTH: u64 = 25;

/// Widest span, in buckets, that is drawn with its empty buckets filled in.
const MAX_FILLED_BINS: u64 = 400;

fn bin_start(score: u64) -> u64 {
    score / BIN_WIDTH * BIN_WIDTH
}

fn bin(start: u64) -> HistogramBin {
    HistogramBin {
        label: format!("{}-{}", start, start.saturating_add(BIN_WIDTH - 1)),
        start,
        count: 0,
    }
}

/// Every player's final score from every game, bucketed by 25.
///
/// All buckets between the lowest and highest score are present, empty ones
/// included. When that span is wider than [`MAX_FILLED_BINS`] only the
/// occupied buckets are returned. Games without scores contribute nothing.
pub fn score_histogram(log: &[GameRecord]) -> Vec<HistogramBin> {
    let mut counts: BTreeMap<u64, usize> = BTreeMap::new();
    for total in log
        .iter()
        .flat_map(|game| game.scores.iter().map(PlayerScores::total))
    {
        *counts.entry(bin_start(total)).or_default() += 1;
    }

    let (Some(&first), Some(&last)) = (counts.keys().next(), counts.keys().next_back()) else {
        return Vec::new();
    };

    if (last - first) / BIN_WIDTH >= MAX_FILLED_BINS {
        debug!("Scores span {}..={}, skipping empty buckets", first, last);
        return counts
            .into_iter()
            .map(|(start, count)| HistogramBin { count, ..bin(start) })
            .collect();
    }

    (first..=last)
        .step_by(BIN_WIDTH as usize)
        .map(|start| HistogramBin {
            count: counts.get(&start).copied().unwrap_or(0),
            ..bin(start)
        })
        .collect()
}

/// Running total of games per calendar day of `end`, plus a closing point
/// at today carrying the final total forward.
pub fn games_played_trend(log: &[GameRecord], ctx: &StatsContext) -> GamesTrend {
    if log.is_empty() {
        return GamesTrend::default();
    }

    let per_day = log
        .iter()
        .fold(BTreeMap::<NaiveDate, usize>::new(), |mut acc, game| {
            *acc.entry(ctx.local_date(game.end)).or_default() += 1;
            acc
        });

    let mut running = 0;
    let mut points: Vec<TrendPoint> = per_day
        .into_iter()
        .map(|(date, count)| {
            running += count;
            TrendPoint {
                date,
                cumulative_count: running,
            }
        })
        .collect();

    let longest_gap = longest_gap(&points);
    points.push(TrendPoint {
        date: ctx.today(),
        cumulative_count: running,
    });

    GamesTrend {
        points,
        longest_gap,
    }
}

/// Widest spacing between consecutive game days; the earliest wins ties.
fn longest_gap(points: &[TrendPoint]) -> Option<GapAnnotation> {
    let mut best: Option<(TrendPoint, TrendPoint, i64)> = None;

    for pair in points.windows(2) {
        let days = (pair[1].date - pair[0].date).num_days();
        if best.map_or(true, |(_, _, widest)| days > widest) {
            best = Some((pair[0], pair[1], days));
        }
    }

    best.map(|(from, to, days)| GapAnnotation {
        from: from.date,
        to: to.date,
        days,
        duration: format_elapsed(Duration::days(days)),
        segment: [
            from,
            TrendPoint {
                date: to.date,
                cumulative_count: from.cumulative_count,
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{game, game_with_rounds, ts};
    use chrono::FixedOffset;
    use pretty_assertions::assert_eq;

    fn ctx(now: &str) -> StatsContext {
        StatsContext::new(ts(now), FixedOffset::east_opt(0).unwrap())
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_histogram_fills_empty_bins() {
        let log = vec![
            game("A", &[("A", 10), ("B", 80)], "2025-01-01T20:00:00Z", 30),
            game("A", &[("A", 24), ("B", 25)], "2025-01-02T20:00:00Z", 30),
        ];
        let bins = score_histogram(&log);
        let summary: Vec<(&str, usize)> = bins
            .iter()
            .map(|b| (b.label.as_str(), b.count))
            .collect();
        assert_eq!(
            summary,
            vec![("0-24", 2), ("25-49", 1), ("50-74", 0), ("75-99", 1)]
        );
    }

    #[test]
    fn test_histogram_starts_at_lowest_bin() {
        let log = vec![game("A", &[("A", 130), ("B", 160)], "2025-01-01T20:00:00Z", 30)];
        let bins = score_histogram(&log);
        assert_eq!(bins[0].label, "125-149");
        assert_eq!(bins[0].start, 125);
        assert_eq!(bins.len(), 2);
    }

    #[test]
    fn test_histogram_counts_every_scored_entry() {
        let mut legacy = game("A", &[("A", 10), ("B", 80)], "2025-01-01T20:00:00Z", 30);
        legacy.scores.clear();
        let log = vec![
            legacy,
            game("A", &[("A", 10), ("B", 80), ("C", 33)], "2025-01-02T20:00:00Z", 30),
        ];
        let bins = score_histogram(&log);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 3);
    }

    #[test]
    fn test_histogram_wide_spread_keeps_occupied_bins() {
        let log = vec![game_with_rounds(
            "Ron",
            &[
                ("Hermione", vec![4_000_000_000, 4_000_000_000]),
                ("Ron", vec![30, 10]),
            ],
            "2025-01-01T20:00:00Z",
            30,
        )];
        let bins = score_histogram(&log);
        let summary: Vec<(&str, u64, usize)> = bins
            .iter()
            .map(|b| (b.label.as_str(), b.start, b.count))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("25-49", 25, 1),
                ("8000000000-8000000024", 8_000_000_000, 1),
            ]
        );
    }

    #[test]
    fn test_histogram_fills_up_to_bin_limit() {
        let top = (MAX_FILLED_BINS - 1) * BIN_WIDTH;
        let log = vec![game("A", &[("A", 0), ("B", top as u32)], "2025-01-01T20:00:00Z", 30)];
        let bins = score_histogram(&log);
        assert_eq!(bins.len() as u64, MAX_FILLED_BINS);
        assert_eq!(bins.last().map(|b| b.start), Some(top));
    }

    #[test]
    fn test_histogram_empty() {
        assert!(score_histogram(&[]).is_empty());
    }

    #[test]
    fn test_trend_cumulative_with_today_point() {
        let log = vec![
            game("A", &[("A", 1), ("B", 2)], "2025-01-03T20:00:00Z", 30),
            game("A", &[("A", 1), ("B", 2)], "2025-01-01T20:00:00Z", 30),
            game("A", &[("A", 1), ("B", 2)], "2025-01-01T21:00:00Z", 30),
        ];
        let trend = games_played_trend(&log, &ctx("2025-02-10T12:00:00Z"));
        let points: Vec<(NaiveDate, usize)> = trend
            .points
            .iter()
            .map(|p| (p.date, p.cumulative_count))
            .collect();
        assert_eq!(
            points,
            vec![
                (date("2025-01-01"), 2),
                (date("2025-01-03"), 3),
                (date("2025-02-10"), 3),
            ]
        );
    }

    #[test]
    fn test_trend_is_non_decreasing_and_ends_at_total() {
        let log: Vec<GameRecord> = (1..=9)
            .map(|day| {
                game(
                    "A",
                    &[("A", 1), ("B", 2)],
                    &format!("2025-03-{:02}T20:00:00Z", day * 3),
                    30,
                )
            })
            .collect();
        let trend = games_played_trend(&log, &ctx("2025-04-01T00:00:00Z"));
        assert!(trend
            .points
            .windows(2)
            .all(|w| w[0].cumulative_count <= w[1].cumulative_count));
        assert_eq!(trend.points.last().unwrap().cumulative_count, log.len());
    }

    #[test]
    fn test_trend_longest_gap() {
        let log = vec![
            game("A", &[("A", 1), ("B", 2)], "2025-01-01T20:00:00Z", 30),
            game("A", &[("A", 1), ("B", 2)], "2025-01-05T20:00:00Z", 30),
            game("A", &[("A", 1), ("B", 2)], "2025-03-01T20:00:00Z", 30),
            game("A", &[("A", 1), ("B", 2)], "2025-03-02T20:00:00Z", 30),
        ];
        let trend = games_played_trend(&log, &ctx("2025-12-31T00:00:00Z"));
        let gap = trend.longest_gap.unwrap();
        assert_eq!(gap.from, date("2025-01-05"));
        assert_eq!(gap.to, date("2025-03-01"));
        assert_eq!(gap.days, 55);
        assert_eq!(gap.duration, "1mo 25d");
        assert_eq!(gap.segment[0].cumulative_count, 2);
        assert_eq!(gap.segment[1].cumulative_count, 2);
        assert_eq!(gap.segment[1].date, date("2025-03-01"));
    }

    #[test]
    fn test_trend_single_day_has_no_gap() {
        let log = vec![game("A", &[("A", 1), ("B", 2)], "2025-01-01T20:00:00Z", 30)];
        let trend = games_played_trend(&log, &ctx("2025-01-01T23:00:00Z"));
        assert!(trend.longest_gap.is_none());
        assert_eq!(trend.points.len(), 2);
    }

    #[test]
    fn test_trend_empty() {
        assert_eq!(
            games_played_trend(&[], &ctx("2025-01-01T00:00:00Z")),
            GamesTrend::default()
        );
    }
}
