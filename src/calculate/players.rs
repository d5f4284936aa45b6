//! Player directory: everyone who has ever sat at the table.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::models::GameRecord;

/// Lowercase with accents stripped, so `Émile` keys as `emile`.
fn base_letters(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Locale-style name ordering: base letters first (ignoring case and
/// accents), then unaccented before accented, then lowercase before
/// uppercase so `anna` < `Anna` < `bob` and `Émile` < `Eve`.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(&base_letters(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

/// Distinct player names across the log, sorted for display.
pub fn derive_players(log: &[GameRecord]) -> Vec<String> {
    let distinct: BTreeSet<&str> = log
        .iter()
        .flat_map(|game| game.players.iter().map(String::as_str))
        .collect();

    let mut players: Vec<String> = distinct.into_iter().map(str::to_string).collect();
    players.sort_by(|a, b| locale_cmp(a, b));
    players
}
