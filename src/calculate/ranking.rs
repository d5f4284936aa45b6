//! Tie-aware rank assignment over an already sorted leaderboard.

use crate::models::Rank;

/// Assign ranks in one pass over `sorted`.
///
/// Adjacent entries with equal keys form a tie group; every member gets
/// the group's first 1-based position, marked tied when the group has more
/// than one member. The next group resumes at its true position
/// (standard competition ranking: 1, T2, T2, 4).
pub fn assign_ranks<T, K, F>(sorted: &[T], key: F) -> Vec<Rank>
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let keys: Vec<K> = sorted.iter().map(&key).collect();
    let mut ranks = Vec::with_capacity(keys.len());
    let mut start = 0;

    while start < keys.len() {
        let mut end = start + 1;
        while end < keys.len() && keys[end] == keys[start] {
            end += 1;
        }
        let rank = Rank {
            position: start + 1,
            tied: end - start > 1,
        };
        ranks.extend(std::iter::repeat(rank).take(end - start));
        start = end;
    }

    ranks
}
