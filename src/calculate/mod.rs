//! Statistics calculation engine.
//!
//! Computes derived metrics from raw delivery and match records:
//! - Batting leaderboards and strike rates
//! - Bowling leaderboards and economy rates
//! - Season trends and match result splits
//! - Team totals, wins and win percentages
//! - Toss impact
//!
//! Every function is a pure fold over the rows it is given. Ratios are
//! computed from unrounded sums; only the reported value is rounded.

pub mod batting;
pub mod bowling;
pub mod matches;
pub mod teams;
pub mod toss;

use std::cmp::Ordering;

use crate::models::Ranked;

/// Round to two decimal places for display.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Runs per 100 balls.
pub fn calculate_strike_rate(runs: i64, balls: u32) -> f64 {
    if balls == 0 {
        0.0
    } else {
        runs as f64 / balls as f64 * 100.0
    }
}

/// Runs conceded per six balls.
pub fn calculate_economy(runs: i64, balls: u32) -> f64 {
    if balls == 0 {
        0.0
    } else {
        runs as f64 / (balls as f64 / 6.0)
    }
}

/// Wins as a percentage of matches played.
pub fn calculate_win_percentage(wins: u32, matches: u32) -> f64 {
    if matches == 0 {
        0.0
    } else {
        wins as f64 / matches as f64 * 100.0
    }
}

/// Arithmetic mean, `None` for no samples.
pub fn calculate_mean(total: f64, samples: u32) -> Option<f64> {
    (samples > 0).then(|| total / samples as f64)
}

/// Sort direction for leaderboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Compare grouping keys: integer keys first in numeric order, then every
/// other key in text order.
///
/// Seasons like "2008" and "2010" sort by year; "2007/08" style keys come
/// after all plain years. This is a total order, so sorting rows that
/// arrive in any order gives the same result.
pub fn compare_keys(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Sort rows by metric, break ties by key ascending, cut to `limit` and
/// number the survivors from 1.
///
/// The metric is the exact (unrounded) value. Tie order depends only on the
/// key, so identical input always gives identical output.
pub fn rank_rows<T, M, K>(
    mut rows: Vec<T>,
    order: SortOrder,
    metric: M,
    key: K,
    limit: Option<usize>,
) -> Vec<Ranked<T>>
where
    M: Fn(&T) -> f64,
    K: Fn(&T) -> &str,
{
    rows.sort_by(|a, b| {
        let by_metric = metric(a).total_cmp(&metric(b));
        let by_metric = match order {
            SortOrder::Ascending => by_metric,
            SortOrder::Descending => by_metric.reverse(),
        };
        by_metric.then_with(|| compare_keys(key(a), key(b)))
    });

    if let Some(limit) = limit {
        rows.truncate(limit);
    }

    rows.into_iter()
        .enumerate()
        .map(|(i, item)| Ranked {
            rank: i as u32 + 1,
            item,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(12.0), 12.0);
        assert_eq!(round2(136.123), 136.12);
        assert_eq!(round2(33.3333), 33.33);
        assert_eq!(round2(66.6666), 66.67);
    }

    #[test]
    fn test_calculate_strike_rate() {
        assert_eq!(calculate_strike_rate(150, 100), 150.0);
        assert!((calculate_strike_rate(1, 3) - 33.333).abs() < 0.01);
        assert_eq!(calculate_strike_rate(10, 0), 0.0);
    }

    #[test]
    fn test_calculate_economy() {
        assert_eq!(calculate_economy(60, 30), 12.0);
        assert_eq!(calculate_economy(24, 24), 6.0);
        assert_eq!(calculate_economy(5, 0), 0.0);
    }

    #[test]
    fn test_calculate_win_percentage() {
        assert_eq!(calculate_win_percentage(0, 10), 0.0);
        assert_eq!(calculate_win_percentage(3, 4), 75.0);
        assert_eq!(calculate_win_percentage(0, 0), 0.0);
    }

    #[test]
    fn test_calculate_mean() {
        assert_eq!(calculate_mean(300.0, 2), Some(150.0));
        assert_eq!(calculate_mean(0.0, 0), None);
    }

    #[test]
    fn test_compare_keys() {
        assert_eq!(compare_keys("2009", "2010"), Ordering::Less);
        assert_eq!(compare_keys("9", "10"), Ordering::Less);
        assert_eq!(compare_keys("2007/08", "2009"), Ordering::Greater);
        assert_eq!(compare_keys("b", "a"), Ordering::Greater);
        assert_eq!(compare_keys("07", "7"), Ordering::Less);
    }

    #[test]
    fn test_compare_keys_mixed_keys_are_transitive() {
        // Integer-only comparison would give 9 < 10, text would give
        // 10 < 1a < 9; the two must not be mixed.
        assert_eq!(compare_keys("9", "10"), Ordering::Less);
        assert_eq!(compare_keys("10", "1a"), Ordering::Less);
        assert_eq!(compare_keys("9", "1a"), Ordering::Less);
    }

    #[test]
    fn test_rank_rows_tie_order_ignores_input_order() {
        let keys = ["9", "10", "1a", "2b", "30", "3c", "400", "4d", "5", "50e"];
        let expected = vec!["5", "9", "10", "30", "400", "1a", "2b", "3c", "4d", "50e"];

        // Every rotation and its reverse of the input gives one ranking.
        for shift in 0..keys.len() {
            let mut rotated = keys.to_vec();
            rotated.rotate_left(shift);
            for input in [rotated.clone(), rotated.into_iter().rev().collect()] {
                let rows: Vec<(&str, f64)> = input.into_iter().map(|k| (k, 5.0)).collect();
                let ranked = rank_rows(rows, SortOrder::Descending, |r| r.1, |r| r.0, None);
                let order: Vec<_> = ranked.iter().map(|r| r.item.0).collect();
                assert_eq!(order, expected);
            }
        }
    }

    #[test]
    fn test_rank_rows_descending_with_tie_break() {
        let rows = vec![("c", 5.0), ("a", 9.0), ("b", 5.0), ("d", 1.0)];

        let ranked = rank_rows(rows, SortOrder::Descending, |r| r.1, |r| r.0, Some(3));

        let keys: Vec<_> = ranked.iter().map(|r| (r.rank, r.item.0)).collect();
        assert_eq!(keys, vec![(1, "a"), (2, "b"), (3, "c")]);
    }

    #[test]
    fn test_rank_rows_ascending_no_limit() {
        let rows = vec![("x", 7.5), ("y", 6.0), ("z", 9.1)];

        let ranked = rank_rows(rows, SortOrder::Ascending, |r| r.1, |r| r.0, None);

        let keys: Vec<_> = ranked.iter().map(|r| r.item.0).collect();
        assert_eq!(keys, vec!["y", "x", "z"]);
    }
}
