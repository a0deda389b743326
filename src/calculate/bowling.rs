//! Bowling aggregations.

use std::collections::HashMap;

use tracing::debug;

use super::{calculate_economy, rank_rows, round2, SortOrder};
use crate::models::{BallEvent, BowlerWickets, Computed, Economy, Ranked};

/// Leading wicket takers.
///
/// Only deliveries whose wicket flag reads as true count. A flag that
/// cannot be read is skipped for this metric.
pub fn most_wickets(balls: &[BallEvent], limit: Option<usize>) -> Computed<Ranked<BowlerWickets>> {
    let mut wickets: HashMap<&str, u32> = HashMap::new();
    let mut skipped = 0;

    for ball in balls {
        let Some(bowler) = ball.bowler.as_deref() else {
            continue;
        };
        match ball.is_wicket.to_flag() {
            Some(true) => *wickets.entry(bowler).or_default() += 1,
            Some(false) => {}
            None => skipped += 1,
        }
    }

    let rows: Vec<BowlerWickets> = wickets
        .into_iter()
        .map(|(bowler, wickets)| BowlerWickets {
            bowler: bowler.to_string(),
            wickets,
        })
        .collect();

    let ranked = rank_rows(
        rows,
        SortOrder::Descending,
        |r| r.wickets as f64,
        |r| r.bowler.as_str(),
        limit,
    );
    Computed::new(ranked, skipped)
}

/// Best (lowest) economy rates among bowlers with at least `min_balls`.
///
/// Runs conceded sums total runs over deliveries that coerce; balls bowled
/// counts every delivery. With `legal_balls_only`, wides and no-balls are
/// dropped from both. Returns an empty result when nobody reaches the
/// threshold.
pub fn best_economy(
    balls: &[BallEvent],
    min_balls: u32,
    legal_balls_only: bool,
    limit: Option<usize>,
) -> Computed<Ranked<Economy>> {
    let mut tallies: HashMap<&str, (i64, u32)> = HashMap::new();
    let mut skipped = 0;

    for ball in balls {
        if legal_balls_only && (ball.is_wide() || ball.is_no_ball()) {
            continue;
        }
        let Some(bowler) = ball.bowler.as_deref() else {
            continue;
        };
        let (runs, count) = tallies.entry(bowler).or_default();
        *count += 1;
        match ball.total_runs.to_int() {
            Some(r) => *runs += r,
            None => skipped += 1,
        }
    }

    let rows: Vec<(Economy, f64)> = tallies
        .into_iter()
        .filter(|(_, (_, count))| *count >= min_balls)
        .map(|(bowler, (runs, count))| {
            let exact = calculate_economy(runs, count);
            let row = Economy {
                bowler: bowler.to_string(),
                runs_conceded: runs,
                balls: count,
                economy: round2(exact),
            };
            (row, exact)
        })
        .collect();

    debug!("{} bowlers reach {} balls bowled", rows.len(), min_balls);

    let ranked = rank_rows(
        rows,
        SortOrder::Ascending,
        |(_, exact)| *exact,
        |(r, _)| r.bowler.as_str(),
        limit,
    )
    .into_iter()
    .map(|r| Ranked {
        rank: r.rank,
        item: r.item.0,
    })
    .collect();

    Computed::new(ranked, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Field;
    use pretty_assertions::assert_eq;

    fn delivery(bowler: &str, total_runs: impl Into<Field>) -> BallEvent {
        BallEvent::new("m1", 1, "batter", bowler).with_runs(0, total_runs)
    }

    fn overs(bowler: &str, balls: usize, runs_per_ball: i64) -> Vec<BallEvent> {
        (0..balls).map(|_| delivery(bowler, runs_per_ball)).collect()
    }

    #[test]
    fn test_economy_exact_ratio() {
        // 60 runs off 30 balls = 12 an over
        let balls = overs("Bowler", 30, 2);

        let result = best_economy(&balls, 30, false, Some(10));

        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].item.runs_conceded, 60);
        assert_eq!(result.rows[0].item.balls, 30);
        assert_eq!(result.rows[0].item.economy, 12.0);
    }

    #[test]
    fn test_economy_empty_when_nobody_reaches_threshold() {
        let mut balls = overs("A", 299, 1);
        balls.extend(overs("B", 120, 0));

        let result = best_economy(&balls, 300, false, Some(10));

        assert!(result.is_empty());
        assert_eq!(result.skipped, 0);
    }

    #[test]
    fn test_economy_sorted_ascending() {
        let mut balls = overs("Expensive", 12, 2);
        balls.extend(overs("Tight", 12, 1));

        let result = best_economy(&balls, 12, false, None);

        let got: Vec<(&str, f64)> = result
            .rows
            .iter()
            .map(|r| (r.item.bowler.as_str(), r.item.economy))
            .collect();
        assert_eq!(got, vec![("Tight", 6.0), ("Expensive", 12.0)]);
    }

    #[test]
    fn test_economy_dirty_runs_excluded_but_ball_counted() {
        let mut balls = overs("A", 5, 1);
        balls.push(delivery("A", "n/a"));

        let result = best_economy(&balls, 6, false, None);

        assert_eq!(result.rows[0].item.balls, 6);
        assert_eq!(result.rows[0].item.economy, 5.0);
        assert_eq!(result.skipped, 1);
    }

    #[test]
    fn test_economy_legal_balls_only() {
        let mut balls = overs("A", 6, 1);
        balls.push(delivery("A", 1).with_wide());
        balls.push(delivery("A", 1).with_no_ball());

        let all = best_economy(&balls, 6, false, None);
        let legal = best_economy(&balls, 6, true, None);

        assert_eq!(all.rows[0].item.balls, 8);
        assert_eq!(legal.rows[0].item.balls, 6);
        assert_eq!(legal.rows[0].item.economy, 6.0);
    }

    #[test]
    fn test_most_wickets() {
        let balls = vec![
            delivery("Malinga", 0).with_wicket(),
            delivery("Malinga", 0).with_wicket(),
            delivery("Malinga", 4),
            delivery("Bravo", 0).with_wicket(),
            delivery("Narine", 1),
        ];

        let result = most_wickets(&balls, Some(10));

        let got: Vec<(u32, &str, u32)> = result
            .rows
            .iter()
            .map(|r| (r.rank, r.item.bowler.as_str(), r.item.wickets))
            .collect();
        assert_eq!(got, vec![(1, "Malinga", 2), (2, "Bravo", 1)]);
    }

    #[test]
    fn test_most_wickets_unreadable_flag_skipped() {
        let mut odd = delivery("A", 0);
        odd.is_wicket = Field::from("caught?");
        let balls = vec![odd, delivery("A", 0).with_wicket()];

        let result = most_wickets(&balls, None);

        assert_eq!(result.rows[0].item.wickets, 1);
        assert_eq!(result.skipped, 1);
    }
}
