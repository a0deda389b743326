//! Batting aggregations.

use std::collections::HashMap;

use tracing::debug;

use super::{calculate_strike_rate, rank_rows, round2, SortOrder};
use crate::models::{BallEvent, BatterRuns, Computed, Ranked, StrikeRate};

/// Per-batter running totals.
#[derive(Debug, Default)]
struct BatterTally {
    /// Sum of coercible batter runs
    runs: i64,
    /// Deliveries whose runs coerced
    scored_balls: u32,
    /// Every delivery faced
    balls: u32,
}

/// Fold deliveries into per-batter tallies. Returns the tallies and the
/// number of deliveries whose runs failed coercion.
fn tally_batters<'a, I>(balls: I) -> (HashMap<&'a str, BatterTally>, usize)
where
    I: IntoIterator<Item = &'a BallEvent>,
{
    let mut tallies: HashMap<&str, BatterTally> = HashMap::new();
    let mut skipped = 0;

    for ball in balls {
        let Some(batter) = ball.batter.as_deref() else {
            continue;
        };
        let tally = tallies.entry(batter).or_default();
        tally.balls += 1;
        match ball.batter_runs.to_int() {
            Some(runs) => {
                tally.runs += runs;
                tally.scored_balls += 1;
            }
            None => skipped += 1,
        }
    }

    (tallies, skipped)
}

/// Top run scorers: sum of batter runs, highest first.
///
/// Deliveries whose runs do not coerce are left out of the sum. A batter
/// with no coercible deliveries at all has no total and is not listed.
pub fn top_run_scorers(balls: &[BallEvent], limit: Option<usize>) -> Computed<Ranked<BatterRuns>> {
    let (tallies, skipped) = tally_batters(balls);

    let rows: Vec<BatterRuns> = tallies
        .into_iter()
        .filter(|(_, t)| t.scored_balls > 0)
        .map(|(batter, t)| BatterRuns {
            batter: batter.to_string(),
            runs: t.runs,
        })
        .collect();

    debug!(
        "Run totals for {} batters ({} deliveries skipped)",
        rows.len(),
        skipped
    );

    let ranked = rank_rows(
        rows,
        SortOrder::Descending,
        |r| r.runs as f64,
        |r| r.batter.as_str(),
        limit,
    );
    Computed::new(ranked, skipped)
}

/// Best strike rates among batters who faced at least `min_balls`.
///
/// Balls faced counts every delivery to the batter (wides excluded when
/// `legal_balls_only` is set). The threshold applies before ranking, so a
/// batter under it never appears.
pub fn best_strike_rate(
    balls: &[BallEvent],
    min_balls: u32,
    legal_balls_only: bool,
    limit: Option<usize>,
) -> Computed<Ranked<StrikeRate>> {
    let faced = balls.iter().filter(|b| !(legal_balls_only && b.is_wide()));
    let (tallies, skipped) = tally_batters(faced);

    let rows: Vec<(StrikeRate, f64)> = tallies
        .into_iter()
        .filter(|(_, t)| t.balls >= min_balls)
        .map(|(batter, t)| {
            let exact = calculate_strike_rate(t.runs, t.balls);
            let row = StrikeRate {
                batter: batter.to_string(),
                runs: t.runs,
                balls: t.balls,
                strike_rate: round2(exact),
            };
            (row, exact)
        })
        .collect();

    debug!(
        "{} batters reach {} balls faced",
        rows.len(),
        min_balls
    );

    let ranked = rank_rows(
        rows,
        SortOrder::Descending,
        |(_, exact)| *exact,
        |(r, _)| r.batter.as_str(),
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

    fn ball(batter: &str, runs: impl Into<Field>) -> BallEvent {
        BallEvent::new("m1", 1, batter, "bowler").with_runs(runs, 0)
    }

    fn balls_for(batter: &str, count: usize, runs: i64) -> Vec<BallEvent> {
        (0..count).map(|_| ball(batter, runs)).collect()
    }

    #[test]
    fn test_unparseable_runs_excluded_from_sum() {
        let balls = vec![ball("Kohli", "4"), ball("Kohli", "NaN"), ball("Kohli", "6")];

        let result = top_run_scorers(&balls, Some(10));

        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].item.runs, 10);
        assert_eq!(result.skipped, 1);
    }

    #[test]
    fn test_top_run_scorers_sorted_descending() {
        let mut balls = balls_for("A", 3, 4);
        balls.extend(balls_for("B", 2, 6));
        balls.extend(balls_for("C", 1, 1));
        balls.extend(balls_for("D", 6, 2));

        let result = top_run_scorers(&balls, Some(10));

        let got: Vec<(u32, &str, i64)> = result
            .rows
            .iter()
            .map(|r| (r.rank, r.item.batter.as_str(), r.item.runs))
            .collect();
        // A, B and D all have 12; ties go alphabetically
        assert_eq!(got, vec![(1, "A", 12), (2, "B", 12), (3, "D", 12), (4, "C", 1)]);
    }

    #[test]
    fn test_top_run_scorers_deterministic() {
        let mut balls = balls_for("Zed", 2, 3);
        balls.extend(balls_for("Amy", 3, 2));
        balls.extend(balls_for("Kim", 1, 6));

        let first = top_run_scorers(&balls, Some(10));
        for _ in 0..5 {
            assert_eq!(top_run_scorers(&balls, Some(10)), first);
        }
    }

    #[test]
    fn test_tied_mixed_keys_rank_the_same_every_run() {
        let names = ["9", "10", "1a", "2b", "30", "3c", "400", "4d", "5", "50e"];
        let balls: Vec<_> = names.iter().map(|n| ball(n, 5)).collect();

        let order = |result: Computed<Ranked<BatterRuns>>| -> Vec<String> {
            result.rows.into_iter().map(|r| r.item.batter).collect()
        };
        let first = order(top_run_scorers(&balls, None));
        assert_eq!(
            first,
            vec!["5", "9", "10", "30", "400", "1a", "2b", "3c", "4d", "50e"]
        );
        for _ in 0..200 {
            assert_eq!(order(top_run_scorers(&balls, None)), first);
        }
    }

    #[test]
    fn test_top_run_scorers_limit() {
        let balls: Vec<_> = (0..15).map(|i| ball(&format!("P{}", i), i as i64)).collect();

        let result = top_run_scorers(&balls, Some(10));

        assert_eq!(result.rows.len(), 10);
        assert_eq!(result.rows[0].item.batter, "P14");
        assert_eq!(result.rows[9].rank, 10);
    }

    #[test]
    fn test_batter_with_only_dirty_runs_not_listed() {
        let balls = vec![ball("Ghost", "x"), ball("Real", 1)];

        let result = top_run_scorers(&balls, None);

        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].item.batter, "Real");
    }

    #[test]
    fn test_strike_rate_threshold_excludes_small_samples() {
        // 499 sixes would be a strike rate of 600 but is below threshold
        let mut balls = balls_for("Slogger", 499, 6);
        balls.extend(balls_for("Anchor", 500, 1));

        let result = best_strike_rate(&balls, 500, false, Some(10));

        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].item.batter, "Anchor");
        assert_eq!(result.rows[0].item.strike_rate, 100.0);
        assert_eq!(result.rows[0].item.balls, 500);
    }

    #[test]
    fn test_strike_rate_exact_ratio() {
        let mut balls = balls_for("A", 2, 1);
        balls.push(ball("A", 0));

        let result = best_strike_rate(&balls, 1, false, None);

        // 2 runs off 3 balls
        assert_eq!(result.rows[0].item.strike_rate, 66.67);
    }

    #[test]
    fn test_strike_rate_dirty_runs_still_count_as_balls() {
        let balls = vec![ball("A", 4), ball("A", "?"), ball("A", 2), ball("A", 0)];

        let result = best_strike_rate(&balls, 4, false, None);

        assert_eq!(result.rows[0].item.balls, 4);
        assert_eq!(result.rows[0].item.runs, 6);
        assert_eq!(result.rows[0].item.strike_rate, 150.0);
        assert_eq!(result.skipped, 1);
    }

    #[test]
    fn test_strike_rate_legal_balls_only() {
        let mut balls = balls_for("A", 3, 2);
        balls.push(ball("A", 0).with_wide());

        let all = best_strike_rate(&balls, 4, false, None);
        let legal = best_strike_rate(&balls, 4, true, None);

        assert_eq!(all.rows[0].item.balls, 4);
        assert!(legal.rows.is_empty());
    }

    #[test]
    fn test_strike_rate_ordering() {
        let mut balls = balls_for("Slow", 10, 1);
        balls.extend(balls_for("Fast", 10, 2));

        let result = best_strike_rate(&balls, 10, false, Some(10));

        assert_eq!(result.rows[0].item.batter, "Fast");
        assert_eq!(result.rows[1].item.batter, "Slow");
    }
}
