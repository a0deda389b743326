//! Team aggregations.
//!
//! Two notions of team success: [`most_successful_teams`]
//! counts raw wins from the winner column, while [`team_win_percentage`]
//! divides wins by every appearance in either team column.

use std::collections::HashMap;

use super::{calculate_mean, calculate_win_percentage, rank_rows, round2, SortOrder};
use crate::models::{
    BallEvent, Computed, MatchRecord, Ranked, TeamAverage, TeamRuns, TeamWickets, TeamWinRate,
    TeamWins,
};

/// Total runs (including extras) per batting side.
pub fn team_total_runs(balls: &[BallEvent], limit: Option<usize>) -> Computed<Ranked<TeamRuns>> {
    let mut totals: HashMap<&str, i64> = HashMap::new();
    let mut skipped = 0;

    for ball in balls {
        let Some(team) = ball.team_batting.as_deref() else {
            continue;
        };
        match ball.total_runs.to_int() {
            Some(runs) => *totals.entry(team).or_default() += runs,
            None => skipped += 1,
        }
    }

    let rows: Vec<TeamRuns> = totals
        .into_iter()
        .map(|(team, runs)| TeamRuns {
            team: team.to_string(),
            runs,
        })
        .collect();

    let ranked = rank_rows(
        rows,
        SortOrder::Descending,
        |r| r.runs as f64,
        |r| r.team.as_str(),
        limit,
    );
    Computed::new(ranked, skipped)
}

/// Teams with the most match wins. Matches without a winner are ignored.
pub fn most_successful_teams(
    matches: &[MatchRecord],
    limit: Option<usize>,
) -> Computed<Ranked<TeamWins>> {
    let rows: Vec<TeamWins> = count_wins(matches)
        .into_iter()
        .map(|(team, wins)| TeamWins {
            team: team.to_string(),
            wins,
        })
        .collect();

    let ranked = rank_rows(
        rows,
        SortOrder::Descending,
        |r| r.wins as f64,
        |r| r.team.as_str(),
        limit,
    );
    Computed::new(ranked, 0)
}

fn count_wins(matches: &[MatchRecord]) -> HashMap<&str, u32> {
    let mut wins: HashMap<&str, u32> = HashMap::new();
    for winner in matches.iter().filter_map(|m| m.match_winner.as_deref()) {
        *wins.entry(winner).or_default() += 1;
    }
    wins
}

/// Win percentage for every team that appears as `team1` or `team2`.
///
/// Matches played counts each appearance in either column, so teams that
/// never won still appear with 0%. A winner that never appears in either
/// team column has no denominator and is left out.
pub fn team_win_percentage(matches: &[MatchRecord]) -> Computed<Ranked<TeamWinRate>> {
    let mut played: HashMap<&str, u32> = HashMap::new();
    for m in matches {
        for team in [m.team1.as_deref(), m.team2.as_deref()].into_iter().flatten() {
            *played.entry(team).or_default() += 1;
        }
    }
    let wins = count_wins(matches);

    let rows: Vec<(TeamWinRate, f64)> = played
        .into_iter()
        .map(|(team, matches)| {
            let wins = wins.get(team).copied().unwrap_or(0);
            let exact = calculate_win_percentage(wins, matches);
            let row = TeamWinRate {
                team: team.to_string(),
                wins,
                matches,
                win_percentage: round2(exact),
            };
            (row, exact)
        })
        .collect();

    let ranked = rank_rows(
        rows,
        SortOrder::Descending,
        |(_, exact)| *exact,
        |(r, _)| r.team.as_str(),
        None,
    )
    .into_iter()
    .map(|r| Ranked {
        rank: r.rank,
        item: r.item.0,
    })
    .collect();

    Computed::new(ranked, 0)
}

/// Mean of a per-ball runs column, grouped by a key, highest first.
fn rank_average_runs<'a, I, K>(
    balls: I,
    key: K,
    limit: Option<usize>,
) -> Computed<Ranked<TeamAverage>>
where
    I: IntoIterator<Item = &'a BallEvent>,
    K: Fn(&'a BallEvent) -> Option<&'a str>,
{
    let mut sums: HashMap<&str, (f64, u32)> = HashMap::new();
    let mut skipped = 0;

    for ball in balls {
        let Some(team) = key(ball) else {
            continue;
        };
        match ball.total_runs.to_float() {
            Some(runs) => {
                let entry = sums.entry(team).or_default();
                entry.0 += runs;
                entry.1 += 1;
            }
            None => skipped += 1,
        }
    }

    let rows: Vec<(TeamAverage, f64)> = sums
        .into_iter()
        .filter_map(|(team, (sum, balls))| {
            let exact = calculate_mean(sum, balls)?;
            let row = TeamAverage {
                team: team.to_string(),
                balls,
                average: round2(exact),
            };
            Some((row, exact))
        })
        .collect();

    let ranked = rank_rows(
        rows,
        SortOrder::Descending,
        |(_, exact)| *exact,
        |(r, _)| r.team.as_str(),
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

/// Mean runs per ball for each batting side.
pub fn average_runs_per_ball(
    balls: &[BallEvent],
    limit: Option<usize>,
) -> Computed<Ranked<TeamAverage>> {
    rank_average_runs(balls, |b| b.team_batting.as_deref(), limit)
}

/// Mean runs per ball scored by the eventual winner, over the deliveries
/// the winner batted in the matches it won.
pub fn winning_team_average_runs(
    balls: &[BallEvent],
    matches: &[MatchRecord],
    limit: Option<usize>,
) -> Computed<Ranked<TeamAverage>> {
    let winner_of: HashMap<&str, &str> = matches
        .iter()
        .filter_map(|m| Some((m.match_id.as_deref()?, m.match_winner.as_deref()?)))
        .collect();

    let winning_balls = balls.iter().filter(|b| {
        match (b.match_id.as_deref(), b.team_batting.as_deref()) {
            (Some(id), Some(team)) => winner_of.get(id) == Some(&team),
            _ => false,
        }
    });

    rank_average_runs(winning_balls, |b| b.team_batting.as_deref(), limit)
}

/// Wickets taken per bowling side.
pub fn wickets_by_team(balls: &[BallEvent], limit: Option<usize>) -> Computed<Ranked<TeamWickets>> {
    let mut wickets: HashMap<&str, u32> = HashMap::new();
    let mut skipped = 0;

    for ball in balls {
        let Some(team) = ball.team_bowling.as_deref() else {
            continue;
        };
        match ball.is_wicket.to_flag() {
            Some(true) => *wickets.entry(team).or_default() += 1,
            Some(false) => {}
            None => skipped += 1,
        }
    }

    let rows: Vec<TeamWickets> = wickets
        .into_iter()
        .map(|(team, wickets)| TeamWickets {
            team: team.to_string(),
            wickets,
        })
        .collect();

    let ranked = rank_rows(
        rows,
        SortOrder::Descending,
        |r| r.wickets as f64,
        |r| r.team.as_str(),
        limit,
    );
    Computed::new(ranked, skipped)
}
