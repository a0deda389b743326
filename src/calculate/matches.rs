//! Match-level aggregations: seasons, first-innings trend, result split and
//! player-of-match awards.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;

use super::{calculate_mean, compare_keys, rank_rows, round2, SortOrder};
use crate::models::{
    BallEvent, Computed, MatchRecord, MatchResult, PlayerAwards, Ranked, ResultCount,
    SeasonAverage, SeasonMatches,
};

/// Distinct matches per season, oldest season first.
pub fn matches_per_season(matches: &[MatchRecord]) -> Computed<SeasonMatches> {
    let mut seasons: HashMap<&str, HashSet<&str>> = HashMap::new();

    for m in matches {
        if let (Some(season), Some(id)) = (m.season_id.as_deref(), m.match_id.as_deref()) {
            seasons.entry(season).or_default().insert(id);
        }
    }

    let mut rows: Vec<SeasonMatches> = seasons
        .into_iter()
        .map(|(season, ids)| SeasonMatches {
            season: season.to_string(),
            matches: ids.len() as u32,
        })
        .collect();
    rows.sort_by(|a, b| compare_keys(&a.season, &b.season));

    Computed::new(rows, 0)
}

/// Average first-innings total per season.
///
/// First-innings deliveries are summed per match, joined to their season
/// through the match table, then averaged per season. Deliveries whose
/// match is unknown are dropped by the join. The innings filter and the
/// runs sum each skip rows that do not coerce.
pub fn average_first_innings(
    balls: &[BallEvent],
    matches: &[MatchRecord],
) -> Computed<SeasonAverage> {
    let season_of: HashMap<&str, &str> = matches
        .iter()
        .filter_map(|m| Some((m.match_id.as_deref()?, m.season_id.as_deref()?)))
        .collect();

    let mut match_totals: HashMap<&str, i64> = HashMap::new();
    let mut skipped = 0;

    for ball in balls {
        match ball.innings.to_int() {
            Some(1) => {}
            Some(_) => continue,
            None => {
                skipped += 1;
                continue;
            }
        }
        let Some(match_id) = ball.match_id.as_deref() else {
            continue;
        };
        match ball.total_runs.to_int() {
            Some(runs) => *match_totals.entry(match_id).or_default() += runs,
            None => skipped += 1,
        }
    }

    let mut by_season: BTreeMap<&str, (f64, u32)> = BTreeMap::new();
    let mut unmatched = 0;
    for (match_id, total) in match_totals {
        match season_of.get(match_id) {
            Some(&season) => {
                let entry = by_season.entry(season).or_default();
                entry.0 += total as f64;
                entry.1 += 1;
            }
            None => unmatched += 1,
        }
    }
    if unmatched > 0 {
        debug!("{} first innings have no matching match record", unmatched);
    }

    let mut rows: Vec<SeasonAverage> = by_season
        .into_iter()
        .filter_map(|(season, (sum, count))| {
            Some(SeasonAverage {
                season: season.to_string(),
                matches: count,
                average: round2(calculate_mean(sum, count)?),
            })
        })
        .collect();
    rows.sort_by(|a, b| compare_keys(&a.season, &b.season));

    Computed::new(rows, skipped)
}

/// Count matches per result category, in fixed category order. Categories
/// with no matches are omitted.
pub fn match_result_types(matches: &[MatchRecord]) -> Computed<ResultCount> {
    let mut counts: BTreeMap<MatchResult, u32> = BTreeMap::new();
    for m in matches {
        *counts.entry(m.result()).or_default() += 1;
    }

    let rows = MatchResult::ALL
        .iter()
        .filter_map(|result| {
            counts.get(result).map(|&matches| ResultCount {
                result: *result,
                matches,
            })
        })
        .collect();

    Computed::new(rows, 0)
}

/// Most player-of-match awards. Matches without an award are ignored.
pub fn player_of_match_awards(
    matches: &[MatchRecord],
    limit: Option<usize>,
) -> Computed<Ranked<PlayerAwards>> {
    let mut awards: HashMap<&str, u32> = HashMap::new();
    for player in matches.iter().filter_map(|m| m.player_of_match.as_deref()) {
        *awards.entry(player).or_default() += 1;
    }

    let rows: Vec<PlayerAwards> = awards
        .into_iter()
        .map(|(player, awards)| PlayerAwards {
            player: player.to_string(),
            awards,
        })
        .collect();

    let ranked = rank_rows(
        rows,
        SortOrder::Descending,
        |r| r.awards as f64,
        |r| r.player.as_str(),
        limit,
    );
    Computed::new(ranked, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Field;
    use pretty_assertions::assert_eq;

    fn first_innings(match_id: &str, total_runs: impl Into<Field>) -> BallEvent {
        BallEvent::new(match_id, 1, "bat", "bowl").with_runs(0, total_runs)
    }

    #[test]
    fn test_matches_per_season_counts_distinct() {
        let matches = vec![
            MatchRecord::new("1", "2009", "A", "B"),
            MatchRecord::new("1", "2009", "A", "B"),
            MatchRecord::new("2", "2009", "C", "D"),
            MatchRecord::new("3", "2008", "A", "C"),
            MatchRecord::new("4", "2010", "B", "D"),
        ];

        let result = matches_per_season(&matches);

        let got: Vec<(&str, u32)> = result
            .rows
            .iter()
            .map(|r| (r.season.as_str(), r.matches))
            .collect();
        assert_eq!(got, vec![("2008", 1), ("2009", 2), ("2010", 1)]);
    }

    #[test]
    fn test_average_first_innings() {
        let matches = vec![
            MatchRecord::new("1", "2008", "A", "B"),
            MatchRecord::new("2", "2008", "C", "D"),
            MatchRecord::new("3", "2009", "A", "C"),
        ];
        let mut balls = vec![
            first_innings("1", 100),
            first_innings("1", 65),
            first_innings("2", 150),
            first_innings("3", 201),
        ];
        // second innings and dirty rows must not count
        balls.push(BallEvent::new("1", 2, "x", "y").with_runs(0, 300));
        balls.push(first_innings("2", "bad"));

        let result = average_first_innings(&balls, &matches);

        let got: Vec<(&str, u32, f64)> = result
            .rows
            .iter()
            .map(|r| (r.season.as_str(), r.matches, r.average))
            .collect();
        assert_eq!(got, vec![("2008", 2, 157.5), ("2009", 1, 201.0)]);
        assert_eq!(result.skipped, 1);
    }

    #[test]
    fn test_average_first_innings_rounds_to_two_places() {
        let matches = vec![
            MatchRecord::new("1", "2011", "A", "B"),
            MatchRecord::new("2", "2011", "A", "B"),
            MatchRecord::new("3", "2011", "A", "B"),
        ];
        let balls = vec![
            first_innings("1", 100),
            first_innings("2", 100),
            first_innings("3", 101),
        ];

        let result = average_first_innings(&balls, &matches);

        assert_eq!(result.rows[0].average, 100.33);
    }

    #[test]
    fn test_average_first_innings_drops_unknown_matches() {
        let matches = vec![MatchRecord::new("1", "2012", "A", "B")];
        let balls = vec![first_innings("1", 120), first_innings("99", 500)];

        let result = average_first_innings(&balls, &matches);

        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].average, 120.0);
    }

    #[test]
    fn test_match_result_types() {
        let matches = vec![
            MatchRecord::new("1", "2008", "A", "B").with_winner("A", 5, 3),
            MatchRecord::new("2", "2008", "A", "B").with_winner("B", 0, 7),
            MatchRecord::new("3", "2008", "A", "B").with_winner("A", 12, 0),
            MatchRecord::new("4", "2008", "A", "B"),
        ];

        let result = match_result_types(&matches);

        assert_eq!(
            result.rows,
            vec![
                ResultCount {
                    result: MatchResult::DefendingTeamWon,
                    matches: 2
                },
                ResultCount {
                    result: MatchResult::ChasingTeamWon,
                    matches: 1
                },
                ResultCount {
                    result: MatchResult::NoResult,
                    matches: 1
                },
            ]
        );
    }

    #[test]
    fn test_player_of_match_awards_skips_missing() {
        let matches = vec![
            MatchRecord::new("1", "2008", "A", "B").with_player_of_match("CH Gayle"),
            MatchRecord::new("2", "2008", "A", "B").with_player_of_match("CH Gayle"),
            MatchRecord::new("3", "2008", "A", "B").with_player_of_match("AB de Villiers"),
            MatchRecord::new("4", "2008", "A", "B"),
        ];

        let result = player_of_match_awards(&matches, Some(10));

        let got: Vec<(&str, u32)> = result
            .rows
            .iter()
            .map(|r| (r.item.player.as_str(), r.item.awards))
            .collect();
        assert_eq!(got, vec![("CH Gayle", 2), ("AB de Villiers", 1)]);
    }
}
