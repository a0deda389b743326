//! Toss impact.

use std::collections::{BTreeMap, HashMap};

use super::{calculate_win_percentage, rank_rows, round2, SortOrder};
use crate::models::{
    Computed, MatchRecord, TossDecisionCount, TossOutcome, TossOutcomeCount, TossWinRate,
};

/// Label for matches with no recorded toss decision.
pub const UNKNOWN_DECISION: &str = "Unknown";

/// Percentage of decided matches won by the toss winner.
///
/// Only matches with both a toss winner and a match winner count. Returns
/// `None` when no match qualifies.
pub fn toss_win_rate(matches: &[MatchRecord]) -> Option<TossWinRate> {
    let mut decided = 0u32;
    let mut toss_winner_won = 0u32;

    for m in matches {
        match m.toss_outcome() {
            TossOutcome::TossWinnerWon => {
                decided += 1;
                toss_winner_won += 1;
            }
            TossOutcome::TossWinnerLost => decided += 1,
            TossOutcome::NoResult => {}
        }
    }

    (decided > 0).then(|| TossWinRate {
        decided,
        toss_winner_won,
        percentage: round2(calculate_win_percentage(toss_winner_won, decided)),
    })
}

/// How often captains chose to bat or field, most common first.
pub fn toss_decisions(matches: &[MatchRecord]) -> Computed<TossDecisionCount> {
    let mut counts: HashMap<String, u32> = HashMap::new();
    for m in matches {
        let decision = m
            .toss_decision
            .as_deref()
            .map(str::to_lowercase)
            .unwrap_or_else(|| UNKNOWN_DECISION.to_string());
        *counts.entry(decision).or_default() += 1;
    }

    let rows: Vec<TossDecisionCount> = counts
        .into_iter()
        .map(|(decision, matches)| TossDecisionCount { decision, matches })
        .collect();

    let rows = rank_rows(
        rows,
        SortOrder::Descending,
        |r| r.matches as f64,
        |r| r.decision.as_str(),
        None,
    )
    .into_iter()
    .map(|r| r.item)
    .collect();

    Computed::new(rows, 0)
}

/// Split of matches by whether the toss winner won, in fixed order.
pub fn toss_outcomes(matches: &[MatchRecord]) -> Computed<TossOutcomeCount> {
    let mut counts: BTreeMap<TossOutcome, u32> = BTreeMap::new();
    for m in matches {
        *counts.entry(m.toss_outcome()).or_default() += 1;
    }

    let rows = TossOutcome::ALL
        .iter()
        .filter_map(|outcome| {
            counts.get(outcome).map(|&matches| TossOutcomeCount {
                outcome: *outcome,
                matches,
            })
        })
        .collect();

    Computed::new(rows, 0)
}
