//! Derived statistics models.
//!
//! Every row here is ephemeral: computed fresh for one report and dropped
//! once rendered.

use serde::Serialize;

use super::{MatchResult, TossOutcome};

/// A row with its 1-based leaderboard position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked<T> {
    pub rank: u32,
    #[serde(flatten)]
    pub item: T,
}

/// Output of one aggregation plus the number of rows its coercion dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Computed<T> {
    pub rows: Vec<T>,
    /// Rows excluded because a field failed numeric coercion
    pub skipped: usize,
}

impl<T> Computed<T> {
    pub fn new(rows: Vec<T>, skipped: usize) -> Self {
        Self { rows, skipped }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Career runs for a batter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatterRuns {
    pub batter: String,
    pub runs: i64,
}

/// Strike rate for a batter over balls faced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrikeRate {
    pub batter: String,
    pub runs: i64,
    pub balls: u32,
    /// Runs per 100 balls, rounded to 2 dp
    pub strike_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BowlerWickets {
    pub bowler: String,
    pub wickets: u32,
}

/// Economy rate for a bowler.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Economy {
    pub bowler: String,
    pub runs_conceded: i64,
    pub balls: u32,
    /// Runs per six balls, rounded to 2 dp
    pub economy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerAwards {
    pub player: String,
    pub awards: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamRuns {
    pub team: String,
    pub runs: i64,
}

/// Total match wins for a team.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamWins {
    pub team: String,
    pub wins: u32,
}

/// Win percentage over every match a team appeared in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamWinRate {
    pub team: String,
    pub wins: u32,
    pub matches: u32,
    pub win_percentage: f64,
}

/// Mean runs per ball for a team.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamAverage {
    pub team: String,
    pub balls: u32,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamWickets {
    pub team: String,
    pub wickets: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonMatches {
    pub season: String,
    pub matches: u32,
}

/// Mean first-innings total for a season.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonAverage {
    pub season: String,
    /// Matches contributing a first innings
    pub matches: u32,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultCount {
    pub result: MatchResult,
    pub matches: u32,
}

/// Share of decided matches won by the toss winner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TossWinRate {
    /// Matches with both a toss winner and a match winner
    pub decided: u32,
    pub toss_winner_won: u32,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TossDecisionCount {
    pub decision: String,
    pub matches: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TossOutcomeCount {
    pub outcome: TossOutcome,
    pub matches: u32,
}
