//! Match-level model and outcome classification.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Field, Record};

/// Column names of the `match_records` table.
pub mod columns {
    pub const MATCH_ID: &str = "match_id";
    pub const SEASON_ID: &str = "season_id";
    pub const TEAM1: &str = "team1";
    pub const TEAM2: &str = "team2";
    pub const TOSS_WINNER: &str = "toss_winner";
    pub const TOSS_DECISION: &str = "toss_decision";
    pub const MATCH_WINNER: &str = "match_winner";
    pub const WIN_BY_RUNS: &str = "win_by_runs";
    pub const WIN_BY_WICKETS: &str = "win_by_wickets";
    pub const PLAYER_OF_MATCH: &str = "player_of_match";

    pub const ALL: &[&str] = &[
        MATCH_ID,
        SEASON_ID,
        TEAM1,
        TEAM2,
        TOSS_WINNER,
        TOSS_DECISION,
        MATCH_WINNER,
        WIN_BY_RUNS,
        WIN_BY_WICKETS,
        PLAYER_OF_MATCH,
    ];
}

/// How a match was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MatchResult {
    /// Side batting first won (margin in runs)
    DefendingTeamWon,
    /// Side batting second won (margin in wickets)
    ChasingTeamWon,
    NoResult,
}

impl MatchResult {
    pub const ALL: [MatchResult; 3] = [
        MatchResult::DefendingTeamWon,
        MatchResult::ChasingTeamWon,
        MatchResult::NoResult,
    ];

    /// Classify from the two victory margins.
    ///
    /// Runs are checked before wickets, so a dirty row with both margins
    /// positive is a defended total. Unreadable margins count as zero.
    pub fn classify(win_by_runs: &Field, win_by_wickets: &Field) -> Self {
        if win_by_runs.to_int().unwrap_or(0) > 0 {
            MatchResult::DefendingTeamWon
        } else if win_by_wickets.to_int().unwrap_or(0) > 0 {
            MatchResult::ChasingTeamWon
        } else {
            MatchResult::NoResult
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchResult::DefendingTeamWon => "Defending Team Won",
            MatchResult::ChasingTeamWon => "Chasing Team Won",
            MatchResult::NoResult => "No Result",
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether the toss winner went on to win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TossOutcome {
    TossWinnerWon,
    TossWinnerLost,
    /// Toss winner or match winner missing
    NoResult,
}

impl TossOutcome {
    pub const ALL: [TossOutcome; 3] = [
        TossOutcome::TossWinnerWon,
        TossOutcome::TossWinnerLost,
        TossOutcome::NoResult,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TossOutcome::TossWinnerWon => "Toss Winner Won",
            TossOutcome::TossWinnerLost => "Toss Winner Lost",
            TossOutcome::NoResult => "No Result",
        }
    }
}

impl fmt::Display for TossOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One match.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: Option<String>,
    pub season_id: Option<String>,
    pub team1: Option<String>,
    pub team2: Option<String>,
    pub toss_winner: Option<String>,
    /// "bat" or "field" in clean data
    pub toss_decision: Option<String>,
    /// `None` when there was no result
    pub match_winner: Option<String>,
    pub win_by_runs: Field,
    pub win_by_wickets: Field,
    pub player_of_match: Option<String>,
}

impl MatchRecord {
    /// Create an undecided match between two teams.
    pub fn new(
        match_id: impl Into<String>,
        season_id: impl Into<String>,
        team1: impl Into<String>,
        team2: impl Into<String>,
    ) -> Self {
        Self {
            match_id: Some(match_id.into()),
            season_id: Some(season_id.into()),
            team1: Some(team1.into()),
            team2: Some(team2.into()),
            win_by_runs: Field::Int(0),
            win_by_wickets: Field::Int(0),
            ..Default::default()
        }
    }

    /// Set the toss winner and their decision.
    pub fn with_toss(mut self, winner: impl Into<String>, decision: impl Into<String>) -> Self {
        self.toss_winner = Some(winner.into());
        self.toss_decision = Some(decision.into());
        self
    }

    /// Set the winner and the raw victory margins.
    pub fn with_winner(
        mut self,
        winner: impl Into<String>,
        win_by_runs: impl Into<Field>,
        win_by_wickets: impl Into<Field>,
    ) -> Self {
        self.match_winner = Some(winner.into());
        self.win_by_runs = win_by_runs.into();
        self.win_by_wickets = win_by_wickets.into();
        self
    }

    pub fn with_player_of_match(mut self, player: impl Into<String>) -> Self {
        self.player_of_match = Some(player.into());
        self
    }

    /// Build from a store record. Missing columns read as null.
    pub fn from_record(record: &Record) -> Self {
        Self {
            match_id: Field::get(record, columns::MATCH_ID).to_key(),
            season_id: Field::get(record, columns::SEASON_ID).to_key(),
            team1: Field::get(record, columns::TEAM1).to_key(),
            team2: Field::get(record, columns::TEAM2).to_key(),
            toss_winner: Field::get(record, columns::TOSS_WINNER).to_key(),
            toss_decision: Field::get(record, columns::TOSS_DECISION).to_key(),
            match_winner: Field::get(record, columns::MATCH_WINNER).to_key(),
            win_by_runs: Field::get(record, columns::WIN_BY_RUNS),
            win_by_wickets: Field::get(record, columns::WIN_BY_WICKETS),
            player_of_match: Field::get(record, columns::PLAYER_OF_MATCH).to_key(),
        }
    }

    /// Convert back into a store record.
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.insert(columns::MATCH_ID.into(), self.match_id.clone().into());
        record.insert(columns::SEASON_ID.into(), self.season_id.clone().into());
        record.insert(columns::TEAM1.into(), self.team1.clone().into());
        record.insert(columns::TEAM2.into(), self.team2.clone().into());
        record.insert(columns::TOSS_WINNER.into(), self.toss_winner.clone().into());
        record.insert(columns::TOSS_DECISION.into(), self.toss_decision.clone().into());
        record.insert(columns::MATCH_WINNER.into(), self.match_winner.clone().into());
        record.insert(columns::WIN_BY_RUNS.into(), self.win_by_runs.clone());
        record.insert(columns::WIN_BY_WICKETS.into(), self.win_by_wickets.clone());
        record.insert(columns::PLAYER_OF_MATCH.into(), self.player_of_match.clone().into());
        record
    }

    pub fn result(&self) -> MatchResult {
        MatchResult::classify(&self.win_by_runs, &self.win_by_wickets)
    }

    pub fn toss_outcome(&self) -> TossOutcome {
        match (&self.toss_winner, &self.match_winner) {
            (Some(toss), Some(winner)) if toss == winner => TossOutcome::TossWinnerWon,
            (Some(_), Some(_)) => TossOutcome::TossWinnerLost,
            _ => TossOutcome::NoResult,
        }
    }
}
