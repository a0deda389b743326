//! Ball-by-ball delivery model.

use serde::{Deserialize, Serialize};

use super::{Field, Record};

/// Column names of the `ball_events` table.
pub mod columns {
    pub const MATCH_ID: &str = "match_id";
    pub const INNINGS: &str = "innings";
    pub const TEAM_BATTING: &str = "team_batting";
    pub const TEAM_BOWLING: &str = "team_bowling";
    pub const BATTER: &str = "batter";
    pub const BOWLER: &str = "bowler";
    pub const BATTER_RUNS: &str = "batter_runs";
    pub const TOTAL_RUNS: &str = "total_runs";
    pub const IS_WICKET: &str = "is_wicket";
    pub const IS_WIDE_BALL: &str = "is_wide_ball";
    pub const IS_NO_BALL: &str = "is_no_ball";

    pub const ALL: &[&str] = &[
        MATCH_ID,
        INNINGS,
        TEAM_BATTING,
        TEAM_BOWLING,
        BATTER,
        BOWLER,
        BATTER_RUNS,
        TOTAL_RUNS,
        IS_WICKET,
        IS_WIDE_BALL,
        IS_NO_BALL,
    ];
}

/// One delivery.
///
/// Identity columns are normalized into grouping keys on load. Numeric and
/// flag columns stay raw and are coerced by each metric that reads them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BallEvent {
    pub match_id: Option<String>,
    pub innings: Field,
    pub team_batting: Option<String>,
    pub team_bowling: Option<String>,
    pub batter: Option<String>,
    pub bowler: Option<String>,
    /// Runs off the bat
    pub batter_runs: Field,
    /// Batter runs plus extras
    pub total_runs: Field,
    pub is_wicket: Field,
    pub is_wide_ball: Field,
    pub is_no_ball: Field,
}

impl BallEvent {
    /// Create a delivery with no runs and no flags set.
    pub fn new(
        match_id: impl Into<String>,
        innings: i64,
        batter: impl Into<String>,
        bowler: impl Into<String>,
    ) -> Self {
        Self {
            match_id: Some(match_id.into()),
            innings: Field::Int(innings),
            batter: Some(batter.into()),
            bowler: Some(bowler.into()),
            batter_runs: Field::Int(0),
            total_runs: Field::Int(0),
            is_wicket: Field::Int(0),
            is_wide_ball: Field::Int(0),
            is_no_ball: Field::Int(0),
            ..Default::default()
        }
    }

    /// Set the batting and bowling sides.
    pub fn with_teams(mut self, batting: impl Into<String>, bowling: impl Into<String>) -> Self {
        self.team_batting = Some(batting.into());
        self.team_bowling = Some(bowling.into());
        self
    }

    /// Set raw batter runs and total runs.
    pub fn with_runs(
        mut self,
        batter_runs: impl Into<Field>,
        total_runs: impl Into<Field>,
    ) -> Self {
        self.batter_runs = batter_runs.into();
        self.total_runs = total_runs.into();
        self
    }

    pub fn with_wicket(mut self) -> Self {
        self.is_wicket = Field::Int(1);
        self
    }

    pub fn with_wide(mut self) -> Self {
        self.is_wide_ball = Field::Int(1);
        self
    }

    pub fn with_no_ball(mut self) -> Self {
        self.is_no_ball = Field::Int(1);
        self
    }

    /// Build from a store record. Missing columns read as null.
    pub fn from_record(record: &Record) -> Self {
        Self {
            match_id: Field::get(record, columns::MATCH_ID).to_key(),
            innings: Field::get(record, columns::INNINGS),
            team_batting: Field::get(record, columns::TEAM_BATTING).to_key(),
            team_bowling: Field::get(record, columns::TEAM_BOWLING).to_key(),
            batter: Field::get(record, columns::BATTER).to_key(),
            bowler: Field::get(record, columns::BOWLER).to_key(),
            batter_runs: Field::get(record, columns::BATTER_RUNS),
            total_runs: Field::get(record, columns::TOTAL_RUNS),
            is_wicket: Field::get(record, columns::IS_WICKET),
            is_wide_ball: Field::get(record, columns::IS_WIDE_BALL),
            is_no_ball: Field::get(record, columns::IS_NO_BALL),
        }
    }

    /// Convert back into a store record.
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.insert(columns::MATCH_ID.into(), self.match_id.clone().into());
        record.insert(columns::INNINGS.into(), self.innings.clone());
        record.insert(columns::TEAM_BATTING.into(), self.team_batting.clone().into());
        record.insert(columns::TEAM_BOWLING.into(), self.team_bowling.clone().into());
        record.insert(columns::BATTER.into(), self.batter.clone().into());
        record.insert(columns::BOWLER.into(), self.bowler.clone().into());
        record.insert(columns::BATTER_RUNS.into(), self.batter_runs.clone());
        record.insert(columns::TOTAL_RUNS.into(), self.total_runs.clone());
        record.insert(columns::IS_WICKET.into(), self.is_wicket.clone());
        record.insert(columns::IS_WIDE_BALL.into(), self.is_wide_ball.clone());
        record.insert(columns::IS_NO_BALL.into(), self.is_no_ball.clone());
        record
    }

    /// Whether the delivery took a wicket. Unreadable flags count as no.
    pub fn is_wicket(&self) -> bool {
        self.is_wicket.to_flag().unwrap_or(false)
    }

    pub fn is_wide(&self) -> bool {
        self.is_wide_ball.to_flag().unwrap_or(false)
    }

    pub fn is_no_ball(&self) -> bool {
        self.is_no_ball.to_flag().unwrap_or(false)
    }
}
