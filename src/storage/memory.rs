//! In-memory record store.

use super::{DataError, Query, Record, RecordStore, TableName};
use crate::models::{BallEvent, MatchRecord};

/// Tables held in memory. Useful as an injected fixture.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    ball_events: Vec<Record>,
    match_records: Vec<Record>,
}

impl MemoryStore {
    pub fn new(ball_events: Vec<Record>, match_records: Vec<Record>) -> Self {
        Self {
            ball_events,
            match_records,
        }
    }

    /// Build from typed rows.
    pub fn from_rows(balls: &[BallEvent], matches: &[MatchRecord]) -> Self {
        Self::new(
            balls.iter().map(BallEvent::to_record).collect(),
            matches.iter().map(MatchRecord::to_record).collect(),
        )
    }

    fn rows(&self, table: TableName) -> &[Record] {
        match table {
            TableName::BallEvents => &self.ball_events,
            TableName::MatchRecords => &self.match_records,
        }
    }
}

impl RecordStore for MemoryStore {
    fn fetch(&self, query: &Query) -> Result<Vec<Record>, DataError> {
        query.apply(self.rows(query.table).iter().cloned())
    }
}
