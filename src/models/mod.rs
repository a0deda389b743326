//! Core data models for cricket records and derived statistics.

mod ball_event;
mod field;
mod match_record;
mod stats;

pub use ball_event::{columns as ball_columns, BallEvent};
pub use field::*;
pub use match_record::{columns as match_columns, MatchRecord, MatchResult, TossOutcome};
pub use stats::*;
