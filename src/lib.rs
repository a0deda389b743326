//! # IPL Insights
//!
//! Batch statistics and charts over Indian Premier League ball-by-ball
//! and match data.
//!
//! ## Architecture
//!
//! - **models**: Record fields, ball events, match records, derived stat rows
//! - **storage**: Record store access (in-memory, JSONL and Parquet data lake)
//! - **calculate**: Aggregations behind each report
//! - **report**: Report catalogue, runner and renderers
//! - **config**: Configuration loading and validation

pub mod calculate;
pub mod config;
pub mod models;
pub mod report;
pub mod storage;

pub use models::*;
