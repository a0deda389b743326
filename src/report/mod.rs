//! Report runner.
//!
//! Each report fetches only the columns and rows it needs from the
//! injected [`RecordStore`], hands typed rows to [`crate::calculate`], and
//! turns the result into a [`Table`] plus the chart spec from the
//! catalogue. Renderers then draw every successful report.
//!
//! Failure policy: an unreachable store stops the whole run; any other
//! failure is logged against its report and the run moves on.

mod catalogue;
mod render;
mod table;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, error, info, warn};

pub use catalogue::ReportKind;
pub use render::{Axis, ChartKind, ChartSpec, RenderError, Renderer, TextRenderer, VegaLiteRenderer};
pub use table::{Cell, Table};

use crate::calculate::{batting, bowling, calculate_win_percentage, matches, round2, teams, toss};
use crate::config::ReportSettings;
use crate::models::{
    ball_columns as bc, match_columns as mc, BallEvent, Computed, MatchRecord, Ranked, TossOutcome,
};
use crate::storage::{DataError, Filter, Query, RecordStore, TableName};

/// A report that could not be produced.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report {report} failed: {source}")]
    Data {
        report: ReportKind,
        source: DataError,
    },

    #[error("report {report} failed to render: {source}")]
    Render {
        report: ReportKind,
        source: RenderError,
    },
}

impl ReportError {
    pub fn report(&self) -> ReportKind {
        match self {
            ReportError::Data { report, .. } | ReportError::Render { report, .. } => *report,
        }
    }

    /// Whether the remaining reports should be abandoned.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ReportError::Data {
                source: DataError::Unavailable(_),
                ..
            }
        )
    }
}

/// A computed report, ready to render.
#[derive(Debug, Clone)]
pub struct ReportOutput {
    pub kind: ReportKind,
    pub table: Table,
    pub chart: ChartSpec,
    /// Rows left out because a value did not coerce
    pub skipped_rows: usize,
    pub generated_at: DateTime<Utc>,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub succeeded: Vec<ReportKind>,
    pub failed: Vec<ReportError>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

fn fetch_balls(store: &dyn RecordStore, query: Query) -> Result<Vec<BallEvent>, DataError> {
    let rows = store.fetch(&query)?;
    debug!("Fetched {} ball events", rows.len());
    Ok(rows.iter().map(BallEvent::from_record).collect())
}

fn fetch_matches(store: &dyn RecordStore, query: Query) -> Result<Vec<MatchRecord>, DataError> {
    let rows = store.fetch(&query)?;
    debug!("Fetched {} match records", rows.len());
    Ok(rows.iter().map(MatchRecord::from_record).collect())
}

fn balls() -> Query {
    Query::table(TableName::BallEvents)
}

fn match_records() -> Query {
    Query::table(TableName::MatchRecords)
}

/// Build a table from computed rows, one row of cells per item.
fn tabulate<T>(
    kind: ReportKind,
    computed: Computed<T>,
    cells: impl Fn(T) -> Vec<Cell>,
) -> (Table, usize) {
    let mut table = Table::new(kind.columns());
    for row in computed.rows {
        table.push(cells(row));
    }
    (table, computed.skipped)
}

fn ranked<T>(row: &Ranked<T>) -> Cell {
    Cell::from(row.rank)
}

fn build_table(
    store: &dyn RecordStore,
    kind: ReportKind,
    settings: &ReportSettings,
) -> Result<(Table, usize), DataError> {
    let limit = Some(settings.leaderboard_limit);

    let built = match kind {
        ReportKind::MatchesPerSeason => {
            let records = fetch_matches(
                store,
                match_records().select(&[mc::MATCH_ID, mc::SEASON_ID]),
            )?;
            tabulate(kind, matches::matches_per_season(&records), |r| {
                vec![r.season.into(), r.matches.into()]
            })
        }
        ReportKind::AvgFirstInnings => {
            let deliveries = fetch_balls(
                store,
                balls()
                    .select(&[bc::MATCH_ID, bc::INNINGS, bc::TOTAL_RUNS])
                    .filter(Filter::equals(bc::INNINGS, 1)),
            )?;
            let records = fetch_matches(
                store,
                match_records().select(&[mc::MATCH_ID, mc::SEASON_ID]),
            )?;
            tabulate(kind, matches::average_first_innings(&deliveries, &records), |r| {
                vec![r.season.into(), r.matches.into(), r.average.into()]
            })
        }
        ReportKind::MatchResultType => {
            let records = fetch_matches(
                store,
                match_records().select(&[mc::WIN_BY_RUNS, mc::WIN_BY_WICKETS]),
            )?;
            tabulate(kind, matches::match_result_types(&records), |r| {
                vec![r.result.label().into(), r.matches.into()]
            })
        }
        ReportKind::TopRunScorers => {
            let deliveries = fetch_balls(store, balls().select(&[bc::BATTER, bc::BATTER_RUNS]))?;
            tabulate(kind, batting::top_run_scorers(&deliveries, limit), |r| {
                vec![ranked(&r), r.item.batter.into(), r.item.runs.into()]
            })
        }
        ReportKind::BestStrikeRate => {
            let deliveries = fetch_balls(
                store,
                balls().select(&[bc::BATTER, bc::BATTER_RUNS, bc::IS_WIDE_BALL]),
            )?;
            let computed = batting::best_strike_rate(
                &deliveries,
                settings.min_balls_strike_rate,
                settings.legal_balls_only,
                limit,
            );
            tabulate(kind, computed, |r| {
                vec![
                    ranked(&r),
                    r.item.batter.into(),
                    r.item.runs.into(),
                    r.item.balls.into(),
                    r.item.strike_rate.into(),
                ]
            })
        }
        ReportKind::MostWickets => {
            let deliveries = fetch_balls(
                store,
                balls()
                    .select(&[bc::BOWLER, bc::IS_WICKET])
                    .filter(Filter::equals(bc::IS_WICKET, true)),
            )?;
            tabulate(kind, bowling::most_wickets(&deliveries, limit), |r| {
                vec![ranked(&r), r.item.bowler.into(), r.item.wickets.into()]
            })
        }
        ReportKind::BestEconomy => {
            let deliveries = fetch_balls(
                store,
                balls().select(&[bc::BOWLER, bc::TOTAL_RUNS, bc::IS_WIDE_BALL, bc::IS_NO_BALL]),
            )?;
            let computed = bowling::best_economy(
                &deliveries,
                settings.min_balls_economy,
                settings.legal_balls_only,
                limit,
            );
            tabulate(kind, computed, |r| {
                vec![
                    ranked(&r),
                    r.item.bowler.into(),
                    r.item.runs_conceded.into(),
                    r.item.balls.into(),
                    r.item.economy.into(),
                ]
            })
        }
        ReportKind::PlayerOfMatch => {
            let records = fetch_matches(
                store,
                match_records()
                    .select(&[mc::PLAYER_OF_MATCH])
                    .filter(Filter::not_null(mc::PLAYER_OF_MATCH)),
            )?;
            tabulate(kind, matches::player_of_match_awards(&records, limit), |r| {
                vec![ranked(&r), r.item.player.into(), r.item.awards.into()]
            })
        }
        ReportKind::TeamTotalRuns => {
            let deliveries =
                fetch_balls(store, balls().select(&[bc::TEAM_BATTING, bc::TOTAL_RUNS]))?;
            tabulate(kind, teams::team_total_runs(&deliveries, limit), |r| {
                vec![ranked(&r), r.item.team.into(), r.item.runs.into()]
            })
        }
        ReportKind::MostSuccessfulTeams => {
            let records = fetch_matches(
                store,
                match_records()
                    .select(&[mc::MATCH_WINNER])
                    .filter(Filter::not_null(mc::MATCH_WINNER)),
            )?;
            tabulate(kind, teams::most_successful_teams(&records, limit), |r| {
                vec![ranked(&r), r.item.team.into(), r.item.wins.into()]
            })
        }
        ReportKind::TeamWinPercentage => {
            let records = fetch_matches(
                store,
                match_records().select(&[mc::TEAM1, mc::TEAM2, mc::MATCH_WINNER]),
            )?;
            tabulate(kind, teams::team_win_percentage(&records), |r| {
                vec![
                    ranked(&r),
                    r.item.team.into(),
                    r.item.wins.into(),
                    r.item.matches.into(),
                    r.item.win_percentage.into(),
                ]
            })
        }
        ReportKind::TossWinRate => {
            let records = fetch_matches(
                store,
                match_records().select(&[mc::TOSS_WINNER, mc::MATCH_WINNER]),
            )?;
            let mut table = Table::new(kind.columns());
            match toss::toss_win_rate(&records) {
                Some(rate) => {
                    let lost = rate.decided - rate.toss_winner_won;
                    table.push(vec![
                        TossOutcome::TossWinnerWon.label().into(),
                        rate.toss_winner_won.into(),
                        rate.percentage.into(),
                    ]);
                    table.push(vec![
                        TossOutcome::TossWinnerLost.label().into(),
                        lost.into(),
                        round2(calculate_win_percentage(lost, rate.decided)).into(),
                    ]);
                }
                None => info!("No decided matches with a recorded toss"),
            }
            (table, 0)
        }
        ReportKind::TossDecision => {
            let records = fetch_matches(store, match_records().select(&[mc::TOSS_DECISION]))?;
            tabulate(kind, toss::toss_decisions(&records), |r| {
                vec![r.decision.into(), r.matches.into()]
            })
        }
        ReportKind::TossOutcome => {
            let records = fetch_matches(
                store,
                match_records().select(&[mc::TOSS_WINNER, mc::MATCH_WINNER]),
            )?;
            tabulate(kind, toss::toss_outcomes(&records), |r| {
                vec![r.outcome.label().into(), r.matches.into()]
            })
        }
        ReportKind::AvgRunsPerBall => {
            let deliveries =
                fetch_balls(store, balls().select(&[bc::TEAM_BATTING, bc::TOTAL_RUNS]))?;
            tabulate(kind, teams::average_runs_per_ball(&deliveries, limit), |r| {
                vec![
                    ranked(&r),
                    r.item.team.into(),
                    r.item.balls.into(),
                    r.item.average.into(),
                ]
            })
        }
        ReportKind::WicketsByTeam => {
            let deliveries = fetch_balls(
                store,
                balls()
                    .select(&[bc::TEAM_BOWLING, bc::IS_WICKET])
                    .filter(Filter::equals(bc::IS_WICKET, true)),
            )?;
            tabulate(kind, teams::wickets_by_team(&deliveries, limit), |r| {
                vec![ranked(&r), r.item.team.into(), r.item.wickets.into()]
            })
        }
        ReportKind::WinningTeamAvgRuns => {
            let deliveries = fetch_balls(
                store,
                balls().select(&[bc::MATCH_ID, bc::TEAM_BATTING, bc::TOTAL_RUNS]),
            )?;
            let records = fetch_matches(
                store,
                match_records()
                    .select(&[mc::MATCH_ID, mc::MATCH_WINNER])
                    .filter(Filter::not_null(mc::MATCH_WINNER)),
            )?;
            let computed = teams::winning_team_average_runs(&deliveries, &records, limit);
            tabulate(kind, computed, |r| {
                vec![
                    ranked(&r),
                    r.item.team.into(),
                    r.item.balls.into(),
                    r.item.average.into(),
                ]
            })
        }
    };

    Ok(built)
}

/// Compute one report.
pub fn run_report(
    store: &dyn RecordStore,
    kind: ReportKind,
    settings: &ReportSettings,
) -> Result<ReportOutput, ReportError> {
    info!("Running report {}", kind);

    let (table, skipped_rows) = build_table(store, kind, settings)
        .map_err(|source| ReportError::Data { report: kind, source })?;

    if skipped_rows > 0 {
        warn!("{}: {} rows skipped on numeric coercion", kind, skipped_rows);
    }
    if table.is_empty() {
        info!("{}: no rows", kind);
    } else {
        debug!("{}: {} rows", kind, table.len());
    }

    let chart = kind.chart();
    chart
        .validate(&table)
        .map_err(|source| ReportError::Render { report: kind, source })?;

    Ok(ReportOutput {
        kind,
        table,
        chart,
        skipped_rows,
        generated_at: Utc::now(),
    })
}

/// Compute and render each report in turn.
///
/// Returns an error only when the store is unreachable; every other
/// failure is recorded in the summary.
pub fn run_reports(
    store: &dyn RecordStore,
    kinds: &[ReportKind],
    settings: &ReportSettings,
    renderers: &mut [Box<dyn Renderer>],
) -> Result<RunSummary, ReportError> {
    let mut summary = RunSummary::default();

    for &kind in kinds {
        let result = run_report(store, kind, settings).and_then(|output| {
            for renderer in renderers.iter_mut() {
                renderer
                    .render(kind.slug(), &output.table, &output.chart)
                    .map_err(|source| ReportError::Render { report: kind, source })?;
            }
            Ok(output)
        });

        match result {
            Ok(_) => summary.succeeded.push(kind),
            Err(e) if e.is_fatal() => {
                error!("{}", e);
                return Err(e);
            }
            Err(e) => {
                error!("{}", e);
                summary.failed.push(e);
            }
        }
    }

    info!(
        "Ran {} reports: {} succeeded, {} failed",
        kinds.len(),
        summary.succeeded.len(),
        summary.failed.len()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Field, Record};
    use crate::storage::MemoryStore;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn text(s: &str) -> Cell {
        Cell::from(s)
    }

    fn fixture() -> MemoryStore {
        let mut balls = Vec::new();
        // Match 1: MI bat first and defend; CSK chase.
        for _ in 0..6 {
            balls.push(
                BallEvent::new("1", 1, "Rohit", "Bravo")
                    .with_teams("MI", "CSK")
                    .with_runs(4, 4),
            );
        }
        balls.push(
            BallEvent::new("1", 2, "Dhoni", "Malinga")
                .with_teams("CSK", "MI")
                .with_runs(1, 1)
                .with_wicket(),
        );
        // Match 2: RCB bat first, KKR chase and win.
        balls.push(
            BallEvent::new("2", 1, "Kohli", "Narine")
                .with_teams("RCB", "KKR")
                .with_runs(6, 6),
        );
        balls.push(
            BallEvent::new("2", 2, "Gambhir", "Chahal")
                .with_teams("KKR", "RCB")
                .with_runs(2, 2),
        );

        let matches = vec![
            MatchRecord::new("1", "2008", "MI", "CSK")
                .with_toss("MI", "bat")
                .with_winner("MI", 23, 0)
                .with_player_of_match("Rohit"),
            MatchRecord::new("2", "2009", "RCB", "KKR")
                .with_toss("RCB", "Field")
                .with_winner("KKR", 0, 5)
                .with_player_of_match("Gambhir"),
            MatchRecord::new("3", "2009", "MI", "KKR"),
        ];

        MemoryStore::from_rows(&balls, &matches)
    }

    fn settings() -> ReportSettings {
        ReportSettings {
            min_balls_strike_rate: 2,
            min_balls_economy: 2,
            ..ReportSettings::default()
        }
    }

    #[test]
    fn test_every_report_runs_on_fixture() {
        let store = fixture();
        for kind in ReportKind::ALL {
            let output = run_report(&store, kind, &settings()).unwrap();
            assert_eq!(output.table.columns.len(), kind.columns().len());
            assert_eq!(output.chart, kind.chart());
        }
    }

    #[test]
    fn test_match_result_type_table() {
        let output = run_report(&fixture(), ReportKind::MatchResultType, &settings()).unwrap();

        assert_eq!(
            output.table.rows,
            vec![
                vec![text("Defending Team Won"), Cell::Int(1)],
                vec![text("Chasing Team Won"), Cell::Int(1)],
                vec![text("No Result"), Cell::Int(1)],
            ]
        );
    }

    #[test]
    fn test_top_run_scorers_ranked() {
        let output = run_report(&fixture(), ReportKind::TopRunScorers, &settings()).unwrap();

        assert_eq!(output.table.rows[0], vec![Cell::Int(1), text("Rohit"), Cell::Int(24)]);
        assert_eq!(output.table.rows[1], vec![Cell::Int(2), text("Kohli"), Cell::Int(6)]);
        assert_eq!(output.table.len(), 4);
    }

    #[test]
    fn test_strike_rate_threshold_from_settings() {
        let output = run_report(&fixture(), ReportKind::BestStrikeRate, &settings()).unwrap();

        assert_eq!(output.table.len(), 1);
        assert_eq!(output.table.rows[0][1], text("Rohit"));
        assert_eq!(output.table.rows[0][4], Cell::Float(400.0));
    }

    #[test]
    fn test_default_thresholds_give_empty_tables() {
        let settings = ReportSettings::default();
        for kind in [ReportKind::BestStrikeRate, ReportKind::BestEconomy] {
            let output = run_report(&fixture(), kind, &settings).unwrap();
            assert!(output.table.is_empty(), "{}", kind);
        }
    }

    #[test]
    fn test_team_win_percentage_includes_winless() {
        let output = run_report(&fixture(), ReportKind::TeamWinPercentage, &settings()).unwrap();

        let csk = output
            .table
            .rows
            .iter()
            .find(|r| r[1] == text("CSK"))
            .unwrap();
        assert_eq!(csk[4], Cell::Float(0.0));
    }

    #[test]
    fn test_toss_win_rate_splits_decided_matches() {
        let output = run_report(&fixture(), ReportKind::TossWinRate, &settings()).unwrap();

        assert_eq!(
            output.table.rows,
            vec![
                vec![text("Toss Winner Won"), Cell::Int(1), Cell::Float(50.0)],
                vec![text("Toss Winner Lost"), Cell::Int(1), Cell::Float(50.0)],
            ]
        );
    }

    #[test]
    fn test_avg_first_innings_by_season() {
        let output = run_report(&fixture(), ReportKind::AvgFirstInnings, &settings()).unwrap();

        assert_eq!(
            output.table.rows,
            vec![
                vec![text("2008"), Cell::Int(1), Cell::Float(24.0)],
                vec![text("2009"), Cell::Int(1), Cell::Float(6.0)],
            ]
        );
    }

    #[test]
    fn test_coercion_skips_are_counted() {
        let mut dirty = Record::new();
        dirty.insert("batter".to_string(), Field::from("Rohit"));
        dirty.insert("batter_runs".to_string(), Field::from("NaN"));
        let mut clean = dirty.clone();
        clean.insert("batter_runs".to_string(), Field::from("4"));
        let store = MemoryStore::new(vec![clean, dirty], Vec::new());

        let output = run_report(&store, ReportKind::TopRunScorers, &settings()).unwrap();

        assert_eq!(output.skipped_rows, 1);
        assert_eq!(output.table.rows, vec![vec![Cell::Int(1), text("Rohit"), Cell::Int(4)]]);
    }

    struct Unreachable;

    impl RecordStore for Unreachable {
        fn fetch(&self, _query: &Query) -> Result<Vec<Record>, DataError> {
            Err(DataError::Unavailable("disk gone".to_string()))
        }
    }

    #[derive(Clone, Default)]
    struct Recording(Rc<RefCell<Vec<String>>>);

    impl Renderer for Recording {
        fn render(
            &mut self,
            name: &str,
            _table: &Table,
            _chart: &ChartSpec,
        ) -> Result<(), RenderError> {
            self.0.borrow_mut().push(name.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_unavailable_store_aborts_run() {
        let recording = Recording::default();
        let mut renderers: Vec<Box<dyn Renderer>> = vec![Box::new(recording.clone())];

        let result = run_reports(&Unreachable, &ReportKind::ALL, &settings(), &mut renderers);

        let err = result.unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(err.report(), ReportKind::MatchesPerSeason);
        assert!(recording.0.borrow().is_empty());
    }

    struct FailsOn(&'static str);

    impl Renderer for FailsOn {
        fn render(
            &mut self,
            name: &str,
            _table: &Table,
            chart: &ChartSpec,
        ) -> Result<(), RenderError> {
            if name == self.0 {
                return Err(RenderError::MissingField {
                    chart: chart.kind,
                    field: "x".to_string(),
                });
            }
            Ok(())
        }
    }

    #[test]
    fn test_failed_report_does_not_stop_others() {
        let kinds = [
            ReportKind::MostWickets,
            ReportKind::TopRunScorers,
            ReportKind::TossOutcome,
        ];
        let recording = Recording::default();
        let mut renderers: Vec<Box<dyn Renderer>> =
            vec![Box::new(FailsOn("top-run-scorers")), Box::new(recording.clone())];

        let summary = run_reports(&fixture(), &kinds, &settings(), &mut renderers).unwrap();

        assert!(!summary.is_success());
        assert_eq!(summary.succeeded, vec![ReportKind::MostWickets, ReportKind::TossOutcome]);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].report(), ReportKind::TopRunScorers);
        assert_eq!(
            *recording.0.borrow(),
            vec!["most-wickets".to_string(), "toss-outcome".to_string()]
        );
    }
}
