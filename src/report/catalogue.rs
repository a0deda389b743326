//! The fixed list of reports, in run order.

use std::fmt;

use super::render::{Axis, ChartKind, ChartSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    MatchesPerSeason,
    AvgFirstInnings,
    MatchResultType,
    TopRunScorers,
    BestStrikeRate,
    MostWickets,
    BestEconomy,
    PlayerOfMatch,
    TeamTotalRuns,
    MostSuccessfulTeams,
    TeamWinPercentage,
    TossWinRate,
    TossDecision,
    TossOutcome,
    AvgRunsPerBall,
    WicketsByTeam,
    WinningTeamAvgRuns,
}

impl ReportKind {
    /// Every report in run order.
    pub const ALL: [ReportKind; 17] = [
        ReportKind::MatchesPerSeason,
        ReportKind::AvgFirstInnings,
        ReportKind::MatchResultType,
        ReportKind::TopRunScorers,
        ReportKind::BestStrikeRate,
        ReportKind::MostWickets,
        ReportKind::BestEconomy,
        ReportKind::PlayerOfMatch,
        ReportKind::TeamTotalRuns,
        ReportKind::MostSuccessfulTeams,
        ReportKind::TeamWinPercentage,
        ReportKind::TossWinRate,
        ReportKind::TossDecision,
        ReportKind::TossOutcome,
        ReportKind::AvgRunsPerBall,
        ReportKind::WicketsByTeam,
        ReportKind::WinningTeamAvgRuns,
    ];

    /// Stable identifier, also the chart filename stem.
    pub fn slug(&self) -> &'static str {
        match self {
            ReportKind::MatchesPerSeason => "matches-per-season",
            ReportKind::AvgFirstInnings => "avg-first-innings",
            ReportKind::MatchResultType => "match-result-type",
            ReportKind::TopRunScorers => "top-run-scorers",
            ReportKind::BestStrikeRate => "best-strike-rate",
            ReportKind::MostWickets => "most-wickets",
            ReportKind::BestEconomy => "best-economy",
            ReportKind::PlayerOfMatch => "player-of-match",
            ReportKind::TeamTotalRuns => "team-total-runs",
            ReportKind::MostSuccessfulTeams => "most-successful-teams",
            ReportKind::TeamWinPercentage => "team-win-percentage",
            ReportKind::TossWinRate => "toss-win-rate",
            ReportKind::TossDecision => "toss-decision",
            ReportKind::TossOutcome => "toss-outcome",
            ReportKind::AvgRunsPerBall => "avg-runs-per-ball",
            ReportKind::WicketsByTeam => "wickets-by-team",
            ReportKind::WinningTeamAvgRuns => "winning-team-avg-runs",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::MatchesPerSeason => "Matches per Season",
            ReportKind::AvgFirstInnings => "Average First Innings Score by Season",
            ReportKind::MatchResultType => "Match Result Types",
            ReportKind::TopRunScorers => "Top Run Scorers",
            ReportKind::BestStrikeRate => "Best Strike Rate",
            ReportKind::MostWickets => "Most Wickets",
            ReportKind::BestEconomy => "Best Economy Rate",
            ReportKind::PlayerOfMatch => "Most Player of the Match Awards",
            ReportKind::TeamTotalRuns => "Team Total Runs",
            ReportKind::MostSuccessfulTeams => "Most Successful Teams",
            ReportKind::TeamWinPercentage => "Team Win Percentage",
            ReportKind::TossWinRate => "Toss Winner Match Win Rate",
            ReportKind::TossDecision => "Toss Decisions",
            ReportKind::TossOutcome => "Toss Outcome",
            ReportKind::AvgRunsPerBall => "Average Runs per Ball by Team",
            ReportKind::WicketsByTeam => "Wickets by Bowling Team",
            ReportKind::WinningTeamAvgRuns => "Average Runs per Ball by Winning Teams",
        }
    }

    /// Table columns, in display order.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            ReportKind::MatchesPerSeason => &["season", "matches"],
            ReportKind::AvgFirstInnings => &["season", "matches", "average"],
            ReportKind::MatchResultType => &["result", "matches"],
            ReportKind::TopRunScorers => &["rank", "batter", "runs"],
            ReportKind::BestStrikeRate => &["rank", "batter", "runs", "balls", "strike_rate"],
            ReportKind::MostWickets => &["rank", "bowler", "wickets"],
            ReportKind::BestEconomy => &["rank", "bowler", "runs_conceded", "balls", "economy"],
            ReportKind::PlayerOfMatch => &["rank", "player", "awards"],
            ReportKind::TeamTotalRuns => &["rank", "team", "runs"],
            ReportKind::MostSuccessfulTeams => &["rank", "team", "wins"],
            ReportKind::TeamWinPercentage => &["rank", "team", "wins", "matches", "win_percentage"],
            ReportKind::TossWinRate => &["outcome", "matches", "percentage"],
            ReportKind::TossDecision => &["decision", "matches"],
            ReportKind::TossOutcome => &["outcome", "matches"],
            ReportKind::AvgRunsPerBall | ReportKind::WinningTeamAvgRuns => {
                &["rank", "team", "balls", "average"]
            }
            ReportKind::WicketsByTeam => &["rank", "team", "wickets"],
        }
    }

    pub fn chart(&self) -> ChartSpec {
        use ChartKind::{Bar, Line, Pie};

        let (kind, x, y) = match self {
            ReportKind::MatchesPerSeason => (Bar, ("season", "Season"), ("matches", "Matches")),
            ReportKind::AvgFirstInnings => (
                Line,
                ("season", "Season"),
                ("average", "Average runs"),
            ),
            ReportKind::MatchResultType => (Bar, ("result", "Result"), ("matches", "Matches")),
            ReportKind::TopRunScorers => (Bar, ("batter", "Batter"), ("runs", "Runs")),
            ReportKind::BestStrikeRate => (
                Bar,
                ("batter", "Batter"),
                ("strike_rate", "Strike rate"),
            ),
            ReportKind::MostWickets => (Bar, ("bowler", "Bowler"), ("wickets", "Wickets")),
            ReportKind::BestEconomy => (Bar, ("bowler", "Bowler"), ("economy", "Economy rate")),
            ReportKind::PlayerOfMatch => (Bar, ("player", "Player"), ("awards", "Awards")),
            ReportKind::TeamTotalRuns => (Bar, ("team", "Team"), ("runs", "Runs")),
            ReportKind::MostSuccessfulTeams => (Bar, ("team", "Team"), ("wins", "Wins")),
            ReportKind::TeamWinPercentage => (Bar, ("team", "Team"), ("win_percentage", "Win %")),
            ReportKind::TossWinRate => (Pie, ("outcome", "Outcome"), ("matches", "Matches")),
            ReportKind::TossDecision => (Bar, ("decision", "Decision"), ("matches", "Matches")),
            ReportKind::TossOutcome => (Pie, ("outcome", "Outcome"), ("matches", "Matches")),
            ReportKind::AvgRunsPerBall => (Bar, ("team", "Team"), ("average", "Runs per ball")),
            ReportKind::WicketsByTeam => (Bar, ("team", "Team"), ("wickets", "Wickets")),
            ReportKind::WinningTeamAvgRuns => (Bar, ("team", "Team"), ("average", "Runs per ball")),
        };
        ChartSpec::new(kind, self.title(), Axis::new(x.0, x.1), Axis::new(y.0, y.1))
    }

    pub fn from_slug(slug: &str) -> Option<ReportKind> {
        let slug = slug.trim();
        ReportKind::ALL.into_iter().find(|k| k.slug() == slug)
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}
