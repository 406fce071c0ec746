use crate::classification::{ClassTable, UnknownOpponentPolicy};
use crate::error::Result;
use crate::match_record::{RawMatchRow, parse_rows};
use crate::outcome_model::{fair_odds, predicted_score};
use crate::report::{Report, build_report};
use crate::team_metrics::{TeamMetrics, compute_team_metrics};
use crate::valuation::{MarketOdds, value_outcomes};

/// Everything one analysis run needs besides the two match tables and the
/// market odds triple.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub home_team: String,
    pub away_team: String,
    pub class_table: ClassTable,
    pub unknown_policy: UnknownOpponentPolicy,
}

impl AnalysisConfig {
    pub fn new(home_team: &str, away_team: &str, class_table: ClassTable) -> Self {
        Self {
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            class_table,
            unknown_policy: UnknownOpponentPolicy::default(),
        }
    }
}

/// One-shot batch analysis: raw rows in, report out. Every failure is typed
/// and terminal; there is no null-report fallback.
pub fn analyze_match(
    home_rows: &[RawMatchRow],
    away_rows: &[RawMatchRow],
    market_odds: MarketOdds,
    cfg: &AnalysisConfig,
) -> Result<Report> {
    // The two sides share no state, so run them side by side.
    let (home, away) = rayon::join(
        || team_metrics_from_rows(&cfg.home_team, home_rows, cfg),
        || team_metrics_from_rows(&cfg.away_team, away_rows, cfg),
    );
    analyze_metrics(&home?, &away?, market_odds)
}

/// The valuation pipeline on already-computed metrics.
pub fn analyze_metrics(
    home: &TeamMetrics,
    away: &TeamMetrics,
    market_odds: MarketOdds,
) -> Result<Report> {
    let fair = fair_odds(home, away)?;
    let valuation = value_outcomes(market_odds, &fair, home, away)?;
    Ok(build_report(
        &home.team,
        &away.team,
        predicted_score(home, away),
        fair,
        market_odds,
        valuation,
    ))
}

fn team_metrics_from_rows(
    team: &str,
    rows: &[RawMatchRow],
    cfg: &AnalysisConfig,
) -> Result<TeamMetrics> {
    let records = parse_rows(rows)?;
    compute_team_metrics(team, &records, &cfg.class_table, cfg.unknown_policy)
}
