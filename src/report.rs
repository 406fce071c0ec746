use std::fmt::Write as _;

use serde::Serialize;

use crate::outcome_model::{FairOdds, Outcome};
use crate::valuation::{MarketOdds, Valuation};

/// A bet worth taking: the model's option value exceeds the market price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub outcome: Outcome,
    pub odds: f64,
    pub value: f64,
    pub stake_pct: f64,
    pub edge_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: String,
    pub home_team: String,
    pub away_team: String,
    pub predicted_score: String,
    pub fair_odds: FairOdds,
    pub market_odds: MarketOdds,
    pub valuation: Valuation,
    pub recommendations: Vec<Recommendation>,
}

pub fn build_report(
    home_team: &str,
    away_team: &str,
    predicted_score: String,
    fair_odds: FairOdds,
    market_odds: MarketOdds,
    valuation: Valuation,
) -> Report {
    let mut recommendations = Vec::new();
    for outcome in Outcome::ALL {
        let odds = market_odds.get(outcome);
        let value = valuation.get(outcome) - odds;
        // Strictly positive: a market priced exactly at fair value is no bet.
        if value > 0.0 {
            let edge_pct = value / odds * 100.0;
            recommendations.push(Recommendation {
                outcome,
                odds,
                value,
                stake_pct: edge_pct,
                edge_pct,
            });
        }
    }

    Report {
        generated_at: chrono::Utc::now().to_rfc3339(),
        home_team: home_team.to_string(),
        away_team: away_team.to_string(),
        predicted_score,
        fair_odds,
        market_odds,
        valuation,
        recommendations,
    }
}

/// Plain-text rendering of the analysis, one screenful.
pub fn render_report(report: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "=== {} vs {} ===",
        report.home_team, report.away_team
    );
    let _ = writeln!(out, "\nPredicted Score: {}", report.predicted_score);

    let _ = writeln!(out, "\nFair Odds vs Market Odds:");
    let _ = writeln!(
        out,
        "{:<8} {:>10} {:>10} {:>10} {:>10}",
        "Outcome", "Market", "Model Fair", "Value", "Edge"
    );
    for outcome in Outcome::ALL {
        let market = report.market_odds.get(outcome);
        let fair = fair_of(&report.fair_odds, outcome);
        let value = report.valuation.get(outcome) - market;
        let edge = value / market * 100.0;
        let _ = writeln!(
            out,
            "{:<8} {:>10.2} {:>10.2} {:>+10.2} {:>9.1}%",
            title(outcome),
            market,
            fair,
            value,
            edge
        );
    }

    if report.recommendations.is_empty() {
        let _ = writeln!(out, "\nNo value bets identified at current odds");
    } else {
        let _ = writeln!(out, "\nRecommended Bets:");
        for rec in &report.recommendations {
            let _ = writeln!(
                out,
                "- {:<6} @ {:.2} (Value: +{:.2}, Edge: {:.1}%, Stake: {:.1}%)",
                title(rec.outcome),
                rec.odds,
                rec.value,
                rec.edge_pct,
                rec.stake_pct
            );
        }
    }

    let _ = writeln!(
        out,
        "\nTime Factors - Home: {:.2}, Away: {:.2}, Draw: {:.2}",
        report.valuation.t_home, report.valuation.t_away, report.valuation.t_draw
    );
    out
}

fn title(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Home => "Home",
        Outcome::Draw => "Draw",
        Outcome::Away => "Away",
    }
}

fn fair_of(fair: &FairOdds, outcome: Outcome) -> f64 {
    match outcome {
        Outcome::Home => fair.home,
        Outcome::Draw => fair.draw,
        Outcome::Away => fair.away,
    }
}
