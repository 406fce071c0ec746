use anyhow::{Context, Result};

use matchvalue::analysis::{AnalysisConfig, analyze_match};
use matchvalue::classification::ClassTable;
use matchvalue::match_record::RawMatchRow;
use matchvalue::report::render_report;
use matchvalue::valuation::MarketOdds;

fn main() -> Result<()> {
    let cfg = AnalysisConfig::new("Real Madrid", "Alavés", ClassTable::la_liga_2021());
    let market_odds = MarketOdds {
        home: 1.36,
        draw: 4.90,
        away: 9.50,
    };

    let report = analyze_match(&real_madrid_rows(), &alaves_rows(), market_odds, &cfg)
        .context("match analysis failed")?;

    if std::env::var("REPORT_JSON").is_ok_and(|v| v == "1") {
        let json = serde_json::to_string_pretty(&report).context("serialize report")?;
        println!("{json}");
    } else {
        print!("{}", render_report(&report));
    }
    Ok(())
}

fn row(date: &str, opponent: &str, result: &str, is_home: bool) -> RawMatchRow {
    RawMatchRow {
        date: date.to_string(),
        opponent: opponent.to_string(),
        result: result.to_string(),
        is_home,
        ball_possession: None,
        passes_pct: None,
    }
}

fn real_madrid_rows() -> Vec<RawMatchRow> {
    vec![
        row("2021-09-12", "Celta Vigo", "5-2", true),
        row("2021-09-19", "Valencia", "2-1", false),
        row("2021-09-22", "Mallorca", "6-1", true),
        row("2021-09-26", "Villarreal", "0-0", true),
        row("2021-10-03", "Espanyol", "1-2", false),
        row("2021-10-17", "Athletic Club", "1-0", false),
        row("2021-10-24", "Barcelona", "2-1", false),
        row("2021-10-27", "Osasuna", "0-0", true),
        row("2021-10-30", "Elche", "2-1", false),
        row("2021-11-06", "Rayo Vallecano", "2-1", true),
        row("2021-11-21", "Granada CF", "4-1", false),
        row("2021-11-28", "Sevilla", "2-1", true),
    ]
}

fn alaves_rows() -> Vec<RawMatchRow> {
    vec![
        row("2021-09-13", "Athletic Club", "0-1", true),
        row("2021-09-18", "Osasuna", "0-2", false),
        row("2021-09-21", "Mallorca", "0-2", false),
        row("2021-09-25", "Atletico Madrid", "1-0", true),
        row("2021-10-01", "Betis", "0-2", false),
        row("2021-10-16", "Valencia", "1-1", false),
        row("2021-10-23", "Elche", "1-0", true),
        row("2021-10-26", "Celta Vigo", "0-1", false),
        row("2021-10-31", "Espanyol", "0-1", false),
        row("2021-11-08", "Levante", "2-1", false),
        row("2021-11-20", "Villarreal", "0-2", true),
        row("2021-11-27", "Cadiz", "2-2", false),
    ]
}
