use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{Result, ValuationError};

/// One row of the per-team table supplied by the ingestion collaborator,
/// exactly as it arrives: `result` is still a `"<int>-<int>"` string and
/// the possession columns are percentage strings like `"57%"`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMatchRow {
    pub date: String,
    pub opponent: String,
    pub result: String,
    pub is_home: bool,
    #[serde(default)]
    pub ball_possession: Option<String>,
    #[serde(default)]
    pub passes_pct: Option<String>,
}

/// A validated match record. Immutable once built; malformed rows are
/// rejected here rather than defaulted mid-computation.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    pub date: NaiveDate,
    pub opponent: String,
    pub goals_scored: u32,
    pub goals_conceded: u32,
    pub is_home: bool,
    /// Fraction in [0, 1]; `ball_possession` preferred, `passes_pct` as
    /// a fallback when possession is missing.
    pub possession: Option<f64>,
}

impl MatchRecord {
    pub fn from_raw(row: &RawMatchRow) -> Result<Self> {
        let date = NaiveDate::parse_from_str(row.date.trim(), "%Y-%m-%d").map_err(|_| {
            ValuationError::InsufficientData(format!("unparseable date {:?}", row.date))
        })?;
        let opponent = row.opponent.trim();
        if opponent.is_empty() {
            return Err(ValuationError::InsufficientData(
                "empty opponent name".to_string(),
            ));
        }
        let (goals_scored, goals_conceded) = parse_result(&row.result)?;

        let possession = match (&row.ball_possession, &row.passes_pct) {
            (Some(raw), _) => Some(parse_percent(raw)?),
            (None, Some(raw)) => Some(parse_percent(raw)?),
            (None, None) => None,
        };

        Ok(Self {
            date,
            opponent: opponent.to_string(),
            goals_scored,
            goals_conceded,
            is_home: row.is_home,
            possession,
        })
    }
}

pub fn parse_rows(rows: &[RawMatchRow]) -> Result<Vec<MatchRecord>> {
    rows.iter().map(MatchRecord::from_raw).collect()
}

/// Splits a `"2-1"` style result string, own goals first.
pub fn parse_result(raw: &str) -> Result<(u32, u32)> {
    let bad = || ValuationError::InsufficientData(format!("unparseable result {raw:?}"));
    let (left, right) = raw.trim().split_once('-').ok_or_else(bad)?;
    let scored = left.trim().parse::<u32>().map_err(|_| bad())?;
    let conceded = right.trim().parse::<u32>().map_err(|_| bad())?;
    Ok((scored, conceded))
}

/// Converts `"57%"` (or a bare `"57"`) into the fraction 0.57.
pub fn parse_percent(raw: &str) -> Result<f64> {
    let s = raw.trim().trim_end_matches('%').replace(',', "");
    let pct = s.parse::<f64>().map_err(|_| {
        ValuationError::InsufficientData(format!("unparseable percentage {raw:?}"))
    })?;
    if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
        return Err(ValuationError::InsufficientData(format!(
            "percentage {raw:?} outside 0..=100"
        )));
    }
    Ok(pct / 100.0)
}
