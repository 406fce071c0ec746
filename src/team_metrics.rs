use serde::Serialize;

use crate::classification::{ClassTable, NEUTRAL_WEIGHT, UnknownOpponentPolicy};
use crate::error::{Result, ValuationError};
use crate::match_record::MatchRecord;

const DEFAULT_REST_DAYS: f64 = 7.0;

/// Immutable per-team snapshot over the supplied match sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamMetrics {
    pub team: String,
    pub matches_used: usize,
    pub avg_goals_scored: f64,
    pub avg_goals_conceded: f64,
    /// Sample standard deviation of goals scored.
    pub volatility: f64,
    pub weighted_avg_scored: f64,
    pub weighted_avg_conceded: f64,
    /// Gap in days between the two most recent matches.
    pub rest_days: f64,
    /// Distinct opponent classes seen, ascending. Unclassified opponents are
    /// not represented here.
    pub classes_faced: Vec<u8>,
}

pub fn compute_team_metrics(
    team: &str,
    records: &[MatchRecord],
    table: &ClassTable,
    policy: UnknownOpponentPolicy,
) -> Result<TeamMetrics> {
    if records.len() < 2 {
        return Err(ValuationError::InsufficientData(format!(
            "{team}: need at least 2 matches, got {}",
            records.len()
        )));
    }

    let mut ordered: Vec<&MatchRecord> = records.iter().collect();
    ordered.sort_by(|a, b| a.date.cmp(&b.date));

    let n = ordered.len() as f64;
    let mut scored_sum = 0.0;
    let mut conceded_sum = 0.0;
    let mut weighted_scored_sum = 0.0;
    let mut weighted_conceded_sum = 0.0;
    let mut classes_faced: Vec<u8> = Vec::new();

    for rec in &ordered {
        let scored = rec.goals_scored as f64;
        let conceded = rec.goals_conceded as f64;
        scored_sum += scored;
        conceded_sum += conceded;

        let weight = match table.weight_of(&rec.opponent, policy)? {
            Some((class, weight)) => {
                if !classes_faced.contains(&class) {
                    classes_faced.push(class);
                }
                weight
            }
            None => NEUTRAL_WEIGHT,
        };
        weighted_scored_sum += scored * weight;
        weighted_conceded_sum += conceded * weight;
    }
    classes_faced.sort_unstable();

    let avg_goals_scored = scored_sum / n;
    let mut variance_sum = 0.0;
    for rec in &ordered {
        variance_sum += (rec.goals_scored as f64 - avg_goals_scored).powi(2);
    }
    let volatility = (variance_sum / (n - 1.0)).sqrt();

    let last = ordered[ordered.len() - 1];
    let prev = ordered[ordered.len() - 2];
    let gap = (last.date - prev.date).num_days();
    let rest_days = if gap > 0 {
        gap as f64
    } else {
        DEFAULT_REST_DAYS
    };

    Ok(TeamMetrics {
        team: team.to_string(),
        matches_used: ordered.len(),
        avg_goals_scored,
        avg_goals_conceded: conceded_sum / n,
        volatility,
        weighted_avg_scored: weighted_scored_sum / n,
        weighted_avg_conceded: weighted_conceded_sum / n,
        rest_days,
        classes_faced,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(date: &str, opponent: &str, scored: u32, conceded: u32) -> MatchRecord {
        MatchRecord {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            opponent: opponent.to_string(),
            goals_scored: scored,
            goals_conceded: conceded,
            is_home: true,
            possession: None,
        }
    }

    fn sample() -> Vec<MatchRecord> {
        vec![
            rec("2021-09-01", "Real Madrid", 1, 2),
            rec("2021-09-08", "Sevilla", 2, 0),
            rec("2021-09-15", "Valencia", 3, 1),
            rec("2021-09-20", "Getafe", 2, 2),
        ]
    }

    #[test]
    fn means_and_volatility_match_hand_computation() {
        let m = compute_team_metrics(
            "Test FC",
            &sample(),
            &ClassTable::la_liga_2021(),
            UnknownOpponentPolicy::NeutralWeight,
        )
        .unwrap();

        assert_eq!(m.matches_used, 4);
        assert!((m.avg_goals_scored - 2.0).abs() < 1e-12);
        assert!((m.avg_goals_conceded - 1.25).abs() < 1e-12);
        // Sample stddev of [1, 2, 3, 2] = sqrt(2/3).
        assert!((m.volatility - (2.0f64 / 3.0).sqrt()).abs() < 1e-12);
        // Weighted: 1*2.0 + 2*1.5 + 3*1.2 + 2*0.8 = 10.2 over 4 matches.
        assert!((m.weighted_avg_scored - 2.55).abs() < 1e-12);
        assert_eq!(m.classes_faced, vec![1, 2, 3, 4]);
        assert!((m.rest_days - 5.0).abs() < 1e-12);
    }

    #[test]
    fn unknown_opponent_gets_neutral_weight_and_no_class() {
        let records = vec![
            rec("2021-09-01", "Borussia Dortmund", 2, 0),
            rec("2021-09-08", "Sevilla", 1, 1),
        ];
        let m = compute_team_metrics(
            "Test FC",
            &records,
            &ClassTable::la_liga_2021(),
            UnknownOpponentPolicy::NeutralWeight,
        )
        .unwrap();
        // 2*1.0 + 1*1.5 over 2 matches.
        assert!((m.weighted_avg_scored - 1.75).abs() < 1e-12);
        assert_eq!(m.classes_faced, vec![2]);
    }

    #[test]
    fn reject_policy_surfaces_configuration_gap() {
        let records = vec![
            rec("2021-09-01", "Borussia Dortmund", 2, 0),
            rec("2021-09-08", "Sevilla", 1, 1),
        ];
        let err = compute_team_metrics(
            "Test FC",
            &records,
            &ClassTable::la_liga_2021(),
            UnknownOpponentPolicy::Reject,
        )
        .unwrap_err();
        assert!(matches!(err, ValuationError::ConfigurationGap { .. }));
    }

    #[test]
    fn fewer_than_two_matches_is_insufficient() {
        let records = vec![rec("2021-09-01", "Sevilla", 1, 0)];
        let err = compute_team_metrics(
            "Test FC",
            &records,
            &ClassTable::la_liga_2021(),
            UnknownOpponentPolicy::NeutralWeight,
        )
        .unwrap_err();
        assert!(matches!(err, ValuationError::InsufficientData(_)));
    }

    #[test]
    fn identical_input_yields_identical_metrics() {
        let table = ClassTable::la_liga_2021();
        let a = compute_team_metrics(
            "Test FC",
            &sample(),
            &table,
            UnknownOpponentPolicy::NeutralWeight,
        )
        .unwrap();
        let b = compute_team_metrics(
            "Test FC",
            &sample(),
            &table,
            UnknownOpponentPolicy::NeutralWeight,
        )
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn same_day_rematch_falls_back_to_default_rest() {
        let records = vec![
            rec("2021-09-01", "Sevilla", 1, 0),
            rec("2021-09-01", "Getafe", 0, 0),
        ];
        let m = compute_team_metrics(
            "Test FC",
            &records,
            &ClassTable::la_liga_2021(),
            UnknownOpponentPolicy::NeutralWeight,
        )
        .unwrap();
        assert!((m.rest_days - 7.0).abs() < 1e-12);
    }
}
