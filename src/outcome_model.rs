use serde::Serialize;

use crate::error::{Result, ValuationError};
use crate::team_metrics::TeamMetrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Home,
    Draw,
    Away,
}

impl Outcome {
    pub const ALL: [Outcome; 3] = [Outcome::Home, Outcome::Draw, Outcome::Away];

    pub fn label(self) -> &'static str {
        match self {
            Outcome::Home => "home",
            Outcome::Draw => "draw",
            Outcome::Away => "away",
        }
    }
}

/// Model probabilities for the three outcomes plus their reciprocal
/// decimal odds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FairOdds {
    pub p_home: f64,
    pub p_draw: f64,
    pub p_away: f64,
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

// The goal range always covers at least the classic 0..=9 sum; beyond that
// it extends until the truncated tail is below TAIL_EPS for both teams.
const MIN_MAX_GOALS: usize = 9;
const HARD_MAX_GOALS: usize = 40;
const TAIL_EPS: f64 = 1e-9;

/// Win/draw/loss probabilities from the two class-weighted scoring rates,
/// each treated as the mean of an independent Poisson goal count.
pub fn fair_odds(home: &TeamMetrics, away: &TeamMetrics) -> Result<FairOdds> {
    let lambda_home = home.weighted_avg_scored;
    let lambda_away = away.weighted_avg_scored;
    for (team, lambda) in [(&home.team, lambda_home), (&away.team, lambda_away)] {
        if !lambda.is_finite() || lambda < 0.0 {
            return Err(ValuationError::InvalidInput(format!(
                "{team}: weighted scoring rate {lambda} is not a valid Poisson mean"
            )));
        }
    }

    let max_goals = summation_bound(lambda_home, lambda_away);
    let pmf_home = poisson_pmf_vec(lambda_home, max_goals);
    let pmf_away = poisson_pmf_vec(lambda_away, max_goals);

    let mut p_home = 0.0_f64;
    let mut p_draw = 0.0_f64;
    let mut away_below = 0.0_f64; // P(away scores fewer than i)
    for i in 0..=max_goals {
        p_home += pmf_home[i] * away_below;
        p_draw += pmf_home[i] * pmf_away[i];
        away_below += pmf_away[i];
    }
    let p_away = 1.0 - p_home - p_draw;

    for (outcome, p) in [
        (Outcome::Home, p_home),
        (Outcome::Draw, p_draw),
        (Outcome::Away, p_away),
    ] {
        if !(p > 0.0) {
            return Err(ValuationError::DegenerateModel(format!(
                "P({}) = {p}; fair odds undefined",
                outcome.label()
            )));
        }
    }

    Ok(FairOdds {
        p_home,
        p_draw,
        p_away,
        home: 1.0 / p_home,
        draw: 1.0 / p_draw,
        away: 1.0 / p_away,
    })
}

/// Most likely-median scoreline `"H-A"` from the two weighted rates.
pub fn predicted_score(home: &TeamMetrics, away: &TeamMetrics) -> String {
    let h = poisson_median(home.weighted_avg_scored);
    let a = poisson_median(away.weighted_avg_scored);
    format!("{h}-{a}")
}

fn summation_bound(lambda_home: f64, lambda_away: f64) -> usize {
    let mut bound = MIN_MAX_GOALS;
    while bound < HARD_MAX_GOALS
        && (poisson_tail(lambda_home, bound) > TAIL_EPS
            || poisson_tail(lambda_away, bound) > TAIL_EPS)
    {
        bound += 1;
    }
    bound
}

fn poisson_tail(lambda: f64, max_k: usize) -> f64 {
    1.0 - poisson_pmf_vec(lambda, max_k).iter().sum::<f64>()
}

fn poisson_pmf_vec(lambda: f64, max_k: usize) -> Vec<f64> {
    let lambda = lambda.max(0.0);
    let mut out = vec![0.0; max_k + 1];
    out[0] = (-lambda).exp();
    for k in 1..=max_k {
        out[k] = out[k - 1] * lambda / k as f64;
    }
    out
}

/// Smallest k with CDF(k) >= 0.5.
fn poisson_median(lambda: f64) -> usize {
    let lambda = lambda.max(0.0);
    let mut pmf = (-lambda).exp();
    let mut cdf = pmf;
    let mut k = 0usize;
    while cdf < 0.5 && k < HARD_MAX_GOALS {
        k += 1;
        pmf *= lambda / k as f64;
        cdf += pmf;
    }
    k
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(team: &str, weighted_avg_scored: f64) -> TeamMetrics {
        TeamMetrics {
            team: team.to_string(),
            matches_used: 10,
            avg_goals_scored: weighted_avg_scored,
            avg_goals_conceded: 1.0,
            volatility: 0.8,
            weighted_avg_scored,
            weighted_avg_conceded: 1.0,
            rest_days: 7.0,
            classes_faced: vec![1, 2, 3],
        }
    }

    #[test]
    fn probabilities_form_a_simplex() {
        let fair = fair_odds(&metrics("H", 1.6), &metrics("A", 1.1)).unwrap();
        let sum = fair.p_home + fair.p_draw + fair.p_away;
        assert!((sum - 1.0).abs() < 1e-9);
        for p in [fair.p_home, fair.p_draw, fair.p_away] {
            assert!(p > 0.0 && p < 1.0);
        }
    }

    #[test]
    fn odds_are_exact_probability_reciprocals() {
        let fair = fair_odds(&metrics("H", 2.0), &metrics("A", 0.9)).unwrap();
        assert!((fair.home * fair.p_home - 1.0).abs() < 1e-12);
        assert!((fair.draw * fair.p_draw - 1.0).abs() < 1e-12);
        assert!((fair.away * fair.p_away - 1.0).abs() < 1e-12);
    }

    #[test]
    fn stronger_home_side_is_favored() {
        let home = metrics("Real Madrid", 2.0);
        let away = metrics("Alavés", 0.5);
        let fair = fair_odds(&home, &away).unwrap();
        assert!(fair.p_home > fair.p_away);

        let score = predicted_score(&home, &away);
        let (h, a) = score.split_once('-').unwrap();
        assert!(h.parse::<u32>().unwrap() > a.parse::<u32>().unwrap());
    }

    #[test]
    fn symmetric_input_gives_symmetric_odds() {
        let fair = fair_odds(&metrics("H", 1.3), &metrics("A", 1.3)).unwrap();
        assert!((fair.p_home - fair.p_away).abs() < 1e-9);
        assert!((fair.home - fair.away).abs() < 1e-6);
    }

    #[test]
    fn zero_scoring_rate_is_degenerate_not_infinite() {
        let err = fair_odds(&metrics("H", 0.0), &metrics("A", 1.2)).unwrap_err();
        assert!(matches!(err, ValuationError::DegenerateModel(_)));

        let err = fair_odds(&metrics("H", 1.2), &metrics("A", 0.0)).unwrap_err();
        assert!(matches!(err, ValuationError::DegenerateModel(_)));
    }

    #[test]
    fn high_scoring_rates_extend_the_goal_range() {
        // With the fixed 0..=9 sum a λ of 6.0 leaves visible tail mass;
        // the adaptive bound keeps the simplex tight instead.
        let fair = fair_odds(&metrics("H", 6.0), &metrics("A", 5.0)).unwrap();
        let sum = fair.p_home + fair.p_draw + fair.p_away;
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(summation_bound(6.0, 5.0) > MIN_MAX_GOALS);
    }

    #[test]
    fn poisson_median_matches_known_values() {
        assert_eq!(poisson_median(0.0), 0);
        assert_eq!(poisson_median(0.5), 0);
        assert_eq!(poisson_median(2.0), 2);
        assert_eq!(poisson_median(4.0), 4);
    }
}
