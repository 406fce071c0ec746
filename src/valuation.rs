use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::{Result, ValuationError};
use crate::outcome_model::{FairOdds, Outcome};
use crate::team_metrics::TeamMetrics;

/// Base discount rate split across outcomes by probability mass.
pub const BASE_DISCOUNT_RATE: f64 = 0.05;

/// Rest-day scale of the sigmoid time mapping.
const REST_SCALE_DAYS: f64 = 7.0;

static STD_NORMAL: Lazy<Normal> = Lazy::new(|| Normal::new(0.0, 1.0).unwrap());

/// Bookmaker decimal odds for the three outcomes, caller-supplied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketOdds {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

impl MarketOdds {
    pub fn get(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Home => self.home,
            Outcome::Draw => self.draw,
            Outcome::Away => self.away,
        }
    }
}

/// Option-style fair value per outcome plus the time factors that went
/// into the pricing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Valuation {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
    pub t_home: f64,
    pub t_draw: f64,
    pub t_away: f64,
}

impl Valuation {
    pub fn get(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Home => self.home,
            Outcome::Draw => self.draw,
            Outcome::Away => self.away,
        }
    }
}

/// Prices each outcome as a call option: underlying = market odds,
/// strike = fair odds, volatility = the relevant team's goal-scoring
/// standard deviation, time = squashed rest days, rate = the outcome's
/// share of the base discount rate.
pub fn value_outcomes(
    market: MarketOdds,
    fair: &FairOdds,
    home: &TeamMetrics,
    away: &TeamMetrics,
) -> Result<Valuation> {
    for outcome in Outcome::ALL {
        let odds = market.get(outcome);
        if !odds.is_finite() || odds <= 0.0 {
            return Err(ValuationError::InvalidInput(format!(
                "market odds for {} must be positive, got {odds}",
                outcome.label()
            )));
        }
    }

    let t_home = rest_to_time(home.rest_days);
    let t_away = rest_to_time(away.rest_days);
    let t_draw = (t_home + t_away) / 2.0;

    // The away rate is whatever remains of the base rate after the
    // home/draw split. With the split normalized over home+draw mass it
    // sits at zero up to rounding; it is deliberately not clamped.
    let mass = fair.p_home + fair.p_draw;
    let r_home = BASE_DISCOUNT_RATE * fair.p_home / mass;
    let r_draw = BASE_DISCOUNT_RATE * fair.p_draw / mass;
    let r_away = BASE_DISCOUNT_RATE - r_home - r_draw;

    let sigma_draw = (home.volatility + away.volatility) / 2.0;
    let legs = [
        (Outcome::Home, fair.home, home.volatility, t_home, r_home),
        (Outcome::Draw, fair.draw, sigma_draw, t_draw, r_draw),
        (Outcome::Away, fair.away, away.volatility, t_away, r_away),
    ];

    let mut values = [0.0_f64; 3];
    for (idx, (outcome, strike, sigma, t, r)) in legs.into_iter().enumerate() {
        if sigma <= 0.0 {
            return Err(ValuationError::InvalidInput(format!(
                "{} volatility {sigma} leaves the pricing undefined",
                outcome.label()
            )));
        }
        if t <= 0.0 {
            return Err(ValuationError::InvalidInput(format!(
                "{} time factor {t} leaves the pricing undefined",
                outcome.label()
            )));
        }
        values[idx] = bs_call(market.get(outcome), strike, sigma, t, r);
    }

    Ok(Valuation {
        home: values[0],
        draw: values[1],
        away: values[2],
        t_home,
        t_draw,
        t_away,
    })
}

/// Squashes rest days into a dimensionless time in (0, 1).
pub fn rest_to_time(days: f64) -> f64 {
    1.0 / (1.0 + (-days / REST_SCALE_DAYS).exp())
}

fn bs_call(spot: f64, strike: f64, sigma: f64, t: f64, r: f64) -> f64 {
    let vol_sqrt_t = sigma * t.sqrt();
    let d1 = ((spot / strike).ln() + (r + sigma * sigma / 2.0) * t) / vol_sqrt_t;
    let d2 = d1 - vol_sqrt_t;
    spot * STD_NORMAL.cdf(d1) - strike * (-r * t).exp() * STD_NORMAL.cdf(d2)
}
