pub mod analysis;
pub mod classification;
pub mod error;
pub mod match_record;
pub mod outcome_model;
pub mod report;
pub mod team_metrics;
pub mod valuation;
