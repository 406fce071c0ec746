use thiserror::Error;

/// Terminal failures for a single match analysis. None of these are
/// retryable: the inputs are deterministic, so the caller must either
/// supply cleaned data or skip the pairing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValuationError {
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error("degenerate model: {0}")]
    DegenerateModel(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("opponent {opponent:?} is missing from the classification table")]
    ConfigurationGap { opponent: String },
}

pub type Result<T> = std::result::Result<T, ValuationError>;
