use analytics::AnalyticsError;
use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RiskError {
    #[error("Weighting parameters are invalid: {0}")]
    InvalidParameters(String),

    #[error("Returns and weights are not aligned: {0}")]
    ShapeMismatch(String),

    #[error("A calculation error occurred: {0}")]
    Calculation(#[from] AnalyticsError),

    #[error("Invalid table: {0}")]
    Table(#[from] CoreError),
}
