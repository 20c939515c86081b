use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Not enough data to perform calculation: {0}")]
    NotEnoughData(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Error in calculation: {0}")]
    Calculation(#[from] CoreError),
}
