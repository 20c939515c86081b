use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write report output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Nothing to plot: {0}")]
    NothingToPlot(String),

    #[error("Chart inputs do not line up: {0}")]
    Mismatch(String),
}
