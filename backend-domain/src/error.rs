use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ScoringError {
    #[error("dataset has no rows")]
    EmptyDataset,
    #[error("missing required column '{0}'")]
    MissingColumn(String),
    #[error("row {row}: missing account")]
    MissingAccount { row: usize },
    #[error("row {row}: cannot parse date '{value}'")]
    InvalidDate { row: usize, value: String },
    #[error("row {row}: balance difference '{value}' is not a number")]
    InvalidBalance { row: usize, value: String },
    #[error("model fit failed: {0}")]
    ModelFit(String),
}

impl ScoringError {
    /// Input errors are the caller's fault; model errors are not.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, ScoringError::ModelFit(_))
    }
}
