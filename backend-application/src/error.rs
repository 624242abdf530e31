use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("not found")]
    NotFound,
    #[error("Processing failed: {0:#}")]
    Processing(anyhow::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
