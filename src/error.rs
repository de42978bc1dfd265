use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("invalid note: {0}")]
    Validation(String),
    #[error("GitLab API error: {0}")]
    IssueTracker(String),
    #[error("could not reach GitLab: {0}")]
    Transport(String),
    #[error("browser error: {0}")]
    Browser(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
