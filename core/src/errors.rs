use thiserror::Error;

/// Errors raised by the generation pipeline's internal plumbing.
///
/// None of these ever reach an end user verbatim; consumers collapse every
/// failure into pre-written in-character fallback content. These exist for
/// developer diagnostics only.
#[derive(Error, Debug)]
pub enum SousChefError {
    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error("Request Error: {0}")]
    RequestError(String),

    #[error("Response Error: {0}")]
    ResponseError(String),

    #[error("HTTP Error: {status_code} - {message}")]
    HttpError { status_code: u16, message: String },

    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),

    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),

    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

/// Result type for generation operations
pub type SousChefResult<T> = Result<T, SousChefError>;
