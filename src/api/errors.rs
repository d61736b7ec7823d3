//! API error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Server reported failure for {0}")]
    Rejected(String),

    #[error("Server returned status {status_code} for {endpoint}")]
    Status { status_code: u16, endpoint: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported spreadsheet file: {0}")]
    UnsupportedFile(String),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("'{0}' cannot be used as a URL path segment")]
    UnaddressableSegment(String),
}

impl ApiError {
    /// True when the server answered `success: false`, as opposed to a
    /// transport or local failure
    pub fn is_rejection(&self) -> bool {
        matches!(self, ApiError::Rejected(_))
    }
}
