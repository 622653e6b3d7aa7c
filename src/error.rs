//! Error type shared by the controllers and their hosts.
//!
//! Host failures never escape a lifecycle operation: the controllers log them
//! with their [`Error::code`] and fall back to the safe default (light mode,
//! native navigation). Only parsing APIs hand an `Error` back to the caller.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("preference storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("media query unavailable: {0}")]
    MediaQueryUnavailable(String),
    #[error("dom operation failed: {0}")]
    Dom(String),
    #[error("element not found: {0}")]
    MissingElement(String),
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },
    #[error("invalid mode: {0:?}")]
    InvalidMode(String),
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    /// Stable machine-readable code, used as the prefix of log lines.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::StorageUnavailable(_) => "E_STORAGE",
            Self::MediaQueryUnavailable(_) => "E_MEDIA_QUERY",
            Self::Dom(_) => "E_DOM",
            Self::MissingElement(_) => "E_MISSING_ELEMENT",
            Self::Navigation { .. } => "E_NAVIGATION",
            Self::InvalidMode(_) => "E_INVALID_MODE",
            Self::Config(_) => "E_CONFIG",
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
