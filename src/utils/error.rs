//! Error handling for Marginal
//!
//! Only setup can fail: loading configuration, compiling prompt rules and
//! registering aliases. Queries made by the host never return errors.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Setup error
#[derive(Error, Debug, Clone)]
pub enum Error {
    // ==================== Registration Errors ====================

    #[error("Invalid prompt pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("No annotator registered for category: {category}")]
    UnknownCategory { category: String },

    // ==================== Configuration Errors ====================

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl Error {
    /// Whether this error came from user-supplied configuration text
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::InvalidPattern { .. })
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
