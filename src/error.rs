//! Error types for prefix parsing, source fetching and configuration.

use std::path::PathBuf;
use thiserror::Error;

/// A token could not be turned into a [`crate::models::Prefix`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrefixError {
    #[error("Invalid prefix '{token}': {reason}")]
    InvalidPrefix { token: String, reason: String },
}

impl PrefixError {
    pub(crate) fn invalid(token: &str, reason: impl Into<String>) -> Self {
        PrefixError::InvalidPrefix {
            token: token.to_string(),
            reason: reason.into(),
        }
    }

    /// The offending input token.
    pub fn token(&self) -> &str {
        match self {
            PrefixError::InvalidPrefix { token, .. } => token,
        }
    }
}

/// Remote text could not be obtained.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Source unavailable {url}: {reason}")]
    SourceUnavailable { url: String, reason: String },

    #[error("Cache IO error {path}: {source}")]
    Cache {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    pub(crate) fn unavailable(url: &str, reason: impl ToString) -> Self {
        FetchError::SourceUnavailable {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// The configuration file is missing, malformed or inconsistent.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Error reading config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing config at '{path}': {message}")]
    Parse { path: String, message: String },

    #[error("Invalid config: {0}")]
    Invalid(String),
}
