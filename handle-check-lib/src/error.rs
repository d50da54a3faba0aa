//! Error handling for handle scanning operations.
//!
//! This module defines a comprehensive error type that covers all the different
//! ways a scan can fail, from invalid configuration to output file issues.

use std::fmt;

/// Main error type for handle scanning operations.
///
/// Per-probe transport failures are deliberately NOT represented here.
/// They are absorbed into [`ProbeVerdict::Inconclusive`](crate::ProbeVerdict)
/// so a single bad response never aborts the enumeration. This enum covers
/// the failures that must stop the run.
#[derive(Debug, Clone)]
pub enum HandleCheckError {
    /// Invalid configuration (alphabet, length, platform entries, etc.)
    ConfigError {
        message: String,
    },

    /// Network-level errors outside the per-probe path (e.g. client construction)
    NetworkError {
        message: String,
        source: Option<String>,
    },

    /// Failure to create or write the output file.
    ///
    /// `written` is the number of handles successfully written before the
    /// failure, so callers can report partial progress instead of silently
    /// truncating.
    SinkError {
        path: String,
        message: String,
        written: usize,
    },

    /// File I/O errors when reading configuration files
    FileError {
        path: String,
        message: String,
    },

    /// Timeout errors when operations take too long
    Timeout {
        operation: String,
        duration: std::time::Duration,
    },

    /// Generic internal errors that don't fit other categories
    Internal {
        message: String,
    },
}

impl HandleCheckError {
    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new network error.
    pub fn network<M: Into<String>>(message: M) -> Self {
        Self::NetworkError {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new network error with source information.
    pub fn network_with_source<M: Into<String>, S: Into<String>>(message: M, source: S) -> Self {
        Self::NetworkError {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a new sink error with the count written before the failure.
    pub fn sink<P: Into<String>, M: Into<String>>(path: P, message: M, written: usize) -> Self {
        Self::SinkError {
            path: path.into(),
            message: message.into(),
            written,
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout<O: Into<String>>(operation: O, duration: std::time::Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl fmt::Display for HandleCheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::NetworkError { message, source } => {
                if let Some(source) = source {
                    write!(f, "Network error: {} (source: {})", message, source)
                } else {
                    write!(f, "Network error: {}", message)
                }
            }
            Self::SinkError {
                path,
                message,
                written,
            } => {
                write!(
                    f,
                    "Output error at '{}': {} ({} handles written before failure)",
                    path, message, written
                )
            }
            Self::FileError { path, message } => {
                write!(f, "File error at '{}': {}", path, message)
            }
            Self::Timeout {
                operation,
                duration,
            } => {
                write!(f, "Timeout after {:?} during: {}", duration, operation)
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for HandleCheckError {}

// Implement From conversions for common error types
impl From<reqwest::Error> for HandleCheckError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout("HTTP request", std::time::Duration::from_secs(30))
        } else if err.is_connect() {
            Self::network_with_source("Connection failed", err.to_string())
        } else {
            Self::network_with_source("HTTP request failed", err.to_string())
        }
    }
}

impl From<std::io::Error> for HandleCheckError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal {
            message: format!("I/O error: {}", err),
        }
    }
}
