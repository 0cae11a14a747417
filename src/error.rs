//! Application error types.
//!
//! Provides unified error handling with actionable context for debugging.

use thiserror::Error;

/// Application result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types with specific context for actionable debugging
#[derive(Debug, Error)]
pub enum Error {
    /// IO error with path context
    #[error("IO error at {path:?}: {source}")]
    Io {
        /// The underlying IO error.
        source: std::io::Error,
        /// File path where the error occurred, if known.
        path: Option<std::path::PathBuf>,
    },

    /// Network error (connection, timeout, DNS)
    #[error("Network error: {0}")]
    Transport(String),

    /// Non-200 answer from the KerkPoint API
    #[error("{message}")]
    Upstream {
        /// Human-readable error description, `API Error ({code}): {reason}`.
        message: String,
        /// HTTP status code of the response.
        status: u16,
        /// Actionable suggestion for resolving the error.
        hint: Option<&'static str>,
    },

    /// Configuration error with guidance
    #[error("Configuration error: {message}. {hint}")]
    Config {
        /// Description of the configuration problem.
        message: String,
        /// Actionable guidance for fixing the issue.
        hint: &'static str,
    },

    /// Malformed or empty payload
    #[error("Parse error in {file:?}: {message}")]
    Parse {
        /// File that failed to parse, if any (`None` for API bodies).
        file: Option<std::path::PathBuf>,
        /// Description of the parse failure.
        message: String,
    },

    /// A settings field was rejected during sanitisation
    #[error("Invalid setting '{field}': {message}")]
    InvalidSetting {
        /// Name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        message: String,
    },

    /// Privileged action attempted without the required rights or token
    #[error("Not authorized: {0}")]
    Unauthorized(String),

    /// QR encoder failure
    #[error("QR encoding failed: {0}")]
    Qr(String),

    /// Sermon feed failure
    #[error("Feed error: {0}")]
    Feed(String),

    /// Generic message error (escape hatch)
    #[error("{0}")]
    Msg(String),
}

impl Error {
    /// Create an IO error with path context
    pub fn io(source: std::io::Error, path: impl Into<Option<std::path::PathBuf>>) -> Self {
        Self::Io { source, path: path.into() }
    }

    /// Create an upstream error from a status code and reason phrase
    pub fn upstream(status: u16, reason: &str) -> Self {
        let hint = match status {
            401 => Some("Check the API bearer token in the plugin settings"),
            403 => Some("The API token may lack the required permissions"),
            404 => Some("Check the base API URL; the resource was not found"),
            429 => Some("Rate limited - wait a moment and try again"),
            500..=599 => Some("KerkPoint API server error - try again later"),
            _ => None,
        };
        Self::Upstream {
            message: format!("API Error ({status}): {reason}"),
            status,
            hint,
        }
    }

    /// Create a config error with actionable hint
    pub fn config(message: impl Into<String>, hint: &'static str) -> Self {
        Self::Config { message: message.into(), hint }
    }

    /// Create a parse error with file context
    pub fn parse(message: impl Into<String>, file: impl Into<Option<std::path::PathBuf>>) -> Self {
        Self::Parse { file: file.into(), message: message.into() }
    }

    /// Create a settings validation error
    pub fn invalid_setting(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidSetting { field, message: message.into() }
    }

    /// The text recorded in the fetch status log for this failure.
    ///
    /// Transport, upstream and parse failures store their bare message
    /// rather than the prefixed `Display` form.
    pub fn recorded_message(&self) -> String {
        match self {
            Self::Transport(message) | Self::Parse { message, .. } | Self::Upstream { message, .. } => {
                message.clone()
            }
            other => other.to_string(),
        }
    }
}

// Convenience conversions
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io { source: e, path: None }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Self::Msg(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Self::Msg(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn upstream_formats_code_and_reason() {
        let err = Error::upstream(503, "Service Unavailable");
        assert_eq!(err.to_string(), "API Error (503): Service Unavailable");
        assert_eq!(err.recorded_message(), "API Error (503): Service Unavailable");
    }

    #[test]
    fn upstream_provides_hints() {
        match Error::upstream(401, "Unauthorized") {
            Error::Upstream { hint: Some(h), status, .. } => {
                assert_eq!(status, 401);
                assert!(h.contains("token"));
            }
            _ => panic!("Expected Upstream error with hint"),
        }
        assert!(matches!(Error::upstream(418, "Teapot"), Error::Upstream { hint: None, .. }));
    }

    #[test]
    fn transport_records_bare_message() {
        let err = Error::Transport("connection refused".into());
        assert_eq!(err.to_string(), "Network error: connection refused");
        assert_eq!(err.recorded_message(), "connection refused");
    }
}
