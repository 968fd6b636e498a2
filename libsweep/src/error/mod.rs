//! Error types for Sweep
//!
//! This module provides error handling for all sweep operations. All errors
//! implement the standard Error trait and carry enough context to report a
//! skipped page, tag, or repository without aborting the whole run.

use reqwest::StatusCode;
use thiserror::Error;

#[cfg(test)]
mod tests;

/// Main error type for sweep operations
#[derive(Error, Debug)]
pub enum SweepError {
    /// Network-related errors (connection, timeout, DNS)
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Authentication errors (401, 403)
    #[error("Authentication error (status: {status_code:?}): {message}")]
    Authentication {
        message: String,
        status_code: Option<u16>,
    },

    /// Resource not found errors (404)
    #[error("{resource_type} not found: {name}")]
    NotFound { resource_type: String, name: String },

    /// Server errors (5xx)
    #[error("Server error (status: {status_code}): {message}")]
    Server { message: String, status_code: u16 },

    /// Any other non-success HTTP status where a specific one was required
    /// (terminal pagination status, non-202 delete, non-200 digest lookup)
    #[error("Unexpected status {status_code}: {message}")]
    UnexpectedStatus { message: String, status_code: u16 },

    /// A continuation link was present but carried no extractable, non-empty
    /// cursor. Aborts the current walk; looping forever is never an option.
    #[error("Invalid continuation link: {link}")]
    InvalidContinuation { link: String },

    /// Validation errors (malformed response body, invalid digest)
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration errors (invalid config file, missing settings)
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Result type alias for sweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

impl SweepError {
    /// Creates a new network error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libsweep::error::SweepError;
    ///
    /// let err = SweepError::network("connection refused");
    /// assert!(matches!(err, SweepError::Network { .. }));
    /// ```
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new network error with a source error.
    pub fn network_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Network {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new authentication error.
    pub fn authentication<S: Into<String>>(message: S, status_code: Option<u16>) -> Self {
        Self::Authentication {
            message: message.into(),
            status_code,
        }
    }

    /// Creates a new not found error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libsweep::error::SweepError;
    ///
    /// let err = SweepError::not_found("repository", "myrepo");
    /// assert!(matches!(err, SweepError::NotFound { .. }));
    /// ```
    pub fn not_found<S: Into<String>>(resource_type: S, name: S) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            name: name.into(),
        }
    }

    /// Creates a new server error.
    pub fn server<S: Into<String>>(message: S, status_code: u16) -> Self {
        Self::Server {
            message: message.into(),
            status_code,
        }
    }

    /// Creates a new unexpected-status error.
    pub fn unexpected_status<S: Into<String>>(message: S, status_code: u16) -> Self {
        Self::UnexpectedStatus {
            message: message.into(),
            status_code,
        }
    }

    /// Creates a new invalid-continuation error from the offending link value.
    pub fn invalid_continuation<S: Into<String>>(link: S) -> Self {
        Self::InvalidContinuation { link: link.into() }
    }

    /// Creates a new validation error.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new validation error with a source error.
    pub fn validation_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Validation {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S, path: Option<S>) -> Self {
        Self::Config {
            message: message.into(),
            path: path.map(|p| p.into()),
            source: None,
        }
    }

    /// Creates a new configuration error with a source error.
    pub fn config_with_source<S, E>(message: S, path: Option<S>, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Config {
            message: message.into(),
            path: path.map(|p| p.into()),
            source: Some(Box::new(source)),
        }
    }

    /// Maps a non-success HTTP status to the matching error variant.
    ///
    /// Used wherever an operation requires a specific success status: the
    /// pagination walk, digest resolution, and manifest deletion.
    ///
    /// # Examples
    ///
    /// ```
    /// use libsweep::error::SweepError;
    /// use reqwest::StatusCode;
    ///
    /// let err = SweepError::from_status(StatusCode::UNAUTHORIZED, "catalog fetch");
    /// assert!(matches!(err, SweepError::Authentication { .. }));
    /// ```
    pub fn from_status(status: StatusCode, context: &str) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => {
                Self::authentication(format!("Authentication required: {}", context), Some(401))
            }
            StatusCode::FORBIDDEN => {
                Self::authentication(format!("Access forbidden: {}", context), Some(403))
            }
            StatusCode::NOT_FOUND => Self::not_found("resource", context),
            s if s.is_server_error() => Self::server(context.to_string(), s.as_u16()),
            s => Self::unexpected_status(context.to_string(), s.as_u16()),
        }
    }
}
