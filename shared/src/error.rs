//! Error types for the contributions service.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while serving a contributions request.
#[derive(Error, Debug)]
pub enum Error {
    /// Upstream answered with a non-2xx status
    #[error("Failed to fetch contributions: {status} {reason}")]
    UpstreamHttp { status: u16, reason: String },

    /// Upstream page did not contain the calendar table
    #[error("Could not find contribution calendar in response")]
    CalendarNotFound,

    /// Transport error talking to upstream
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl Error {
    /// Get HTTP status code for this error.
    ///
    /// Every failure while serving a calendar is reported as a server error,
    /// including an unparseable date range.
    pub fn status_code(&self) -> u16 {
        500
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_message_carries_status() {
        let err = Error::UpstreamHttp {
            status: 404,
            reason: "Not Found".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to fetch contributions: 404 Not Found");
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_every_error_is_server_error() {
        assert_eq!(Error::Validation("bad date".to_string()).status_code(), 500);
        assert_eq!(Error::CalendarNotFound.status_code(), 500);
        assert_eq!(Error::Config("missing".to_string()).status_code(), 500);
    }
}
