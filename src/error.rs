//! Error types for fetching sensor data.

use thiserror::Error;

/// Errors that can occur while fetching feed data from the upstream API or a
/// local file.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The API answered with a non-success status code.
    #[error("{what} request returned status {status}")]
    Status { what: &'static str, status: u16 },

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Failed to read a local feed file.
    #[error("Read error: {0}")]
    Read(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::Connection(err.to_string())
        } else if err.is_decode() {
            FetchError::Parse(err.to_string())
        } else {
            FetchError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message() {
        let err = FetchError::Status {
            what: "latest entry",
            status: 404,
        };
        assert_eq!(err.to_string(), "latest entry request returned status 404");
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = FetchError::from(json_err);
        assert!(matches!(err, FetchError::Parse(_)));
    }
}
