//! Error types for snapshot producers.

use thiserror::Error;

/// Errors that can occur while collecting a snapshot from an upstream service.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Required configuration (usually credentials) is missing or invalid.
    #[error("Missing configuration: {0}")]
    Config(String),

    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// HTTP request failed or returned an unexpected status.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// The response body could not be parsed at all.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// The response parsed but did not have the expected structure.
    #[error("Unexpected response structure: {0}")]
    Schema(String),

    /// Reading a captured payload from disk failed.
    #[error("Read error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SourceError::Timeout
        } else if err.is_connect() {
            SourceError::Connection(err.to_string())
        } else {
            SourceError::Http(err.to_string())
        }
    }
}

/// Both halves of a credential pair, or a `Config` error naming what is missing.
pub(crate) fn require_credentials<'a>(
    username: Option<&'a str>,
    password: Option<&'a str>,
    what: &str,
) -> Result<(&'a str, &'a str), SourceError> {
    match (username, password) {
        (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => Ok((u, p)),
        _ => Err(SourceError::Config(format!(
            "{} username/password not set",
            what
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_must_be_complete() {
        assert!(require_credentials(Some("u"), Some("p"), "SISS").is_ok());
        assert!(matches!(
            require_credentials(Some("u"), None, "SISS"),
            Err(SourceError::Config(_))
        ));
        assert!(matches!(
            require_credentials(Some(""), Some("p"), "tower"),
            Err(SourceError::Config(_))
        ));
    }

    #[test]
    fn messages_name_the_failure_kind() {
        assert_eq!(
            SourceError::Auth("bad password".into()).to_string(),
            "Authentication failed: bad password"
        );
        assert_eq!(SourceError::Timeout.to_string(), "Request timed out");
    }
}
