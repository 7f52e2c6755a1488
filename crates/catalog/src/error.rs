//! Catalog Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. These are the failures a
//! [`RemoteCatalogClient`](crate::RemoteCatalogClient) implementation reports.

use derive_more::{Display, Error};

/// A catalog error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The remote service rejected the login (bad API key, revoked access).
    #[display("authentication failed: {_0}")]
    Authentication(#[error(not(source))] String),
    /// Any other remote failure: not found, rate limited, network trouble.
    #[display("remote service error ({status}): {message}")]
    RemoteService {
        /// HTTP-like status code; `0` when no response was received.
        status: u16,
        /// Message reported by the service or transport.
        message: String,
    },
    /// The caller's cancellation token fired before the call completed.
    #[display("request cancelled")]
    Cancelled,
}

impl ErrorKind {
    /// Shorthand for a [`RemoteService`](Self::RemoteService) error.
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::RemoteService { status, message: message.into() }
    }

    /// Shorthand for a `404` [`RemoteService`](Self::RemoteService) error.
    pub fn not_found(what: impl std::fmt::Display) -> Self {
        Self::remote(404, format!("not found: {what}"))
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RemoteService { status, .. } => *status == 0 || *status == 429 || *status >= 500,
            Self::Authentication(_) | Self::Cancelled => false,
        }
    }

    /// Returns `true` for a remote "not found" response.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RemoteService { status: 404, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::Cancelled.to_string(), "request cancelled");
        assert_eq!(ErrorKind::remote(503, "unavailable").to_string(), "remote service error (503): unavailable");
        assert_eq!(ErrorKind::Authentication("bad key".to_string()).to_string(), "authentication failed: bad key");
    }

    #[rstest]
    #[case(ErrorKind::remote(0, "connection reset"), true)]
    #[case(ErrorKind::remote(429, "slow down"), true)]
    #[case(ErrorKind::remote(502, "bad gateway"), true)]
    #[case(ErrorKind::remote(404, "missing"), false)]
    #[case(ErrorKind::Authentication("nope".to_string()), false)]
    #[case(ErrorKind::Cancelled, false)]
    fn error_kind_retryable(#[case] kind: ErrorKind, #[case] expected: bool) {
        assert_eq!(kind.is_retryable(), expected);
    }

    #[test]
    fn not_found_is_detected() {
        assert!(ErrorKind::not_found("series 42").is_not_found());
        assert!(!ErrorKind::remote(500, "boom").is_not_found());
    }
}
