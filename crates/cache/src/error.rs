//! Cache Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Remote failures keep the catalog's
//! own error frame as a child.

use derive_more::{Display, Error};
use marquee_catalog::error::{Error as CatalogError, ErrorKind as CatalogErrorKind};

/// A cache error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for cache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// No API key is configured. Fatal until the configuration is fixed.
    #[display("no API key configured for the remote catalog")]
    MissingApiKey,
    /// Login failed; the next call will try again.
    #[display("authentication failed: {_0}")]
    Authentication(#[error(not(source))] String),
    /// A remote call (other than login) failed.
    #[display("catalog error: {_0}")]
    Catalog(CatalogErrorKind),
    /// The caller's cancellation token fired.
    #[display("request cancelled")]
    Cancelled,
}
impl ErrorKind {
    /// Convert a remote call error into a cache error, preserving the
    /// catalog crate's `Exn` frame as a child in its own error tree.
    #[track_caller]
    pub fn catalog(err: CatalogError) -> Error {
        let inner = (*err).clone();
        match inner {
            CatalogErrorKind::Cancelled => err.raise(ErrorKind::Cancelled),
            CatalogErrorKind::Authentication(message) => err.raise(ErrorKind::Authentication(message)),
            other => err.raise(ErrorKind::Catalog(other)),
        }
    }

    /// Convert a failed login into a cache error. Every failure other than
    /// cancellation counts as an authentication failure.
    #[track_caller]
    pub fn login(err: CatalogError) -> Error {
        let inner = (*err).clone();
        match inner {
            CatalogErrorKind::Cancelled => err.raise(ErrorKind::Cancelled),
            CatalogErrorKind::Authentication(message) => err.raise(ErrorKind::Authentication(message)),
            other => err.raise(ErrorKind::Authentication(other.to_string())),
        }
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Catalog(inner) => inner.is_retryable(),
            Self::MissingApiKey | Self::Authentication(_) | Self::Cancelled => false,
        }
    }

    /// Returns `true` for failures of a single remote call, which callers may
    /// swallow. Cancellation and credential problems are never swallowable.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Catalog(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(CatalogErrorKind::Cancelled, ErrorKind::Cancelled)]
    #[case(CatalogErrorKind::Authentication("bad".to_string()), ErrorKind::Authentication("bad".to_string()))]
    #[case(CatalogErrorKind::remote(503, "down"), ErrorKind::Catalog(CatalogErrorKind::remote(503, "down")))]
    fn test_catalog_lifting(#[case] inner: CatalogErrorKind, #[case] expected: ErrorKind) {
        let err = ErrorKind::catalog(exn::Exn::from(inner));
        assert_eq!(*err, expected);
    }

    #[test]
    fn test_login_failures_are_authentication() {
        let err = ErrorKind::login(exn::Exn::from(CatalogErrorKind::remote(500, "boom")));
        assert!(matches!(&*err, ErrorKind::Authentication(message) if message.contains("boom")));
        let err = ErrorKind::login(exn::Exn::from(CatalogErrorKind::Cancelled));
        assert_eq!(*err, ErrorKind::Cancelled);
    }

    #[test]
    fn test_retryable() {
        assert!(ErrorKind::Catalog(CatalogErrorKind::remote(429, "slow")).is_retryable());
        assert!(!ErrorKind::Catalog(CatalogErrorKind::remote(404, "gone")).is_retryable());
        assert!(!ErrorKind::MissingApiKey.is_retryable());
        assert!(ErrorKind::Catalog(CatalogErrorKind::remote(404, "gone")).is_remote());
        assert!(!ErrorKind::Cancelled.is_remote());
    }
}
