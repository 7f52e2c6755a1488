//! Resolver Error Types
//!
//! Remote failures of individual calls are turned into empty results before
//! they reach the host, so the errors left here are the ones the host has to
//! act on: credentials and cancellation.

use derive_more::{Display, Error};
use marquee_cache::error::ErrorKind as CacheErrorKind;

/// A resolver error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for resolver operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// No API key is configured.
    #[display("no API key configured for the remote catalog")]
    MissingApiKey,
    /// The remote catalog rejected the login.
    #[display("authentication failed: {_0}")]
    Authentication(#[error(not(source))] String),
    /// The caller's cancellation token fired.
    #[display("request cancelled")]
    Cancelled,
}
impl ErrorKind {
    /// The resolver error a cache error surfaces as, or `None` for remote
    /// catalog failures, which the resolver turns into empty results.
    pub fn from_cache(kind: &CacheErrorKind) -> Option<Self> {
        match kind {
            CacheErrorKind::MissingApiKey => Some(Self::MissingApiKey),
            CacheErrorKind::Authentication(message) => Some(Self::Authentication(message.clone())),
            CacheErrorKind::Cancelled => Some(Self::Cancelled),
            CacheErrorKind::Catalog(_) => None,
        }
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::MissingApiKey | Self::Authentication(_) | Self::Cancelled => false,
        }
    }
}
