//! Ranking Error Types

use derive_more::{Display, Error};

/// A ranking error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for ranking operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The artwork category id is missing from the category table, or its
    /// name is outside the known vocabulary. The remote taxonomy has drifted.
    #[display("unknown artwork category: {_0}")]
    UnknownArtworkCategory(#[error(not(source))] u64),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::UnknownArtworkCategory(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::UnknownArtworkCategory(99).to_string(), "unknown artwork category: 99");
        assert!(!ErrorKind::UnknownArtworkCategory(99).is_retryable());
    }
}
