use std::fmt::{Debug, Formatter, Result as FmtResult};
use tokio::time::{Duration, Instant};

/// An authenticated session issued by the remote catalog for one language.
///
/// Sessions are created by the session cache after a successful login and
/// handed to every remote call. The token is never empty.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    /// Normalized language code the session was issued for.
    pub language: String,
    /// Opaque bearer token.
    pub token: String,
    /// When the token was issued (monotonic clock).
    pub issued_at: Instant,
}
impl Session {
    /// Create a session stamped with the current instant.
    pub fn new(language: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            token: token.into(),
            issued_at: Instant::now(),
        }
    }

    /// Time elapsed since the token was issued.
    pub fn age(&self) -> Duration {
        self.issued_at.elapsed()
    }

    /// Returns `true` once the session is at least `refresh_after` old.
    pub fn is_stale(&self, refresh_after: Duration) -> bool {
        self.age() >= refresh_after
    }
}
impl Debug for Session {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        // Tokens end up in logs far too easily.
        f.debug_struct("Session")
            .field("language", &self.language)
            .field("token", &"<redacted>")
            .field("issued_at", &self.issued_at)
            .finish()
    }
}
