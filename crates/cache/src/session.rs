use crate::error::{ErrorKind, Result};
use dashmap::DashMap;
use exn::OptionExt;
use marquee_catalog::{ClientHandle, Session, normalize_language};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

/// Per-language state: the cached session, and the lock that serializes
/// logins for that language.
#[derive(Default)]
struct Shard {
    session: RwLock<Option<Session>>,
    refresh: Mutex<()>,
}

/// Authenticated sessions, one per language.
///
/// Languages are normalized (`"en-US"` and `"EN"` share a session) and each
/// one owns an independent shard, so a slow login for one language never
/// delays callers asking for another. Within a language, at most one login is
/// in flight; concurrent callers wait for it and reuse its session.
///
/// Login failures are never cached: the slot stays empty and the next call
/// logs in again. There are no retries, timeouts or timers here.
pub struct SessionCache {
    client: ClientHandle,
    api_key: Option<String>,
    refresh_after: Duration,
    shards: DashMap<String, Arc<Shard>>,
}
impl SessionCache {
    /// Sessions older than this are refreshed before use.
    pub const DEFAULT_REFRESH_AFTER: Duration = Duration::from_secs(20 * 60 * 60);

    /// A missing API key is only reported at the first login attempt.
    pub fn new(client: ClientHandle, api_key: Option<String>) -> Self {
        Self {
            client,
            api_key,
            refresh_after: Self::DEFAULT_REFRESH_AFTER,
            shards: DashMap::new(),
        }
    }

    pub fn with_refresh_after(mut self, refresh_after: Duration) -> Self {
        self.refresh_after = refresh_after;
        self
    }

    pub fn client(&self) -> &ClientHandle {
        &self.client
    }

    fn shard(&self, language: &str) -> Arc<Shard> {
        self.shards.entry(language.to_string()).or_default().clone()
    }

    async fn live_session(&self, shard: &Shard) -> Option<Session> {
        shard.session.read().await.as_ref().filter(|s| !s.is_stale(self.refresh_after)).cloned()
    }

    /// A valid session for `language`, logging in if there is none yet or the
    /// cached one has gone stale.
    ///
    /// # Errors
    /// - [`MissingApiKey`](ErrorKind::MissingApiKey) when no API key is set.
    /// - [`Authentication`](ErrorKind::Authentication) when login fails or
    ///   returns an empty token.
    /// - [`Cancelled`](ErrorKind::Cancelled) when `cancel` fires. Cached state
    ///   is left untouched.
    #[instrument(skip(self, cancel), fields(client = self.client.name()))]
    pub async fn get_session(&self, language: &str, cancel: &CancellationToken) -> Result<Session> {
        let language = normalize_language(language);
        let shard = self.shard(&language);
        if let Some(session) = self.live_session(&shard).await {
            return Ok(session);
        }

        let _guard = tokio::select! {
            biased;
            _ = cancel.cancelled() => exn::bail!(ErrorKind::Cancelled),
            guard = shard.refresh.lock() => guard,
        };
        // Another caller may have logged in while we waited for the lock.
        if let Some(session) = self.live_session(&shard).await {
            tracing::debug!(language = %language, "Reusing session from concurrent login");
            return Ok(session);
        }

        let api_key = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_raise(|| ErrorKind::MissingApiKey)?;
        let refreshing = shard.session.read().await.is_some();
        tracing::info!(language = %language, refreshing, "Logging in to remote catalog");

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => exn::bail!(ErrorKind::Cancelled),
            result = self.client.login(api_key, cancel) => result,
        };
        let token = match result {
            Ok(token) if !token.trim().is_empty() => token,
            Ok(_) => {
                *shard.session.write().await = None;
                exn::bail!(ErrorKind::Authentication("remote catalog returned an empty token".to_string()));
            },
            Err(err) => {
                let err = ErrorKind::login(err);
                let kind: &ErrorKind = &err;
                if !matches!(kind, ErrorKind::Cancelled) {
                    tracing::warn!(language = %language, error = %kind, "Login failed");
                    *shard.session.write().await = None;
                }
                return Err(err);
            },
        };

        let session = Session::new(language, token);
        *shard.session.write().await = Some(session.clone());
        Ok(session)
    }

    /// Drop the cached session for `language` (e.g. after the remote service
    /// rejected its token). The next call logs in again.
    pub async fn invalidate(&self, language: &str) {
        let language = normalize_language(language);
        // Clone the shard out so no map guard is held across the await.
        let shard = self.shards.get(&language).map(|shard| Arc::clone(shard.value()));
        if let Some(shard) = shard {
            let _guard = shard.refresh.lock().await;
            *shard.session.write().await = None;
            tracing::debug!(language = %language, "Session invalidated");
        }
    }

    /// Languages that currently hold a session that is not stale.
    pub async fn cached_languages(&self) -> Vec<String> {
        let shards: Vec<(String, Arc<Shard>)> =
            self.shards.iter().map(|entry| (entry.key().clone(), Arc::clone(entry.value()))).collect();
        let mut languages = Vec::with_capacity(shards.len());
        for (language, shard) in shards {
            if self.live_session(&shard).await.is_some() {
                languages.push(language);
            }
        }
        languages.sort();
        languages
    }
}
