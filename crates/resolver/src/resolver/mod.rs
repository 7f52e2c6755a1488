mod calls;
mod episode;
mod images;
mod series;

use crate::error::{ErrorKind, Result};
use marquee_cache::error::Result as CacheResult;
use marquee_cache::{ResultCache, SessionCache};
use marquee_catalog::{ClientHandle, DEFAULT_LANGUAGE, normalize_language};
use marquee_config::Config;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

/// Tunables of a [`Resolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Language used when a call does not name one.
    pub language: String,
    pub refresh_after: Duration,
    pub ttl: Duration,
    /// Upper bound on the candidates returned by a series search.
    pub max_candidates: usize,
    /// Allowed distance between a requested year and a candidate's year.
    pub year_tolerance: u32,
}
impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            refresh_after: SessionCache::DEFAULT_REFRESH_AFTER,
            ttl: ResultCache::DEFAULT_TTL,
            max_candidates: 10,
            year_tolerance: 1,
        }
    }
}
impl From<&Config> for ResolverOptions {
    fn from(config: &Config) -> Self {
        Self {
            language: normalize_language(&config.language),
            refresh_after: config.refresh_after(),
            ttl: config.ttl(),
            max_candidates: config.search.max_candidates,
            year_tolerance: config.search.year_tolerance,
        }
    }
}

/// Resolves series, episodes and artwork against the remote catalog.
///
/// Every remote call goes through a [`ResultCache`] backed by a
/// [`SessionCache`], so repeated lookups within the cache's time-to-live cost
/// nothing. Failures of individual remote calls are logged and turned into
/// empty results; only credential problems and cancellation are returned to
/// the host.
///
/// # Examples
///
/// ```
/// use marquee_catalog::client::MockCatalog;
/// use marquee_catalog::models::RawSearchResult;
/// use marquee_resolver::{Resolver, SeriesQuery};
/// use std::sync::Arc;
/// use tokio_util::sync::CancellationToken;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = MockCatalog::default().with_search(
///     "office",
///     [RawSearchResult { id: 73244, name: "The Office".to_string(), ..Default::default() }],
/// );
/// let resolver = Resolver::new(Arc::new(client), Some("api-key".to_string()));
/// let candidates = resolver.search_series(&SeriesQuery::named("The Office"), &CancellationToken::new()).await?;
/// assert_eq!(candidates[0].id(), 73244);
/// # Ok(())
/// # }
/// ```
pub struct Resolver {
    client: ClientHandle,
    results: ResultCache,
    options: ResolverOptions,
}
impl Resolver {
    pub fn new(client: ClientHandle, api_key: Option<String>) -> Self {
        Self::with_options(client, api_key, ResolverOptions::default())
    }

    pub fn with_options(client: ClientHandle, api_key: Option<String>, options: ResolverOptions) -> Self {
        let sessions = SessionCache::new(Arc::clone(&client), api_key).with_refresh_after(options.refresh_after);
        let results = ResultCache::new(Arc::new(sessions)).with_ttl(options.ttl);
        Self { client, results, options }
    }

    /// Build a resolver from loaded configuration.
    pub fn from_config(client: ClientHandle, config: &Config) -> Self {
        let api_key = config.api_key().map(str::to_string);
        Self::with_options(client, api_key, ResolverOptions::from(config))
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    pub fn cache(&self) -> &ResultCache {
        &self.results
    }

    /// Languages the remote catalog offers metadata in.
    ///
    /// Empty when the catalog cannot be reached.
    #[instrument(skip_all)]
    pub async fn supported_languages(&self, cancel: &CancellationToken) -> Result<Vec<String>> {
        let language = self.language(None);
        let languages = recover(self.cached_languages(&language, cancel).await, "language list")?;
        Ok(languages.unwrap_or_default())
    }

    /// Normalized language for a call, falling back to the configured one.
    fn language(&self, requested: Option<&str>) -> String {
        match requested.map(str::trim).filter(|l| !l.is_empty()) {
            Some(language) => normalize_language(language),
            None => normalize_language(&self.options.language),
        }
    }
}

/// Keep a value, or log a remote failure and carry on without it.
///
/// Credential problems and cancellation are returned as errors.
fn recover<T>(result: CacheResult<T>, what: &str) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) => match ErrorKind::from_cache(&err) {
            Some(kind) => Err(err.raise(kind)),
            None => {
                tracing::warn!(error = %&*err, what, "Remote catalog call failed; continuing without it");
                Ok(None)
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_catalog::client::{Call, Failure, MockCatalog};

    #[test]
    fn test_options_from_config() {
        let mut config = Config::default();
        config.language = "pt-BR".to_string();
        config.cache.ttl_secs = 90;
        config.search.max_candidates = 3;
        let options = ResolverOptions::from(&config);
        assert_eq!(options.language, "pt");
        assert_eq!(options.ttl, Duration::from_secs(90));
        assert_eq!(options.refresh_after, Duration::from_secs(72_000));
        assert_eq!(options.max_candidates, 3);
        assert_eq!(options.year_tolerance, 1);
    }

    #[test]
    fn test_language_fallback() {
        let mut options = ResolverOptions::default();
        options.language = "de".to_string();
        let resolver = Resolver::with_options(Arc::new(MockCatalog::default()), None, options);
        assert_eq!(resolver.language(None), "de");
        assert_eq!(resolver.language(Some("  ")), "de");
        assert_eq!(resolver.language(Some("fr-CA")), "fr");
    }

    #[tokio::test]
    async fn test_missing_api_key_surfaces() {
        let client = Arc::new(MockCatalog::default());
        let mut config = Config::default();
        config.api_key = Some(" ".to_string());
        let resolver = Resolver::from_config(client.clone(), &config);
        let err = resolver.supported_languages(&CancellationToken::new()).await.unwrap_err();
        assert_eq!(*err, ErrorKind::MissingApiKey);
        assert_eq!(client.calls(Call::Login), 0);
    }

    #[tokio::test]
    async fn test_supported_languages_are_cached() {
        let client = Arc::new(MockCatalog::default().with_languages(["en", "de", "fr"]));
        let resolver = Resolver::new(client.clone(), Some("api-key".to_string()));
        let cancel = CancellationToken::new();
        assert_eq!(resolver.supported_languages(&cancel).await.unwrap(), vec!["en", "de", "fr"]);
        assert_eq!(resolver.supported_languages(&cancel).await.unwrap(), vec!["en", "de", "fr"]);
        assert_eq!(client.calls(Call::Languages), 1);
    }

    #[tokio::test]
    async fn test_remote_failure_is_empty_but_login_failure_surfaces() {
        let client = Arc::new(MockCatalog::default().with_failure(Failure::Languages));
        let resolver = Resolver::new(client.clone(), Some("api-key".to_string()));
        let cancel = CancellationToken::new();
        assert!(resolver.supported_languages(&cancel).await.unwrap().is_empty());

        let client = Arc::new(MockCatalog::default().with_failure(Failure::Login));
        let resolver = Resolver::new(client.clone(), Some("api-key".to_string()));
        let err = resolver.supported_languages(&cancel).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Authentication(_)));
    }

    #[tokio::test]
    async fn test_cancelled_call_surfaces() {
        let client = Arc::new(MockCatalog::default());
        let resolver = Resolver::new(client.clone(), Some("api-key".to_string()));
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = resolver.supported_languages(&cancel).await.unwrap_err();
        assert_eq!(*err, ErrorKind::Cancelled);
    }
}
