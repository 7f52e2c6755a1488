//! Remote catalog client trait and test double.
//!
//! This module defines the [`RemoteCatalogClient`] trait, the capability the
//! metadata layer consumes to talk to the remote catalog service. The trait
//! covers authentication, search, detail lookups and artwork listings; how
//! those map onto HTTP endpoints is up to the implementation.

#[cfg(feature = "mock")]
mod mock;

#[cfg(feature = "mock")]
pub use self::mock::{Call, Failure, MockCatalog};
use crate::error::Result;
use crate::models::{
    ArtworkCategory, ArtworkCount, ArtworkFilter, EpisodeQuery, RawArtwork, RawEpisodeDetail, RawEpisodeSummary,
    RawSearchResult, RawSeriesDetail, SearchFilter, Session,
};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Unified interface for the remote catalog service.
///
/// Every call except [`login`](Self::login) is made on behalf of an
/// authenticated [`Session`]; callers obtain one from the session cache rather
/// than logging in themselves. All calls accept a [`CancellationToken`] and
/// must return [`Cancelled`](crate::error::ErrorKind::Cancelled) promptly once
/// it fires. Implementations never retry internally: retry policy belongs to
/// the orchestrating caller.
///
/// # Errors
/// - [`Authentication`](crate::error::ErrorKind::Authentication) when login
///   is rejected.
/// - [`RemoteService`](crate::error::ErrorKind::RemoteService) for every other
///   remote failure (not found, rate limited, network).
/// - [`Cancelled`](crate::error::ErrorKind::Cancelled) when the token fires.
///
/// # Examples
///
/// ```
/// use marquee_catalog::models::{SearchFilter, Session};
/// use marquee_catalog::{RemoteCatalogClient, error::Result};
/// use tokio_util::sync::CancellationToken;
///
/// async fn first_title(client: &dyn RemoteCatalogClient, session: &Session) -> Result<Option<String>> {
///     let cancel = CancellationToken::new();
///     let results = client.search(session, "office", "en", &SearchFilter::series(), &cancel).await?;
///     Ok(results.into_iter().next().map(|r| r.name))
/// }
/// ```
#[async_trait]
pub trait RemoteCatalogClient: Send + Sync {
    /// Name of the client implementation (used for logging only).
    fn name(&self) -> &str;

    /// Exchange an API key for a session token.
    async fn login(&self, api_key: &str, cancel: &CancellationToken) -> Result<String>;

    /// Language codes the catalog can serve metadata in.
    async fn languages(&self, session: &Session, cancel: &CancellationToken) -> Result<Vec<String>>;

    /// The catalog's artwork taxonomy.
    async fn artwork_categories(&self, session: &Session, cancel: &CancellationToken) -> Result<Vec<ArtworkCategory>>;

    /// Free-text search.
    ///
    /// Results are in the remote service's relevance order, which callers
    /// use as the final ranking tie-break.
    async fn search(
        &self,
        session: &Session,
        query: &str,
        language: &str,
        filter: &SearchFilter,
        cancel: &CancellationToken,
    ) -> Result<Vec<RawSearchResult>>;

    /// Look up series by a cross-provider id (IMDb, Zap2it).
    async fn search_by_remote_id(
        &self,
        session: &Session,
        remote_id: &str,
        language: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<RawSearchResult>>;

    /// Full series record, including cast.
    async fn series_detail(
        &self,
        session: &Session,
        id: u64,
        language: &str,
        cancel: &CancellationToken,
    ) -> Result<RawSeriesDetail>;

    /// Episodes of a series matching `query`, in listing order.
    async fn episodes(
        &self,
        session: &Session,
        series_id: u64,
        query: &EpisodeQuery,
        language: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<RawEpisodeSummary>>;

    /// Full episode record, including credits.
    async fn episode_detail(
        &self,
        session: &Session,
        id: u64,
        language: &str,
        cancel: &CancellationToken,
    ) -> Result<RawEpisodeDetail>;

    /// Artwork categories present for a series, with their record counts.
    async fn artwork_summary(
        &self,
        session: &Session,
        series_id: u64,
        cancel: &CancellationToken,
    ) -> Result<Vec<ArtworkCount>>;

    /// Artwork records of a series matching `filter`.
    async fn artwork(
        &self,
        session: &Session,
        series_id: u64,
        filter: &ArtworkFilter,
        language: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<RawArtwork>>;
}
