//! Cached remote calls.
//!
//! One method per remote operation, each with its own explicitly built cache
//! key. `language` is always the already-normalized language.

use super::Resolver;
use marquee_cache::CacheKey;
use marquee_cache::error::Result;
use marquee_catalog::models::{
    ArtworkCategory, ArtworkCount, ArtworkFilter, EpisodeQuery, RawArtwork, RawEpisodeDetail, RawEpisodeSummary,
    RawSearchResult, RawSeriesDetail, SearchFilter,
};
use tokio_util::sync::CancellationToken;

impl Resolver {
    pub(super) async fn cached_languages(&self, language: &str, cancel: &CancellationToken) -> Result<Vec<String>> {
        let client = &self.client;
        let key = CacheKey::new("languages");
        self.results
            .get_or_compute(key, language, cancel, |session| async move { client.languages(&session, cancel).await })
            .await
    }

    pub(super) async fn cached_categories(
        &self,
        language: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<ArtworkCategory>> {
        let client = &self.client;
        let key = CacheKey::new("artwork_categories");
        self.results
            .get_or_compute(key, language, cancel, |session| async move {
                client.artwork_categories(&session, cancel).await
            })
            .await
    }

    pub(super) async fn cached_search(
        &self,
        query: &str,
        language: &str,
        filter: &SearchFilter,
        cancel: &CancellationToken,
    ) -> Result<Vec<RawSearchResult>> {
        let client = &self.client;
        let key = CacheKey::new("search").part(query).part(language).part(filter);
        self.results
            .get_or_compute(key, language, cancel, |session| async move {
                client.search(&session, query, language, filter, cancel).await
            })
            .await
    }

    pub(super) async fn cached_search_by_remote_id(
        &self,
        remote_id: &str,
        language: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<RawSearchResult>> {
        let client = &self.client;
        let key = CacheKey::new("search_by_remote_id").part(remote_id).part(language);
        self.results
            .get_or_compute(key, language, cancel, |session| async move {
                client.search_by_remote_id(&session, remote_id, language, cancel).await
            })
            .await
    }

    pub(super) async fn cached_series(
        &self,
        id: u64,
        language: &str,
        cancel: &CancellationToken,
    ) -> Result<RawSeriesDetail> {
        let client = &self.client;
        let key = CacheKey::new("series").part(id).part(language);
        self.results
            .get_or_compute(key, language, cancel, |session| async move {
                client.series_detail(&session, id, language, cancel).await
            })
            .await
    }

    pub(super) async fn cached_episodes(
        &self,
        series_id: u64,
        query: &EpisodeQuery,
        language: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<RawEpisodeSummary>> {
        let client = &self.client;
        let key = CacheKey::new("episodes").part(series_id).part(query).part(language);
        self.results
            .get_or_compute(key, language, cancel, |session| async move {
                client.episodes(&session, series_id, query, language, cancel).await
            })
            .await
    }

    pub(super) async fn cached_episode(
        &self,
        id: u64,
        language: &str,
        cancel: &CancellationToken,
    ) -> Result<RawEpisodeDetail> {
        let client = &self.client;
        let key = CacheKey::new("episode").part(id).part(language);
        self.results
            .get_or_compute(key, language, cancel, |session| async move {
                client.episode_detail(&session, id, language, cancel).await
            })
            .await
    }

    pub(super) async fn cached_artwork_summary(
        &self,
        series_id: u64,
        language: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<ArtworkCount>> {
        let client = &self.client;
        let key = CacheKey::new("artwork_summary").part(series_id);
        self.results
            .get_or_compute(key, language, cancel, |session| async move {
                client.artwork_summary(&session, series_id, cancel).await
            })
            .await
    }

    pub(super) async fn cached_artwork(
        &self,
        series_id: u64,
        filter: &ArtworkFilter,
        language: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<RawArtwork>> {
        let client = &self.client;
        let key = CacheKey::new("artwork").part(series_id).part(filter).part(language);
        self.results
            .get_or_compute(key, language, cancel, |session| async move {
                client.artwork(&session, series_id, filter, language, cancel).await
            })
            .await
    }
}
