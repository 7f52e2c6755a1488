//! In-memory catalog client for testing.

use crate::RemoteCatalogClient;
use crate::error::{ErrorKind, Result};
use crate::models::{
    ArtworkCategory, ArtworkCount, ArtworkFilter, EpisodeQuery, RawArtwork, RawEpisodeDetail, RawEpisodeSummary,
    RawSearchResult, RawSeriesDetail, SearchFilter, Session,
};
use async_trait::async_trait;
use exn::OptionExt;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

/// Remote calls counted by [`MockCatalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Call {
    Login,
    Languages,
    ArtworkCategories,
    Search,
    SearchByRemoteId,
    SeriesDetail,
    Episodes,
    EpisodeDetail,
    ArtworkSummary,
    Artwork,
}
const CALL_KINDS: usize = 10;

/// Failures that can be injected into [`MockCatalog`].
///
/// [`Login`](Self::Login) fails with an authentication error, everything else
/// with a `500` remote service error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Failure {
    Login,
    Languages,
    ArtworkCategories,
    Search,
    SeriesDetail(u64),
    Episodes(u64),
    EpisodeDetail(u64),
    ArtworkSummary(u64),
    /// Artwork queries for one category id.
    Artwork(u64),
}

#[derive(Default)]
struct MockData {
    languages: Vec<String>,
    categories: Vec<ArtworkCategory>,
    search: HashMap<String, Vec<RawSearchResult>>,
    remote_ids: HashMap<String, Vec<RawSearchResult>>,
    series: HashMap<u64, RawSeriesDetail>,
    episodes: HashMap<u64, Vec<RawEpisodeDetail>>,
    artwork: HashMap<u64, Vec<RawArtwork>>,
}

/// In-memory catalog client for testing.
///
/// Data and injected failures live behind [`RwLock`]s so every trait method
/// works on `&self`. Each remote call increments a per-[`Call`] counter, which
/// is what cache tests assert on. An optional latency makes every call
/// suspend (honouring cancellation) so concurrency tests can overlap calls.
///
/// # Examples
///
/// ```
/// use marquee_catalog::client::{Call, MockCatalog};
/// use marquee_catalog::models::{RawSeriesDetail, Session};
/// use marquee_catalog::RemoteCatalogClient;
/// use tokio_util::sync::CancellationToken;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = MockCatalog::default().with_series(RawSeriesDetail {
///     id: 42,
///     name: "The Office".to_string(),
///     ..Default::default()
/// });
/// let cancel = CancellationToken::new();
/// let token = client.login("key", &cancel).await?;
/// let session = Session::new("en", token);
/// let series = client.series_detail(&session, 42, "en", &cancel).await?;
/// assert_eq!(series.name, "The Office");
/// assert_eq!(client.calls(Call::SeriesDetail), 1);
/// # Ok(())
/// # }
/// ```
pub struct MockCatalog {
    name: String,
    token: String,
    latency: Option<Duration>,
    counters: [AtomicUsize; CALL_KINDS],
    failures: RwLock<HashSet<Failure>>,
    data: RwLock<MockData>,
}

impl MockCatalog {
    /// The artwork taxonomy the mock serves unless told otherwise.
    pub fn default_categories() -> Vec<ArtworkCategory> {
        vec![
            ArtworkCategory::new(1, "Banner", "series"),
            ArtworkCategory::new(2, "Poster", "series"),
            ArtworkCategory::new(3, "Background", "series"),
            ArtworkCategory::new(5, "Icon", "series"),
            ArtworkCategory::new(6, "Banner", "season"),
            ArtworkCategory::new(7, "Poster", "season"),
            ArtworkCategory::new(8, "Background", "season"),
            ArtworkCategory::new(11, "Screencap", "episode"),
            ArtworkCategory::new(23, "ClearLogo", "series"),
        ]
    }

    /// Change the name of the mock client.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Change the token prefix handed out by `login`. An empty prefix makes
    /// `login` return an empty token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    /// Make every call suspend for `latency` before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn with_languages(mut self, languages: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.data.get_mut().languages = languages.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_categories(mut self, categories: impl IntoIterator<Item = ArtworkCategory>) -> Self {
        self.data.get_mut().categories = categories.into_iter().collect();
        self
    }

    /// Register the results returned for an exact search query.
    pub fn with_search(mut self, query: impl Into<String>, results: impl IntoIterator<Item = RawSearchResult>) -> Self {
        self.data.get_mut().search.insert(query.into(), results.into_iter().collect());
        self
    }

    /// Register the results returned for a remote id lookup.
    pub fn with_remote_id(
        mut self,
        remote_id: impl Into<String>,
        results: impl IntoIterator<Item = RawSearchResult>,
    ) -> Self {
        self.data.get_mut().remote_ids.insert(remote_id.into(), results.into_iter().collect());
        self
    }

    pub fn with_series(mut self, series: RawSeriesDetail) -> Self {
        self.data.get_mut().series.insert(series.id, series);
        self
    }

    /// Register an episode under its `series_id`.
    pub fn with_episode(mut self, episode: RawEpisodeDetail) -> Self {
        self.data.get_mut().episodes.entry(episode.series_id).or_default().push(episode);
        self
    }

    pub fn with_artwork(mut self, series_id: u64, artwork: impl IntoIterator<Item = RawArtwork>) -> Self {
        self.data.get_mut().artwork.entry(series_id).or_default().extend(artwork);
        self
    }

    pub fn with_failure(mut self, failure: Failure) -> Self {
        self.failures.get_mut().insert(failure);
        self
    }

    /// Start failing `failure` from now on.
    pub async fn fail(&self, failure: Failure) {
        self.failures.write().await.insert(failure);
    }

    /// Stop failing `failure`.
    pub async fn recover(&self, failure: Failure) {
        self.failures.write().await.remove(&failure);
    }

    /// Number of times `call` has been made (including failed attempts).
    pub fn calls(&self, call: Call) -> usize {
        self.counters[call as usize].load(Ordering::SeqCst)
    }

    /// Number of remote calls of any kind.
    pub fn total_calls(&self) -> usize {
        self.counters.iter().map(|c| c.load(Ordering::SeqCst)).sum()
    }

    async fn enter(&self, call: Call, cancel: &CancellationToken) -> Result<()> {
        self.counters[call as usize].fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::select! {
                _ = cancel.cancelled() => exn::bail!(ErrorKind::Cancelled),
                _ = tokio::time::sleep(latency) => {},
            }
        }
        if cancel.is_cancelled() {
            exn::bail!(ErrorKind::Cancelled);
        }
        Ok(())
    }

    async fn check(&self, failure: Failure) -> Result<()> {
        if self.failures.read().await.contains(&failure) {
            exn::bail!(match failure {
                Failure::Login => ErrorKind::Authentication("injected login failure".to_string()),
                other => ErrorKind::remote(500, format!("injected failure: {other:?}")),
            });
        }
        Ok(())
    }
}
impl Default for MockCatalog {
    fn default() -> Self {
        let data = MockData {
            languages: vec!["en".to_string()],
            categories: Self::default_categories(),
            ..Default::default()
        };
        Self {
            name: "mock".to_string(),
            token: "mock-token".to_string(),
            latency: None,
            counters: Default::default(),
            failures: RwLock::new(HashSet::new()),
            data: RwLock::new(data),
        }
    }
}

#[async_trait]
impl RemoteCatalogClient for MockCatalog {
    fn name(&self) -> &str {
        &self.name
    }

    async fn login(&self, api_key: &str, cancel: &CancellationToken) -> Result<String> {
        self.enter(Call::Login, cancel).await?;
        self.check(Failure::Login).await?;
        if api_key.is_empty() {
            exn::bail!(ErrorKind::Authentication("empty API key".to_string()));
        }
        if self.token.is_empty() {
            return Ok(String::new());
        }
        // Each login hands out a distinct token so refreshes are observable.
        Ok(format!("{}-{}", self.token, self.calls(Call::Login)))
    }

    async fn languages(&self, _session: &Session, cancel: &CancellationToken) -> Result<Vec<String>> {
        self.enter(Call::Languages, cancel).await?;
        self.check(Failure::Languages).await?;
        Ok(self.data.read().await.languages.clone())
    }

    async fn artwork_categories(&self, _session: &Session, cancel: &CancellationToken) -> Result<Vec<ArtworkCategory>> {
        self.enter(Call::ArtworkCategories, cancel).await?;
        self.check(Failure::ArtworkCategories).await?;
        Ok(self.data.read().await.categories.clone())
    }

    async fn search(
        &self,
        _session: &Session,
        query: &str,
        _language: &str,
        filter: &SearchFilter,
        cancel: &CancellationToken,
    ) -> Result<Vec<RawSearchResult>> {
        self.enter(Call::Search, cancel).await?;
        self.check(Failure::Search).await?;
        let guard = self.data.read().await;
        let results = guard.search.get(query).cloned().unwrap_or_default();
        Ok(match filter.year {
            Some(year) => results
                .into_iter()
                .filter(|r| r.first_aired.as_deref().is_some_and(|d| d.starts_with(&year.to_string())))
                .collect(),
            None => results,
        })
    }

    async fn search_by_remote_id(
        &self,
        _session: &Session,
        remote_id: &str,
        _language: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<RawSearchResult>> {
        self.enter(Call::SearchByRemoteId, cancel).await?;
        self.check(Failure::Search).await?;
        Ok(self.data.read().await.remote_ids.get(remote_id).cloned().unwrap_or_default())
    }

    async fn series_detail(
        &self,
        _session: &Session,
        id: u64,
        _language: &str,
        cancel: &CancellationToken,
    ) -> Result<RawSeriesDetail> {
        self.enter(Call::SeriesDetail, cancel).await?;
        self.check(Failure::SeriesDetail(id)).await?;
        let guard = self.data.read().await;
        let series = guard.series.get(&id).cloned().ok_or_raise(|| ErrorKind::not_found(id))?;
        Ok(series)
    }

    async fn episodes(
        &self,
        _session: &Session,
        series_id: u64,
        query: &EpisodeQuery,
        _language: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<RawEpisodeSummary>> {
        self.enter(Call::Episodes, cancel).await?;
        self.check(Failure::Episodes(series_id)).await?;
        let guard = self.data.read().await;
        let episodes = guard.episodes.get(&series_id).map(Vec::as_slice).unwrap_or_default();
        Ok(episodes.iter().map(RawEpisodeDetail::summary).filter(|e| query.matches(e)).collect())
    }

    async fn episode_detail(
        &self,
        _session: &Session,
        id: u64,
        _language: &str,
        cancel: &CancellationToken,
    ) -> Result<RawEpisodeDetail> {
        self.enter(Call::EpisodeDetail, cancel).await?;
        self.check(Failure::EpisodeDetail(id)).await?;
        let guard = self.data.read().await;
        let episode = guard
            .episodes
            .values()
            .flatten()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_raise(|| ErrorKind::not_found(id))?;
        Ok(episode)
    }

    async fn artwork_summary(
        &self,
        _session: &Session,
        series_id: u64,
        cancel: &CancellationToken,
    ) -> Result<Vec<ArtworkCount>> {
        self.enter(Call::ArtworkSummary, cancel).await?;
        self.check(Failure::ArtworkSummary(series_id)).await?;
        let guard = self.data.read().await;
        // BTreeMap keeps the summary in a stable category order.
        let mut counts: BTreeMap<u64, u32> = BTreeMap::new();
        for artwork in guard.artwork.get(&series_id).map(Vec::as_slice).unwrap_or_default() {
            *counts.entry(artwork.category_id).or_default() += 1;
        }
        Ok(counts.into_iter().map(|(category_id, count)| ArtworkCount { category_id, count }).collect())
    }

    async fn artwork(
        &self,
        _session: &Session,
        series_id: u64,
        filter: &ArtworkFilter,
        _language: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<RawArtwork>> {
        self.enter(Call::Artwork, cancel).await?;
        if let Some(category_id) = filter.category_id {
            self.check(Failure::Artwork(category_id)).await?;
        }
        let guard = self.data.read().await;
        let artwork = guard.artwork.get(&series_id).map(Vec::as_slice).unwrap_or_default();
        Ok(artwork.iter().filter(|a| filter.matches(a)).cloned().collect())
    }
}
