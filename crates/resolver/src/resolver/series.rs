use super::{Resolver, recover};
use crate::error::Result;
use crate::models::{Person, PersonKind, SeriesQuery, SeriesRecord, SeriesStatus};
use futures::future::try_join_all;
use marquee_catalog::models::{EpisodeQuery, RawSearchResult, RawSeriesDetail, SearchFilter};
use marquee_rank::image::artwork_url;
use marquee_rank::series::{parse_air_date, within_year};
use marquee_rank::{MatchQuery, ProviderIds, SearchCandidate, rank_candidates};
use time::{Date, Weekday};
use tokio_util::sync::CancellationToken;
use tracing::instrument;

impl Resolver {
    /// Candidate series for a host query, best first.
    ///
    /// A known catalog id short-circuits to that series. Known IMDb or Zap2it
    /// ids are looked up next. Otherwise the name is searched and ranked, and
    /// candidates whose production year is too far from the query's year are
    /// dropped.
    #[instrument(skip(self, query, cancel), fields(name = %query.name))]
    pub async fn search_series(&self, query: &SeriesQuery, cancel: &CancellationToken) -> Result<Vec<SearchCandidate>> {
        let language = self.language(query.language.as_deref());

        if let Some(id) = query.catalog_id {
            let detail = recover(self.cached_series(id, &language, cancel).await, "series detail")?;
            return Ok(detail.map(|d| candidate_from_detail(&d)).into_iter().collect());
        }

        for remote_id in [query.imdb_id.as_deref(), query.zap2it_id.as_deref()].into_iter().flatten() {
            let remote_id = remote_id.trim();
            if remote_id.is_empty() {
                continue;
            }
            let results = recover(self.cached_search_by_remote_id(remote_id, &language, cancel).await, "remote id")?;
            let mut candidates: Vec<SearchCandidate> =
                results.unwrap_or_default().iter().map(SearchCandidate::from_raw).collect();
            if !candidates.is_empty() {
                for candidate in &mut candidates {
                    candidate.external_ids.imdb = candidate.external_ids.imdb.take().or(query.imdb_id.clone());
                    candidate.external_ids.zap2it = candidate.external_ids.zap2it.take().or(query.zap2it_id.clone());
                }
                candidates.truncate(self.options.max_candidates);
                return Ok(candidates);
            }
        }

        let mut candidates = self.find_candidates(&query.name, &language, cancel).await?;
        candidates.retain(|c| within_year(c.production_year, query.year, self.options.year_tolerance));
        tracing::debug!(count = candidates.len(), "Series search finished");
        Ok(candidates)
    }

    /// Search the catalog for `name`, rank the results and keep the best
    /// `max_candidates` of them.
    ///
    /// A failed search yields no candidates. External ids are looked up for
    /// the kept candidates on a best-effort basis.
    pub async fn find_candidates(
        &self,
        name: &str,
        language: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchCandidate>> {
        let query = MatchQuery::new(name);
        if query.comparable_name().is_empty() {
            return Ok(Vec::new());
        }
        let language = self.language(Some(language));
        let results = recover(
            self.cached_search(query.comparable_name(), &language, &SearchFilter::series(), cancel).await,
            "search",
        )?
        .unwrap_or_default();
        let ranked = rank_candidates(&query, results.iter().map(SearchCandidate::from_raw))
            .into_iter()
            .take(self.options.max_candidates)
            .map(|ranked| self.with_external_ids(ranked.item, &language, cancel));
        try_join_all(ranked).await
    }

    async fn with_external_ids(
        &self,
        mut candidate: SearchCandidate,
        language: &str,
        cancel: &CancellationToken,
    ) -> Result<SearchCandidate> {
        let id = candidate.id();
        if let Some(detail) = recover(self.cached_series(id, language, cancel).await, "candidate external ids")? {
            candidate.external_ids = provider_ids(&detail);
        }
        Ok(candidate)
    }

    /// Identify a series (by catalog id when known, otherwise via
    /// [`search_series`](Self::search_series)) and resolve it.
    pub async fn resolve_series(&self, query: &SeriesQuery, cancel: &CancellationToken) -> Result<Option<SeriesRecord>> {
        let id = match query.catalog_id {
            Some(id) => id,
            None => match self.search_series(query, cancel).await?.first() {
                Some(candidate) => candidate.id(),
                None => return Ok(None),
            },
        };
        self.resolve_series_by_id(id, query.language.as_deref(), cancel).await
    }

    /// The full record of a series, or `None` when it cannot be fetched.
    #[instrument(skip(self, cancel))]
    pub async fn resolve_series_by_id(
        &self,
        id: u64,
        language: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Option<SeriesRecord>> {
        let language = self.language(language);
        let Some(detail) = recover(self.cached_series(id, &language, cancel).await, "series detail")? else {
            return Ok(None);
        };
        let mut record = series_record(&detail);
        if record.status == Some(SeriesStatus::Ended) {
            record.end_date = self.last_air_date(&detail, &language, cancel).await?;
        }
        Ok(Some(record))
    }

    /// Latest air date within the last aired season.
    async fn last_air_date(
        &self,
        detail: &RawSeriesDetail,
        language: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Date>> {
        let Some(season) = detail.aired_seasons.iter().copied().max() else {
            return Ok(None);
        };
        let episodes = recover(
            self.cached_episodes(detail.id, &EpisodeQuery::season(season), language, cancel).await,
            "season episodes",
        )?;
        Ok(episodes
            .unwrap_or_default()
            .iter()
            .filter_map(|e| e.first_aired.as_deref().and_then(parse_air_date))
            .max())
    }
}

fn provider_ids(detail: &RawSeriesDetail) -> ProviderIds {
    let non_empty = |id: &Option<String>| id.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
    ProviderIds {
        catalog: detail.id,
        imdb: non_empty(&detail.imdb_id),
        zap2it: non_empty(&detail.zap2it_id),
    }
}

fn candidate_from_detail(detail: &RawSeriesDetail) -> SearchCandidate {
    let raw = RawSearchResult {
        id: detail.id,
        name: detail.name.clone(),
        aliases: detail.aliases.clone(),
        first_aired: detail.first_aired.clone(),
        banner: None,
        overview: detail.overview.clone(),
        network: detail.network.clone(),
    };
    SearchCandidate {
        external_ids: provider_ids(detail),
        ..SearchCandidate::from_raw(&raw)
    }
}

/// `"Daily"` airs every day, a weekday name airs on that day, anything else
/// is unknown.
pub(crate) fn air_days(value: Option<&str>) -> Vec<Weekday> {
    let Some(value) = value.map(|v| v.trim().to_lowercase()) else {
        return Vec::new();
    };
    let day = match value.as_str() {
        "daily" => {
            return vec![
                Weekday::Sunday,
                Weekday::Monday,
                Weekday::Tuesday,
                Weekday::Wednesday,
                Weekday::Thursday,
                Weekday::Friday,
                Weekday::Saturday,
            ];
        },
        "sunday" => Weekday::Sunday,
        "monday" => Weekday::Monday,
        "tuesday" => Weekday::Tuesday,
        "wednesday" => Weekday::Wednesday,
        "thursday" => Weekday::Thursday,
        "friday" => Weekday::Friday,
        "saturday" => Weekday::Saturday,
        _ => return Vec::new(),
    };
    vec![day]
}

fn series_record(detail: &RawSeriesDetail) -> SeriesRecord {
    let premiere_date = detail.first_aired.as_deref().and_then(parse_air_date);
    let mut actors: Vec<_> = detail.actors.iter().filter(|a| !a.name.trim().is_empty()).collect();
    actors.sort_by_key(|a| a.sort_order);
    let people = actors
        .into_iter()
        .map(|actor| Person {
            name: actor.name.trim().to_string(),
            role: actor.role.as_deref().map(str::trim).filter(|r| !r.is_empty()).map(str::to_string),
            kind: PersonKind::Actor,
            sort_order: Some(actor.sort_order),
            image_url: actor.image.as_deref().filter(|i| !i.is_empty()).map(artwork_url),
        })
        .collect();
    SeriesRecord {
        name: detail.name.clone(),
        overview: detail.overview.clone(),
        premiere_date,
        end_date: None,
        production_year: premiere_date.map(|d| d.year()),
        status: detail.status.as_deref().and_then(SeriesStatus::parse),
        air_days: air_days(detail.airs_day_of_week.as_deref()),
        air_time: detail.airs_time.as_deref().map(str::trim).filter(|t| !t.is_empty()).map(str::to_string),
        runtime: detail.runtime,
        community_rating: detail.site_rating,
        official_rating: detail.rating.clone(),
        genres: detail.genres.clone(),
        studios: detail.network.iter().filter(|n| !n.trim().is_empty()).cloned().collect(),
        provider_ids: provider_ids(detail),
        people,
    }
}
