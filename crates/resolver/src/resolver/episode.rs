use super::{Resolver, recover};
use crate::credits::{parse_guest_stars, parse_names};
use crate::error::Result;
use crate::models::{EpisodeRecord, PersonKind, RemoteImage};
use marquee_catalog::models::{EpisodeQuery, RawEpisodeDetail};
use marquee_rank::image::artwork_url;
use marquee_rank::series::parse_air_date;
use marquee_rank::{ArtworkItem, ImageKind, ProviderIds};
use tokio_util::sync::CancellationToken;
use tracing::instrument;

impl Resolver {
    /// The first episode of a series matching `query`, with its credits.
    ///
    /// `None` when nothing matches or the episode cannot be fetched.
    #[instrument(skip(self, cancel))]
    pub async fn resolve_episode(
        &self,
        series_id: u64,
        query: &EpisodeQuery,
        language: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Option<EpisodeRecord>> {
        let language = self.language(language);
        let detail = self.episode_detail(series_id, query, &language, cancel).await?;
        Ok(detail.map(|detail| episode_record(series_id, &detail)))
    }

    /// The screencap of the first episode matching `query`.
    pub async fn episode_image(
        &self,
        series_id: u64,
        query: &EpisodeQuery,
        language: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Option<RemoteImage>> {
        let language = self.language(language);
        let Some(detail) = self.episode_detail(series_id, query, &language, cancel).await? else {
            return Ok(None);
        };
        let Some(filename) = detail.filename.as_deref().map(str::trim).filter(|f| !f.is_empty()) else {
            return Ok(None);
        };
        let item = ArtworkItem {
            url: artwork_url(filename),
            width: detail.thumb_width,
            height: detail.thumb_height,
            ..Default::default()
        };
        Ok(Some(RemoteImage::new(ImageKind::Thumb, item)))
    }

    async fn episode_detail(
        &self,
        series_id: u64,
        query: &EpisodeQuery,
        language: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<RawEpisodeDetail>> {
        if query.is_empty() {
            return Ok(None);
        }
        let episodes = recover(self.cached_episodes(series_id, query, language, cancel).await, "episode listing")?;
        let Some(first) = episodes.unwrap_or_default().into_iter().next() else {
            tracing::debug!(series_id, "No episode matches the query");
            return Ok(None);
        };
        recover(self.cached_episode(first.id, language, cancel).await, "episode detail")
    }
}

fn episode_record(series_id: u64, detail: &RawEpisodeDetail) -> EpisodeRecord {
    let mut people = parse_names(&detail.directors, PersonKind::Director);
    people.extend(parse_names(&detail.writers, PersonKind::Writer));
    people.extend(parse_guest_stars(&detail.guest_stars));
    EpisodeRecord {
        series_id,
        name: detail.name.clone(),
        overview: detail.overview.clone(),
        season_number: detail.aired_season,
        episode_number: detail.aired_episode,
        absolute_number: detail.absolute_number,
        premiere_date: detail.first_aired.as_deref().and_then(parse_air_date),
        community_rating: detail.site_rating,
        provider_ids: ProviderIds {
            catalog: detail.id,
            imdb: detail.imdb_id.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string),
            zap2it: None,
        },
        people,
    }
}
