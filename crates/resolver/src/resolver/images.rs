use super::{Resolver, recover};
use crate::error::Result;
use crate::models::RemoteImage;
use futures::future::join_all;
use marquee_catalog::models::ArtworkFilter;
use marquee_rank::{ArtworkCategories, ArtworkItem, rank_images};
use tokio_util::sync::CancellationToken;
use tracing::instrument;

impl Resolver {
    /// Ranked series-level artwork (posters, banners, backdrops, logos).
    #[instrument(skip(self, cancel))]
    pub async fn series_images(
        &self,
        series_id: u64,
        language: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Vec<RemoteImage>> {
        let language = self.language(language);
        self.discover_images(series_id, None, &language, cancel).await
    }

    /// Ranked artwork of one season.
    #[instrument(skip(self, cancel))]
    pub async fn season_images(
        &self,
        series_id: u64,
        season: u32,
        language: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Vec<RemoteImage>> {
        let language = self.language(language);
        self.discover_images(series_id, Some(season), &language, cancel).await
    }

    /// Query every category the series has artwork in, then rank the lot.
    async fn discover_images(
        &self,
        series_id: u64,
        season: Option<u32>,
        language: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<RemoteImage>> {
        let applies_to = if season.is_some() { "season" } else { "series" };
        let Some(categories) = recover(self.cached_categories(language, cancel).await, "artwork categories")? else {
            return Ok(Vec::new());
        };
        let Some(summary) = recover(self.cached_artwork_summary(series_id, language, cancel).await, "artwork summary")?
        else {
            return Ok(Vec::new());
        };

        let season = season.map(|s| s.to_string());
        let filters: Vec<ArtworkFilter> = summary
            .iter()
            .filter(|present| present.count > 0)
            .filter(|present| {
                categories
                    .iter()
                    .any(|c| c.id == present.category_id && c.applies_to.eq_ignore_ascii_case(applies_to))
            })
            .map(|present| {
                let filter = ArtworkFilter::category(present.category_id);
                match &season {
                    Some(season) => filter.with_season(season.as_str()),
                    None => filter,
                }
            })
            .collect();
        tracing::debug!(series_id, categories = filters.len(), "Querying artwork categories");

        let responses = join_all(filters.iter().map(|filter| self.cached_artwork(series_id, filter, language, cancel))).await;
        let mut items = Vec::new();
        for response in responses {
            if let Some(artwork) = recover(response, "artwork category")? {
                items.extend(artwork.iter().map(ArtworkItem::from_raw));
            }
        }

        let table: ArtworkCategories = categories.into_iter().collect();
        let images = rank_images(items, season.as_deref(), language)
            .into_iter()
            .filter_map(|item| match table.kind_for(item.category_id) {
                Ok(kind) => Some(RemoteImage::new(kind, item)),
                Err(err) => {
                    tracing::warn!(error = %&*err, url = %item.url, "Skipping image");
                    None
                },
            })
            .collect();
        Ok(images)
    }
}

#[cfg(test)]
mod tests {
    use crate::Resolver;
    use marquee_catalog::client::{Call, Failure, MockCatalog};
    use marquee_catalog::models::{ArtworkCategory, RawArtwork};
    use marquee_rank::ImageKind;
    use std::sync::Arc;
    use tokio_util::sync::CancellationToken;

    fn artwork(file_name: &str, category_id: u64, language: Option<&str>, rating: Option<f64>) -> RawArtwork {
        RawArtwork {
            file_name: file_name.to_string(),
            category_id,
            language: language.map(str::to_string),
            rating,
            ..Default::default()
        }
    }

    fn in_season(mut artwork: RawArtwork, season: &str) -> RawArtwork {
        artwork.season = Some(season.to_string());
        artwork
    }

    fn resolver(client: &Arc<MockCatalog>) -> Resolver {
        Resolver::new(client.clone(), Some("api-key".to_string()))
    }

    fn urls(images: &[crate::models::RemoteImage]) -> Vec<&str> {
        images.iter().map(|i| i.url.trim_start_matches("https://artworks.thetvdb.com/banners/")).collect()
    }

    #[tokio::test]
    async fn test_series_images_prefer_language() {
        let client = Arc::new(MockCatalog::default().with_artwork(
            7,
            [
                artwork("y.jpg", 2, Some("en"), Some(100.0)),
                artwork("z.jpg", 2, None, Some(1.0)),
                artwork("x.jpg", 2, Some("de"), Some(5.0)),
            ],
        ));
        let resolver = resolver(&client);
        let images = resolver.series_images(7, Some("de"), &CancellationToken::new()).await.unwrap();
        assert_eq!(urls(&images), vec!["x.jpg", "y.jpg", "z.jpg"]);
        assert!(images.iter().all(|i| i.kind == ImageKind::Primary));
        assert_eq!(images[0].community_rating, Some(5.0));
    }

    #[tokio::test]
    async fn test_only_present_categories_are_queried() {
        let client = Arc::new(MockCatalog::default().with_artwork(
            7,
            [artwork("poster.jpg", 2, None, None), artwork("fanart.jpg", 3, None, None)],
        ));
        let resolver = resolver(&client);
        let cancel = CancellationToken::new();
        let images = resolver.series_images(7, None, &cancel).await.unwrap();
        let kinds: Vec<_> = images.iter().map(|i| i.kind).collect();
        assert_eq!(kinds.len(), 2);
        assert!(kinds.contains(&ImageKind::Primary));
        assert!(kinds.contains(&ImageKind::Backdrop));
        assert_eq!(client.calls(Call::ArtworkSummary), 1);
        assert_eq!(client.calls(Call::Artwork), 2);

        resolver.series_images(7, None, &cancel).await.unwrap();
        assert_eq!(client.calls(Call::Artwork), 2);
    }

    #[tokio::test]
    async fn test_failing_category_is_omitted() {
        let client = Arc::new(
            MockCatalog::default()
                .with_artwork(7, [artwork("poster.jpg", 2, None, None), artwork("fanart.jpg", 3, None, None)])
                .with_failure(Failure::Artwork(3)),
        );
        let resolver = resolver(&client);
        let images = resolver.series_images(7, None, &CancellationToken::new()).await.unwrap();
        assert_eq!(urls(&images), vec!["poster.jpg"]);
    }

    #[tokio::test]
    async fn test_unknown_category_is_skipped() {
        let mut categories = MockCatalog::default_categories();
        categories.push(ArtworkCategory::new(40, "Hologram", "series"));
        let client = Arc::new(
            MockCatalog::default()
                .with_categories(categories)
                .with_artwork(7, [artwork("poster.jpg", 2, None, None), artwork("holo.jpg", 40, None, None)]),
        );
        let resolver = resolver(&client);
        let images = resolver.series_images(7, None, &CancellationToken::new()).await.unwrap();
        assert_eq!(urls(&images), vec!["poster.jpg"]);
    }

    #[tokio::test]
    async fn test_season_images_filter_by_season() {
        let client = Arc::new(MockCatalog::default().with_artwork(
            7,
            [
                artwork("series.jpg", 2, None, None),
                in_season(artwork("s1.jpg", 7, None, None), "1"),
                in_season(artwork("s2.jpg", 7, None, None), "2"),
                in_season(artwork("s1-wide.jpg", 6, None, None), "1"),
            ],
        ));
        let resolver = resolver(&client);
        let images = resolver.season_images(7, 1, None, &CancellationToken::new()).await.unwrap();
        let mut found: Vec<_> = images.iter().map(|i| (urls(std::slice::from_ref(i))[0], i.kind)).collect();
        found.sort_by_key(|(url, _)| *url);
        assert_eq!(found, vec![("s1-wide.jpg", ImageKind::Banner), ("s1.jpg", ImageKind::Primary)]);
        assert_eq!(client.calls(Call::Artwork), 2);
    }

    #[tokio::test]
    async fn test_failed_summary_is_empty() {
        let client = Arc::new(
            MockCatalog::default()
                .with_artwork(7, [artwork("poster.jpg", 2, None, None)])
                .with_failure(Failure::ArtworkSummary(7)),
        );
        let resolver = resolver(&client);
        let images = resolver.series_images(7, None, &CancellationToken::new()).await.unwrap();
        assert!(images.is_empty());
        assert_eq!(client.calls(Call::Artwork), 0);
    }
}
