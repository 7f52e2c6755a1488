//! Records handed to the host.

use derive_more::Display;
use marquee_rank::{ArtworkItem, ImageKind, ProviderIds};
use time::{Date, Weekday};

/// What the host knows about a series it wants identified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesQuery {
    /// Title as the host has it, possibly with a bracketed year.
    pub name: String,
    /// Release year, when the host knows it.
    pub year: Option<i32>,
    /// Metadata language; the configured default when absent.
    pub language: Option<String>,
    pub catalog_id: Option<u64>,
    pub imdb_id: Option<String>,
    pub zap2it_id: Option<String>,
}
impl SeriesQuery {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_catalog_id(mut self, id: u64) -> Self {
        self.catalog_id = Some(id);
        self
    }

    pub fn with_imdb_id(mut self, id: impl Into<String>) -> Self {
        self.imdb_id = Some(id.into());
        self
    }

    pub fn with_zap2it_id(mut self, id: impl Into<String>) -> Self {
        self.zap2it_id = Some(id.into());
        self
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesStatus {
    Continuing,
    Ended,
}
impl SeriesStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "continuing" => Some(Self::Continuing),
            "ended" => Some(Self::Ended),
            _ => None,
        }
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersonKind {
    Actor,
    GuestStar,
    Director,
    Writer,
}

/// Someone credited on a series or an episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub name: String,
    /// Character name(s) for actors and guest stars, joined with `", "`.
    pub role: Option<String>,
    pub kind: PersonKind,
    pub sort_order: Option<i32>,
    pub image_url: Option<String>,
}
impl Person {
    pub fn new(name: impl Into<String>, kind: PersonKind) -> Self {
        Self {
            name: name.into(),
            role: None,
            kind,
            sort_order: None,
            image_url: None,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

/// A fully resolved series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRecord {
    pub name: String,
    pub overview: Option<String>,
    pub premiere_date: Option<Date>,
    /// Latest air date of the last aired season, for ended series.
    pub end_date: Option<Date>,
    pub production_year: Option<i32>,
    pub status: Option<SeriesStatus>,
    pub air_days: Vec<Weekday>,
    pub air_time: Option<String>,
    /// Typical episode runtime in minutes.
    pub runtime: Option<u32>,
    pub community_rating: Option<f32>,
    pub official_rating: Option<String>,
    pub genres: Vec<String>,
    pub studios: Vec<String>,
    pub provider_ids: ProviderIds,
    /// Actors, in billing order.
    pub people: Vec<Person>,
}

/// A fully resolved episode.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeRecord {
    pub series_id: u64,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub season_number: Option<u32>,
    pub episode_number: Option<u32>,
    pub absolute_number: Option<u32>,
    pub premiere_date: Option<Date>,
    pub community_rating: Option<f32>,
    pub provider_ids: ProviderIds,
    /// Directors, then writers, then guest stars.
    pub people: Vec<Person>,
}

/// A ranked image, typed for one of the host's image slots.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteImage {
    pub kind: ImageKind,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub language: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub community_rating: Option<f64>,
    pub vote_count: Option<u32>,
}
impl RemoteImage {
    pub fn new(kind: ImageKind, item: ArtworkItem) -> Self {
        Self {
            kind,
            url: item.url,
            thumbnail_url: item.thumbnail_url,
            language: item.language,
            width: item.width,
            height: item.height,
            community_rating: item.score,
            vote_count: item.votes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Continuing", Some(SeriesStatus::Continuing))]
    #[case("ENDED", Some(SeriesStatus::Ended))]
    #[case(" ended ", Some(SeriesStatus::Ended))]
    #[case("Upcoming", None)]
    #[case("", None)]
    fn test_series_status(#[case] input: &str, #[case] expected: Option<SeriesStatus>) {
        assert_eq!(SeriesStatus::parse(input), expected);
    }

    #[test]
    fn test_series_query_builder() {
        let query = SeriesQuery::named("Dark").with_year(2017).with_language("de").with_imdb_id("tt5753856");
        assert_eq!(query.name, "Dark");
        assert_eq!(query.year, Some(2017));
        assert_eq!(query.language.as_deref(), Some("de"));
        assert_eq!(query.imdb_id.as_deref(), Some("tt5753856"));
        assert_eq!(query.catalog_id, None);
    }
}
