/// Structured filter for listing a series' episodes.
///
/// Every field is optional; only the fields that are set restrict the
/// listing. The field order here is the order in which fields contribute to
/// cache keys, so it must not be shuffled casually.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EpisodeQuery {
    pub aired_season: Option<u32>,
    pub aired_episode: Option<u32>,
    pub dvd_season: Option<u32>,
    pub dvd_episode: Option<u32>,
    pub absolute_number: Option<u32>,
}
impl EpisodeQuery {
    /// Query by aired (broadcast) order.
    pub fn aired(season: u32, episode: u32) -> Self {
        Self::default().with_aired_season(season).with_aired_episode(episode)
    }

    /// Query every episode of an aired season.
    pub fn season(season: u32) -> Self {
        Self::default().with_aired_season(season)
    }

    pub fn with_aired_season(mut self, season: u32) -> Self {
        self.aired_season = Some(season);
        self
    }

    pub fn with_aired_episode(mut self, episode: u32) -> Self {
        self.aired_episode = Some(episode);
        self
    }

    pub fn with_dvd_season(mut self, season: u32) -> Self {
        self.dvd_season = Some(season);
        self
    }

    pub fn with_dvd_episode(mut self, episode: u32) -> Self {
        self.dvd_episode = Some(episode);
        self
    }

    pub fn with_absolute_number(mut self, number: u32) -> Self {
        self.absolute_number = Some(number);
        self
    }

    /// Returns `true` if no field is set (the query matches everything).
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Returns `true` if every set field equals the summary's value.
    pub fn matches(&self, episode: &RawEpisodeSummary) -> bool {
        fn check(wanted: Option<u32>, actual: Option<u32>) -> bool {
            wanted.is_none() || wanted == actual
        }
        check(self.aired_season, episode.aired_season)
            && check(self.aired_episode, episode.aired_episode)
            && check(self.dvd_season, episode.dvd_season)
            && check(self.dvd_episode, episode.dvd_episode)
            && check(self.absolute_number, episode.absolute_number)
    }
}

/// One entry of an episode listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEpisodeSummary {
    pub id: u64,
    pub name: Option<String>,
    pub aired_season: Option<u32>,
    pub aired_episode: Option<u32>,
    pub dvd_season: Option<u32>,
    pub dvd_episode: Option<u32>,
    pub absolute_number: Option<u32>,
    /// Air date (usually `YYYY-MM-DD`).
    pub first_aired: Option<String>,
}

/// Full episode record as returned by the remote catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEpisodeDetail {
    pub id: u64,
    pub series_id: u64,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub aired_season: Option<u32>,
    pub aired_episode: Option<u32>,
    pub dvd_season: Option<u32>,
    pub dvd_episode: Option<u32>,
    pub absolute_number: Option<u32>,
    pub first_aired: Option<String>,
    pub site_rating: Option<f32>,
    pub site_rating_count: Option<u32>,
    /// Flat list of director names.
    pub directors: Vec<String>,
    /// Flat list of writer names.
    pub writers: Vec<String>,
    /// Flat `"Name (Role)"` entries. Multi-role entries may be split across
    /// several consecutive items by the upstream service.
    pub guest_stars: Vec<String>,
    pub imdb_id: Option<String>,
    /// Relative path of the episode screencap.
    pub filename: Option<String>,
    pub thumb_width: Option<u32>,
    pub thumb_height: Option<u32>,
}
impl RawEpisodeDetail {
    /// The listing entry equivalent to this detail record.
    pub fn summary(&self) -> RawEpisodeSummary {
        RawEpisodeSummary {
            id: self.id,
            name: self.name.clone(),
            aired_season: self.aired_season,
            aired_episode: self.aired_episode,
            dvd_season: self.dvd_season,
            dvd_episode: self.dvd_episode,
            absolute_number: self.absolute_number,
            first_aired: self.first_aired.clone(),
        }
    }
}
