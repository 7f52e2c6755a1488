/// Full series record as returned by the remote catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSeriesDetail {
    pub id: u64,
    pub name: String,
    pub aliases: Vec<String>,
    pub overview: Option<String>,
    /// First-air date (usually `YYYY-MM-DD`).
    pub first_aired: Option<String>,
    /// Airing status, e.g. `"Continuing"` or `"Ended"`.
    pub status: Option<String>,
    /// `"Daily"`, a weekday name, or something the service made up.
    pub airs_day_of_week: Option<String>,
    pub airs_time: Option<String>,
    /// Typical episode runtime in minutes.
    pub runtime: Option<u32>,
    /// Official content rating (e.g. `"TV-14"`).
    pub rating: Option<String>,
    /// Community rating average.
    pub site_rating: Option<f32>,
    pub site_rating_count: Option<u32>,
    pub genres: Vec<String>,
    pub network: Option<String>,
    pub imdb_id: Option<String>,
    pub zap2it_id: Option<String>,
    /// Season numbers that have aired episodes (specials are season `0`).
    pub aired_seasons: Vec<u32>,
    pub actors: Vec<RawActor>,
}

/// A cast member attached to a series.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawActor {
    pub id: u64,
    pub name: String,
    pub role: Option<String>,
    /// Billing order; lower is more prominent.
    pub sort_order: i32,
    /// Relative path of the actor's photo.
    pub image: Option<String>,
}
