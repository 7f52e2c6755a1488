use std::fmt::{Display, Formatter, Result as FmtResult};

/// Kind of record a search should return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SearchKind {
    #[default]
    Series,
    Movie,
    Person,
}
impl SearchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchKind::Series => "series",
            SearchKind::Movie => "movie",
            SearchKind::Person => "person",
        }
    }
}
impl Display for SearchKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Filters applied to a free-text search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SearchFilter {
    /// Record kind; series unless stated otherwise.
    pub kind: SearchKind,
    /// Restrict results to a first-air year.
    pub year: Option<i32>,
}
impl SearchFilter {
    pub fn series() -> Self {
        Self::default()
    }

    pub fn with_year(mut self, year: impl Into<Option<i32>>) -> Self {
        self.year = year.into();
        self
    }
}

/// One item of a remote search response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSearchResult {
    /// Catalog id of the series.
    pub id: u64,
    /// Primary title, in the remote service's original casing.
    pub name: String,
    /// Alternative titles.
    pub aliases: Vec<String>,
    /// First-air date as sent by the service (usually `YYYY-MM-DD`).
    pub first_aired: Option<String>,
    /// Relative path of the series banner, if any.
    pub banner: Option<String>,
    pub overview: Option<String>,
    pub network: Option<String>,
}
