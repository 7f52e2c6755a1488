/// A remote-defined artwork classification.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtworkCategory {
    pub id: u64,
    /// Category name, e.g. `"Poster"`, `"Background"`, `"ClearLogo"`.
    pub name: String,
    /// Record type the category applies to (`"series"`, `"season"`, ...).
    pub applies_to: String,
}
impl ArtworkCategory {
    pub fn new(id: u64, name: impl Into<String>, applies_to: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            applies_to: applies_to.into(),
        }
    }
}

/// Number of artwork records a series has in one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArtworkCount {
    pub category_id: u64,
    pub count: u32,
}

/// Filter for an artwork query.
///
/// The field order here is the order in which fields contribute to cache
/// keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ArtworkFilter {
    pub category_id: Option<u64>,
    /// Season affinity, as the remote identifier (season number as text).
    pub season: Option<String>,
}
impl ArtworkFilter {
    pub fn category(category_id: u64) -> Self {
        Self {
            category_id: Some(category_id),
            season: None,
        }
    }

    pub fn with_season(mut self, season: impl Into<String>) -> Self {
        self.season = Some(season.into());
        self
    }

    /// Returns `true` if the artwork passes every set field.
    pub fn matches(&self, artwork: &RawArtwork) -> bool {
        self.category_id.is_none_or(|id| id == artwork.category_id)
            && self.season.as_ref().is_none_or(|season| artwork.season.as_ref() == Some(season))
    }
}

/// One artwork record as returned by the remote catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawArtwork {
    pub id: u64,
    /// Relative path (or absolute URL) of the full-size image.
    pub file_name: String,
    /// Relative path (or absolute URL) of the thumbnail.
    pub thumbnail: Option<String>,
    pub language: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Community rating average.
    pub rating: Option<f64>,
    /// Number of community votes behind `rating`.
    pub rating_count: Option<u32>,
    pub category_id: u64,
    /// Season affinity identifier, when the artwork belongs to a season.
    pub season: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artwork(category_id: u64, season: Option<&str>) -> RawArtwork {
        RawArtwork {
            category_id,
            season: season.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn filter_by_category() {
        let filter = ArtworkFilter::category(2);
        assert!(filter.matches(&artwork(2, None)));
        assert!(filter.matches(&artwork(2, Some("1"))));
        assert!(!filter.matches(&artwork(3, None)));
    }

    #[test]
    fn filter_by_season() {
        let filter = ArtworkFilter::category(7).with_season("2");
        assert!(filter.matches(&artwork(7, Some("2"))));
        assert!(!filter.matches(&artwork(7, Some("3"))));
        assert!(!filter.matches(&artwork(7, None)));
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(ArtworkFilter::default().matches(&artwork(1, None)));
    }
}
