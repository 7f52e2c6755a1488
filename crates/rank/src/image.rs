//! Artwork Ranking
//!
//! The remote catalog classifies artwork with its own category ids. The host
//! only knows a handful of image slots ([`ImageKind`]), so every category is
//! mapped through its name. Ranking prefers the host's language, then the
//! community score, then the number of votes behind that score.

use crate::error::{ErrorKind, Result};
use derive_more::Display;
use exn::OptionExt;
use marquee_catalog::is_english;
use marquee_catalog::models::{ArtworkCategory, RawArtwork};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Where relative artwork paths are served from.
pub const ARTWORK_BASE_URL: &str = "https://artworks.thetvdb.com/banners/";

/// Image slot in the host's vocabulary.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Primary,
    Banner,
    Backdrop,
    Logo,
    Thumb,
}
impl ImageKind {
    /// Map a remote category name (any casing) onto an image slot.
    ///
    /// # Examples
    ///
    /// ```
    /// use marquee_rank::ImageKind;
    /// assert_eq!(ImageKind::from_category_name("Background"), Some(ImageKind::Backdrop));
    /// assert_eq!(ImageKind::from_category_name("POSTER"), Some(ImageKind::Primary));
    /// assert_eq!(ImageKind::from_category_name("hologram"), None);
    /// ```
    pub fn from_category_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "poster" | "season" => Some(Self::Primary),
            "banner" | "series" | "seasonwide" => Some(Self::Banner),
            "background" | "fanart" => Some(Self::Backdrop),
            "clearlogo" | "logo" => Some(Self::Logo),
            "icon" | "thumbnail" | "screencap" => Some(Self::Thumb),
            _ => None,
        }
    }
}

/// The remote artwork taxonomy, as a category id to name table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtworkCategories {
    names: HashMap<u64, String>,
}
impl ArtworkCategories {
    pub fn new(categories: impl IntoIterator<Item = ArtworkCategory>) -> Self {
        categories.into_iter().collect()
    }

    pub fn name(&self, id: u64) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    /// Image slot for a category id.
    ///
    /// # Errors
    /// [`UnknownArtworkCategory`](ErrorKind::UnknownArtworkCategory) when the
    /// id is not in the table or its name is not a known category name.
    pub fn kind_for(&self, id: u64) -> Result<ImageKind> {
        let kind = self
            .name(id)
            .and_then(ImageKind::from_category_name)
            .ok_or_raise(|| ErrorKind::UnknownArtworkCategory(id))?;
        Ok(kind)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
impl FromIterator<ArtworkCategory> for ArtworkCategories {
    fn from_iter<I: IntoIterator<Item = ArtworkCategory>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(|c| (c.id, c.name)).collect(),
        }
    }
}

/// Turn a catalog artwork path into an absolute URL.
///
/// # Examples
///
/// ```
/// use marquee_rank::image::artwork_url;
/// assert_eq!(artwork_url("posters/1.jpg"), "https://artworks.thetvdb.com/banners/posters/1.jpg");
/// assert_eq!(artwork_url("https://cdn.example/x.jpg"), "https://cdn.example/x.jpg");
/// ```
pub fn artwork_url(path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else {
        format!("{ARTWORK_BASE_URL}{}", path.trim_start_matches('/'))
    }
}

/// A candidate image for one of the host's image slots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArtworkItem {
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub language: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Community rating average.
    pub score: Option<f64>,
    /// Number of votes behind `score`.
    pub votes: Option<u32>,
    pub category_id: u64,
    /// Season affinity identifier.
    pub season: Option<String>,
}
impl ArtworkItem {
    pub fn from_raw(raw: &RawArtwork) -> Self {
        Self {
            url: artwork_url(&raw.file_name),
            thumbnail_url: raw.thumbnail.as_deref().filter(|t| !t.is_empty()).map(artwork_url),
            language: raw.language.clone(),
            width: raw.width,
            height: raw.height,
            score: raw.rating,
            votes: raw.rating_count,
            category_id: raw.category_id,
            season: raw.season.clone(),
        }
    }
}

/// How well an image language suits the preferred language; higher is
/// better.
///
/// - `3`: exact match (case-insensitive), or no language when English is
///   preferred.
/// - `2`: English or no language, when another language is preferred.
/// - `0`: anything else.
pub fn language_tier(language: Option<&str>, preferred: &str) -> u8 {
    let preferred_english = is_english(preferred);
    match language.map(str::trim).filter(|l| !l.is_empty()) {
        Some(language) if language.eq_ignore_ascii_case(preferred.trim()) => 3,
        Some(language) if !preferred_english && language.eq_ignore_ascii_case("en") => 2,
        Some(_) => 0,
        None if preferred_english => 3,
        None => 2,
    }
}

/// Order images best first.
///
/// When `season` is given, only images with exactly that season affinity are
/// kept. The sort is stable: images that tie keep their incoming order.
pub fn rank_images(
    images: impl IntoIterator<Item = ArtworkItem>,
    season: Option<&str>,
    preferred_language: &str,
) -> Vec<ArtworkItem> {
    let mut tiered: Vec<(u8, ArtworkItem)> = images
        .into_iter()
        .filter(|image| season.is_none_or(|s| image.season.as_deref() == Some(s)))
        .map(|image| (language_tier(image.language.as_deref(), preferred_language), image))
        .collect();
    tiered.sort_by(|(tier_a, a), (tier_b, b)| {
        tier_b
            .cmp(tier_a)
            .then_with(|| compare_score(b.score, a.score))
            .then_with(|| b.votes.unwrap_or(0).cmp(&a.votes.unwrap_or(0)))
    });
    tiered.into_iter().map(|(_, image)| image).collect()
}

fn compare_score(a: Option<f64>, b: Option<f64>) -> Ordering {
    a.unwrap_or(0.0).total_cmp(&b.unwrap_or(0.0))
}
