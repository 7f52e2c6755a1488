use marquee_catalog::models::{ArtworkFilter, EpisodeQuery, SearchFilter};
use std::fmt::{Display, Formatter, Result as FmtResult, Write};

/// Terminates every segment of a key.
const SEPARATOR: char = '\x1F';

/// Deterministic key of a cached remote call.
///
/// A key is the operation name followed by each parameter, every segment
/// terminated by the ASCII unit separator. Keys are built explicitly at each
/// call site, so two calls with logically identical parameters always produce
/// the same key.
///
/// # Examples
///
/// ```
/// use marquee_cache::CacheKey;
/// use marquee_catalog::models::EpisodeQuery;
///
/// let a = CacheKey::new("episodes").part(73244u64).part(EpisodeQuery::default().with_aired_episode(2).with_aired_season(1));
/// let b = CacheKey::new("episodes").part(73244u64).part(EpisodeQuery::aired(1, 2));
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "episodes\x1F73244\x1Faired_season=1\x1Faired_episode=2\x1F");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);
impl CacheKey {
    pub fn new(operation: &str) -> Self {
        let mut key = Self(String::with_capacity(64));
        key.segment(operation);
        key
    }

    /// Append a parameter.
    pub fn part(mut self, part: impl KeyPart) -> Self {
        part.write_key(&mut self);
        self
    }

    /// Append one raw segment.
    pub fn segment(&mut self, value: impl Display) {
        let start = self.0.len();
        // Writing into a String cannot fail.
        let _ = write!(self.0, "{value}");
        // A separator inside a value would shift every following segment.
        if self.0[start..].contains(SEPARATOR) {
            let cleaned = self.0[start..].replace(SEPARATOR, "");
            self.0.truncate(start);
            self.0.push_str(&cleaned);
        }
        self.0.push(SEPARATOR);
    }

    /// Append a `name=value` segment when the value is present.
    pub fn field(&mut self, name: &str, value: Option<impl Display>) {
        if let Some(value) = value {
            self.segment(format_args!("{name}={value}"));
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl Display for CacheKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        // Separators are unreadable in logs.
        f.write_str(&self.0.trim_end_matches(SEPARATOR).replace(SEPARATOR, "/"))
    }
}

/// A parameter that can contribute to a [`CacheKey`].
///
/// Primitive values write themselves as one segment. Structured parameters
/// write one `name=value` segment per present field, in declaration order.
pub trait KeyPart {
    fn write_key(&self, key: &mut CacheKey);
}

macro_rules! display_key_part {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl KeyPart for $ty {
                fn write_key(&self, key: &mut CacheKey) {
                    key.segment(self);
                }
            }
        )+
    };
}
display_key_part!(u32, u64, i32, i64, bool, str, String);

impl<T: KeyPart + ?Sized> KeyPart for &T {
    fn write_key(&self, key: &mut CacheKey) {
        (**self).write_key(key);
    }
}

impl<T: KeyPart> KeyPart for Option<T> {
    /// An absent value still takes an empty segment so positions stay fixed.
    fn write_key(&self, key: &mut CacheKey) {
        match self {
            Some(value) => value.write_key(key),
            None => key.segment(""),
        }
    }
}

impl KeyPart for EpisodeQuery {
    fn write_key(&self, key: &mut CacheKey) {
        key.field("aired_season", self.aired_season);
        key.field("aired_episode", self.aired_episode);
        key.field("dvd_season", self.dvd_season);
        key.field("dvd_episode", self.dvd_episode);
        key.field("absolute_number", self.absolute_number);
    }
}

impl KeyPart for SearchFilter {
    fn write_key(&self, key: &mut CacheKey) {
        key.field("kind", Some(self.kind));
        key.field("year", self.year);
    }
}

impl KeyPart for ArtworkFilter {
    fn write_key(&self, key: &mut CacheKey) {
        key.field("category_id", self.category_id);
        key.field("season", self.season.as_deref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_only() {
        assert_eq!(CacheKey::new("languages").as_str(), "languages\x1F");
    }

    #[test]
    fn test_primitive_segments() {
        let key = CacheKey::new("series").part(42u64).part("en");
        assert_eq!(key.as_str(), "series\x1F42\x1Fen\x1F");
        assert_eq!(key.to_string(), "series/42/en");
    }

    #[test]
    fn test_absent_fields_are_skipped() {
        let key = CacheKey::new("episodes").part(EpisodeQuery::default().with_absolute_number(12));
        assert_eq!(key.as_str(), "episodes\x1Fabsolute_number=12\x1F");
    }

    #[test]
    fn test_fields_follow_declaration_order() {
        let a = EpisodeQuery::default().with_dvd_episode(3).with_aired_season(1).with_dvd_season(2);
        let b = EpisodeQuery::default().with_dvd_season(2).with_dvd_episode(3).with_aired_season(1);
        let key_a = CacheKey::new("episodes").part(a);
        let key_b = CacheKey::new("episodes").part(b);
        assert_eq!(key_a, key_b);
        assert_eq!(key_a.as_str(), "episodes\x1Faired_season=1\x1Fdvd_season=2\x1Fdvd_episode=3\x1F");
    }

    #[test]
    fn test_different_values_differ() {
        let one = CacheKey::new("episodes").part(EpisodeQuery::aired(1, 2));
        let other = CacheKey::new("episodes").part(EpisodeQuery::aired(1, 3));
        let dvd = CacheKey::new("episodes").part(EpisodeQuery::default().with_dvd_season(1).with_dvd_episode(2));
        assert_ne!(one, other);
        assert_ne!(one, dvd);
    }

    #[test]
    fn test_filters() {
        let search = CacheKey::new("search").part(SearchFilter::series().with_year(2005));
        assert_eq!(search.as_str(), "search\x1Fkind=series\x1Fyear=2005\x1F");
        let artwork = CacheKey::new("artwork").part(ArtworkFilter::category(7).with_season("2"));
        assert_eq!(artwork.as_str(), "artwork\x1Fcategory_id=7\x1Fseason=2\x1F");
    }

    #[test]
    fn test_optional_primitive_keeps_position() {
        let absent = CacheKey::new("op").part(None::<u32>).part(5u32);
        let present = CacheKey::new("op").part(Some(5u32)).part(None::<u32>);
        assert_eq!(absent.as_str(), "op\x1F\x1F5\x1F");
        assert_eq!(present.as_str(), "op\x1F5\x1F\x1F");
        assert_ne!(absent, present);
    }

    #[test]
    fn test_separator_in_value_is_dropped() {
        let key = CacheKey::new("search").part("a\x1Fb");
        assert_eq!(key.as_str(), "search\x1Fab\x1F");
    }
}
