//! Series Candidate Ranking

use crate::Ranked;
use crate::normalize::ParsedName;
use marquee_catalog::models::RawSearchResult;
use time::Date;
use time::macros::format_description;

/// Identifiers of a series across providers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ProviderIds {
    /// Id in the remote catalog. Always present.
    pub catalog: u64,
    pub imdb: Option<String>,
    pub zap2it: Option<String>,
}
impl ProviderIds {
    pub fn catalog(id: u64) -> Self {
        Self {
            catalog: id,
            ..Default::default()
        }
    }
}

/// One unconfirmed search match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCandidate {
    /// Primary title first, then aliases.
    pub titles: Vec<String>,
    pub production_year: Option<i32>,
    pub external_ids: ProviderIds,
    pub overview: Option<String>,
    /// Relative path or URL of the series banner.
    pub image: Option<String>,
}
impl SearchCandidate {
    pub fn from_raw(raw: &RawSearchResult) -> Self {
        let titles = std::iter::once(raw.name.clone())
            .chain(raw.aliases.iter().cloned())
            .filter(|t| !t.trim().is_empty())
            .collect();
        Self {
            titles,
            production_year: raw.first_aired.as_deref().and_then(parse_air_date).map(|d| d.year()),
            external_ids: ProviderIds::catalog(raw.id),
            overview: raw.overview.clone(),
            image: raw.banner.clone(),
        }
    }

    /// The primary title, if the record had any.
    pub fn name(&self) -> Option<&str> {
        self.titles.first().map(String::as_str)
    }

    pub fn id(&self) -> u64 {
        self.external_ids.catalog
    }
}

/// Parse a catalog air date: `YYYY-MM-DD`, optionally followed by a time.
pub fn parse_air_date(value: &str) -> Option<Date> {
    let value = value.trim();
    let date = value.get(..10)?;
    let rest = &value[10..];
    if !(rest.is_empty() || rest.starts_with([' ', 'T', 't'])) {
        return None;
    }
    Date::parse(date, format_description!("[year]-[month]-[day]")).ok()
}

/// Returns `false` only when both years are known and differ by more than
/// `tolerance`.
pub fn within_year(candidate: Option<i32>, wanted: Option<i32>, tolerance: u32) -> bool {
    match (candidate, wanted) {
        (Some(candidate), Some(wanted)) => candidate.abs_diff(wanted) <= tolerance,
        _ => true,
    }
}

/// Sort key of a candidate; lower is better.
///
/// Field order is significant: the derived [`Ord`] compares fields top to
/// bottom. Every flag is `0` when the condition holds and `1` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MatchKey {
    /// A title equals the raw query name (case-insensitive).
    pub exact_title: u8,
    /// A title contains the parsed query name.
    pub contains_name: u8,
    /// The production year equals the parsed query year.
    pub same_year: u8,
    /// A title contains the comparable query name.
    pub contains_comparable: u8,
    /// Position in the remote relevance order.
    pub position: usize,
}

/// A search query prepared for ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchQuery {
    raw: String,
    parsed: ParsedName,
    comparable: String,
}
impl MatchQuery {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let parsed = ParsedName::parse(&raw);
        let comparable = parsed.comparable();
        Self { raw, parsed, comparable }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn parsed(&self) -> &ParsedName {
        &self.parsed
    }

    /// What the remote search is sent.
    pub fn comparable_name(&self) -> &str {
        &self.comparable
    }

    pub fn key_for(&self, candidate: &SearchCandidate, position: usize) -> MatchKey {
        let titles: Vec<String> = candidate.titles.iter().map(|t| t.to_lowercase()).collect();
        let raw = self.raw.trim().to_lowercase();
        let name = self.parsed.name.to_lowercase();
        let flag = |hit: bool| u8::from(!hit);
        MatchKey {
            exact_title: flag(titles.iter().any(|t| *t == raw)),
            contains_name: flag(titles.iter().any(|t| t.contains(&name))),
            same_year: flag(candidate.production_year.is_some() && candidate.production_year == self.parsed.year),
            contains_comparable: flag(titles.iter().any(|t| t.contains(&self.comparable))),
            position,
        }
    }
}

/// Order candidates best first.
///
/// `candidates` must be in the remote service's relevance order: positions
/// are taken from it.
pub fn rank_candidates(
    query: &MatchQuery,
    candidates: impl IntoIterator<Item = SearchCandidate>,
) -> Vec<Ranked<SearchCandidate, MatchKey>> {
    let mut ranked: Vec<_> = candidates
        .into_iter()
        .enumerate()
        .map(|(position, item)| {
            let key = query.key_for(&item, position);
            Ranked { item, key }
        })
        .collect();
    ranked.sort_by_key(|r| r.key);
    ranked
}
