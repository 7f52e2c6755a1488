//! Title normalization and result ranking.
//!
//! Everything in this crate is pure and synchronous: it takes records that
//! were already fetched from the remote catalog and decides which of them the
//! host should see first.
//!
//! - [`normalize`]: comparable names and query-name parsing.
//! - [`series`]: ranking of series search candidates.
//! - [`image`]: artwork category mapping and image ranking.

mod consts;
pub mod error;
pub mod image;
pub mod normalize;
pub mod series;

pub use crate::image::{ArtworkCategories, ArtworkItem, ImageKind, rank_images};
pub use crate::normalize::{ParsedName, comparable_name};
pub use crate::series::{MatchKey, MatchQuery, ProviderIds, SearchCandidate, rank_candidates};

/// An item together with the key it was sorted by.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranked<T, K> {
    pub item: T,
    pub key: K,
}
