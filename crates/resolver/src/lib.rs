//! Series, episode and artwork metadata for a media library host.
//!
//! The [`Resolver`] is the boundary the host talks to. It identifies series
//! from a title, year or known ID, assembles series and episode records with
//! their credits, and discovers ranked artwork. Remote calls are cached and
//! authenticated through `marquee-cache`; ranking is delegated to
//! `marquee-rank`.

pub mod credits;
pub mod error;
pub mod models;
mod resolver;

pub use crate::models::{
    EpisodeRecord, Person, PersonKind, RemoteImage, SeriesQuery, SeriesRecord, SeriesStatus,
};
pub use crate::resolver::{Resolver, ResolverOptions};
