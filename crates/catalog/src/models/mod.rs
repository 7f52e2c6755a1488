mod artwork;
mod episode;
pub mod lang;
mod search;
mod series;
mod session;

pub use self::artwork::{ArtworkCategory, ArtworkCount, ArtworkFilter, RawArtwork};
pub use self::episode::{EpisodeQuery, RawEpisodeDetail, RawEpisodeSummary};
pub use self::search::{RawSearchResult, SearchFilter, SearchKind};
pub use self::series::{RawActor, RawSeriesDetail};
pub use self::session::Session;
