//! In-memory caches in front of the remote TV catalog.
//!
//! Nothing here is persisted: a restart invalidates everything, and the
//! remote catalog remains the source of truth.
//!
//! # Architecture
//! - [`SessionCache`]: one authenticated [`Session`](marquee_catalog::Session)
//!   per language. Logs in lazily, refreshes stale tokens, and serializes
//!   refreshes per language without ever blocking other languages.
//! - [`ResultCache`]: remote call results keyed by a [`CacheKey`] and kept for
//!   a fixed time-to-live. A miss borrows a session from the session cache
//!   before running the remote call.

pub mod error;
mod key;
mod result;
mod session;

pub use crate::key::{CacheKey, KeyPart};
pub use crate::result::ResultCache;
pub use crate::session::SessionCache;
