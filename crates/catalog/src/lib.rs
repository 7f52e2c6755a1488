//! Remote TV catalog client interface.
//!
//! This crate describes the boundary between the metadata layer and the remote
//! catalog service: the [`RemoteCatalogClient`] trait, the raw records it
//! returns, and the language-code helpers that every layer above agrees on.
//! The HTTP transport and response deserialization live in implementations of
//! the trait and are not part of this crate.
//!
//! With the `mock` feature enabled, [`MockCatalog`](client::MockCatalog)
//! provides an in-memory client with call counters and failure injection for
//! tests in other crates.

pub mod client;
pub mod error;
pub mod models;

pub use crate::client::RemoteCatalogClient;
pub use crate::models::Session;
pub use crate::models::lang::{DEFAULT_LANGUAGE, is_english, normalize_language};
use std::sync::Arc;

pub type ClientHandle = Arc<dyn RemoteCatalogClient + Send + Sync>;
