//! lyrebird-fetch - Lyrics fetch orchestration
//!
//! Aggregates lyrics from several unreliable, heterogeneous external
//! providers and returns the single correct match even when providers are
//! slow, wrong, or silently return an unrelated song.
//!
//! The crate covers:
//! - running provider lookups sequentially or as a concurrent race;
//! - deciding, with fuzzy cross-script text comparison, whether a returned
//!   item is actually the requested song;
//! - cancelling remaining work only after a positive validation decision,
//!   never on a first-arrival basis.
//!
//! Provider adapters, the HTTP layer, caching and rate limiting live
//! outside this crate; providers are reachable only through the
//! [`LyricsFetcher`] trait.

pub mod error;
pub mod services;
pub mod types;

pub use crate::error::{FetchError, FetchResult};
pub use crate::types::{FetcherDescriptor, LyricsFetcher};
