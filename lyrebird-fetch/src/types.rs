//! Provider boundary types
//!
//! A provider adapter is anything that can look up a song by (artist, title)
//! and hand back lyrics in the fixed [`LyricsResult`] shape, or nothing.
//! Adapters map their native payloads into that shape before results ever
//! reach the validator, so the validator only ever sees one shape.

use async_trait::async_trait;
use lyrebird_common::types::LyricsResult;
use std::sync::Arc;

/// Fetch capability contract, one implementation per provider.
///
/// Errors crossing this boundary are absorbed by the orchestrator into
/// `error` attempt records; they never abort the surrounding request.
/// `Ok(None)` means the provider answered but had nothing for this song.
#[async_trait]
pub trait LyricsFetcher: Send + Sync {
    async fn fetch(
        &self,
        artist: &str,
        song: &str,
        want_timestamps: bool,
    ) -> anyhow::Result<Option<LyricsResult>>;
}

/// A registry slot: a small integer id mapped to a named fetch capability.
#[derive(Clone)]
pub struct FetcherDescriptor {
    /// User-facing fetcher id (stable across releases)
    pub id: u8,
    /// Provider display name, used in attempt logs
    pub display_name: String,
    /// The adapter itself; `None` when the provider is known but not
    /// configured in this deployment
    pub fetcher: Option<Arc<dyn LyricsFetcher>>,
}

impl FetcherDescriptor {
    pub fn configured(&self) -> bool {
        self.fetcher.is_some()
    }
}

impl std::fmt::Debug for FetcherDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetcherDescriptor")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("configured", &self.configured())
            .finish()
    }
}
