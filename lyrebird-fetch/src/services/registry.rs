//! Fetcher registry
//!
//! Maps small integer ids to named fetch capabilities. The id space is
//! user-facing (callers pass `sequence=3,1`) and stable across releases.
//! The registry is constructed once at startup and passed by reference
//! into the orchestrator; there is no global mutable state.

use crate::types::{FetcherDescriptor, LyricsFetcher};
use lyrebird_common::{Error, Result};
use std::collections::BTreeMap;
use std::sync::Arc;

/// The standard provider slots, in id order.
pub const STANDARD_FETCHERS: [(u8, &str); 6] = [
    (1, "Genius"),
    (2, "LRCLIB"),
    (3, "SimpMusic"),
    (4, "YouTube Music"),
    (5, "Lyrics.ovh"),
    (6, "ChartLyrics"),
];

/// Registry of fetch capabilities, keyed by id.
#[derive(Debug, Default)]
pub struct FetcherRegistry {
    entries: BTreeMap<u8, FetcherDescriptor>,
}

impl FetcherRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the six standard provider slots, all unconfigured.
    /// Deployments attach adapters with [`configure`](Self::configure).
    pub fn with_standard_slots() -> Self {
        let mut registry = Self::new();
        for (id, name) in STANDARD_FETCHERS {
            registry.register(id, name, None);
        }
        registry
    }

    /// Register (or replace) a slot.
    pub fn register(
        &mut self,
        id: u8,
        display_name: impl Into<String>,
        fetcher: Option<Arc<dyn LyricsFetcher>>,
    ) {
        self.entries.insert(
            id,
            FetcherDescriptor {
                id,
                display_name: display_name.into(),
                fetcher,
            },
        );
    }

    /// Attach an adapter to an existing slot.
    pub fn configure(&mut self, id: u8, fetcher: Arc<dyn LyricsFetcher>) -> Result<()> {
        match self.entries.get_mut(&id) {
            Some(descriptor) => {
                descriptor.fetcher = Some(fetcher);
                Ok(())
            }
            None => Err(Error::InvalidInput(format!("Unknown fetcher id: {}", id))),
        }
    }

    pub fn get(&self, id: u8) -> Option<&FetcherDescriptor> {
        self.entries.get(&id)
    }

    pub fn contains(&self, id: u8) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = u8> + '_ {
        self.entries.keys().copied()
    }

    /// Smallest and largest registered id, for error messages.
    pub fn id_bounds(&self) -> Option<(u8, u8)> {
        let min = self.entries.keys().next()?;
        let max = self.entries.keys().next_back()?;
        Some((*min, *max))
    }
}
