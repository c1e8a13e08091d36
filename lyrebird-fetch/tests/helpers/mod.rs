//! Shared test fixtures: scripted fake fetchers and registry builders
#![allow(dead_code)]

use async_trait::async_trait;
use lyrebird_common::types::{LyricsResult, TimedLine};
use lyrebird_fetch::services::FetcherRegistry;
use lyrebird_fetch::types::LyricsFetcher;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Quiet-by-default tracing for test debugging (RUST_LOG to enable).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

pub fn lyrics(source: &str, artist: &str, title: &str) -> LyricsResult {
    LyricsResult {
        source: source.to_string(),
        artist: artist.to_string(),
        title: title.to_string(),
        lyrics: "line one\nline two".to_string(),
        timed_lines: None,
        has_timestamps: false,
    }
}

pub fn timed_lyrics(source: &str, artist: &str, title: &str) -> LyricsResult {
    LyricsResult {
        timed_lines: Some(vec![
            TimedLine {
                text: "line one".to_string(),
                start_ms: 0,
                end_ms: 2000,
            },
            TimedLine {
                text: "line two".to_string(),
                start_ms: 2000,
                end_ms: 4000,
            },
        ]),
        has_timestamps: true,
        ..lyrics(source, artist, title)
    }
}

/// Replies with a fixed result after a fixed delay, counting invocations.
pub struct ScriptedFetcher {
    delay: Duration,
    reply: Option<LyricsResult>,
    calls: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new(delay: Duration, reply: Option<LyricsResult>) -> Arc<Self> {
        Arc::new(Self {
            delay,
            reply,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LyricsFetcher for ScriptedFetcher {
    async fn fetch(
        &self,
        _artist: &str,
        _song: &str,
        _want_timestamps: bool,
    ) -> anyhow::Result<Option<LyricsResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(self.reply.clone())
    }
}

/// Always fails with the given message.
pub struct FailingFetcher {
    message: String,
}

impl FailingFetcher {
    pub fn new(message: &str) -> Arc<Self> {
        Arc::new(Self {
            message: message.to_string(),
        })
    }
}

#[async_trait]
impl LyricsFetcher for FailingFetcher {
    async fn fetch(
        &self,
        _artist: &str,
        _song: &str,
        _want_timestamps: bool,
    ) -> anyhow::Result<Option<LyricsResult>> {
        anyhow::bail!("{}", self.message)
    }
}

/// Never settles; only the per-task timeout ends it.
pub struct NeverFetcher;

#[async_trait]
impl LyricsFetcher for NeverFetcher {
    async fn fetch(
        &self,
        _artist: &str,
        _song: &str,
        _want_timestamps: bool,
    ) -> anyhow::Result<Option<LyricsResult>> {
        std::future::pending::<()>().await;
        unreachable!()
    }
}

/// Panics when invoked; exercises task-failure recovery.
pub struct PanickingFetcher;

#[async_trait]
impl LyricsFetcher for PanickingFetcher {
    async fn fetch(
        &self,
        _artist: &str,
        _song: &str,
        _want_timestamps: bool,
    ) -> anyhow::Result<Option<LyricsResult>> {
        panic!("provider adapter bug")
    }
}

/// Registry with the given configured slots.
pub fn registry_of(
    entries: Vec<(u8, &str, Arc<dyn LyricsFetcher>)>,
) -> Arc<FetcherRegistry> {
    let mut registry = FetcherRegistry::new();
    for (id, name, fetcher) in entries {
        registry.register(id, name, Some(fetcher));
    }
    Arc::new(registry)
}
