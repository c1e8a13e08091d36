//! Sequential fetch runner
//!
//! Tries fetchers one at a time in the given order, validating each result
//! before advancing. Returns on the first valid verdict; a provider that
//! answers with the wrong song is recorded as `validation_failed` and the
//! runner moves on.

use crate::services::{FetcherRegistry, MatchValidator};
use lyrebird_common::types::{AttemptOutcome, FetchAttempt, FetchRequest, LyricsResult};
use std::sync::Arc;
use std::time::Duration;

pub struct SequentialRunner {
    registry: Arc<FetcherRegistry>,
    validator: MatchValidator,
    task_timeout: Duration,
}

impl SequentialRunner {
    pub fn new(
        registry: Arc<FetcherRegistry>,
        validator: MatchValidator,
        task_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            validator,
            task_timeout,
        }
    }

    /// Walk `ids` in order until one fetcher produces a validated result.
    /// Every id produces exactly one attempt record; exhaustion returns
    /// `None` plus the full attempt list.
    pub async fn run(
        &self,
        request: &FetchRequest,
        ids: &[u8],
    ) -> (Option<LyricsResult>, Vec<FetchAttempt>) {
        let mut attempts = Vec::with_capacity(ids.len());

        for &id in ids {
            let Some(descriptor) = self.registry.get(id) else {
                attempts.push(FetchAttempt::new(
                    format!("fetcher #{}", id),
                    AttemptOutcome::NotConfigured,
                ));
                continue;
            };
            let api = descriptor.display_name.clone();
            let Some(fetcher) = descriptor.fetcher.clone() else {
                tracing::debug!(api = %api, "Fetcher not configured, skipping");
                attempts.push(FetchAttempt::new(api, AttemptOutcome::NotConfigured));
                continue;
            };

            tracing::debug!(
                api = %api,
                artist = %request.artist,
                song = %request.song,
                "Trying fetcher"
            );

            let fetched = tokio::time::timeout(
                self.task_timeout,
                fetcher.fetch(&request.artist, &request.song, request.want_timestamps),
            )
            .await;

            match fetched {
                Err(_) => {
                    tracing::warn!(api = %api, "Fetcher timed out");
                    attempts.push(FetchAttempt::new(api, AttemptOutcome::Timeout));
                }
                Ok(Err(e)) => {
                    tracing::warn!(api = %api, error = %e, "Fetcher failed");
                    attempts.push(
                        FetchAttempt::new(api, AttemptOutcome::Error).with_message(e.to_string()),
                    );
                }
                Ok(Ok(None)) => {
                    attempts.push(FetchAttempt::new(api, AttemptOutcome::NoLyrics));
                }
                Ok(Ok(Some(result))) => {
                    if result.lyrics.trim().is_empty() {
                        attempts.push(FetchAttempt::new(api, AttemptOutcome::NoLyrics));
                        continue;
                    }
                    if request.want_timestamps && !result.has_timestamps {
                        attempts.push(
                            FetchAttempt::new(api, AttemptOutcome::NoLyrics)
                                .with_message("result has no timestamps"),
                        );
                        continue;
                    }
                    let verdict =
                        self.validator
                            .validate(&request.artist, &request.song, &result);
                    if verdict.valid {
                        attempts.push(
                            FetchAttempt::new(api, AttemptOutcome::Success).with_verdict(verdict),
                        );
                        return (Some(result), attempts);
                    }
                    attempts.push(
                        FetchAttempt::new(api, AttemptOutcome::ValidationFailed)
                            .with_result(result)
                            .with_verdict(verdict),
                    );
                }
            }
        }

        (None, attempts)
    }
}
