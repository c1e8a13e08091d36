//! Concurrent fetch race
//!
//! Runs one independent task per fetcher id and validates completions in
//! completion order. The critical correctness property: a wrong early
//! answer must never preempt a correct later one. Remaining tasks are
//! cancelled only after a result passes validation, never on first
//! arrival.
//!
//! Single-writer aggregation: the pending set and the attempt log are
//! owned by the coordinating loop and only ever touched there. Tasks
//! communicate exclusively through their completion values, so no locks
//! are needed. Cancellation is cooperative: a task that observes its token
//! before settling resolves to "no attempt", which is how a
//! cancellation/completion race stays unambiguous.

use crate::services::{FetcherRegistry, MatchValidator};
use futures::stream::{FuturesUnordered, StreamExt};
use lyrebird_common::types::{AttemptOutcome, FetchAttempt, FetchRequest, LyricsResult};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Terminal state of one racing fetch task.
enum SettledOutcome {
    Fetched(LyricsResult),
    NoLyrics { message: Option<String> },
    TimedOut,
    Failed(String),
}

struct TaskSettled {
    id: u8,
    api: String,
    outcome: SettledOutcome,
}

pub struct RaceCoordinator {
    registry: Arc<FetcherRegistry>,
    validator: MatchValidator,
    task_timeout: Duration,
}

impl RaceCoordinator {
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

    /// Race all of `ids` concurrently; accept the first completion that
    /// passes validation, then cancel the rest. Exhaustion returns `None`
    /// plus every settled attempt.
    pub async fn race(
        &self,
        request: &FetchRequest,
        ids: &[u8],
    ) -> (Option<LyricsResult>, Vec<FetchAttempt>) {
        let mut attempts = Vec::with_capacity(ids.len());
        let mut tokens: HashMap<u8, CancellationToken> = HashMap::new();
        let mut pending = FuturesUnordered::new();

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
                attempts.push(FetchAttempt::new(api, AttemptOutcome::NotConfigured));
                continue;
            };

            let token = CancellationToken::new();
            tokens.insert(id, token.clone());

            let artist = request.artist.clone();
            let song = request.song.clone();
            let want_timestamps = request.want_timestamps;
            let task_timeout = self.task_timeout;
            let task_api = api.clone();

            tracing::debug!(api = %api, id, "Dispatching race task");

            let handle = tokio::spawn(async move {
                tokio::select! {
                    // Cancelled before settling: produce no attempt record.
                    _ = token.cancelled() => None,
                    fetched = tokio::time::timeout(
                        task_timeout,
                        fetcher.fetch(&artist, &song, want_timestamps),
                    ) => {
                        let outcome = match fetched {
                            Err(_) => SettledOutcome::TimedOut,
                            Ok(Err(e)) => SettledOutcome::Failed(e.to_string()),
                            Ok(Ok(None)) => SettledOutcome::NoLyrics { message: None },
                            Ok(Ok(Some(result))) => {
                                if result.lyrics.trim().is_empty() {
                                    SettledOutcome::NoLyrics { message: None }
                                } else if want_timestamps && !result.has_timestamps {
                                    SettledOutcome::NoLyrics {
                                        message: Some("result has no timestamps".to_string()),
                                    }
                                } else {
                                    SettledOutcome::Fetched(result)
                                }
                            }
                        };
                        Some(TaskSettled { id, api: task_api, outcome })
                    }
                }
            });

            // Recover panics into error attempts instead of letting a
            // JoinError escape the aggregation loop.
            let join_api = api;
            pending.push(async move {
                match handle.await {
                    Ok(settled) => settled,
                    Err(e) => Some(TaskSettled {
                        id,
                        api: join_api,
                        outcome: SettledOutcome::Failed(format!("task failed: {}", e)),
                    }),
                }
            });
        }

        // Wait for completions one at a time, in completion order.
        while let Some(settled) = pending.next().await {
            let Some(settled) = settled else {
                continue;
            };

            match settled.outcome {
                SettledOutcome::Fetched(result) => {
                    let verdict =
                        self.validator
                            .validate(&request.artist, &request.song, &result);
                    if verdict.valid {
                        // Validated accept: now, and only now, cancel the
                        // rest of the pending set.
                        for (other_id, token) in &tokens {
                            if *other_id != settled.id {
                                token.cancel();
                            }
                        }
                        tracing::info!(
                            api = %settled.api,
                            artist = %request.artist,
                            song = %request.song,
                            "Race won by validated result"
                        );
                        attempts.push(
                            FetchAttempt::new(settled.api, AttemptOutcome::Success)
                                .with_verdict(verdict),
                        );
                        return (Some(result), attempts);
                    }
                    tracing::debug!(
                        api = %settled.api,
                        reason = %verdict.reason,
                        "Race completion rejected, race continues"
                    );
                    attempts.push(
                        FetchAttempt::new(settled.api, AttemptOutcome::ValidationFailed)
                            .with_result(result)
                            .with_verdict(verdict),
                    );
                }
                SettledOutcome::NoLyrics { message } => {
                    let mut attempt = FetchAttempt::new(settled.api, AttemptOutcome::NoLyrics);
                    if let Some(message) = message {
                        attempt = attempt.with_message(message);
                    }
                    attempts.push(attempt);
                }
                SettledOutcome::TimedOut => {
                    tracing::warn!(api = %settled.api, "Race task timed out");
                    attempts.push(FetchAttempt::new(settled.api, AttemptOutcome::Timeout));
                }
                SettledOutcome::Failed(message) => {
                    tracing::warn!(api = %settled.api, error = %message, "Race task failed");
                    attempts.push(
                        FetchAttempt::new(settled.api, AttemptOutcome::Error)
                            .with_message(message),
                    );
                }
            }
        }

        tracing::debug!(
            artist = %request.artist,
            song = %request.song,
            attempts = attempts.len(),
            "Race exhausted without a valid result"
        );
        (None, attempts)
    }
}
