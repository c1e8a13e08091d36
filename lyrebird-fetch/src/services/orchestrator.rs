//! Fetch orchestrator
//!
//! Top-level entry point: validates any custom sequence before a single
//! fetch is dispatched, chooses between the sequential runner and the race
//! coordinator from the request parameters, and shapes the outcome into
//! the wire response the routing layer serves.
//!
//! Strategy selection:
//! - fast mode races a fixed small id set;
//! - a custom sequence with more than one id races over exactly that set;
//! - a custom sequence with one id runs sequentially (degenerate race);
//! - otherwise the default id list runs sequentially, with a shorter list
//!   when timed lyrics were requested.

use crate::error::{FetchError, FetchResult};
use crate::services::{FetcherRegistry, MatchValidator, RaceCoordinator, SequentialRunner};
use chrono::Utc;
use lyrebird_common::config::TomlConfig;
use lyrebird_common::types::{
    AttemptOutcome, FetchAttempt, FetchRequest, LyricsResult, ResolveError, ResolveResponse,
    ResolveStatus,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Default provider order for plain lyrics.
pub const DEFAULT_PLAIN_SEQUENCE: &[u8] = &[1, 2, 3, 4, 5, 6];

/// Default provider order when timed lyrics were requested; only the
/// providers that can return timestamps are worth trying.
pub const DEFAULT_TIMED_SEQUENCE: &[u8] = &[2, 3, 4];

/// Fixed id set raced in fast mode.
pub const FAST_RACE_SEQUENCE: &[u8] = &[2, 3, 4];

/// Which runner a request resolves through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    Sequential(Vec<u8>),
    Race(Vec<u8>),
}

pub struct FetchOrchestrator {
    registry: Arc<FetcherRegistry>,
    sequential: SequentialRunner,
    race: RaceCoordinator,
}

impl FetchOrchestrator {
    pub fn new(registry: Arc<FetcherRegistry>, config: &TomlConfig) -> Self {
        let validator = MatchValidator::new(&config.matching);
        let task_timeout = Duration::from_secs(config.fetch.task_timeout_secs);
        Self {
            sequential: SequentialRunner::new(
                Arc::clone(&registry),
                validator.clone(),
                task_timeout,
            ),
            race: RaceCoordinator::new(Arc::clone(&registry), validator, task_timeout),
            registry,
        }
    }

    /// Parse and validate a comma-separated sequence spec ("3,1") against
    /// the registry. Runs before any fetch is dispatched; a violation
    /// means no partial work was performed.
    pub fn parse_sequence(&self, spec: &str) -> FetchResult<Vec<u8>> {
        let mut ids = Vec::new();
        for part in spec.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let id: u8 = part.parse().map_err(|_| {
                FetchError::InvalidSequence(
                    "must be comma-separated integers".to_string(),
                )
            })?;
            ids.push(id);
        }

        let (min_id, max_id) = self
            .registry
            .id_bounds()
            .ok_or_else(|| FetchError::InvalidSequence("no fetchers registered".to_string()))?;

        let mut seen = HashSet::new();
        let valid = !ids.is_empty()
            && ids.len() <= self.registry.len()
            && ids.iter().all(|id| self.registry.contains(*id))
            && ids.iter().all(|id| seen.insert(*id));
        if !valid {
            return Err(FetchError::InvalidSequence(format!(
                "must be unique numbers between {} and {}",
                min_id, max_id
            )));
        }

        Ok(ids)
    }

    /// Pick the runner and id list for a validated request.
    pub fn choose_strategy(&self, request: &FetchRequest) -> Strategy {
        if request.fast_mode {
            return Strategy::Race(FAST_RACE_SEQUENCE.to_vec());
        }
        match &request.custom_sequence {
            Some(ids) if ids.len() > 1 => Strategy::Race(ids.clone()),
            Some(ids) => Strategy::Sequential(ids.clone()),
            None => {
                let ids = if request.want_timestamps {
                    DEFAULT_TIMED_SEQUENCE
                } else {
                    DEFAULT_PLAIN_SEQUENCE
                };
                Strategy::Sequential(ids.to_vec())
            }
        }
    }

    /// Typed entry point for in-process callers: resolve a request whose
    /// custom sequence (if any) has already been parsed.
    pub async fn resolve_request(
        &self,
        request: &FetchRequest,
    ) -> (FetchResult<LyricsResult>, Vec<FetchAttempt>) {
        let request_id = Uuid::new_v4();
        let strategy = self.choose_strategy(request);
        tracing::info!(
            request_id = %request_id,
            artist = %request.artist,
            song = %request.song,
            want_timestamps = request.want_timestamps,
            strategy = ?strategy,
            "Resolving lyrics request"
        );

        let (result, attempts) = match &strategy {
            Strategy::Sequential(ids) => self.sequential.run(request, ids).await,
            Strategy::Race(ids) => self.race.race(request, ids).await,
        };

        match result {
            Some(lyrics) => {
                tracing::info!(
                    request_id = %request_id,
                    source = %lyrics.source,
                    attempts = attempts.len(),
                    "Request resolved"
                );
                (Ok(lyrics), attempts)
            }
            None => {
                tracing::warn!(
                    request_id = %request_id,
                    artist = %request.artist,
                    song = %request.song,
                    attempts = attempts.len(),
                    "Request exhausted all fetchers"
                );
                (
                    Err(FetchError::Exhausted {
                        artist: request.artist.clone(),
                        song: request.song.clone(),
                    }),
                    attempts,
                )
            }
        }
    }

    /// Wire-shaped entry point consumed by the routing layer.
    #[allow(clippy::too_many_arguments)]
    pub async fn resolve(
        &self,
        artist: &str,
        song: &str,
        want_timestamps: bool,
        use_custom_sequence: bool,
        sequence_spec: Option<&str>,
        fast_mode: bool,
    ) -> ResolveResponse {
        let custom_sequence = if use_custom_sequence {
            let Some(spec) = sequence_spec.filter(|s| !s.trim().is_empty()) else {
                return error_response(
                    FetchError::InvalidSequence(
                        "sequence parameter required when custom sequence is enabled".to_string(),
                    ),
                    Vec::new(),
                );
            };
            match self.parse_sequence(spec) {
                Ok(ids) => Some(ids),
                // Validation error: surfaced immediately, no fetch attempted.
                Err(e) => return error_response(e, Vec::new()),
            }
        } else {
            None
        };

        let request = FetchRequest {
            artist: artist.to_string(),
            song: song.to_string(),
            want_timestamps,
            fast_mode,
            custom_sequence,
        };

        let (result, attempts) = self.resolve_request(&request).await;
        match result {
            Ok(lyrics) => ResolveResponse {
                status: ResolveStatus::Success,
                data: Some(lyrics),
                error: None,
                attempts,
            },
            Err(e) => error_response(e, attempts),
        }
    }
}

/// Build the wire error response. Exhaustion names the providers whose
/// results were rejected by validation, so callers can tell "nothing found
/// anywhere" apart from "found things but none matched".
fn error_response(error: FetchError, attempts: Vec<FetchAttempt>) -> ResolveResponse {
    let rejected: Vec<&str> = attempts
        .iter()
        .filter(|a| a.outcome == AttemptOutcome::ValidationFailed)
        .map(|a| a.api.as_str())
        .collect();

    let message = if matches!(error, FetchError::Exhausted { .. }) && !rejected.is_empty() {
        format!(
            "{} (rejected unvalidated results from: {})",
            error,
            rejected.join(", ")
        )
    } else {
        error.to_string()
    };

    ResolveResponse {
        status: ResolveStatus::Error,
        data: None,
        error: Some(ResolveError {
            message,
            timestamp: Utc::now(),
        }),
        attempts,
    }
}
