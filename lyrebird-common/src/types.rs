//! Data model shared between the fetch orchestrator and its callers
//!
//! These are the wire-shaped types: everything here serializes with serde so
//! the routing layer and the on-disk cache can pass them through untouched.
//! `LyricsResult` and `TimedLine` keep the camelCase key names the public API
//! has always used; diagnostics (`FetchAttempt`, `ValidationVerdict`) use
//! snake_case keys.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single lyrics lookup request, as received from the routing layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchRequest {
    /// Requested artist name, verbatim from the caller
    pub artist: String,
    /// Requested song title, verbatim from the caller
    pub song: String,
    /// Caller wants line-timed lyrics
    pub want_timestamps: bool,
    /// Race a small fixed provider set instead of walking the defaults
    pub fast_mode: bool,
    /// Explicit provider order (registered fetcher ids, unique), if any
    pub custom_sequence: Option<Vec<u8>>,
}

impl FetchRequest {
    /// Plain lookup with default provider selection.
    pub fn new(artist: impl Into<String>, song: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            song: song.into(),
            want_timestamps: false,
            fast_mode: false,
            custom_sequence: None,
        }
    }
}

/// One line of timed lyrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedLine {
    pub text: String,
    pub start_ms: u64,
    pub end_ms: u64,
}

/// Lyrics returned by a provider, mapped into the one fixed shape the
/// validator and the callers ever see. Provider adapters are responsible
/// for translating their native payloads into this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LyricsResult {
    /// Display name of the provider that produced this result
    pub source: String,
    /// Artist name(s) as the provider reported them
    pub artist: String,
    /// Song title as the provider reported it
    pub title: String,
    /// Full lyrics text
    pub lyrics: String,
    /// Line-timed lyrics, when the provider has them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timed_lines: Option<Vec<TimedLine>>,
    pub has_timestamps: bool,
}

/// Terminal outcome of one dispatched fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// Provider returned lyrics that passed validation
    Success,
    /// Provider answered but had nothing usable for this request
    NoLyrics,
    /// Provider did not settle within the per-task timeout
    Timeout,
    /// Provider raised an error; recovered locally
    Error,
    /// Provider is registered but no adapter is configured
    NotConfigured,
    /// Provider answered with a result that did not match the request
    ValidationFailed,
}

/// Diagnostic record of a single fetch, finalized exactly once when the
/// fetch settles. Never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchAttempt {
    /// Provider display name
    pub api: String,
    pub outcome: AttemptOutcome,
    /// Error detail, where the outcome carries one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// The rejected raw result, kept for diagnostics on validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<LyricsResult>,
    /// The validator's decision, where one was computed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<ValidationVerdict>,
}

impl FetchAttempt {
    pub fn new(api: impl Into<String>, outcome: AttemptOutcome) -> Self {
        Self {
            api: api.into(),
            outcome,
            message: None,
            result: None,
            verdict: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_result(mut self, result: LyricsResult) -> Self {
        self.result = Some(result);
        self
    }

    pub fn with_verdict(mut self, verdict: ValidationVerdict) -> Self {
        self.verdict = Some(verdict);
        self
    }
}

/// Structured accept/reject decision for one (request, candidate) pair.
/// A pure function of its inputs: validating the same pair twice yields
/// identical verdicts. Scores are rounded to three decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    pub valid: bool,
    /// Names the rule that accepted, or the check(s) that failed with scores
    pub reason: String,
    /// Best pairwise artist similarity found, 0.0..=1.0
    pub artist_match: f64,
    /// Title similarity after length penalty, 0.0..=1.0
    pub song_match: f64,
    /// Normalized artist names the provider returned
    pub returned_artists: Vec<String>,
    /// Normalized title the provider returned
    pub returned_song: String,
    /// Similarity scoring was bypassed for cross-script results
    pub script_mismatch: bool,
}

/// Overall request status on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolveStatus {
    Success,
    Error,
}

/// Error object surfaced to callers when a request fails as a whole.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveError {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Wire-shaped response of the orchestrator entry point, consumed by the
/// routing layer. The attempt log is always present so a caller can tell
/// "nothing found anywhere" apart from "found things but none matched".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveResponse {
    pub status: ResolveStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<LyricsResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ResolveError>,
    pub attempts: Vec<FetchAttempt>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attempt_outcome_serializes_snake_case() {
        let json = serde_json::to_string(&AttemptOutcome::ValidationFailed).unwrap();
        assert_eq!(json, "\"validation_failed\"");
        let json = serde_json::to_string(&AttemptOutcome::NoLyrics).unwrap();
        assert_eq!(json, "\"no_lyrics\"");
    }

    #[test]
    fn lyrics_result_uses_camel_case_keys() {
        let result = LyricsResult {
            source: "LRCLIB".into(),
            artist: "Adele".into(),
            title: "Hello".into(),
            lyrics: "Hello, it's me".into(),
            timed_lines: Some(vec![TimedLine {
                text: "Hello, it's me".into(),
                start_ms: 0,
                end_ms: 4200,
            }]),
            has_timestamps: true,
        };
        let value = serde_json::to_value(&result).unwrap();
        assert!(value.get("hasTimestamps").is_some());
        assert!(value.get("timedLines").is_some());
        assert!(value["timedLines"][0].get("startMs").is_some());
    }

    #[test]
    fn empty_optionals_are_omitted_from_attempts() {
        let attempt = FetchAttempt::new("Genius", AttemptOutcome::NoLyrics);
        let value = serde_json::to_value(&attempt).unwrap();
        assert!(value.get("message").is_none());
        assert!(value.get("result").is_none());
        assert!(value.get("verdict").is_none());
        assert_eq!(value["outcome"], "no_lyrics");
    }
}
