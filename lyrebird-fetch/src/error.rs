//! Error types for lyrebird-fetch
//!
//! Individual provider failures are never errors at this level: the runners
//! absorb them into `FetchAttempt` records. Only a malformed custom sequence
//! (surfaced before any fetch is dispatched) and total exhaustion reach the
//! caller as typed errors.

use thiserror::Error;

/// Fetch orchestration errors surfaced to callers
#[derive(Debug, Error)]
pub enum FetchError {
    /// Custom sequence failed validation; no fetch was attempted
    #[error("Invalid sequence: {0}")]
    InvalidSequence(String),

    /// Every configured provider was tried and none produced a valid match
    #[error("No lyrics found for '{song}' by '{artist}'")]
    Exhausted { artist: String, song: String },
}

/// Result type for fetch orchestration
pub type FetchResult<T> = std::result::Result<T, FetchError>;
