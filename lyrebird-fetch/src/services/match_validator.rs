//! Match validation for fetched lyrics
//!
//! Decides whether a provider's result is actually the requested song.
//! The goal is to reject obviously wrong results (searching "Nasha" and
//! getting "Shape of You") while accepting correct results with messy
//! metadata: Punjabi titles stored in Gurmukhi script, duplicate artist
//! credits, feat. annotations, romanisation variants.
//!
//! Every step below is a tie-break policy, not an implementation detail:
//!
//! 1. No title metadata: trust the provider (a lyrics body with no
//!    searchable title cannot be second-guessed).
//! 2. Script gate: when query and result are in incompatible writing
//!    systems, similarity is meaningless (score ~0) and is bypassed.
//! 3. Adaptive thresholds: short titles get lower thresholds; a
//!    5-character title fails a 0.75 ratio test on a single-char edit.
//! 4. Length-penalised song score, with an extension-suffix escape hatch
//!    ("Rockstar (feat. 21 Savage)" is still "Rockstar").
//! 5. Artist rule cascade a-e, first success wins.
//!
//! `validate` never fails; a malformed candidate degrades to a permissive
//! verdict rather than an error.

use crate::services::normalizer::{normalize, scripts_compatible, split_artists};
use crate::services::similarity;
use lyrebird_common::config::MatchConfig;
use lyrebird_common::types::{LyricsResult, ValidationVerdict};

/// Title suffix words that extend a song title without changing the song's
/// identity. Compared after normalization, so "feat." appears as "feat".
const EXTENSION_KEYWORDS: [&str; 20] = [
    "feat",
    "featuring",
    "ft",
    "remix",
    "live",
    "acoustic",
    "cover",
    "version",
    "edit",
    "radio",
    "official",
    "remaster",
    "remastered",
    "bonus",
    "alt",
    "instrumental",
    "extended",
    "deluxe",
    "explicit",
    "clean",
];

/// Validates that a fetched result matches the requested (artist, song).
#[derive(Debug, Clone)]
pub struct MatchValidator {
    /// Base similarity threshold before adaptive shortening
    base_threshold: f64,
    /// Minimum pairwise artist similarity for the extension-collab rule
    extension_collab_floor: f64,
}

impl Default for MatchValidator {
    fn default() -> Self {
        Self::new(&MatchConfig::default())
    }
}

impl MatchValidator {
    pub fn new(config: &MatchConfig) -> Self {
        Self {
            base_threshold: config.base_threshold,
            extension_collab_floor: config.extension_collab_floor,
        }
    }

    /// Decide whether `candidate` is the requested song.
    ///
    /// Pure function of its inputs and the two configured constants:
    /// validating the same pair twice yields identical verdicts.
    pub fn validate(
        &self,
        requested_artist: &str,
        requested_song: &str,
        candidate: &LyricsResult,
    ) -> ValidationVerdict {
        let requested_artists = split_artists(requested_artist);
        let requested_song_norm = normalize(requested_song);
        let returned_artists = split_artists(&candidate.artist);
        let returned_song = normalize(&candidate.title);

        // No searchable title: trust the provider.
        if returned_song.is_empty() {
            tracing::warn!(
                requested_song = %requested_song,
                source = %candidate.source,
                "No title in result, trusting provider"
            );
            return accept(
                "No title metadata - trusting source",
                1.0,
                1.0,
                returned_artists,
                returned_song,
                false,
            );
        }

        // Cross-script bypass: Latin request vs Gurmukhi/Devanagari/Arabic/
        // Korean result (or vice versa) makes edit distance meaningless.
        if !scripts_compatible(&requested_song_norm, &returned_song) {
            tracing::info!(
                requested_artist = %requested_artist,
                requested_song = %requested_song,
                returned_song = %returned_song,
                "Cross-script match, similarity bypassed"
            );
            return accept(
                "Cross-script match - similarity bypassed",
                1.0,
                1.0,
                returned_artists,
                returned_song,
                true,
            );
        }

        let song_threshold = adaptive_threshold(requested_song, self.base_threshold);
        let artist_threshold = adaptive_threshold(requested_artist, self.base_threshold);

        // Song check: length-penalised similarity, or a recognized
        // extension of the requested title.
        let song_score = similarity_ratio(&requested_song_norm, &returned_song);
        let is_extension = is_extension_suffix(&returned_song, &requested_song_norm);
        let song_ok = song_score >= song_threshold || is_extension;

        // Artist rule cascade.
        let mut best_artist = 0.0f64;
        let mut found = false;
        let mut method = "";
        let returned_joined = returned_artists.join(" ");
        let requested_full = normalize(requested_artist);

        if returned_artists.is_empty() {
            // No artist metadata at all: the song check alone decides.
            found = true;
            method = "no artist metadata - song-only";
        } else {
            for requested in &requested_artists {
                for returned in &returned_artists {
                    best_artist = best_artist.max(similarity_ratio(requested, returned));
                }

                // a: direct similarity against any returned name
                if returned_artists
                    .iter()
                    .any(|returned| similarity_ratio(requested, returned) >= artist_threshold)
                {
                    found = true;
                    method = "direct similarity";
                    break;
                }

                // b: requested name appears inside the returned credit string
                if requested.chars().count() >= 3 && returned_joined.contains(requested.as_str()) {
                    found = true;
                    method = "substring match";
                    break;
                }

                // c: requested name credited inside the returned title
                if requested.chars().count() >= 3 && returned_song.contains(requested.as_str()) {
                    found = true;
                    method = "featured in title";
                    break;
                }

                // d: a returned name appears inside the full requested
                // credit (collaborator listed on only one side)
                if returned_artists.iter().any(|returned| {
                    returned.chars().count() >= 3 && requested_full.contains(returned.as_str())
                }) {
                    found = true;
                    method = "reversed collab";
                    break;
                }

                // e: the title is an extension of the requested one and the
                // artists are at least loosely related. The floor excludes
                // completely unrelated names while accepting a featured
                // artist attributed differently.
                if is_extension && best_artist >= self.extension_collab_floor {
                    found = true;
                    method = "extension collab";
                    break;
                }
            }
        }

        if found && song_ok {
            tracing::info!(
                requested_artist = %requested_artist,
                requested_song = %requested_song,
                method = %method,
                artist_score = best_artist,
                song_score = song_score,
                "Validation accepted"
            );
            return accept(
                &format!("Matched via {}", method),
                best_artist,
                song_score,
                returned_artists,
                returned_song,
                false,
            );
        }

        let mut parts = Vec::new();
        if !found {
            parts.push(format!(
                "artist score={:.2} < {:.2}",
                best_artist, artist_threshold
            ));
        }
        if !song_ok {
            parts.push(format!("song score={:.2} < {:.2}", song_score, song_threshold));
        }
        let reason = parts.join(" | ");
        tracing::warn!(
            requested_artist = %requested_artist,
            requested_song = %requested_song,
            returned_artists = %returned_joined,
            returned_song = %returned_song,
            reason = %reason,
            "Validation rejected"
        );
        ValidationVerdict {
            valid: false,
            reason,
            artist_match: round3(best_artist),
            song_match: round3(song_score),
            returned_artists,
            returned_song,
            script_mismatch: false,
        }
    }
}

/// Length-penalised similarity between two strings.
///
/// When the returned string is more than 1.5x longer than the requested
/// one, the raw ratio is scaled down by `0.5 + 0.5 * (len_req / len_ret)`
/// to stop short queries over-matching long titles:
/// "hello" vs "hello goodbye" drops from 0.56 to 0.38.
fn similarity_ratio(requested: &str, returned: &str) -> f64 {
    let a = normalize(requested);
    let b = normalize(returned);
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let mut score = similarity::ratio(&a, &b);
    let len_a = a.chars().count() as f64;
    let len_b = b.chars().count() as f64;
    if len_b > len_a * 1.5 {
        score *= 0.5 + 0.5 * (len_a / len_b);
    }
    score
}

/// Shrink the base threshold for short strings; a one-character edit on a
/// 5-character title is not the same signal as one on a 20-character title.
fn adaptive_threshold(text: &str, base: f64) -> f64 {
    let len = normalize(text).chars().count();
    if len <= 4 {
        (base - 0.35).max(0.40)
    } else if len <= 6 {
        (base - 0.20).max(0.50)
    } else if len <= 10 {
        (base - 0.10).max(0.60)
    } else {
        base
    }
}

/// True when `returned` is `requested` plus a recognized extension
/// ("rockstar feat 21 savage" extends "rockstar"). Strict: the requested
/// title must be a true prefix and the remainder must begin with one of
/// the extension keywords. An exact match is not an extension.
fn is_extension_suffix(returned: &str, requested_norm: &str) -> bool {
    if requested_norm.is_empty() || !returned.starts_with(requested_norm) {
        return false;
    }
    let suffix = returned[requested_norm.len()..].trim();
    match suffix.split_whitespace().next() {
        Some(first_word) => EXTENSION_KEYWORDS.contains(&first_word),
        None => false,
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

fn accept(
    reason: &str,
    artist_match: f64,
    song_match: f64,
    returned_artists: Vec<String>,
    returned_song: String,
    script_mismatch: bool,
) -> ValidationVerdict {
    ValidationVerdict {
        valid: true,
        reason: reason.to_string(),
        artist_match: round3(artist_match),
        song_match: round3(song_match),
        returned_artists,
        returned_song,
        script_mismatch,
    }
}
