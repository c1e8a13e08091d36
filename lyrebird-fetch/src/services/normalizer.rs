//! Text normalization and script classification
//!
//! Pure utilities shared by the match validator. Normalization makes
//! provider metadata comparable across punctuation, casing and Unicode
//! composition differences; script classification powers the cross-script
//! bypass (edit distance between a Latin query and a Gurmukhi title is
//! meaningless, not a mismatch).

use unicode_normalization::UnicodeNormalization;

/// Unicode block ranges counted as non-Latin for script classification.
const NON_LATIN_RANGES: [(u32, u32); 17] = [
    (0x0600, 0x06FF), // Arabic
    (0x0900, 0x097F), // Devanagari
    (0x0A00, 0x0A7F), // Gurmukhi
    (0x0A80, 0x0AFF), // Gujarati
    (0x0B00, 0x0B7F), // Oriya
    (0x0B80, 0x0BFF), // Tamil
    (0x0C00, 0x0C7F), // Telugu
    (0x0C80, 0x0CFF), // Kannada
    (0x0D00, 0x0D7F), // Malayalam
    (0x0E00, 0x0E7F), // Thai
    (0x0F00, 0x0FFF), // Tibetan
    (0x1100, 0x11FF), // Hangul Jamo
    (0x3000, 0x9FFF), // CJK Unified
    (0xAC00, 0xD7AF), // Hangul Syllables
    (0x0400, 0x04FF), // Cyrillic
    (0x0370, 0x03FF), // Greek
    (0x0590, 0x05FF), // Hebrew
];

/// Words that separate artist names inside a single credit string.
/// Compared against whitespace-delimited tokens, not raw substrings, so
/// names like "Sandra" survive.
const ARTIST_SEPARATOR_WORDS: [&str; 7] =
    ["feat.", "feat", "featuring", "ft.", "ft", "with", "and"];

/// NFC-normalize, strip punctuation, collapse whitespace, lowercase.
///
/// Keeps Unicode alphanumerics and `_`; everything else is treated as
/// punctuation and dropped. Empty input normalizes to the empty string.
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut stripped = String::with_capacity(text.len());
    for c in text.nfc() {
        if c.is_alphanumeric() || c == '_' {
            for lower in c.to_lowercase() {
                stripped.push(lower);
            }
        } else if c.is_whitespace() {
            stripped.push(' ');
        }
    }

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split a multi-artist credit string into deduplicated normalized names.
///
/// `"Adele, Adele"` becomes `["adele"]`; `"Talwiinder & Vision"` becomes
/// `["talwiinder", "vision"]`. Separators are `,` `;` `/` `&` plus the
/// credit words `and`, `with`, `feat.`, `ft.`, `featuring` (case-insensitive,
/// matched as whole tokens). Empty parts are dropped; first-seen order is
/// preserved.
pub fn split_artists(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut delimited = String::with_capacity(text.len());
    for token in text.split_whitespace() {
        let word = token
            .trim_matches(|c: char| "()[]".contains(c))
            .to_lowercase();
        if ARTIST_SEPARATOR_WORDS.contains(&word.as_str()) {
            delimited.push(',');
        } else {
            delimited.push_str(token);
        }
        delimited.push(' ');
    }
    let delimited = delimited.replace([';', '/', '&'], ",");

    let mut seen = std::collections::HashSet::new();
    let mut artists = Vec::new();
    for part in delimited.split(',') {
        let name = normalize(part);
        if !name.is_empty() && seen.insert(name.clone()) {
            artists.push(name);
        }
    }
    artists
}

/// True when more than 20% of characters fall within the non-Latin block
/// table. Single-character and empty strings never trigger this, guarding
/// against division noise on degenerate input.
pub fn is_non_latin_dominant(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    let total = text.chars().count();
    let non_latin = text
        .chars()
        .filter(|c| {
            let cp = *c as u32;
            NON_LATIN_RANGES.iter().any(|(lo, hi)| (*lo..=*hi).contains(&cp))
        })
        .count();
    non_latin as f64 > (total as f64 * 0.2).max(1.0)
}

/// Two strings are script-compatible when they are dominated by the same
/// script family (both Latin-ish, or both non-Latin).
pub fn scripts_compatible(a: &str, b: &str) -> bool {
    is_non_latin_dominant(a) == is_non_latin_dominant(b)
}
