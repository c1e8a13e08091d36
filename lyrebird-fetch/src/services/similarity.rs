//! Longest-matching-block string similarity
//!
//! Ratcliff-Obershelp ratio: find the longest contiguous matching block,
//! recurse on the pieces left and right of it, and score
//! `2 * matched / (len_a + len_b)`. This matters for the validator's
//! tie-break policy; bigram or edit-distance scores rank near-miss titles
//! differently and would change documented accept/reject decisions.

/// Similarity ratio in `0.0..=1.0` over Unicode scalar values.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let matched = matching_chars(&a, &b);
    (2.0 * matched as f64) / ((a.len() + b.len()) as f64)
}

/// Total characters covered by matching blocks, via longest-block recursion.
fn matching_chars(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    // Longest common contiguous block, earliest position on ties.
    let mut best_a = 0;
    let mut best_b = 0;
    let mut best_len = 0;
    let mut prev = vec![0usize; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        let mut current = vec![0usize; b.len() + 1];
        for (j, &cb) in b.iter().enumerate() {
            if ca == cb {
                let len = prev[j] + 1;
                current[j + 1] = len;
                if len > best_len {
                    best_len = len;
                    best_a = i + 1 - len;
                    best_b = j + 1 - len;
                }
            }
        }
        prev = current;
    }

    if best_len == 0 {
        return 0;
    }

    best_len
        + matching_chars(&a[..best_a], &b[..best_b])
        + matching_chars(&a[best_a + best_len..], &b[best_b + best_len..])
}
