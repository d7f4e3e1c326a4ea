//! Symptom phrase matching.
//!
//! Two phrases match on substring containment in either direction, or
//! when at least half the words of the longer phrase are shared.

use std::collections::HashSet;

/// Minimum shared-word ratio for two phrases to match.
pub const WORD_OVERLAP_THRESHOLD: f64 = 0.5;

/// Canonical form of a phrase: trimmed and lower-cased.
pub fn normalize_phrase(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Whether a knowledge-base phrase and a reported phrase name the same
/// symptom. Symmetric in its arguments.
pub fn symptoms_match(a: &str, b: &str) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();

    if a.contains(b.as_str()) || b.contains(a.as_str()) {
        return true;
    }

    let a_words: HashSet<&str> = a.split_whitespace().collect();
    let b_words: HashSet<&str> = b.split_whitespace().collect();
    if a_words.is_empty() || b_words.is_empty() {
        return false;
    }

    let overlap = a_words.intersection(&b_words).count();
    let largest = a_words.len().max(b_words.len());
    overlap as f64 / largest as f64 >= WORD_OVERLAP_THRESHOLD
}
