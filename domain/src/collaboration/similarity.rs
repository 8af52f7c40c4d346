//! Text similarity used to decide whether two positions diverge.

use std::collections::HashSet;

fn word_set(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
        .filter(|w| w.len() > 2)
        .collect()
}

/// Jaccard similarity between the normalised word sets of two texts.
///
/// Words shorter than three characters are ignored. Returns `1.0` when both
/// texts are empty and `0.0` when exactly one is.
pub fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let words_a = word_set(a);
    let words_b = word_set(b);

    if words_a.is_empty() && words_b.is_empty() {
        return 1.0;
    }
    if words_a.is_empty() || words_b.is_empty() {
        return 0.0;
    }

    let intersection = words_a.intersection(&words_b).count();
    let union = words_a.union(&words_b).count();
    intersection as f64 / union as f64
}

/// Whitespace- and case-insensitive equality.
pub fn equivalent(a: &str, b: &str) -> bool {
    let normalize = |s: &str| s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    normalize(a) == normalize(b)
}
