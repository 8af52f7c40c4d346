//! Candidate ranking and selection.
//!
//! Ordering: confidence descending, then shorter content (prefer concise),
//! then lexical content order so the result never depends on arrival order.

use super::entities::{Thought, ThoughtCandidate};
use std::cmp::Ordering;

/// Compare two scored texts by the ranking policy.
pub fn compare_scored(a_content: &str, a_conf: f64, b_content: &str, b_conf: f64) -> Ordering {
    b_conf
        .total_cmp(&a_conf)
        .then_with(|| a_content.len().cmp(&b_content.len()))
        .then_with(|| a_content.cmp(b_content))
}

/// Sort candidates best-first.
pub fn rank_candidates(mut candidates: Vec<ThoughtCandidate>) -> Vec<ThoughtCandidate> {
    candidates.sort_by(|a, b| compare_scored(&a.content, a.confidence, &b.content, b.confidence));
    candidates
}

/// Result of picking the top-`b` candidates at one expansion step.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub kept: Vec<ThoughtCandidate>,
    pub discarded: Vec<ThoughtCandidate>,
}

impl Selection {
    /// Contents of the discarded candidates, best-first.
    pub fn discarded_contents(&self) -> Vec<String> {
        self.discarded.iter().map(|c| c.content.clone()).collect()
    }
}

/// Rank `candidates` and keep the best `branching` of them.
///
/// Candidates with empty content never make it into the kept set.
pub fn select_top(candidates: Vec<ThoughtCandidate>, branching: usize) -> Selection {
    let (usable, empty): (Vec<_>, Vec<_>) = candidates
        .into_iter()
        .partition(|c| !c.content.trim().is_empty());

    let mut ranked = rank_candidates(usable);
    let discarded_tail = if ranked.len() > branching {
        ranked.split_off(branching)
    } else {
        Vec::new()
    };

    let mut discarded = discarded_tail;
    discarded.extend(empty);

    Selection {
        kept: ranked,
        discarded,
    }
}

/// Best thought of a collection by the ranking policy.
pub fn best_thought<'a, I>(thoughts: I) -> Option<&'a Thought>
where
    I: IntoIterator<Item = &'a Thought>,
{
    thoughts
        .into_iter()
        .min_by(|a, b| compare_scored(&a.content, a.confidence, &b.content, b.confidence))
}
