//! Tree-of-thought domain
//!
//! A [`Thought`] is one reasoning step produced by an agent. Thoughts form a
//! [`ThoughtTree`] (strictly a forest: one or more top-level thoughts per
//! agent) whose depth and branching are bounded by [`TreeBounds`].
//!
//! Selection between competing candidates follows a single deterministic
//! policy, see [`ranking`].

pub mod entities;
pub mod ranking;
pub mod tree;

pub use entities::{Thought, ThoughtCandidate, clamp_confidence};
pub use ranking::{Selection, best_thought, rank_candidates, select_top};
pub use tree::{ThoughtTree, TreeBounds};
