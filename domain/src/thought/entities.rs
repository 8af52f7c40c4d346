//! Thought entities

use crate::core::id::{AgentId, ThoughtId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A raw continuation proposed by the AI service, before it is placed
/// into a tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThoughtCandidate {
    pub content: String,
    /// Service-reported confidence, clamped to [0, 1]
    pub confidence: f64,
}

impl ThoughtCandidate {
    pub fn new(content: impl Into<String>, confidence: f64) -> Self {
        Self {
            content: content.into(),
            confidence: clamp_confidence(confidence),
        }
    }
}

/// A single reasoning step produced by one agent.
///
/// Thoughts are immutable once placed in a tree; refinements produce
/// new child thoughts rather than edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thought {
    pub id: ThoughtId,
    pub agent_id: AgentId,
    pub content: String,
    pub confidence: f64,
    /// `None` for top-level thoughts
    pub parent_id: Option<ThoughtId>,
    /// 1 for top-level thoughts, parent depth + 1 otherwise
    pub depth: usize,
    /// Sibling candidates that were ranked out at this step
    pub alternatives: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Thought {
    /// Create a top-level thought for an agent.
    pub fn root(agent_id: AgentId, content: impl Into<String>, confidence: f64) -> Self {
        Self {
            id: ThoughtId::generate(),
            agent_id,
            content: content.into(),
            confidence: clamp_confidence(confidence),
            parent_id: None,
            depth: 1,
            alternatives: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Create a thought that refines `parent`, owned by the same agent.
    pub fn child_of(parent: &Thought, content: impl Into<String>, confidence: f64) -> Self {
        Self {
            id: ThoughtId::generate(),
            agent_id: parent.agent_id.clone(),
            content: content.into(),
            confidence: clamp_confidence(confidence),
            parent_id: Some(parent.id.clone()),
            depth: parent.depth + 1,
            alternatives: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Build a tree node from a ranked candidate.
    pub fn from_candidate(
        agent_id: &AgentId,
        parent: Option<&Thought>,
        candidate: ThoughtCandidate,
    ) -> Self {
        match parent {
            Some(parent) => Self::child_of(parent, candidate.content, candidate.confidence),
            None => Self::root(agent_id.clone(), candidate.content, candidate.confidence),
        }
    }

    pub fn with_alternatives(mut self, alternatives: Vec<String>) -> Self {
        self.alternatives = alternatives;
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Clamp a confidence value into [0, 1], mapping NaN to 0.
pub fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_and_child_depth() {
        let root = Thought::root(AgentId::new("a"), "Use REST", 0.7);
        let child = Thought::child_of(&root, "Use REST with versioned paths", 0.8);

        assert!(root.is_root());
        assert_eq!(root.depth, 1);
        assert_eq!(child.depth, 2);
        assert_eq!(child.parent_id.as_ref(), Some(&root.id));
        assert_eq!(child.agent_id, root.agent_id);
    }

    #[test]
    fn test_confidence_is_clamped() {
        assert_eq!(ThoughtCandidate::new("x", 1.7).confidence, 1.0);
        assert_eq!(ThoughtCandidate::new("x", -0.2).confidence, 0.0);
        assert_eq!(clamp_confidence(f64::NAN), 0.0);
    }

    #[test]
    fn test_from_candidate_without_parent_is_root() {
        let agent = AgentId::new("a");
        let thought = Thought::from_candidate(&agent, None, ThoughtCandidate::new("idea", 0.5));
        assert!(thought.is_root());
        assert_eq!(thought.agent_id, agent);
    }
}
