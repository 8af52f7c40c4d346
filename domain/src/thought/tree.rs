//! Thought tree (forest) with enforced structural invariants.
//!
//! Every non-root thought has exactly one parent, and that parent must be
//! in the tree before the child is inserted. Because insertion requires an
//! existing parent, cycles are impossible by construction. Depth and
//! per-node branching are bounded by [`TreeBounds`].

use super::entities::Thought;
use super::ranking::best_thought;
use crate::core::error::DomainError;
use crate::core::id::{AgentId, ThoughtId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration bounds for a thought tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeBounds {
    /// Maximum depth (top-level thoughts have depth 1)
    pub max_depth: usize,
    /// Maximum children per node, and top-level thoughts per agent
    pub max_branching: usize,
}

impl Default for TreeBounds {
    fn default() -> Self {
        Self {
            max_depth: 3,
            max_branching: 2,
        }
    }
}

/// The set of thoughts produced for one request.
#[derive(Debug, Clone, Default)]
pub struct ThoughtTree {
    bounds: TreeBounds,
    /// Insertion order; parents always precede children
    thoughts: Vec<Thought>,
    index: HashMap<ThoughtId, usize>,
    children: HashMap<ThoughtId, Vec<ThoughtId>>,
    roots: Vec<ThoughtId>,
}

impl ThoughtTree {
    pub fn new(bounds: TreeBounds) -> Self {
        Self {
            bounds,
            ..Default::default()
        }
    }

    pub fn bounds(&self) -> TreeBounds {
        self.bounds
    }

    /// Insert a thought, rejecting anything that would break the invariants.
    pub fn insert(&mut self, thought: Thought) -> Result<(), DomainError> {
        if self.index.contains_key(&thought.id) {
            return Err(DomainError::DuplicateThought(thought.id.to_string()));
        }
        if thought.depth == 0 || thought.depth > self.bounds.max_depth {
            return Err(DomainError::DepthExceeded {
                depth: thought.depth,
                max: self.bounds.max_depth,
            });
        }

        match &thought.parent_id {
            Some(parent_id) => {
                let parent = self.get(parent_id).ok_or_else(|| DomainError::UnknownParent {
                    thought: thought.id.to_string(),
                    parent: parent_id.to_string(),
                })?;
                if thought.depth != parent.depth + 1 {
                    return Err(DomainError::InvalidDepth {
                        thought: thought.id.to_string(),
                        depth: thought.depth,
                        expected: parent.depth + 1,
                    });
                }
                let siblings = self.children.get(parent_id).map_or(0, Vec::len);
                if siblings >= self.bounds.max_branching {
                    return Err(DomainError::BranchingExceeded {
                        node: parent_id.to_string(),
                        max: self.bounds.max_branching,
                    });
                }
                self.children
                    .entry(parent_id.clone())
                    .or_default()
                    .push(thought.id.clone());
            }
            None => {
                if thought.depth != 1 {
                    return Err(DomainError::InvalidDepth {
                        thought: thought.id.to_string(),
                        depth: thought.depth,
                        expected: 1,
                    });
                }
                let agent_roots = self.roots_for(&thought.agent_id).count();
                if agent_roots >= self.bounds.max_branching {
                    return Err(DomainError::BranchingExceeded {
                        node: format!("root of {}", thought.agent_id),
                        max: self.bounds.max_branching,
                    });
                }
                self.roots.push(thought.id.clone());
            }
        }

        self.index.insert(thought.id.clone(), self.thoughts.len());
        self.thoughts.push(thought);
        Ok(())
    }

    /// Merge another tree into this one, preserving its insertion order.
    ///
    /// All or nothing: on error this tree is left unchanged.
    pub fn merge(&mut self, other: ThoughtTree) -> Result<(), DomainError> {
        let mut merged = self.clone();
        for thought in other.thoughts {
            merged.insert(thought)?;
        }
        *self = merged;
        Ok(())
    }

    pub fn get(&self, id: &ThoughtId) -> Option<&Thought> {
        self.index.get(id).map(|&i| &self.thoughts[i])
    }

    pub fn children(&self, id: &ThoughtId) -> impl Iterator<Item = &Thought> {
        self.children
            .get(id)
            .into_iter()
            .flatten()
            .filter_map(|child| self.get(child))
    }

    pub fn roots(&self) -> impl Iterator<Item = &Thought> {
        self.roots.iter().filter_map(|id| self.get(id))
    }

    fn roots_for<'a>(&'a self, agent_id: &'a AgentId) -> impl Iterator<Item = &'a Thought> {
        self.roots().filter(move |t| &t.agent_id == agent_id)
    }

    /// All thoughts in insertion order (parents before children).
    pub fn iter(&self) -> impl Iterator<Item = &Thought> {
        self.thoughts.iter()
    }

    pub fn len(&self) -> usize {
        self.thoughts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thoughts.is_empty()
    }

    /// Deepest level actually reached.
    pub fn depth(&self) -> usize {
        self.thoughts.iter().map(|t| t.depth).max().unwrap_or(0)
    }

    /// Highest-ranked thought anywhere in the tree.
    pub fn top_thought(&self) -> Option<&Thought> {
        best_thought(&self.thoughts)
    }

    /// Highest-ranked thought produced by one agent.
    pub fn top_thought_for(&self, agent_id: &AgentId) -> Option<&Thought> {
        best_thought(self.thoughts.iter().filter(|t| &t.agent_id == agent_id))
    }

    /// Confidence of the top thought (0.0 for an empty tree).
    pub fn top_confidence(&self) -> f64 {
        self.top_thought().map_or(0.0, |t| t.confidence)
    }

    /// Re-check every invariant over the stored thoughts.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut rebuilt = ThoughtTree::new(self.bounds);
        for thought in &self.thoughts {
            rebuilt.insert(thought.clone())?;
        }
        Ok(())
    }

    pub fn into_thoughts(self) -> Vec<Thought> {
        self.thoughts
    }
}
