//! Agent response - the externally visible answer to one request.

use crate::core::id::{AgentId, CollaborationId, ThoughtId};
use crate::thought::clamp_confidence;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Explanatory metadata attached to every response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// Agents whose thoughts fed into the response
    pub contributing_agents: Vec<AgentId>,
    /// Agents whose thought generation failed
    pub failed_agents: Vec<AgentId>,
    pub collaboration_id: Option<CollaborationId>,
    /// `None` when no collaboration took place
    pub consensus_reached: Option<bool>,
    /// The response was produced on a degraded path
    pub degraded: bool,
    pub degraded_reason: Option<String>,
    pub optimization_iterations: usize,
    /// The optimizer ran but could not improve on its input
    pub optimization_stalled: bool,
    /// Artifacts that could not be persisted
    pub persistence_failures: usize,
    /// Free-form extension data
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ResponseMetadata {
    pub fn degraded(reason: impl Into<String>) -> Self {
        Self {
            degraded: true,
            degraded_reason: Some(reason.into()),
            ..Default::default()
        }
    }

    pub fn insert_extra(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.extra.insert(key.into(), value);
    }
}

/// The answer returned to the caller.
///
/// Each optimization step produces a new value through [`AgentResponse::revised`]
/// instead of editing the previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    pub content: String,
    /// Clamped to [0, 1]
    pub confidence: f64,
    /// Thought the response is grounded on, if any
    pub reasoning: Option<ThoughtId>,
    /// Alternative phrasings or positions
    pub alternatives: Vec<String>,
    pub metadata: ResponseMetadata,
}

impl AgentResponse {
    pub fn new(content: impl Into<String>, confidence: f64) -> Self {
        Self {
            content: content.into(),
            confidence: clamp_confidence(confidence),
            reasoning: None,
            alternatives: Vec::new(),
            metadata: ResponseMetadata::default(),
        }
    }

    pub fn with_reasoning(mut self, thought: ThoughtId) -> Self {
        self.reasoning = Some(thought);
        self
    }

    pub fn with_alternatives(mut self, alternatives: Vec<String>) -> Self {
        self.alternatives = alternatives;
        self
    }

    pub fn with_metadata(mut self, metadata: ResponseMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// New response with replaced content and confidence, keeping reasoning,
    /// alternatives and metadata.
    pub fn revised(&self, content: impl Into<String>, confidence: f64) -> Self {
        Self {
            content: content.into(),
            confidence: clamp_confidence(confidence),
            reasoning: self.reasoning.clone(),
            alternatives: self.alternatives.clone(),
            metadata: self.metadata.clone(),
        }
    }

    /// New response with the confidence capped at `max`.
    pub fn capped_at(&self, max: f64) -> Self {
        self.revised(self.content.clone(), self.confidence.min(max))
    }
}
