//! Agent entities - the reasoning participants owned by a project.

use crate::core::id::{AgentId, ProjectId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Current lifecycle status of an agent.
///
/// Only the orchestrator drives transitions, and only through the agent
/// store: `Idle → Thinking → (Error) → Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    #[default]
    Idle,
    Thinking,
    Error,
}

impl AgentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentStatus::Idle => "idle",
            AgentStatus::Thinking => "thinking",
            AgentStatus::Error => "error",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, AgentStatus::Idle)
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The perspective an agent brings to a discussion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Strategy,
    Implementation,
    Review,
    Research,
    Custom(String),
}

impl AgentRole {
    pub fn as_str(&self) -> &str {
        match self {
            AgentRole::Strategy => "strategy",
            AgentRole::Implementation => "implementation",
            AgentRole::Review => "review",
            AgentRole::Research => "research",
            AgentRole::Custom(name) => name,
        }
    }

    /// One-line focus description used when prompting on behalf of this role.
    pub fn focus(&self) -> &str {
        match self {
            AgentRole::Strategy => "overall approach, trade-offs and long-term direction",
            AgentRole::Implementation => "concrete steps, interfaces and working details",
            AgentRole::Review => "risks, gaps, edge cases and correctness",
            AgentRole::Research => "prior art, evidence and alternatives worth knowing",
            AgentRole::Custom(_) => "the task from your specialised perspective",
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AgentRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("Agent role must not be empty".to_string());
        }
        Ok(match trimmed.to_lowercase().as_str() {
            "strategy" | "strategist" => AgentRole::Strategy,
            "implementation" | "implementer" => AgentRole::Implementation,
            "review" | "reviewer" => AgentRole::Review,
            "research" | "researcher" => AgentRole::Research,
            _ => AgentRole::Custom(trimmed.to_string()),
        })
    }
}

/// Rolling performance metrics for an agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentMetrics {
    /// Requests the agent took part in
    pub requests: u64,
    /// Requests in which the agent produced thoughts
    pub successes: u64,
    /// `successes / requests` (0.0 when no requests yet)
    pub success_rate: f64,
    /// Mean top-thought confidence over successful requests
    pub average_confidence: f64,
}

impl AgentMetrics {
    /// Fold one request outcome into the rolling metrics.
    ///
    /// `confidence` is only counted for successful requests.
    pub fn record(&mut self, success: bool, confidence: Option<f64>) {
        self.requests += 1;
        if success {
            self.successes += 1;
            if let Some(confidence) = confidence {
                let n = self.successes as f64;
                let confidence = confidence.clamp(0.0, 1.0);
                self.average_confidence += (confidence - self.average_confidence) / n;
            }
        }
        self.success_rate = self.successes as f64 / self.requests as f64;
    }
}

/// A reasoning participant owned by a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub project_id: ProjectId,
    pub name: String,
    pub role: AgentRole,
    /// Free-form capability tags (e.g. "api-design", "security")
    pub capabilities: Vec<String>,
    pub status: AgentStatus,
    pub metrics: AgentMetrics,
}

impl Agent {
    /// Create an idle agent with a generated id.
    pub fn new(project_id: impl Into<ProjectId>, name: impl Into<String>, role: AgentRole) -> Self {
        Self {
            id: AgentId::generate(),
            project_id: project_id.into(),
            name: name.into(),
            role,
            capabilities: Vec::new(),
            status: AgentStatus::Idle,
            metrics: AgentMetrics::default(),
        }
    }

    pub fn with_id(mut self, id: impl Into<AgentId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_capabilities<I, S>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capabilities = capabilities.into_iter().map(Into::into).collect();
        self
    }

    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.iter().any(|c| c.eq_ignore_ascii_case(capability))
    }
}
