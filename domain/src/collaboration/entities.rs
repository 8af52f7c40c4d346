//! Collaboration entities

use crate::core::error::DomainError;
use crate::core::id::{AgentId, CollaborationId, ProjectId, ThoughtId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a collaboration session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollaborationStatus {
    #[default]
    Active,
    Consensus,
    Conflict,
    Closed,
}

impl CollaborationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollaborationStatus::Active => "active",
            CollaborationStatus::Consensus => "consensus",
            CollaborationStatus::Conflict => "conflict",
            CollaborationStatus::Closed => "closed",
        }
    }

    /// Sessions that still need attention (not settled, not closed).
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            CollaborationStatus::Active | CollaborationStatus::Conflict
        )
    }
}

impl fmt::Display for CollaborationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of session the orchestrator opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    Brainstorming,
    #[default]
    ProblemSolving,
    DecisionMaking,
    CodeReview,
}

impl SessionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::Brainstorming => "brainstorming",
            SessionType::ProblemSolving => "problem_solving",
            SessionType::DecisionMaking => "decision_making",
            SessionType::CodeReview => "code_review",
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SessionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "brainstorming" => Ok(SessionType::Brainstorming),
            "problem_solving" => Ok(SessionType::ProblemSolving),
            "decision_making" => Ok(SessionType::DecisionMaking),
            "code_review" => Ok(SessionType::CodeReview),
            other => Err(format!(
                "Unknown session type: {}. Valid: brainstorming, problem_solving, decision_making, code_review",
                other
            )),
        }
    }
}

/// One agent's stance within a conflicting view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentPosition {
    pub agent_id: AgentId,
    /// Thought the position is taken from
    pub thought_id: Option<ThoughtId>,
    pub content: String,
    /// The agent's own confidence in this position
    pub confidence: f64,
    /// Summed confidence of every participant holding an equivalent position
    pub aggregate_confidence: f64,
}

/// How a conflicting view was settled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionKind {
    /// One agent's position was adopted
    Selected { agent_id: AgentId },
    /// Complementary positions were merged
    Synthesized { agents: Vec<AgentId> },
}

/// Recorded resolution of a conflicting view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub kind: ResolutionKind,
    /// Content the participants settle on
    pub content: String,
    pub confidence: f64,
    /// Human-readable explanation of the decision
    pub note: String,
}

/// A disagreement between participants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictingView {
    pub topic: String,
    pub positions: Vec<AgentPosition>,
    pub resolution: Option<Resolution>,
    pub recorded_at: DateTime<Utc>,
}

impl ConflictingView {
    pub fn new(topic: impl Into<String>, positions: Vec<AgentPosition>) -> Self {
        Self {
            topic: topic.into(),
            positions,
            resolution: None,
            recorded_at: Utc::now(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolution.is_some()
    }
}

/// State shared by all participants of a session.
///
/// Conflicting views are append-only, and a resolution, once recorded, is
/// never replaced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SharedContext {
    pub agreed_decisions: Vec<String>,
    conflicting_views: Vec<ConflictingView>,
}

impl SharedContext {
    pub fn conflicting_views(&self) -> &[ConflictingView] {
        &self.conflicting_views
    }

    /// Append a view and return its index.
    pub fn record_view(&mut self, view: ConflictingView) -> usize {
        self.conflicting_views.push(view);
        self.conflicting_views.len() - 1
    }

    /// Attach a resolution to a still-unresolved view.
    pub fn record_resolution(
        &mut self,
        index: usize,
        resolution: Resolution,
    ) -> Result<(), DomainError> {
        let view = self
            .conflicting_views
            .get_mut(index)
            .ok_or(DomainError::UnknownConflictingView(index))?;
        if view.is_resolved() {
            return Err(DomainError::ResolutionAlreadyRecorded(index));
        }
        self.agreed_decisions.push(resolution.content.clone());
        view.resolution = Some(resolution);
        Ok(())
    }

    pub fn record_agreement(&mut self, decision: impl Into<String>) {
        self.agreed_decisions.push(decision.into());
    }

    pub fn unresolved_count(&self) -> usize {
        self.conflicting_views.iter().filter(|v| !v.is_resolved()).count()
    }

    pub fn all_resolved(&self) -> bool {
        self.unresolved_count() == 0
    }
}

/// A consensus-building session among a set of agents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collaboration {
    pub id: CollaborationId,
    pub project_id: ProjectId,
    pub session_type: SessionType,
    pub participants: Vec<AgentId>,
    pub status: CollaborationStatus,
    pub shared_context: SharedContext,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Collaboration {
    pub fn new(
        project_id: ProjectId,
        participants: Vec<AgentId>,
        session_type: SessionType,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: CollaborationId::generate(),
            project_id,
            session_type,
            participants,
            status: CollaborationStatus::Active,
            shared_context: SharedContext::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Re-evaluate consensus: `Consensus` iff every view is resolved,
    /// `Conflict` otherwise. Closed sessions keep their status.
    pub fn evaluate_consensus(&mut self) -> bool {
        let reached = self.shared_context.all_resolved();
        if self.status != CollaborationStatus::Closed {
            self.status = if reached {
                CollaborationStatus::Consensus
            } else {
                CollaborationStatus::Conflict
            };
            self.touch();
        }
        reached
    }

    pub fn close(&mut self) {
        self.status = CollaborationStatus::Closed;
        self.touch();
    }

    /// Whether an unsettled session has outlived `timeout`.
    pub fn is_expired(&self, now: DateTime<Utc>, timeout: Duration) -> bool {
        self.is_active() && now - self.created_at >= timeout
    }

    /// Resolution backed by the highest confidence (earliest wins ties).
    pub fn leading_resolution(&self) -> Option<&Resolution> {
        self.shared_context
            .conflicting_views()
            .iter()
            .filter_map(|v| v.resolution.as_ref())
            .fold(None, |best: Option<&Resolution>, r| match best {
                Some(b) if b.confidence >= r.confidence => Some(b),
                _ => Some(r),
            })
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(agent: &str, content: &str, confidence: f64) -> AgentPosition {
        AgentPosition {
            agent_id: AgentId::new(agent),
            thought_id: None,
            content: content.to_string(),
            confidence,
            aggregate_confidence: confidence,
        }
    }

    fn resolution(content: &str, confidence: f64) -> Resolution {
        Resolution {
            kind: ResolutionKind::Selected {
                agent_id: AgentId::new("a"),
            },
            content: content.to_string(),
            confidence,
            note: String::new(),
        }
    }

    fn collaboration() -> Collaboration {
        Collaboration::new(
            ProjectId::new("p"),
            vec![AgentId::new("a"), AgentId::new("b")],
            SessionType::ProblemSolving,
        )
    }

    #[test]
    fn test_consensus_when_all_views_resolved() {
        let mut collab = collaboration();
        let index = collab.shared_context.record_view(ConflictingView::new(
            "approach",
            vec![position("a", "REST", 0.6), position("b", "gRPC", 0.7)],
        ));
        assert!(!collab.evaluate_consensus());
        assert_eq!(collab.status, CollaborationStatus::Conflict);

        collab
            .shared_context
            .record_resolution(index, resolution("gRPC", 0.7))
            .unwrap();
        assert!(collab.evaluate_consensus());
        assert_eq!(collab.status, CollaborationStatus::Consensus);
        assert_eq!(collab.shared_context.agreed_decisions, vec!["gRPC"]);
    }

    #[test]
    fn test_resolution_cannot_be_replaced() {
        let mut context = SharedContext::default();
        let index = context.record_view(ConflictingView::new("x", vec![]));
        context.record_resolution(index, resolution("first", 0.5)).unwrap();

        let err = context
            .record_resolution(index, resolution("second", 0.9))
            .unwrap_err();
        assert_eq!(err, DomainError::ResolutionAlreadyRecorded(index));
        assert_eq!(
            context.conflicting_views()[0].resolution.as_ref().unwrap().content,
            "first"
        );
        assert_eq!(
            context.record_resolution(7, resolution("x", 0.1)),
            Err(DomainError::UnknownConflictingView(7))
        );
    }

    #[test]
    fn test_closed_session_keeps_status() {
        let mut collab = collaboration();
        collab.close();
        assert!(collab.evaluate_consensus());
        assert_eq!(collab.status, CollaborationStatus::Closed);
        assert!(!collab.is_active());
    }

    #[test]
    fn test_expiry() {
        let collab = collaboration();
        let later = collab.created_at + Duration::seconds(120);
        assert!(collab.is_expired(later, Duration::seconds(60)));
        assert!(!collab.is_expired(collab.created_at, Duration::seconds(60)));
    }

    #[test]
    fn test_leading_resolution_prefers_confidence() {
        let mut collab = collaboration();
        for (content, confidence) in [("a", 0.6), ("b", 0.8), ("c", 0.8)] {
            let index = collab
                .shared_context
                .record_view(ConflictingView::new(content, vec![]));
            collab
                .shared_context
                .record_resolution(index, resolution(content, confidence))
                .unwrap();
        }
        assert_eq!(collab.leading_resolution().unwrap().content, "b");
    }

    #[test]
    fn test_session_type_from_str() {
        assert_eq!(
            "code-review".parse::<SessionType>().unwrap(),
            SessionType::CodeReview
        );
        assert!("chat".parse::<SessionType>().is_err());
    }
}
