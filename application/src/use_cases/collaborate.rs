//! Collaboration and consensus management
//!
//! A session compares the top thought of every participant. Each pair whose
//! top thoughts diverge becomes a conflicting view, and the configured
//! [`ResolutionStrategy`](thinktank_domain::ResolutionStrategy) settles it if
//! it can. Consensus is reached once every view carries a resolution.
//!
//! Sessions live in memory for the lifetime of the manager; every change is
//! written through to the collaboration store on a best-effort basis.

use crate::config::CollaborationParams;
use crate::ports::collaboration_store::CollaborationStore;
use crate::ports::store::Subscription;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thinktank_domain::collaboration::{equivalent, jaccard_similarity};
use thinktank_domain::{
    AgentId, AgentPosition, Collaboration, CollaborationId, ConflictingView, DomainError,
    ProjectId, SessionType, Thought, ThoughtTree,
};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur while managing a collaboration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollaborationError {
    #[error("Collaboration {0} not found")]
    NotFound(CollaborationId),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Runs consensus sessions among agents
pub struct CollaborationManager {
    store: Arc<dyn CollaborationStore>,
    params: CollaborationParams,
    sessions: Mutex<HashMap<CollaborationId, Collaboration>>,
}

impl CollaborationManager {
    pub fn new(store: Arc<dyn CollaborationStore>, params: CollaborationParams) -> Self {
        Self {
            store,
            params,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn params(&self) -> &CollaborationParams {
        &self.params
    }

    /// Open a session over `tree`, recording and resolving divergences.
    ///
    /// Participants without a thought in the tree take no position.
    pub async fn start_collaboration(
        &self,
        project_id: &ProjectId,
        participants: &[AgentId],
        tree: &ThoughtTree,
        session_type: SessionType,
    ) -> Result<Collaboration, CollaborationError> {
        let mut collaboration =
            Collaboration::new(project_id.clone(), participants.to_vec(), session_type);

        let tops: Vec<(&AgentId, &Thought)> = participants
            .iter()
            .filter_map(|agent| tree.top_thought_for(agent).map(|t| (agent, t)))
            .collect();

        for (i, (agent_a, top_a)) in tops.iter().enumerate() {
            for (agent_b, top_b) in &tops[i + 1..] {
                let similarity = jaccard_similarity(&top_a.content, &top_b.content);
                if similarity >= self.params.divergence_threshold {
                    continue;
                }
                debug!(
                    "Agents {} and {} diverge (similarity {:.2})",
                    agent_a, agent_b, similarity
                );
                let view = ConflictingView::new(
                    format!("Approach of {} vs {}", agent_a, agent_b),
                    vec![position(agent_a, top_a, &tops), position(agent_b, top_b, &tops)],
                );
                let index = collaboration.shared_context.record_view(view);
                let resolution = self
                    .params
                    .strategy
                    .resolve(&collaboration.shared_context.conflicting_views()[index].positions);
                if let Some(resolution) = resolution {
                    collaboration
                        .shared_context
                        .record_resolution(index, resolution)?;
                }
            }
        }

        if collaboration.shared_context.conflicting_views().is_empty()
            && let Some(top) = tree.top_thought()
        {
            collaboration.shared_context.record_agreement(top.content.clone());
        }

        info!(
            "Started {} collaboration {} with {} participants ({} conflicting views, {} unresolved)",
            collaboration.session_type,
            collaboration.id,
            participants.len(),
            collaboration.shared_context.conflicting_views().len(),
            collaboration.shared_context.unresolved_count()
        );

        if let Err(e) = self.store.insert_collaboration(&collaboration).await {
            warn!("Persistence failure for collaboration {}: {}", collaboration.id, e);
        }
        self.lock_sessions()
            .insert(collaboration.id.clone(), collaboration.clone());
        Ok(collaboration)
    }

    /// Settle the session status: `Consensus` iff every view is resolved.
    pub async fn reach_consensus(&self, id: &CollaborationId) -> Result<bool, CollaborationError> {
        let (reached, snapshot) = {
            let mut sessions = self.lock_sessions();
            let collaboration = sessions
                .get_mut(id)
                .ok_or_else(|| CollaborationError::NotFound(id.clone()))?;
            let reached = collaboration.evaluate_consensus();
            (reached, collaboration.clone())
        };

        debug!("Collaboration {} is now {}", id, snapshot.status);
        self.persist(&snapshot).await;
        Ok(reached)
    }

    /// Close a session and stop tracking it; the store keeps the closed copy.
    pub async fn close_collaboration(&self, id: &CollaborationId) -> Result<(), CollaborationError> {
        let mut collaboration = self
            .lock_sessions()
            .remove(id)
            .ok_or_else(|| CollaborationError::NotFound(id.clone()))?;
        collaboration.close();
        self.persist(&collaboration).await;
        Ok(())
    }

    /// Close every unsettled session older than the session timeout.
    ///
    /// Closed sessions, and settled ones untouched for a full timeout, are
    /// dropped from memory. Returns the number of sessions closed.
    pub async fn close_expired(&self, now: DateTime<Utc>) -> usize {
        let timeout = self.params.session_timeout_chrono();
        let mut expired = Vec::new();
        {
            let mut sessions = self.lock_sessions();
            sessions.retain(|_, c| {
                if c.is_expired(now, timeout) {
                    c.close();
                    expired.push(c.clone());
                    return false;
                }
                c.is_active() || now - c.updated_at < timeout
            });
        }

        for collaboration in &expired {
            info!("Closed expired collaboration {}", collaboration.id);
            self.persist(collaboration).await;
        }
        expired.len()
    }

    /// Unsettled sessions of a project, oldest first.
    pub fn active_collaborations(&self, project_id: &ProjectId) -> Vec<Collaboration> {
        let mut active: Vec<Collaboration> = self
            .lock_sessions()
            .values()
            .filter(|c| &c.project_id == project_id && c.is_active())
            .cloned()
            .collect();
        active.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        active
    }

    /// A session still tracked in memory. Closed sessions live only in the store.
    pub fn get(&self, id: &CollaborationId) -> Option<Collaboration> {
        self.lock_sessions().get(id).cloned()
    }

    /// Subscribe to a project's active collaborations as published by the store.
    pub fn subscribe(&self, project_id: &ProjectId) -> Subscription<Collaboration> {
        self.store.subscribe_collaborations(project_id)
    }

    async fn persist(&self, collaboration: &Collaboration) {
        if let Err(e) = self.store.update_collaboration(collaboration).await {
            warn!("Persistence failure for collaboration {}: {}", collaboration.id, e);
        }
    }

    fn lock_sessions(&self) -> std::sync::MutexGuard<'_, HashMap<CollaborationId, Collaboration>> {
        // A poisoned map still holds consistent sessions: every mutation is a
        // single method call on one entry.
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Position of `agent` with its support summed over equivalent top thoughts.
fn position(agent: &AgentId, top: &Thought, tops: &[(&AgentId, &Thought)]) -> AgentPosition {
    let aggregate_confidence = tops
        .iter()
        .filter(|(_, other)| equivalent(&other.content, &top.content))
        .map(|(_, other)| other.confidence)
        .sum();
    AgentPosition {
        agent_id: agent.clone(),
        thought_id: Some(top.id.clone()),
        content: top.content.clone(),
        confidence: top.confidence,
        aggregate_confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::MemoryCollaborationStore;
    use std::time::Duration;
    use thinktank_domain::{CollaborationStatus, ResolutionStrategy, TreeBounds};

    fn tree(tops: &[(&str, &str, f64)]) -> ThoughtTree {
        let mut tree = ThoughtTree::new(TreeBounds::default());
        for (agent, content, confidence) in tops {
            tree.insert(Thought::root(AgentId::new(*agent), *content, *confidence))
                .unwrap();
        }
        tree
    }

    fn ids(names: &[&str]) -> Vec<AgentId> {
        names.iter().map(|n| AgentId::new(*n)).collect()
    }

    fn manager(strategy: ResolutionStrategy) -> (CollaborationManager, Arc<MemoryCollaborationStore>) {
        let store = Arc::new(MemoryCollaborationStore::default());
        let params = CollaborationParams::default().with_strategy(strategy);
        (CollaborationManager::new(store.clone(), params), store)
    }

    #[tokio::test]
    async fn test_agreeing_agents_record_no_views() {
        let (manager, store) = manager(ResolutionStrategy::HighestConfidence);
        let tree = tree(&[
            ("a", "Expose a REST API with JSON resources", 0.8),
            ("b", "Expose a REST API with JSON resources", 0.7),
        ]);

        let session = manager
            .start_collaboration(&ProjectId::new("p"), &ids(&["a", "b"]), &tree, SessionType::ProblemSolving)
            .await
            .unwrap();

        assert!(session.shared_context.conflicting_views().is_empty());
        assert_eq!(session.shared_context.agreed_decisions.len(), 1);
        assert!(manager.reach_consensus(&session.id).await.unwrap());
        assert_eq!(manager.get(&session.id).unwrap().status, CollaborationStatus::Consensus);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_divergent_pairs_are_resolved_by_confidence() {
        let (manager, _) = manager(ResolutionStrategy::HighestConfidence);
        let tree = tree(&[
            ("a", "Expose a REST API with JSON resources", 0.8),
            ("b", "Stream events through a message broker", 0.6),
        ]);

        let session = manager
            .start_collaboration(&ProjectId::new("p"), &ids(&["a", "b"]), &tree, SessionType::DecisionMaking)
            .await
            .unwrap();

        let views = session.shared_context.conflicting_views();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].positions.len(), 2);
        let resolution = views[0].resolution.as_ref().unwrap();
        assert_eq!(resolution.content, "Expose a REST API with JSON resources");
        assert!(manager.reach_consensus(&session.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_aggregate_confidence_counts_equivalent_positions() {
        let (manager, _) = manager(ResolutionStrategy::HighestConfidence);
        let tree = tree(&[
            ("a", "Stream events through a message broker", 0.5),
            ("b", "stream events   through a message broker", 0.5),
            ("c", "Expose a REST API with JSON resources", 0.9),
        ]);

        let session = manager
            .start_collaboration(&ProjectId::new("p"), &ids(&["a", "b", "c"]), &tree, SessionType::DecisionMaking)
            .await
            .unwrap();

        // a-c and b-c diverge; a-b agree
        let views = session.shared_context.conflicting_views();
        assert_eq!(views.len(), 2);
        let broker = views[0]
            .positions
            .iter()
            .find(|p| p.agent_id == AgentId::new("a"))
            .unwrap();
        assert!((broker.aggregate_confidence - 1.0).abs() < 1e-9);
        assert_eq!(
            views[0].resolution.as_ref().unwrap().content,
            "Stream events through a message broker"
        );
    }

    #[tokio::test]
    async fn test_strict_strategy_leaves_close_calls_unresolved() {
        let (manager, _) = manager(ResolutionStrategy::Strict { min_margin: 0.2 });
        let tree = tree(&[
            ("a", "Expose a REST API with JSON resources", 0.7),
            ("b", "Stream events through a message broker", 0.65),
        ]);

        let session = manager
            .start_collaboration(&ProjectId::new("p"), &ids(&["a", "b"]), &tree, SessionType::CodeReview)
            .await
            .unwrap();

        assert_eq!(session.shared_context.unresolved_count(), 1);
        assert!(!manager.reach_consensus(&session.id).await.unwrap());
        let stored = manager.get(&session.id).unwrap();
        assert_eq!(stored.status, CollaborationStatus::Conflict);
        assert_eq!(manager.active_collaborations(&ProjectId::new("p")).len(), 1);
    }

    #[tokio::test]
    async fn test_synthesis_merges_complementary_positions() {
        let (manager, _) = manager(ResolutionStrategy::default());
        let tree = tree(&[
            ("a", "Expose a REST API with JSON resources", 0.7),
            ("b", "Stream events through a message broker", 0.68),
        ]);

        let session = manager
            .start_collaboration(&ProjectId::new("p"), &ids(&["a", "b"]), &tree, SessionType::Brainstorming)
            .await
            .unwrap();

        let resolution = session.leading_resolution().unwrap();
        assert!(resolution.content.starts_with("Combined approach:"));
        assert!(resolution.content.contains("message broker"));
    }

    #[tokio::test]
    async fn test_unknown_collaboration_is_an_error() {
        let (manager, _) = manager(ResolutionStrategy::default());
        let id = CollaborationId::new("missing");
        assert_eq!(
            manager.reach_consensus(&id).await.unwrap_err(),
            CollaborationError::NotFound(id.clone())
        );
        assert!(manager.close_collaboration(&id).await.is_err());
    }

    #[tokio::test]
    async fn test_close_expired_sessions() {
        let store = Arc::new(MemoryCollaborationStore::default());
        let params = CollaborationParams::default()
            .with_strategy(ResolutionStrategy::Strict { min_margin: 1.0 })
            .with_session_timeout(Duration::from_secs(60));
        let manager = CollaborationManager::new(store.clone(), params);
        let tree = tree(&[
            ("a", "Expose a REST API with JSON resources", 0.7),
            ("b", "Stream events through a message broker", 0.6),
        ]);
        let project = ProjectId::new("p");

        let session = manager
            .start_collaboration(&project, &ids(&["a", "b"]), &tree, SessionType::ProblemSolving)
            .await
            .unwrap();
        manager.reach_consensus(&session.id).await.unwrap();

        assert_eq!(manager.close_expired(Utc::now()).await, 0);
        let later = Utc::now() + chrono::Duration::seconds(120);
        assert_eq!(manager.close_expired(later).await, 1);
        assert!(manager.get(&session.id).is_none());
        assert!(manager.active_collaborations(&project).is_empty());
        assert!(store.subscribe_collaborations(&project).borrow().is_empty());

        let stored = store.collaborations_by_project(&project).await.unwrap();
        assert_eq!(stored[0].status, CollaborationStatus::Closed);
        assert_eq!(
            manager.reach_consensus(&session.id).await.unwrap_err(),
            CollaborationError::NotFound(session.id.clone())
        );
    }

    #[tokio::test]
    async fn test_finished_sessions_are_not_kept_in_memory() {
        let store = Arc::new(MemoryCollaborationStore::default());
        let params = CollaborationParams::default()
            .with_strategy(ResolutionStrategy::HighestConfidence)
            .with_session_timeout(Duration::from_secs(60));
        let manager = CollaborationManager::new(store.clone(), params);
        let tree = tree(&[
            ("a", "Expose a REST API with JSON resources", 0.7),
            ("b", "Stream events through a message broker", 0.6),
        ]);
        let project = ProjectId::new("p");

        let mut sessions = Vec::new();
        for _ in 0..3 {
            let session = manager
                .start_collaboration(&project, &ids(&["a", "b"]), &tree, SessionType::DecisionMaking)
                .await
                .unwrap();
            sessions.push(session.id);
        }
        manager.close_collaboration(&sessions[0]).await.unwrap();
        assert!(manager.get(&sessions[0]).is_none());
        assert!(manager.reach_consensus(&sessions[1]).await.unwrap());

        // Nothing is old enough yet
        assert_eq!(manager.close_expired(Utc::now()).await, 0);
        assert!(manager.get(&sessions[1]).is_some());
        assert!(manager.get(&sessions[2]).is_some());

        let later = Utc::now() + chrono::Duration::seconds(120);
        assert_eq!(manager.close_expired(later).await, 1);
        assert!(sessions.iter().all(|id| manager.get(id).is_none()));

        let stored = store.collaborations_by_project(&project).await.unwrap();
        assert_eq!(stored.len(), 3);
        let status = |id: &CollaborationId| {
            stored.iter().find(|c| &c.id == id).map(|c| c.status)
        };
        assert_eq!(status(&sessions[0]), Some(CollaborationStatus::Closed));
        assert_eq!(status(&sessions[1]), Some(CollaborationStatus::Consensus));
        assert_eq!(status(&sessions[2]), Some(CollaborationStatus::Closed));
    }

    #[tokio::test]
    async fn test_store_failure_does_not_abort_session() {
        let store = Arc::new(MemoryCollaborationStore::failing());
        let manager = CollaborationManager::new(store, CollaborationParams::default());
        let tree = tree(&[("a", "Expose a REST API", 0.7)]);

        let session = manager
            .start_collaboration(&ProjectId::new("p"), &ids(&["a"]), &tree, SessionType::ProblemSolving)
            .await
            .unwrap();
        assert!(manager.reach_consensus(&session.id).await.unwrap());
    }
}
