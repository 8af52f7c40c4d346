//! In-memory collaboration store

use super::{Channels, lock};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use thinktank_application::{CollaborationStore, StoreError, Subscription};
use thinktank_domain::{Collaboration, ProjectId};

#[derive(Default)]
struct State {
    projects: HashMap<ProjectId, Vec<Collaboration>>,
    channels: Channels<Collaboration>,
}

impl State {
    fn active(&self, project_id: &ProjectId) -> Vec<Collaboration> {
        self.projects
            .get(project_id)
            .map(|all| all.iter().filter(|c| c.is_active()).cloned().collect())
            .unwrap_or_default()
    }

    fn publish(&self, project_id: &ProjectId) {
        self.channels.publish(project_id, self.active(project_id));
    }
}

/// Collaboration store that keeps every session in process memory
///
/// Subscribers receive the project's active sessions only.
#[derive(Default)]
pub struct InMemoryCollaborationStore {
    state: Mutex<State>,
}

impl InMemoryCollaborationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CollaborationStore for InMemoryCollaborationStore {
    async fn insert_collaboration(&self, collaboration: &Collaboration) -> Result<(), StoreError> {
        let mut state = lock(&self.state, "collaboration store")?;
        let sessions = state
            .projects
            .entry(collaboration.project_id.clone())
            .or_default();
        if sessions.iter().any(|c| c.id == collaboration.id) {
            return Err(StoreError::Conflict(format!(
                "collaboration {} already exists",
                collaboration.id
            )));
        }
        sessions.push(collaboration.clone());
        state.publish(&collaboration.project_id);
        Ok(())
    }

    async fn update_collaboration(&self, collaboration: &Collaboration) -> Result<(), StoreError> {
        let mut state = lock(&self.state, "collaboration store")?;
        let stored = state
            .projects
            .get_mut(&collaboration.project_id)
            .and_then(|sessions| sessions.iter_mut().find(|c| c.id == collaboration.id))
            .ok_or_else(|| StoreError::NotFound(format!("collaboration {}", collaboration.id)))?;
        *stored = collaboration.clone();
        state.publish(&collaboration.project_id);
        Ok(())
    }

    async fn collaborations_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<Collaboration>, StoreError> {
        let state = lock(&self.state, "collaboration store")?;
        Ok(state.projects.get(project_id).cloned().unwrap_or_default())
    }

    fn subscribe_collaborations(&self, project_id: &ProjectId) -> Subscription<Collaboration> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let current = state.active(project_id);
        state.channels.subscribe(project_id, || current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thinktank_domain::{AgentId, SessionType};

    fn session(project: &str) -> Collaboration {
        Collaboration::new(
            ProjectId::new(project),
            vec![AgentId::new("ada"), AgentId::new("alan")],
            SessionType::ProblemSolving,
        )
    }

    #[tokio::test]
    async fn test_insert_and_list() {
        let store = InMemoryCollaborationStore::new();
        let first = session("alpha");
        store.insert_collaboration(&first).await.unwrap();
        store.insert_collaboration(&session("beta")).await.unwrap();

        let alpha = store
            .collaborations_by_project(&ProjectId::new("alpha"))
            .await
            .unwrap();
        assert_eq!(alpha, vec![first.clone()]);

        let err = store.insert_collaboration(&first).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_unknown_is_not_found() {
        let store = InMemoryCollaborationStore::new();
        let err = store
            .update_collaboration(&session("alpha"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_closed_sessions_leave_subscription() {
        let store = InMemoryCollaborationStore::new();
        let project = ProjectId::new("alpha");
        let mut rx = store.subscribe_collaborations(&project);
        assert!(rx.borrow_and_update().is_empty());

        let mut collaboration = session("alpha");
        store.insert_collaboration(&collaboration).await.unwrap();
        rx.changed().await.unwrap();
        let opened = rx.borrow_and_update().clone();
        assert_eq!(opened.len(), 1);

        collaboration.close();
        store.update_collaboration(&collaboration).await.unwrap();
        rx.changed().await.unwrap();
        let closed = rx.borrow_and_update().clone();
        assert!(closed.is_empty());
        assert!(closed.sequence > opened.sequence);

        // Closed sessions remain queryable
        let all = store.collaborations_by_project(&project).await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(!all[0].is_active());
    }
}
