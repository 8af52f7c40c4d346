//! In-memory thought store

use super::lock;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use thinktank_application::{StoreError, ThoughtStore};
use thinktank_domain::{AgentId, ProjectId, Thought, ThoughtId};

#[derive(Default)]
struct State {
    projects: HashMap<ProjectId, Vec<Thought>>,
    ids: HashSet<ThoughtId>,
}

/// Append-only thought store
///
/// Thoughts are immutable once persisted; re-inserting an id is a conflict.
#[derive(Default)]
pub struct InMemoryThoughtStore {
    state: Mutex<State>,
}

impl InMemoryThoughtStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn thoughts_by_project(&self, project_id: &ProjectId) -> Vec<Thought> {
        lock(&self.state, "thought store")
            .map(|state| state.projects.get(project_id).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    pub fn thoughts_by_agent(&self, project_id: &ProjectId, agent_id: &AgentId) -> Vec<Thought> {
        self.thoughts_by_project(project_id)
            .into_iter()
            .filter(|t| &t.agent_id == agent_id)
            .collect()
    }

    pub fn len(&self) -> usize {
        lock(&self.state, "thought store")
            .map(|state| state.ids.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ThoughtStore for InMemoryThoughtStore {
    async fn insert_thought(
        &self,
        project_id: &ProjectId,
        thought: &Thought,
    ) -> Result<(), StoreError> {
        let mut state = lock(&self.state, "thought store")?;
        if !state.ids.insert(thought.id.clone()) {
            return Err(StoreError::Conflict(format!("thought {} already stored", thought.id)));
        }
        state
            .projects
            .entry(project_id.clone())
            .or_default()
            .push(thought.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_query() {
        let store = InMemoryThoughtStore::new();
        let project = ProjectId::new("alpha");
        let root = Thought::root(AgentId::new("ada"), "use REST", 0.7);
        let child = Thought::child_of(&root, "use REST with paging", 0.8);
        let other = Thought::root(AgentId::new("alan"), "use gRPC", 0.6);

        for thought in [&root, &child, &other] {
            store.insert_thought(&project, thought).await.unwrap();
        }

        assert_eq!(store.len(), 3);
        assert_eq!(store.thoughts_by_project(&project)[1], child);
        assert_eq!(store.thoughts_by_agent(&project, &AgentId::new("ada")).len(), 2);
        assert!(store.thoughts_by_project(&ProjectId::new("beta")).is_empty());
    }

    #[tokio::test]
    async fn test_thoughts_are_immutable() {
        let store = InMemoryThoughtStore::new();
        let project = ProjectId::new("alpha");
        let thought = Thought::root(AgentId::new("ada"), "use REST", 0.7);
        store.insert_thought(&project, &thought).await.unwrap();

        let err = store.insert_thought(&project, &thought).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.len(), 1);
    }
}
