//! In-memory agent store

use super::{Channels, lock};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use thinktank_application::{AgentStore, StoreError, Subscription};
use thinktank_domain::{Agent, AgentId, AgentStatus, ProjectId};
use tracing::debug;

#[derive(Default)]
struct State {
    /// Agents per project, in registration order
    projects: HashMap<ProjectId, Vec<Agent>>,
    owners: HashMap<AgentId, ProjectId>,
    channels: Channels<Agent>,
}

impl State {
    fn agents(&self, project_id: &ProjectId) -> Vec<Agent> {
        self.projects.get(project_id).cloned().unwrap_or_default()
    }

    fn modify(&mut self, agent_id: &AgentId, f: impl FnOnce(&mut Agent)) -> Result<(), StoreError> {
        let project_id = self
            .owners
            .get(agent_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("agent {}", agent_id)))?;
        let agent = self
            .projects
            .get_mut(&project_id)
            .and_then(|agents| agents.iter_mut().find(|a| &a.id == agent_id))
            .ok_or_else(|| StoreError::NotFound(format!("agent {}", agent_id)))?;
        f(agent);

        let snapshot = self.agents(&project_id);
        self.channels.publish(&project_id, snapshot);
        Ok(())
    }
}

/// Agent store that keeps every agent in process memory
#[derive(Default)]
pub struct InMemoryAgentStore {
    state: Mutex<State>,
}

impl InMemoryAgentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `agents`; later duplicates are skipped.
    pub fn with_agents(agents: impl IntoIterator<Item = Agent>) -> Self {
        let store = Self::new();
        for agent in agents {
            if let Err(e) = store.register(agent) {
                debug!("Skipping seed agent: {}", e);
            }
        }
        store
    }

    /// Add an agent to its project.
    pub fn register(&self, agent: Agent) -> Result<(), StoreError> {
        let mut state = lock(&self.state, "agent store")?;
        if state.owners.contains_key(&agent.id) {
            return Err(StoreError::Conflict(format!("agent {} already exists", agent.id)));
        }

        let project_id = agent.project_id.clone();
        state.owners.insert(agent.id.clone(), project_id.clone());
        state.projects.entry(project_id.clone()).or_default().push(agent);

        let snapshot = state.agents(&project_id);
        state.channels.publish(&project_id, snapshot);
        Ok(())
    }

    pub fn get(&self, agent_id: &AgentId) -> Option<Agent> {
        let state = lock(&self.state, "agent store").ok()?;
        let project_id = state.owners.get(agent_id)?;
        state
            .projects
            .get(project_id)?
            .iter()
            .find(|a| &a.id == agent_id)
            .cloned()
    }
}

#[async_trait]
impl AgentStore for InMemoryAgentStore {
    async fn agents_by_project(&self, project_id: &ProjectId) -> Result<Vec<Agent>, StoreError> {
        Ok(lock(&self.state, "agent store")?.agents(project_id))
    }

    fn subscribe_agents(&self, project_id: &ProjectId) -> Subscription<Agent> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let current = state.agents(project_id);
        state.channels.subscribe(project_id, || current)
    }

    async fn update_agent_status(
        &self,
        agent_id: &AgentId,
        status: AgentStatus,
    ) -> Result<(), StoreError> {
        lock(&self.state, "agent store")?.modify(agent_id, |agent| agent.status = status)
    }

    async fn record_performance(
        &self,
        agent_id: &AgentId,
        success: bool,
        confidence: Option<f64>,
    ) -> Result<(), StoreError> {
        lock(&self.state, "agent store")?
            .modify(agent_id, |agent| agent.metrics.record(success, confidence))
    }
}
