//! Agent storage port
//!
//! Agent status is the only shared mutable state touched during a request.
//! It changes exclusively through this port.

use super::store::{StoreError, Subscription};
use async_trait::async_trait;
use thinktank_domain::{Agent, AgentId, AgentStatus, ProjectId};

#[async_trait]
pub trait AgentStore: Send + Sync {
    /// All agents owned by a project, in a stable order.
    async fn agents_by_project(&self, project_id: &ProjectId) -> Result<Vec<Agent>, StoreError>;

    /// Subscribe to the agent list of a project.
    fn subscribe_agents(&self, project_id: &ProjectId) -> Subscription<Agent>;

    async fn update_agent_status(
        &self,
        agent_id: &AgentId,
        status: AgentStatus,
    ) -> Result<(), StoreError>;

    /// Fold one request outcome into the agent's rolling metrics.
    async fn record_performance(
        &self,
        agent_id: &AgentId,
        success: bool,
        confidence: Option<f64>,
    ) -> Result<(), StoreError>;
}
