//! Thought storage port

use super::store::StoreError;
use async_trait::async_trait;
use thinktank_domain::{ProjectId, Thought};

#[async_trait]
pub trait ThoughtStore: Send + Sync {
    /// Persist one thought. Thoughts are immutable once stored.
    async fn insert_thought(&self, project_id: &ProjectId, thought: &Thought)
    -> Result<(), StoreError>;
}
